//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: shader generation error (broken step chain, texture count out of range)
//! - 11: I/O error (writing the shader file)
//! - 12: input error (unknown data type, bad settings JSON)
//! - 13: serialization error

use std::fmt;

use typed_sprite_core::SpriteError;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// Shader assembly or renderer configuration failed.
    Sprite(SpriteError),
    /// Writing the shader file failed.
    Io(String),
    /// A user input error (unknown tag, bad settings JSON).
    Input(String),
    /// JSON output could not be produced.
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Sprite(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Sprite(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<SpriteError> for CliError {
    fn from(e: SpriteError) -> Self {
        match e {
            SpriteError::UnknownDataType(_) => CliError::Input(e.to_string()),
            other => CliError::Sprite(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_error_exit_code_is_10() {
        let err = CliError::Sprite(SpriteError::InvalidTextureCount(0));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn io_error_exit_code_is_11() {
        let err = CliError::from(std::io::Error::other("disk full"));
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn unknown_data_type_routes_to_input() {
        let cli_err = CliError::from(SpriteError::UnknownDataType("float32".into()));
        assert_eq!(cli_err.exit_code(), 12);
        assert!(cli_err.to_string().contains("float32"));
    }

    #[test]
    fn chain_mismatch_routes_to_sprite() {
        let cli_err = CliError::from(SpriteError::ChainTypeMismatch {
            step: 0,
            expected: "vec4".into(),
            found: "uvec4".into(),
        });
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("uvec4"));
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
