//! Error types for typed sprite rendering.

use thiserror::Error;

use crate::shader::ShaderError;

/// Errors produced while generating shaders or driving typed renderers.
#[derive(Debug, Error)]
pub enum SpriteError {
    /// A data-type tag outside the supported integer set.
    #[error("unknown data type '{0}': expected one of int8, int16, int32, int64, uint16, uint32, uint64")]
    UnknownDataType(String),

    /// Adjacent shader steps disagree on the type flowing between them.
    #[error("shader step {step} expects input '{expected}' but receives '{found}'")]
    ChainTypeMismatch {
        step: usize,
        expected: String,
        found: String,
    },

    /// A uniform default was generated for a type that is not a GLSL scalar.
    #[error("uniform '{name}' has non-scalar type '{glsl_type}' and cannot take a generated default")]
    UnsupportedUniformType { name: String, glsl_type: String },

    /// A multi-texture shader was requested with no texture slots.
    #[error("invalid texture count {0}: expected 1 to 2147483647 samplers")]
    InvalidTextureCount(u32),

    /// No renderer is registered under the given plugin name.
    #[error("no renderer registered as '{0}'")]
    UnknownRenderer(String),

    /// A shader stage failed to compile or the program failed to link.
    #[error(transparent)]
    Compilation(#[from] ShaderError),

    /// Branch probing reached zero and even that failed to compile.
    #[error("capability probe exhausted: no branch count down from {requested} compiles")]
    CapabilityExhausted { requested: u32 },

    /// Sprites were flushed before the renderer had a compiled program.
    #[error("renderer '{0}' has no compiled program")]
    NotReady(String),

    /// The GPU backend failed to allocate or bind a resource.
    #[error("gpu error: {0}")]
    Gpu(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_data_type_includes_tag_and_choices() {
        let msg = SpriteError::UnknownDataType("float32".into()).to_string();
        assert!(msg.contains("float32"), "missing tag in: {msg}");
        assert!(msg.contains("uint64"), "missing supported set in: {msg}");
    }

    #[test]
    fn chain_type_mismatch_includes_all_fields() {
        let err = SpriteError::ChainTypeMismatch {
            step: 2,
            expected: "uvec4".into(),
            found: "vec4".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains('2'), "missing step in: {msg}");
        assert!(msg.contains("uvec4"), "missing expected in: {msg}");
        assert!(msg.contains("vec4"), "missing found in: {msg}");
    }

    #[test]
    fn compilation_error_is_transparent() {
        let err = SpriteError::from(ShaderError::LinkError("varying mismatch".into()));
        assert!(err.to_string().contains("varying mismatch"));
        assert!(matches!(err, SpriteError::Compilation(_)));
    }

    #[test]
    fn capability_exhausted_mentions_request() {
        let msg = SpriteError::CapabilityExhausted { requested: 16 }.to_string();
        assert!(msg.contains("16"), "missing request in: {msg}");
    }

    #[test]
    fn sprite_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpriteError>();
    }
}
