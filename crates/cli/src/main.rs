#![deny(unsafe_code)]
//! CLI for inspecting typed sprite renderers.
//!
//! Subcommands:
//! - `list` -- print the supported data types and their renderers
//! - `shader <tag>` -- print the generated GLSL for one data type

mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use typed_sprite_core::{assemble, plugin_name, BaseDataType, DataType, RendererSettings, ShaderStep, ShaderTemplates};

#[derive(Parser)]
#[command(name = "typed-sprite", about = "Typed sprite shader generator")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Stage {
    Vertex,
    Fragment,
    Both,
}

#[derive(Subcommand)]
enum Command {
    /// List supported data types with their renderer names.
    List,
    /// Print the shader program generated for a data type.
    Shader {
        /// Data type tag (e.g. "uint16").
        tag: String,

        /// Sampler count; defaults to the settings' ceiling.
        #[arg(short, long)]
        max_textures: Option<u32>,

        /// Which stage to print.
        #[arg(short, long, value_enum, default_value_t = Stage::Fragment)]
        stage: Stage,

        /// Renderer settings as a JSON string.
        #[arg(long, default_value = "{}")]
        settings: String,

        /// Write the output to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn list(json: bool) -> Result<String, CliError> {
    let rows: Vec<(DataType, BaseDataType)> = DataType::ALL.iter().map(|&dt| (dt, dt.into())).collect();

    if json {
        let info: Vec<serde_json::Value> = rows
            .iter()
            .map(|(dt, base)| {
                serde_json::json!({
                    "data_type": dt,
                    "plugin_name": plugin_name(*dt),
                    "sampler_type": base.glsl_sampler_type(),
                    "color_type": base.glsl_color_type(),
                    "max_value": base.max_value(),
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&info)?);
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|(dt, base)| {
            format!(
                "  {:<7} {:<20} {:<10} max {}",
                dt.as_str(),
                plugin_name(*dt),
                base.glsl_sampler_type(),
                base.max_value()
            )
        })
        .collect();
    Ok(format!("Data types:\n{}", lines.join("\n")))
}

fn shader(
    tag: &str,
    max_textures: Option<u32>,
    stage: Stage,
    settings: &str,
    json: bool,
) -> Result<String, CliError> {
    let params: serde_json::Value = serde_json::from_str(settings)
        .map_err(|e| CliError::Input(format!("invalid --settings JSON: {e}")))?;
    let settings = RendererSettings::from_json(&params);

    let base = BaseDataType::from_tag(tag)?;
    let max_textures = max_textures.unwrap_or_else(|| settings.texture_ceiling(u32::MAX));
    let source = assemble(
        &ShaderTemplates::default(),
        &[ShaderStep::min_max()],
        max_textures,
        &base,
    )?;
    log::debug!("assembled {tag} shader with {max_textures} samplers");

    let vertex = matches!(stage, Stage::Vertex | Stage::Both).then_some(source.vertex);
    let fragment = matches!(stage, Stage::Fragment | Stage::Both).then_some(source.fragment);

    if json {
        let info = serde_json::json!({
            "data_type": base.data_type(),
            "plugin_name": plugin_name(base.data_type()),
            "max_textures": max_textures,
            "vertex": vertex,
            "fragment": fragment,
        });
        return Ok(serde_json::to_string_pretty(&info)?);
    }

    Ok([vertex, fragment].into_iter().flatten().collect::<Vec<_>>().join("\n\n"))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => println!("{}", list(cli.json)?),
        Command::Shader {
            tag,
            max_textures,
            stage,
            settings,
            output,
        } => {
            let text = shader(&tag, max_textures, stage, &settings, cli.json)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    eprintln!("wrote {tag} shader -> {}", path.display());
                }
                None => println!("{text}"),
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_shader_arguments() {
        let cli = Cli::try_parse_from([
            "typed-sprite",
            "shader",
            "int16",
            "--max-textures",
            "4",
            "--stage",
            "both",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Shader {
                tag,
                max_textures,
                stage,
                ..
            } => {
                assert_eq!(tag, "int16");
                assert_eq!(max_textures, Some(4));
                assert!(stage == Stage::Both);
            }
            Command::List => panic!("expected shader command"),
        }
    }

    #[test]
    fn list_names_every_renderer() {
        let text = list(false).unwrap();
        for dt in DataType::ALL {
            assert!(text.contains(&plugin_name(dt)), "missing {dt} in:\n{text}");
        }
    }

    #[test]
    fn list_json_is_an_array_of_types() {
        let value: serde_json::Value = serde_json::from_str(&list(true).unwrap()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0]["data_type"], "int8");
        assert_eq!(entries[0]["sampler_type"], "isampler2D");
    }

    #[test]
    fn fragment_honors_max_textures() {
        let text = shader("uint32", Some(3), Stage::Fragment, "{}", false).unwrap();
        assert!(text.starts_with("#version 300 es"));
        assert!(text.contains("uniform usampler2D uSamplers[3];"), "got:\n{text}");
        assert!(!text.contains("gl_Position"));
    }

    #[test]
    fn settings_ceiling_is_the_default_count() {
        let text = shader("int8", None, Stage::Fragment, r#"{"max_textures": 6}"#, false).unwrap();
        assert!(text.contains("uSamplers[6]"), "got:\n{text}");

        let legacy = shader("int8", None, Stage::Fragment, r#"{"legacy": true}"#, false).unwrap();
        assert!(legacy.contains("uSamplers[1]"), "got:\n{legacy}");
    }

    #[test]
    fn json_output_omits_unrequested_stage() {
        let text = shader("uint16", Some(2), Stage::Vertex, "{}", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value["fragment"].is_null());
        assert!(value["vertex"].as_str().unwrap().contains("projectionMatrix"));
        assert_eq!(value["plugin_name"], "typedSprite_uint16");
    }

    #[test]
    fn unknown_tag_is_input_error() {
        let err = shader("float32", None, Stage::Both, "{}", false).err().unwrap();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn bad_settings_json_is_input_error() {
        let err = shader("int8", None, Stage::Both, "{oops", false).err().unwrap();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn zero_textures_is_generation_error() {
        let err = shader("int8", Some(0), Stage::Both, "{}", false).err().unwrap();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn texture_count_past_int_range_is_generation_error() {
        let err = shader("int8", Some(u32::MAX), Stage::Fragment, "{}", false).err().unwrap();
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("4294967295"), "got: {err}");
    }
}
