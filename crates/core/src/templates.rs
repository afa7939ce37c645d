//! GLSL templates for typed multi-texture sprites and capability probing.
//!
//! The sprite templates target GLSL ES 3.00 (`#version 300 es`), which must
//! stay the first line: nothing may be inserted ahead of it when compiling.
//!
//! Fragment placeholders, substituted in this order:
//! `%count%`, `%forloop%`, `%sampler_type%`, `%color_type%`,
//! `%steps_uniforms%`, `%steps%`, `%steps_output%`.

/// Vertex stage of the sprite program. Has no placeholders.
pub const SPRITE_VERTEX_TEMPLATE: &str = r#"#version 300 es
precision highp float;
precision highp int;
in vec2 aVertexPosition;
in vec2 aTextureCoord;
in vec4 aColor;
in float aTextureId;

uniform mat3 projectionMatrix;

out vec2 vTextureCoord;
out vec4 vColor;
out float vTextureId;

void main(void){
    gl_Position = vec4((projectionMatrix * vec3(aVertexPosition, 1.0)).xy, 0.0, 1.0);

    vTextureCoord = aTextureCoord;
    vTextureId = aTextureId;
    vColor = aColor;
}"#;

/// Fragment stage of the sprite program.
pub const SPRITE_FRAGMENT_TEMPLATE: &str = r#"#version 300 es
precision highp float;
precision highp int;
precision highp %sampler_type%;

in vec2 vTextureCoord;
in vec4 vColor;
in float vTextureId;
uniform %sampler_type% uSamplers[%count%];
%steps_uniforms%
out vec4 myOutputColor;

void main(void){
%color_type% color;
%forloop%
%color_type% step0 = color;
%steps%
myOutputColor = %steps_output%;
}"#;

/// GLSL ES 1.00 fragment shader used to probe the driver's branch limit.
/// `%forloop%` receives the if/else chain.
pub const PROBE_FRAGMENT_TEMPLATE: &str = "precision mediump float;
void main(void){
float test = 0.1;
%forloop%
gl_FragColor = vec4(0.0);
}";

/// Name of the sampler array uniform in [`SPRITE_FRAGMENT_TEMPLATE`].
pub const SAMPLERS_UNIFORM: &str = "uSamplers";

/// Name of the projection uniform in [`SPRITE_VERTEX_TEMPLATE`].
pub const PROJECTION_UNIFORM: &str = "projectionMatrix";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_templates_start_with_version_directive() {
        assert!(SPRITE_VERTEX_TEMPLATE.starts_with("#version 300 es\n"));
        assert!(SPRITE_FRAGMENT_TEMPLATE.starts_with("#version 300 es\n"));
    }

    #[test]
    fn vertex_template_has_no_placeholders() {
        assert!(!SPRITE_VERTEX_TEMPLATE.contains('%'));
    }

    #[test]
    fn fragment_template_declares_every_placeholder() {
        for token in [
            "%count%",
            "%forloop%",
            "%sampler_type%",
            "%color_type%",
            "%steps_uniforms%",
            "%steps%",
            "%steps_output%",
        ] {
            assert!(
                SPRITE_FRAGMENT_TEMPLATE.contains(token),
                "missing {token} in:\n{SPRITE_FRAGMENT_TEMPLATE}"
            );
        }
    }

    #[test]
    fn vertex_outputs_match_fragment_inputs() {
        for varying in ["vTextureCoord", "vColor", "vTextureId"] {
            assert!(
                SPRITE_VERTEX_TEMPLATE.contains(&format!(" {varying};")),
                "vertex template does not write {varying}"
            );
            assert!(
                SPRITE_FRAGMENT_TEMPLATE.contains(&format!(" {varying};")),
                "fragment template does not read {varying}"
            );
        }
    }

    #[test]
    fn probe_template_has_no_version_directive() {
        assert!(!PROBE_FRAGMENT_TEMPLATE.contains("#version"));
        assert!(PROBE_FRAGMENT_TEMPLATE.contains("%forloop%"));
    }
}
