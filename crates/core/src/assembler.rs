//! Assembly of typed multi-texture sprite shaders.
//!
//! Generation is plain ordered text substitution. Tokens are replaced in a
//! fixed order (texture count and dispatch first, then sampler and color
//! types, then step wiring) so that no substituted text reintroduces a token
//! that has already been consumed.

use std::borrow::Cow;

use crate::data_type::BaseDataType;
use crate::error::SpriteError;
use crate::gpu::{GpuBackend, ProgramId};
use crate::step::{check_chain, ShaderStep};
use crate::templates::{SAMPLERS_UNIFORM, SPRITE_FRAGMENT_TEMPLATE, SPRITE_VERTEX_TEMPLATE};
use crate::uniforms::{UniformBindings, UniformValue};

/// Vertex and fragment templates fed to the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderTemplates {
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl Default for ShaderTemplates {
    fn default() -> Self {
        Self {
            vertex: Cow::Borrowed(SPRITE_VERTEX_TEMPLATE),
            fragment: Cow::Borrowed(SPRITE_FRAGMENT_TEMPLATE),
        }
    }
}

/// Final shader text for both stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    /// Whether both stages open with their `#version` directive.
    pub fn version_directive_first(&self) -> bool {
        self.vertex.starts_with("#version") && self.fragment.starts_with("#version")
    }
}

/// A linked program together with the uniform values it was bound with.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProgram {
    pub id: ProgramId,
    pub max_textures: u32,
    pub bindings: UniformBindings,
}

/// The if/else chain selecting which sampler to read for the fragment's
/// texture id.
///
/// Texture ids are integers in `[0, max_textures)`. Branch `i` is taken when
/// `vTextureId < i.5`, which avoids comparing floats for equality; the last
/// branch has no test.
pub fn sampler_dispatch_src(max_textures: u32) -> String {
    let mut src = String::from("\n\n");

    for i in 0..max_textures {
        if i > 0 {
            src.push_str("\nelse ");
        }
        if i + 1 < max_textures {
            src.push_str(&format!("if(vTextureId < {i}.5)"));
        }
        src.push_str("\n{");
        src.push_str(&format!("\n\tcolor = texture({SAMPLERS_UNIFORM}[{i}], vTextureCoord);"));
        src.push_str("\n}");
    }

    src.push_str("\n\n");
    src
}

/// Substitutes every fragment placeholder.
pub fn assemble_fragment(
    template: &str,
    steps: &[ShaderStep],
    max_textures: u32,
    base: &BaseDataType,
) -> String {
    let step_uniforms = steps
        .iter()
        .map(|step| step.glsl_headers(base))
        .collect::<Vec<_>>()
        .join("\n");
    let step_bodies = steps
        .iter()
        .enumerate()
        .map(|(i, step)| step.glsl(base, i))
        .collect::<Vec<_>>()
        .join("\n");

    template
        .replace("%count%", &max_textures.to_string())
        .replace("%forloop%", &sampler_dispatch_src(max_textures))
        .replace("%sampler_type%", &base.glsl_sampler_type())
        .replace("%color_type%", &base.glsl_color_type())
        .replace("%steps_uniforms%", &step_uniforms)
        .replace("%steps%", &step_bodies)
        .replace("%steps_output%", &format!("step{}", steps.len()))
}

/// Produces both shader stages for `base` with `max_textures` samplers.
///
/// # Errors
///
/// `InvalidTextureCount` when `max_textures` is zero or exceeds `i32::MAX`
/// (sampler indices are GLSL `int`s), `ChainTypeMismatch`
/// when the steps do not connect the sampled color to a `vec4` output.
pub fn assemble(
    templates: &ShaderTemplates,
    steps: &[ShaderStep],
    max_textures: u32,
    base: &BaseDataType,
) -> Result<ShaderSource, SpriteError> {
    if max_textures == 0 || i32::try_from(max_textures).is_err() {
        return Err(SpriteError::InvalidTextureCount(max_textures));
    }
    check_chain(steps, base)?;

    Ok(ShaderSource {
        vertex: templates.vertex.to_string(),
        fragment: assemble_fragment(&templates.fragment, steps, max_textures, base),
    })
}

/// Assembles, compiles and binds a multi-texture program.
///
/// After linking, the sampler array is set to `[0, max_textures)` and each
/// step writes its uniforms. Compilation failures propagate unchanged; there
/// is no fallback shader.
pub fn compile_multi_texture_program(
    gpu: &mut dyn GpuBackend,
    templates: &ShaderTemplates,
    steps: &mut [ShaderStep],
    max_textures: u32,
    base: &BaseDataType,
) -> Result<CompiledProgram, SpriteError> {
    let source = assemble(templates, steps, max_textures, base)?;
    let sampler_count =
        i32::try_from(max_textures).map_err(|_| SpriteError::InvalidTextureCount(max_textures))?;
    let id = gpu.create_program(&source.vertex, &source.fragment)?;

    let mut bindings = UniformBindings::new();
    bindings.set(
        SAMPLERS_UNIFORM,
        UniformValue::IntArray((0..sampler_count).collect()),
    );
    for step in steps.iter_mut() {
        step.set_attrs(&mut bindings, base)?;
    }
    gpu.apply_uniforms(id, &bindings);

    log::info!(
        "compiled {} sprite program with {max_textures} samplers",
        base.data_type()
    );

    Ok(CompiledProgram {
        id,
        max_textures,
        bindings,
    })
}
