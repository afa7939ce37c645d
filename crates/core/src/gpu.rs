//! The seam between renderers and the GPU.
//!
//! Renderers never talk to a graphics API directly; every compile, bind
//! and draw goes through [`GpuBackend`]. The `render` feature provides a
//! glow implementation, and tests drive renderers with recording doubles.

use crate::error::SpriteError;
use crate::shader::ShaderError;
use crate::uniforms::{UniformBindings, UniformValue};
use crate::vertex::SpriteVertex;

/// Backend-assigned handle of a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Host-assigned handle of an uploaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Limits queried from the context when renderers initialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuCapabilities {
    /// `MAX_TEXTURE_IMAGE_UNITS` for the fragment stage.
    pub max_texture_image_units: u32,
    /// Whether the context accepts `#version 300 es` shaders (WebGL2 or
    /// GLES 3).
    pub supports_glsl_es3: bool,
}

/// Something that can trial-compile a fragment shader.
pub trait ShaderCompiler {
    /// Compiles `source` as a fragment shader and discards the result.
    fn compile_fragment(&mut self, source: &str) -> Result<(), ShaderError>;
}

/// A compiler owned by a context created just for probing.
///
/// `release` frees the context's GPU resources; it is called exactly once,
/// when the owning [`ProbeContext`](crate::capability::ProbeContext) drops.
pub trait DisposableContext: ShaderCompiler {
    fn release(&mut self);
}

/// GPU operations needed by typed sprite renderers.
pub trait GpuBackend: ShaderCompiler {
    fn capabilities(&self) -> GpuCapabilities;

    /// Compiles both stages and links them, passing the sources through
    /// unchanged.
    fn create_program(&mut self, vertex: &str, fragment: &str) -> Result<ProgramId, SpriteError>;

    fn delete_program(&mut self, program: ProgramId);

    fn use_program(&mut self, program: ProgramId);

    /// Writes one uniform of the currently used program. Names the program
    /// does not expose are ignored.
    fn set_uniform(&mut self, program: ProgramId, name: &str, value: &UniformValue);

    fn bind_texture(&mut self, unit: u32, texture: TextureId) -> Result<(), SpriteError>;

    fn unbind_texture(&mut self, unit: u32);

    /// Uploads `vertices` (four per quad) and draws them as indexed quads.
    fn draw_quads(&mut self, program: ProgramId, vertices: &[SpriteVertex]) -> Result<(), SpriteError>;

    /// Uses `program` and writes every binding in `bindings`.
    fn apply_uniforms(&mut self, program: ProgramId, bindings: &UniformBindings) {
        self.use_program(program);
        for (name, value) in bindings.iter() {
            self.set_uniform(program, name, value);
        }
    }
}
