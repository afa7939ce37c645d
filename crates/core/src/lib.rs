#![deny(unsafe_code)]
//! Typed-sampler sprite rendering for integer pixel formats.
//!
//! Ordinary sprite shaders sample through `sampler2D`, which cannot read
//! integer textures. This crate generates GLSL ES 3.00 programs that sample
//! `isampler2D` / `usampler2D` arrays, batch sprites across as many texture
//! units as the driver can dispatch, and keeps the shared texture units free
//! of formats a program cannot sample.
//!
//! Shader generation, probing, batching and eviction are backend-independent
//! and go through the [`GpuBackend`] seam. The `render` feature adds a glow
//! implementation.

pub mod assembler;
pub mod batch;
pub mod capability;
pub mod data_type;
pub mod error;
pub mod gpu;
pub mod registry;
pub mod renderer;
pub mod settings;
pub mod shader;
pub mod step;
pub mod templates;
pub mod texture_units;
pub mod uniforms;
pub mod vertex;

#[cfg(feature = "render")]
pub mod render;

pub use assembler::{assemble, compile_multi_texture_program, CompiledProgram, ShaderSource, ShaderTemplates};
pub use batch::{BatchDraw, SpriteBatch, SpriteQuad};
pub use capability::{check_max_if_statements, probe_max_branches, ProbeContext};
pub use data_type::{BaseDataType, DataType};
pub use error::SpriteError;
pub use gpu::{DisposableContext, GpuBackend, GpuCapabilities, ProgramId, ShaderCompiler, TextureId};
pub use registry::{plugin_name, register_typed_renderers, RendererRegistry, TypedSprite};
pub use renderer::{BatchRenderer, DefaultBatchRenderer, RendererState, TypedBatchRenderer};
pub use settings::RendererSettings;
pub use shader::{ShaderError, ShaderStage};
pub use step::{ShaderStep, TypeResolver, UniformDescriptor};
pub use texture_units::{BoundTexture, TextureUnits};
pub use uniforms::{UniformBindings, UniformValue};
pub use vertex::SpriteVertex;
