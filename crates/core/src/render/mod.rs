//! glow implementation of the GPU seam.
//!
//! This module is only available when the `render` feature is enabled.
//!
//! - [`program`] -- Shader compilation and linking.
//! - [`texture`] -- Integer texture formats and upload.
//! - [`backend`] -- [`GlowBackend`], the [`GpuBackend`](crate::gpu::GpuBackend)
//!   used on real contexts.

pub mod backend;
pub mod program;
pub mod texture;

pub use backend::{GlowBackend, MAX_QUADS_PER_DRAW};
pub use program::{compile_program, compile_shader, link_program, trial_compile_fragment};
pub use texture::{upload_integer_texture, IntegerTextureFormat};
