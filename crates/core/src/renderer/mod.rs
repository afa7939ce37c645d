//! Batch renderers sharing one set of texture units.
//!
//! A frame may interleave typed renderers of different tags with the host's
//! default sprite renderer. All of them bind into the same
//! [`TextureUnits`], so each one evicts incompatible textures before it
//! draws (see [`crate::texture_units`]).

mod default;
mod typed;

pub use default::DefaultBatchRenderer;
pub use typed::{ortho_projection, TypedBatchRenderer};

use crate::assembler::CompiledProgram;
use crate::batch::SpriteQuad;
use crate::data_type::DataType;
use crate::error::SpriteError;
use crate::gpu::GpuBackend;
use crate::texture_units::TextureUnits;

/// Lifecycle of a renderer's program.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RendererState {
    /// No program; waiting for a context.
    #[default]
    Uninitialized,
    /// The context cannot compile `#version 300 es` shaders.
    Unsupported,
    /// A program is linked and its uniforms bound.
    Ready(CompiledProgram),
}

impl RendererState {
    pub fn program(&self) -> Option<&CompiledProgram> {
        match self {
            RendererState::Ready(program) => Some(program),
            _ => None,
        }
    }
}

/// A renderer that queues sprites and draws them in batches.
pub trait BatchRenderer {
    /// Plugin name the renderer is registered under.
    fn name(&self) -> &str;

    /// Tag of the textures this renderer samples, `None` for ordinary
    /// textures.
    fn data_type(&self) -> Option<DataType>;

    /// (Re)builds GPU state for a new context.
    fn on_context_change(&mut self, gpu: &mut dyn GpuBackend) -> Result<(), SpriteError>;

    /// Forgets GPU state after the context is lost.
    fn on_context_lost(&mut self);

    fn is_ready(&self) -> bool;

    /// Queues a sprite without drawing.
    fn queue(&mut self, quad: SpriteQuad);

    /// Sprites queued since the last flush.
    fn pending(&self) -> usize;

    /// Sprites queued before [`render`](Self::render) flushes on its own.
    fn batch_size(&self) -> usize;

    /// Makes the shared units safe for this renderer and draws the queue.
    fn flush(&mut self, gpu: &mut dyn GpuBackend, units: &mut TextureUnits) -> Result<(), SpriteError>;

    /// Queues `quad`, flushing first when the batch is full.
    fn render(
        &mut self,
        gpu: &mut dyn GpuBackend,
        units: &mut TextureUnits,
        quad: SpriteQuad,
    ) -> Result<(), SpriteError> {
        if self.pending() >= self.batch_size() {
            self.flush(gpu, units)?;
        }
        self.queue(quad);
        Ok(())
    }
}
