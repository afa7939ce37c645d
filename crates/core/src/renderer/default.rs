//! Eviction wrapper for the host's default sprite renderer.

use super::BatchRenderer;
use crate::batch::SpriteQuad;
use crate::data_type::DataType;
use crate::error::SpriteError;
use crate::gpu::GpuBackend;
use crate::texture_units::{evict_and_unbind, TextureUnits};

/// Wraps the host's ordinary sprite renderer so that it evicts every typed
/// texture before drawing.
///
/// The wrapped renderer's own flush runs unchanged afterwards, so textures
/// typed renderers left behind are never sampled through a float sampler.
pub struct DefaultBatchRenderer<R: BatchRenderer> {
    inner: R,
}

impl<R: BatchRenderer> DefaultBatchRenderer<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BatchRenderer> BatchRenderer for DefaultBatchRenderer<R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn data_type(&self) -> Option<DataType> {
        None
    }

    fn on_context_change(&mut self, gpu: &mut dyn GpuBackend) -> Result<(), SpriteError> {
        self.inner.on_context_change(gpu)
    }

    fn on_context_lost(&mut self) {
        self.inner.on_context_lost();
    }

    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    fn queue(&mut self, quad: SpriteQuad) {
        self.inner.queue(quad);
    }

    fn pending(&self) -> usize {
        self.inner.pending()
    }

    fn batch_size(&self) -> usize {
        self.inner.batch_size()
    }

    fn flush(&mut self, gpu: &mut dyn GpuBackend, units: &mut TextureUnits) -> Result<(), SpriteError> {
        evict_and_unbind(units, gpu, None);
        self.inner.flush(gpu, units)
    }
}
