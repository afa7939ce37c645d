//! Renderer for sprites of one integer data type.

use glam::{Mat3, Vec3};

use super::{BatchRenderer, RendererState};
use crate::assembler::{compile_multi_texture_program, ShaderTemplates};
use crate::batch::{BatchDraw, SpriteBatch, SpriteQuad};
use crate::capability::check_max_if_statements;
use crate::data_type::{BaseDataType, DataType};
use crate::error::SpriteError;
use crate::gpu::GpuBackend;
use crate::registry::plugin_name;
use crate::settings::RendererSettings;
use crate::step::ShaderStep;
use crate::templates::PROJECTION_UNIFORM;
use crate::texture_units::{evict_and_unbind, TextureUnits};
use crate::uniforms::UniformValue;

/// Projection from pixel coordinates (origin top-left, y down) to clip
/// space for a `width` x `height` target.
pub fn ortho_projection(width: f32, height: f32) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(2.0 / width, 0.0, 0.0),
        Vec3::new(0.0, -2.0 / height, 0.0),
        Vec3::new(-1.0, 1.0, 1.0),
    )
}

/// Renders sprites whose textures hold raw integer texels of one
/// [`DataType`].
///
/// On each context change the renderer probes how many samplers the driver
/// can dispatch, then builds and binds a program sampling with the tag's
/// typed sampler. Before every draw it evicts bound textures of any other
/// tag.
pub struct TypedBatchRenderer<D: BatchDraw = SpriteBatch> {
    name: String,
    base: BaseDataType,
    settings: RendererSettings,
    templates: ShaderTemplates,
    steps: Vec<ShaderStep>,
    projection: Mat3,
    state: RendererState,
    batch: D,
}

impl TypedBatchRenderer<SpriteBatch> {
    /// A renderer with the min/max normalization step and the default batch.
    pub fn new(data_type: DataType, settings: RendererSettings) -> Self {
        let batch = SpriteBatch::with_capacity(settings.batch_size);
        Self::with_batch(data_type, settings, batch)
    }
}

impl<D: BatchDraw> TypedBatchRenderer<D> {
    pub fn with_batch(data_type: DataType, settings: RendererSettings, batch: D) -> Self {
        Self {
            name: plugin_name(data_type),
            base: BaseDataType::new(data_type),
            settings,
            templates: ShaderTemplates::default(),
            steps: vec![ShaderStep::min_max()],
            projection: Mat3::IDENTITY,
            state: RendererState::Uninitialized,
            batch,
        }
    }

    /// Replaces the step chain. Takes effect at the next context change.
    pub fn with_steps(mut self, steps: Vec<ShaderStep>) -> Self {
        self.steps = steps;
        self
    }

    pub fn state(&self) -> &RendererState {
        &self.state
    }

    /// Step chain, e.g. for overriding uniform values before the next
    /// context change.
    pub fn steps_mut(&mut self) -> &mut [ShaderStep] {
        &mut self.steps
    }

    /// Sets the projection, binding it right away when a program exists.
    pub fn set_projection(&mut self, gpu: &mut dyn GpuBackend, projection: Mat3) {
        self.projection = projection;
        if let RendererState::Ready(program) = &mut self.state {
            let value = UniformValue::Mat3(projection);
            gpu.use_program(program.id);
            gpu.set_uniform(program.id, PROJECTION_UNIFORM, &value);
            program.bindings.set(PROJECTION_UNIFORM, value);
        }
    }

    /// Deletes the program, if any, and returns to `Uninitialized`.
    pub fn destroy(&mut self, gpu: &mut dyn GpuBackend) {
        if let RendererState::Ready(program) = std::mem::take(&mut self.state) {
            gpu.delete_program(program.id);
        }
    }

    fn texture_count(&self, gpu: &mut dyn GpuBackend) -> Result<u32, SpriteError> {
        let units = gpu.capabilities().max_texture_image_units;
        let ceiling = self.settings.texture_ceiling(units);
        if ceiling == 0 {
            return Err(SpriteError::InvalidTextureCount(0));
        }
        if self.settings.legacy {
            return Ok(ceiling);
        }

        match check_max_if_statements(gpu, ceiling)? {
            0 => Err(SpriteError::CapabilityExhausted { requested: ceiling }),
            count => Ok(count),
        }
    }
}

impl<D: BatchDraw> BatchRenderer for TypedBatchRenderer<D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn data_type(&self) -> Option<DataType> {
        Some(self.base.data_type())
    }

    /// Builds the program for the current context. A program left from an
    /// earlier change on the same context is deleted first.
    fn on_context_change(&mut self, gpu: &mut dyn GpuBackend) -> Result<(), SpriteError> {
        self.destroy(gpu);

        if !gpu.capabilities().supports_glsl_es3 {
            log::warn!("{} needs a WebGL2 / GLSL ES 3.00 context; disabled", self.name);
            self.state = RendererState::Unsupported;
            return Ok(());
        }

        let max_textures = self.texture_count(gpu)?;
        let program = compile_multi_texture_program(
            gpu,
            &self.templates,
            &mut self.steps,
            max_textures,
            &self.base,
        )?;
        self.state = RendererState::Ready(program);

        let projection = self.projection;
        self.set_projection(gpu, projection);
        Ok(())
    }

    fn on_context_lost(&mut self) {
        self.state = RendererState::Uninitialized;
    }

    fn is_ready(&self) -> bool {
        matches!(self.state, RendererState::Ready(_))
    }

    fn queue(&mut self, quad: SpriteQuad) {
        self.batch.push(quad);
    }

    fn pending(&self) -> usize {
        self.batch.pending()
    }

    fn batch_size(&self) -> usize {
        self.settings.batch_size
    }

    fn flush(&mut self, gpu: &mut dyn GpuBackend, units: &mut TextureUnits) -> Result<(), SpriteError> {
        evict_and_unbind(units, gpu, Some(self.base.data_type()));

        if self.batch.pending() == 0 {
            return Ok(());
        }
        match &self.state {
            RendererState::Ready(program) => self.batch.draw(gpu, units, program),
            _ => Err(SpriteError::NotReady(self.name.clone())),
        }
    }
}
