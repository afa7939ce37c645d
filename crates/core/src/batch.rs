//! Multi-texture sprite batching.
//!
//! [`SpriteBatch`] is the base draw routine renderers delegate to after
//! eviction. Queued quads are drawn in groups sharing at most
//! `max_textures` distinct textures. Each texture in a group claims a unit
//! of the shared [`TextureUnits`], and every vertex carries the claimed unit
//! as its texture id so the fragment dispatch samples the right sampler.

use crate::assembler::CompiledProgram;
use crate::error::SpriteError;
use crate::gpu::{GpuBackend, TextureId};
use crate::texture_units::{BoundTexture, TextureUnits};
use crate::vertex::SpriteVertex;

/// One sprite ready to batch: four corners in clip-space-projected pixel
/// coordinates, their texture coordinates, a tint and the texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteQuad {
    pub texture: BoundTexture,
    /// Corners in the order top-left, top-right, bottom-right, bottom-left.
    pub positions: [[f32; 2]; 4],
    /// Normalized texture coordinates, `0xffff` meaning 1.0.
    pub uvs: [[u16; 2]; 4],
    /// RGBA tint.
    pub tint: [u8; 4],
}

impl SpriteQuad {
    /// An axis-aligned quad covering the whole texture.
    pub fn rect(texture: BoundTexture, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            texture,
            positions: [
                [x, y],
                [x + width, y],
                [x + width, y + height],
                [x, y + height],
            ],
            uvs: [[0, 0], [u16::MAX, 0], [u16::MAX, u16::MAX], [0, u16::MAX]],
            tint: [u8::MAX; 4],
        }
    }

    fn vertices(&self, texture_unit: u32) -> [SpriteVertex; 4] {
        std::array::from_fn(|i| SpriteVertex {
            position: self.positions[i],
            uv: self.uvs[i],
            color: self.tint,
            texture_id: texture_unit as f32,
        })
    }
}

/// The draw routine a renderer delegates to once the units are safe to use.
pub trait BatchDraw {
    fn push(&mut self, quad: SpriteQuad);

    /// Quads queued since the last draw.
    fn pending(&self) -> usize;

    /// Draws and clears every queued quad with `program`.
    fn draw(
        &mut self,
        gpu: &mut dyn GpuBackend,
        units: &mut TextureUnits,
        program: &CompiledProgram,
    ) -> Result<(), SpriteError>;
}

/// Default [`BatchDraw`] implementation.
#[derive(Debug, Default)]
pub struct SpriteBatch {
    quads: Vec<SpriteQuad>,
    vertices: Vec<SpriteVertex>,
    tick: u32,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(quads: usize) -> Self {
        Self {
            quads: Vec::with_capacity(quads),
            vertices: Vec::with_capacity(quads * 4),
            tick: 0,
        }
    }

    /// Picks a unit in `0..max_textures` not yet claimed by the group:
    /// where the texture already sits, else the first empty unit, else the
    /// next one in round-robin order.
    fn claim_unit(
        &mut self,
        units: &TextureUnits,
        claimed: &[u32],
        quad: &SpriteQuad,
        max_textures: u32,
    ) -> u32 {
        let free = |unit: &u32| !claimed.contains(unit);

        if let Some(unit) = units
            .unit_of(quad.texture.id)
            .filter(|unit| *unit < max_textures && free(unit))
        {
            return unit;
        }
        if let Some(unit) = (0..max_textures).find(|unit| free(unit) && units.get(*unit).is_none()) {
            return unit;
        }
        loop {
            let unit = self.tick % max_textures;
            self.tick = self.tick.wrapping_add(1);
            if free(&unit) {
                return unit;
            }
        }
    }

    fn draw_group(
        &mut self,
        gpu: &mut dyn GpuBackend,
        program: &CompiledProgram,
    ) -> Result<(), SpriteError> {
        if self.vertices.is_empty() {
            return Ok(());
        }
        let result = gpu.draw_quads(program.id, &self.vertices);
        self.vertices.clear();
        result
    }

    /// Draws `quads` group by group. `group_start` tracks the first quad of
    /// the group not yet drawn.
    fn draw_groups(
        &mut self,
        gpu: &mut dyn GpuBackend,
        units: &mut TextureUnits,
        program: &CompiledProgram,
        quads: &[SpriteQuad],
        group_start: &mut usize,
    ) -> Result<(), SpriteError> {
        let max_textures = program.max_textures.max(1);
        let mut claimed: Vec<u32> = Vec::with_capacity(max_textures as usize);
        let mut group_textures: Vec<(TextureId, u32)> = Vec::new();

        gpu.use_program(program.id);

        for (index, quad) in quads.iter().enumerate() {
            let unit = match group_textures.iter().find(|(id, _)| *id == quad.texture.id) {
                Some(&(_, unit)) => unit,
                None => {
                    if group_textures.len() as u32 == max_textures {
                        self.draw_group(gpu, program)?;
                        *group_start = index;
                        group_textures.clear();
                        claimed.clear();
                    }
                    let unit = self.claim_unit(units, &claimed, quad, max_textures);
                    if units.get(unit) != Some(&quad.texture) {
                        gpu.bind_texture(unit, quad.texture.id)?;
                        units.bind(unit, quad.texture);
                    }
                    claimed.push(unit);
                    group_textures.push((quad.texture.id, unit));
                    unit
                }
            };
            self.vertices.extend_from_slice(&quad.vertices(unit));
        }

        self.draw_group(gpu, program)?;
        *group_start = quads.len();
        Ok(())
    }
}

impl BatchDraw for SpriteBatch {
    fn push(&mut self, quad: SpriteQuad) {
        self.quads.push(quad);
    }

    fn pending(&self) -> usize {
        self.quads.len()
    }

    /// On failure the group being built and every later quad stay queued,
    /// in order; groups drawn before the failure are gone.
    fn draw(
        &mut self,
        gpu: &mut dyn GpuBackend,
        units: &mut TextureUnits,
        program: &CompiledProgram,
    ) -> Result<(), SpriteError> {
        let mut quads = std::mem::take(&mut self.quads);
        let mut group_start = 0;
        self.vertices.clear();

        let result = self.draw_groups(gpu, units, program, &quads, &mut group_start);
        if result.is_err() {
            self.vertices.clear();
            self.quads = quads.split_off(group_start);
        }
        result
    }
}
