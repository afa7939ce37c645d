//! The shared array of bound texture units and the eviction rule that
//! keeps it consistent across renderers.
//!
//! Every renderer active in a frame binds into the same units. A program
//! declaring `usampler2D` cannot sample from a unit holding a signed or a
//! float texture: the draw fails silently or reads garbage. There is no
//! error to detect, so each renderer evicts, before it draws, every bound
//! texture whose tag differs from its own. Typed renderers keep only their
//! own tag; the default renderer (tag `None`) keeps only untyped textures.

use crate::data_type::DataType;
use crate::gpu::{GpuBackend, TextureId};

/// A texture occupying a unit, with the format tag it was uploaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundTexture {
    pub id: TextureId,
    /// `None` for ordinary (float/normalized) textures.
    pub data_type: Option<DataType>,
}

impl BoundTexture {
    pub fn untyped(id: TextureId) -> Self {
        Self { id, data_type: None }
    }

    pub fn typed(id: TextureId, data_type: DataType) -> Self {
        Self {
            id,
            data_type: Some(data_type),
        }
    }
}

/// Bound-texture state shared by every renderer in a frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureUnits {
    slots: Vec<Option<BoundTexture>>,
}

impl TextureUnits {
    /// `count` empty units, normally `MAX_TEXTURE_IMAGE_UNITS`.
    pub fn new(count: u32) -> Self {
        Self {
            slots: vec![None; count as usize],
        }
    }

    pub fn len(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, unit: u32) -> Option<&BoundTexture> {
        self.slots.get(unit as usize).and_then(Option::as_ref)
    }

    /// Records `texture` in `unit`, growing the array if needed, and returns
    /// the texture it replaced.
    pub fn bind(&mut self, unit: u32, texture: BoundTexture) -> Option<BoundTexture> {
        let unit = unit as usize;
        if unit >= self.slots.len() {
            self.slots.resize(unit + 1, None);
        }
        self.slots[unit].replace(texture)
    }

    pub fn unbind(&mut self, unit: u32) -> Option<BoundTexture> {
        self.slots.get_mut(unit as usize).and_then(Option::take)
    }

    /// The unit `texture` is bound to, if any.
    pub fn unit_of(&self, texture: TextureId) -> Option<u32> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Some(bound) if bound.id == texture))
            .map(|unit| unit as u32)
    }

    /// Occupied units with their textures.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &BoundTexture)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(unit, slot)| slot.as_ref().map(|bound| (unit as u32, bound)))
    }
}

/// Clears every unit whose texture tag differs from `keep` and returns the
/// cleared units in ascending order.
pub fn evict_incompatible(units: &mut TextureUnits, keep: Option<DataType>) -> Vec<u32> {
    let evicted: Vec<u32> = units
        .iter()
        .filter(|(_, bound)| bound.data_type != keep)
        .map(|(unit, _)| unit)
        .collect();

    for &unit in &evicted {
        units.unbind(unit);
    }

    evicted
}

/// [`evict_incompatible`], followed by unbinding the cleared units on the
/// GPU.
pub fn evict_and_unbind(
    units: &mut TextureUnits,
    gpu: &mut dyn GpuBackend,
    keep: Option<DataType>,
) -> Vec<u32> {
    let evicted = evict_incompatible(units, keep);
    for &unit in &evicted {
        gpu.unbind_texture(unit);
    }
    if !evicted.is_empty() {
        let owner = keep.map_or("default", DataType::as_str);
        log::trace!("{owner} renderer evicted texture units {evicted:?}");
    }
    evicted
}
