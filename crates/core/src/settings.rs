//! Renderer configuration.
//!
//! Settings can be deserialized with serde, or extracted leniently from a
//! JSON object with [`RendererSettings::from_json`]: missing keys and values
//! of the wrong type fall back to the defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default ceiling on samplers per batch.
pub const DEFAULT_MAX_TEXTURES: u32 = 32;
/// Default number of quads queued before a renderer flushes on its own.
pub const DEFAULT_BATCH_SIZE: usize = 4096;

/// Options shared by every typed renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Upper bound on samplers per draw, further capped by the context's
    /// texture units and by capability probing.
    pub max_textures: u32,
    /// Quads queued before `render` flushes.
    pub batch_size: usize,
    /// Single-texture mode for contexts where multi-texture batching is
    /// unreliable. Skips probing.
    pub legacy: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            max_textures: DEFAULT_MAX_TEXTURES,
            batch_size: DEFAULT_BATCH_SIZE,
            legacy: false,
        }
    }
}

impl RendererSettings {
    pub fn from_json(params: &Value) -> Self {
        let defaults = Self::default();
        Self {
            max_textures: param_u32(params, "max_textures", defaults.max_textures),
            batch_size: param_usize(params, "batch_size", defaults.batch_size).max(1),
            legacy: param_bool(params, "legacy", defaults.legacy),
        }
    }

    /// Sampler count to request before probing, given the context's
    /// texture-unit limit.
    pub fn texture_ceiling(&self, max_texture_image_units: u32) -> u32 {
        if self.legacy {
            1
        } else {
            self.max_textures.min(max_texture_image_units)
        }
    }
}

fn param_u32(params: &Value, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}
