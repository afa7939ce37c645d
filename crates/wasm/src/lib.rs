//! WASM bindings for typed sprite rendering.
//!
//! Exposes shader generation and the driver branch probe to JavaScript.
//! Probing runs on a throwaway `OffscreenCanvas` WebGL2 context that is
//! lost again as soon as the probe finishes.

#[cfg(target_arch = "wasm32")]
mod probe;

use typed_sprite_core::{assemble, BaseDataType, ShaderStep, ShaderTemplates, SpriteError};
use wasm_bindgen::prelude::*;

fn to_js(err: SpriteError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Largest sampler count up to `requested` that this browser's fragment
/// compiler can dispatch.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn probe_max_textures(requested: u32) -> Result<u32, JsValue> {
    typed_sprite_core::probe_max_branches(None, requested, probe::OffscreenProbeContext::create)
        .map_err(to_js)
}

/// Fragment shader source for `tag` with `max_textures` samplers.
#[wasm_bindgen]
pub fn fragment_shader_source(tag: &str, max_textures: u32) -> Result<String, JsValue> {
    fragment_source(tag, max_textures).map_err(to_js)
}

/// Renderer plugin name for `tag`, e.g. `typedSprite_uint16`.
#[wasm_bindgen]
pub fn plugin_name(tag: &str) -> Result<String, JsValue> {
    plugin_name_for(tag).map_err(to_js)
}

fn fragment_source(tag: &str, max_textures: u32) -> Result<String, SpriteError> {
    let base = BaseDataType::from_tag(tag)?;
    let source = assemble(
        &ShaderTemplates::default(),
        &[ShaderStep::min_max()],
        max_textures,
        &base,
    )?;
    Ok(source.fragment)
}

fn plugin_name_for(tag: &str) -> Result<String, SpriteError> {
    let base = BaseDataType::from_tag(tag)?;
    Ok(typed_sprite_core::plugin_name(base.data_type()))
}
