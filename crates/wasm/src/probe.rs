use typed_sprite_core::render::trial_compile_fragment;
use typed_sprite_core::{DisposableContext, ShaderCompiler, ShaderError, SpriteError};
use wasm_bindgen::JsCast;
use web_sys::{OffscreenCanvas, WebGl2RenderingContext, WebglLoseContext};

/// A 1x1 offscreen WebGL2 context used only to trial-compile shaders.
pub struct OffscreenProbeContext {
    gl: glow::Context,
    raw: WebGl2RenderingContext,
}

impl OffscreenProbeContext {
    pub fn create() -> Result<Self, SpriteError> {
        let canvas = OffscreenCanvas::new(1, 1)
            .map_err(|e| SpriteError::Gpu(format!("cannot create OffscreenCanvas: {e:?}")))?;
        let raw = canvas
            .get_context("webgl2")
            .map_err(|e| SpriteError::Gpu(format!("webgl2 context request failed: {e:?}")))?
            .ok_or_else(|| SpriteError::Gpu("webgl2 is not available".into()))?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| SpriteError::Gpu("context is not a WebGl2RenderingContext".into()))?;

        let gl = glow::Context::from_webgl2_context(raw.clone());
        Ok(Self { gl, raw })
    }
}

impl ShaderCompiler for OffscreenProbeContext {
    fn compile_fragment(&mut self, source: &str) -> Result<(), ShaderError> {
        trial_compile_fragment(&self.gl, source)
    }
}

impl DisposableContext for OffscreenProbeContext {
    fn release(&mut self) {
        let extension = self
            .raw
            .get_extension("WEBGL_lose_context")
            .ok()
            .flatten()
            .and_then(|ext| ext.dyn_into::<WebglLoseContext>().ok());

        match extension {
            Some(ext) => ext.lose_context(),
            None => log::warn!("WEBGL_lose_context unavailable; probe context left to the GC"),
        }
    }
}
