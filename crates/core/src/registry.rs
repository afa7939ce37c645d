//! Renderer registration by plugin name.
//!
//! Each data type gets one renderer, registered as `typedSprite_<tag>`. A
//! [`TypedSprite`] carries the same name as its plugin selector, which is
//! how the host routes it to the matching renderer.

use std::collections::BTreeMap;

use crate::batch::SpriteQuad;
use crate::data_type::DataType;
use crate::error::SpriteError;
use crate::renderer::{BatchRenderer, TypedBatchRenderer};
use crate::settings::RendererSettings;
use crate::texture_units::BoundTexture;

/// Prefix shared by every typed renderer's plugin name.
pub const PLUGIN_PREFIX: &str = "typedSprite_";

pub fn plugin_name(data_type: DataType) -> String {
    format!("{PLUGIN_PREFIX}{data_type}")
}

/// A sprite whose texture holds raw texels of one data type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedSprite {
    data_type: DataType,
    plugin_name: String,
    quad: SpriteQuad,
}

impl TypedSprite {
    /// A sprite drawing `quad`; the quad's texture is retagged with
    /// `data_type`.
    pub fn new(data_type: DataType, mut quad: SpriteQuad) -> Self {
        quad.texture = BoundTexture::typed(quad.texture.id, data_type);
        Self {
            data_type,
            plugin_name: plugin_name(data_type),
            quad,
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Name of the renderer this sprite is drawn by.
    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    pub fn quad(&self) -> &SpriteQuad {
        &self.quad
    }

    pub fn into_quad(self) -> SpriteQuad {
        self.quad
    }
}

type RendererFactory = Box<dyn Fn() -> Box<dyn BatchRenderer>>;

/// Plugin name to renderer factory table.
#[derive(Default)]
pub struct RendererRegistry {
    factories: BTreeMap<String, RendererFactory>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`, replacing any earlier factory.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn BatchRenderer> + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Sorted names of every registered renderer.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// A fresh renderer for `name`.
    ///
    /// # Errors
    ///
    /// `UnknownRenderer` when nothing is registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn BatchRenderer>, SpriteError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| SpriteError::UnknownRenderer(name.to_string()))
    }
}

/// Registers one [`TypedBatchRenderer`] per data type.
pub fn register_typed_renderers(registry: &mut RendererRegistry, settings: RendererSettings) {
    for data_type in DataType::ALL {
        registry.register(plugin_name(data_type), move || {
            Box::new(TypedBatchRenderer::new(data_type, settings)) as Box<dyn BatchRenderer>
        });
    }
    log::debug!("registered {} typed sprite renderers", DataType::ALL.len());
}
