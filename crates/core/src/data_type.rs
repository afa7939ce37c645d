//! Integer pixel formats and their GLSL type vocabulary.
//!
//! A [`DataType`] is the tag a texture carries to say how its texels are
//! stored. [`BaseDataType`] derives from it everything shader generation
//! needs: the `i`/`u` prefix for vector and sampler types, the scalar
//! type name, and the normalization range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpriteError;

/// Integer channel formats that can be sampled through a typed sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint16,
    Uint32,
    Uint64,
}

impl DataType {
    /// Every supported tag, in registration order.
    pub const ALL: [DataType; 7] = [
        DataType::Int8,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::Uint16,
        DataType::Uint32,
        DataType::Uint64,
    ];

    /// The tag string, e.g. `"uint16"`.
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Uint16 => "uint16",
            DataType::Uint32 => "uint32",
            DataType::Uint64 => "uint64",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
        )
    }

    /// Storage bit depth as named by the tag.
    pub fn bit_depth(self) -> u32 {
        match self {
            DataType::Int8 => 8,
            DataType::Int16 | DataType::Uint16 => 16,
            DataType::Int32 | DataType::Uint32 => 32,
            DataType::Int64 | DataType::Uint64 => 64,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = SpriteError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .into_iter()
            .find(|dt| dt.as_str() == tag)
            .ok_or_else(|| SpriteError::UnknownDataType(tag.to_string()))
    }
}

/// GLSL scalar families a uniform value can be bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Uint,
    Float,
}

impl ScalarKind {
    /// Maps a resolved GLSL scalar type name back to its family.
    pub fn from_glsl(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ScalarKind::Int),
            "uint" => Some(ScalarKind::Uint),
            "float" => Some(ScalarKind::Float),
            _ => None,
        }
    }

    pub fn glsl(self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Uint => "uint",
            ScalarKind::Float => "float",
        }
    }
}

/// Shader-facing description of a [`DataType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseDataType {
    prefix: &'static str,
    depth: u32,
    data_type: DataType,
}

impl BaseDataType {
    pub fn new(data_type: DataType) -> Self {
        let prefix = if data_type.is_signed() { "i" } else { "u" };

        // Not channel aware: 64-bit data is uploaded as RGBA16, so it is
        // normalized by 16 bits.
        let depth = match data_type.bit_depth() {
            64 => 16,
            depth => depth,
        };

        Self {
            prefix,
            depth,
            data_type,
        }
    }

    /// Parses a tag string, failing on anything outside [`DataType::ALL`].
    pub fn from_tag(tag: &str) -> Result<Self, SpriteError> {
        tag.parse().map(Self::new)
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// `"i"` for signed tags, `"u"` for unsigned ones.
    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Bit depth used for normalization (64-bit tags report 16).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Four-component vector the sampler returns, e.g. `uvec4`.
    pub fn glsl_color_type(&self) -> String {
        format!("{}vec4", self.prefix)
    }

    /// Sampler type matching the texture's internal format, e.g. `isampler2D`.
    pub fn glsl_sampler_type(&self) -> String {
        format!("{}sampler2D", self.prefix)
    }

    pub fn scalar_kind(&self) -> ScalarKind {
        if self.data_type.is_signed() {
            ScalarKind::Int
        } else {
            ScalarKind::Uint
        }
    }

    pub fn glsl_scalar(&self) -> &'static str {
        self.scalar_kind().glsl()
    }

    /// Lower bound of the normalization range.
    ///
    /// Always 0: sign is not taken into account yet.
    pub fn min_value(&self) -> u64 {
        0
    }

    /// Upper bound of the normalization range, `2^depth`.
    pub fn max_value(&self) -> u64 {
        1u64 << self.depth
    }
}

impl From<DataType> for BaseDataType {
    fn from(data_type: DataType) -> Self {
        Self::new(data_type)
    }
}
