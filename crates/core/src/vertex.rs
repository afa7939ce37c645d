//! Interleaved sprite vertex layout shared by the batcher and the backend.

use bytemuck::{Pod, Zeroable};

/// One corner of a sprite quad, laid out as the vertex template reads it.
///
/// 20 bytes: position `f32x2` at 0, texture coordinate `u16x2` (normalized)
/// at 8, tint `u8x4` (normalized, RGBA) at 12, texture unit `f32` at 16.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [u16; 2],
    pub color: [u8; 4],
    pub texture_id: f32,
}

/// Component type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Float,
    UnsignedShort,
    UnsignedByte,
}

/// Where one vertex input lives inside [`SpriteVertex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub components: i32,
    pub kind: AttributeKind,
    pub normalized: bool,
    pub offset: i32,
}

impl SpriteVertex {
    /// Byte stride between consecutive vertices.
    pub const STRIDE: i32 = std::mem::size_of::<SpriteVertex>() as i32;

    /// Attribute bindings in the order the vertex template declares them.
    ///
    /// `aTextureId` may be optimized out by drivers for single-texture
    /// programs; backends skip attributes the program does not expose.
    pub const ATTRIBUTES: [VertexAttribute; 4] = [
        VertexAttribute {
            name: "aVertexPosition",
            components: 2,
            kind: AttributeKind::Float,
            normalized: false,
            offset: 0,
        },
        VertexAttribute {
            name: "aTextureCoord",
            components: 2,
            kind: AttributeKind::UnsignedShort,
            normalized: true,
            offset: 8,
        },
        VertexAttribute {
            name: "aColor",
            components: 4,
            kind: AttributeKind::UnsignedByte,
            normalized: true,
            offset: 12,
        },
        VertexAttribute {
            name: "aTextureId",
            components: 1,
            kind: AttributeKind::Float,
            normalized: false,
            offset: 16,
        },
    ];
}

/// Vertices per sprite quad.
pub const VERTICES_PER_QUAD: usize = 4;

/// Two triangles per quad, `0 1 2` and `0 2 3`.
pub fn quad_indices(quads: usize) -> Vec<u16> {
    (0..quads)
        .flat_map(|q| {
            let base = (q * VERTICES_PER_QUAD) as u16;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect()
}
