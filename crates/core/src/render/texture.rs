//! Integer texture formats and upload.
//!
//! Typed textures hold one raw integer per texel in the red channel and are
//! sampled through `isampler2D` / `usampler2D`. Integer textures are not
//! filterable, so they always use `NEAREST`. GL has no 64-bit texel
//! formats: 64-bit tags upload as 32-bit texels.

use crate::data_type::DataType;

/// GL formats used to upload and sample one data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerTextureFormat {
    /// Sized internal format, e.g. `glow::R16UI`.
    pub internal_format: u32,
    /// Always `glow::RED_INTEGER`.
    pub format: u32,
    /// Component type of the uploaded data, e.g. `glow::UNSIGNED_SHORT`.
    pub pixel_type: u32,
    /// Bytes per texel in the upload buffer.
    pub bytes_per_texel: usize,
}

impl IntegerTextureFormat {
    pub fn for_data_type(data_type: DataType) -> Self {
        let (internal_format, pixel_type, bytes_per_texel) = match data_type {
            DataType::Int8 => (glow::R8I, glow::BYTE, 1),
            DataType::Int16 => (glow::R16I, glow::SHORT, 2),
            DataType::Int32 | DataType::Int64 => (glow::R32I, glow::INT, 4),
            DataType::Uint16 => (glow::R16UI, glow::UNSIGNED_SHORT, 2),
            DataType::Uint32 | DataType::Uint64 => (glow::R32UI, glow::UNSIGNED_INT, 4),
        };
        Self {
            internal_format,
            format: glow::RED_INTEGER,
            pixel_type,
            bytes_per_texel,
        }
    }

    /// Bytes a `width` x `height` upload must contain.
    pub fn byte_len(&self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_texel
    }
}

/// Creates a texture of `data_type` texels from tightly packed `data`.
///
/// # Errors
///
/// An error string if `data` has the wrong length or the context fails to
/// create the texture.
#[allow(unsafe_code)]
pub fn upload_integer_texture(
    gl: &glow::Context,
    data_type: DataType,
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<glow::Texture, String> {
    use glow::HasContext;

    let format = IntegerTextureFormat::for_data_type(data_type);
    let expected = format.byte_len(width, height);
    if data.len() != expected {
        return Err(format!(
            "{data_type} texture of {width}x{height} needs {expected} bytes, got {}",
            data.len()
        ));
    }

    // SAFETY: glow wraps raw GL calls as unsafe. The upload length was
    // checked against the format, and rows are tightly packed.
    let texture = unsafe { gl.create_texture()? };

    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);

        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);

        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            format.internal_format as i32,
            width as i32,
            height as i32,
            0,
            format.format,
            format.pixel_type,
            glow::PixelUnpackData::Slice(Some(data)),
        );

        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_format_is_red_integer() {
        for dt in DataType::ALL {
            let format = IntegerTextureFormat::for_data_type(dt);
            assert_eq!(format.format, glow::RED_INTEGER, "{dt}");
        }
    }

    #[test]
    fn signedness_follows_data_type() {
        assert_eq!(IntegerTextureFormat::for_data_type(DataType::Int16).internal_format, glow::R16I);
        assert_eq!(IntegerTextureFormat::for_data_type(DataType::Uint16).internal_format, glow::R16UI);
        assert_eq!(
            IntegerTextureFormat::for_data_type(DataType::Uint32).pixel_type,
            glow::UNSIGNED_INT
        );
    }

    #[test]
    fn sixty_four_bit_tags_upload_as_thirty_two_bit() {
        let int64 = IntegerTextureFormat::for_data_type(DataType::Int64);
        let uint64 = IntegerTextureFormat::for_data_type(DataType::Uint64);
        assert_eq!(int64.internal_format, glow::R32I);
        assert_eq!(uint64.internal_format, glow::R32UI);
        assert_eq!(uint64.bytes_per_texel, 4);
    }

    #[test]
    fn byte_len_scales_with_texel_size() {
        let format = IntegerTextureFormat::for_data_type(DataType::Int8);
        assert_eq!(format.byte_len(16, 4), 64);
        let format = IntegerTextureFormat::for_data_type(DataType::Uint32);
        assert_eq!(format.byte_len(16, 4), 256);
    }

    #[test]
    #[ignore = "requires GL context"]
    fn upload_rejects_short_buffer() {
        // Would test: upload_integer_texture errors before any GL call when
        // data.len() != byte_len.
    }
}
