//! [`GpuBackend`] on top of a `glow::Context`.

use crate::error::SpriteError;
use crate::gpu::{GpuBackend, GpuCapabilities, ProgramId, ShaderCompiler, TextureId};
use crate::shader::ShaderError;
use crate::uniforms::UniformValue;
use crate::vertex::{quad_indices, AttributeKind, SpriteVertex, VERTICES_PER_QUAD};

use super::program::{compile_program, trial_compile_fragment};

/// Most quads a single draw can index with 16-bit indices.
pub const MAX_QUADS_PER_DRAW: usize = (u16::MAX as usize + 1) / VERTICES_PER_QUAD;

/// GL objects owned by one linked sprite program.
struct SpriteProgram {
    program: glow::Program,
    vao: glow::VertexArray,
    vertex_buffer: glow::Buffer,
    index_buffer: glow::Buffer,
    indexed_quads: usize,
}

/// Whether a context with this version accepts `#version 300 es` sources.
pub fn accepts_glsl_es3(major: u32, minor: u32, is_embedded: bool) -> bool {
    if is_embedded {
        major >= 3
    } else {
        (major, minor) >= (4, 3)
    }
}

/// GPU backend driving a glow context.
///
/// Textures are uploaded by the host and registered here to obtain the
/// [`TextureId`]s batches refer to.
pub struct GlowBackend {
    gl: glow::Context,
    capabilities: GpuCapabilities,
    programs: Vec<Option<SpriteProgram>>,
    textures: Vec<Option<glow::Texture>>,
}

impl GlowBackend {
    /// Wraps `gl` and queries its limits.
    #[allow(unsafe_code)]
    pub fn new(gl: glow::Context) -> Self {
        use glow::HasContext;

        // SAFETY: querying an integer parameter has no preconditions.
        let units = unsafe { gl.get_parameter_i32(glow::MAX_TEXTURE_IMAGE_UNITS) };
        let version = gl.version();
        let capabilities = GpuCapabilities {
            max_texture_image_units: u32::try_from(units).unwrap_or(0),
            supports_glsl_es3: accepts_glsl_es3(version.major, version.minor, version.is_embedded),
        };
        log::debug!(
            "glow context {}.{} (embedded: {}), {} texture units",
            version.major,
            version.minor,
            version.is_embedded,
            capabilities.max_texture_image_units
        );

        Self {
            gl,
            capabilities,
            programs: Vec::new(),
            textures: Vec::new(),
        }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn into_gl(self) -> glow::Context {
        self.gl
    }

    /// Makes `texture` available to batches under the returned id.
    pub fn register_texture(&mut self, texture: glow::Texture) -> TextureId {
        let slot = self.textures.iter().position(Option::is_none);
        let index = match slot {
            Some(index) => {
                self.textures[index] = Some(texture);
                index
            }
            None => {
                self.textures.push(Some(texture));
                self.textures.len() - 1
            }
        };
        TextureId(index as u64)
    }

    /// Forgets `id` and returns the texture for the host to delete.
    pub fn unregister_texture(&mut self, id: TextureId) -> Option<glow::Texture> {
        self.textures.get_mut(id.0 as usize).and_then(Option::take)
    }

    fn program(&self, id: ProgramId) -> Result<&SpriteProgram, SpriteError> {
        self.programs
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or_else(|| SpriteError::Gpu(format!("unknown program {}", id.0)))
    }

    #[allow(unsafe_code)]
    fn create_vertex_state(&self, program: glow::Program) -> Result<SpriteProgram, String> {
        use glow::HasContext;

        // SAFETY: glow wraps raw GL calls as unsafe. The attribute layout
        // matches SpriteVertex (repr(C), 20 bytes) and the element buffer is
        // bound while the vertex array is, so it becomes part of its state.
        unsafe {
            let vao = self.gl.create_vertex_array()?;
            let vertex_buffer = self.gl.create_buffer()?;
            let index_buffer = self.gl.create_buffer()?;

            self.gl.bind_vertex_array(Some(vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));

            for attribute in SpriteVertex::ATTRIBUTES {
                let Some(location) = self.gl.get_attrib_location(program, attribute.name) else {
                    continue;
                };
                let data_type = match attribute.kind {
                    AttributeKind::Float => glow::FLOAT,
                    AttributeKind::UnsignedShort => glow::UNSIGNED_SHORT,
                    AttributeKind::UnsignedByte => glow::UNSIGNED_BYTE,
                };
                self.gl.enable_vertex_attrib_array(location);
                self.gl.vertex_attrib_pointer_f32(
                    location,
                    attribute.components,
                    data_type,
                    attribute.normalized,
                    SpriteVertex::STRIDE,
                    attribute.offset,
                );
            }

            self.gl.bind_vertex_array(None);

            Ok(SpriteProgram {
                program,
                vao,
                vertex_buffer,
                index_buffer,
                indexed_quads: 0,
            })
        }
    }
}

impl ShaderCompiler for GlowBackend {
    fn compile_fragment(&mut self, source: &str) -> Result<(), ShaderError> {
        trial_compile_fragment(&self.gl, source)
    }
}

impl GpuBackend for GlowBackend {
    fn capabilities(&self) -> GpuCapabilities {
        self.capabilities
    }

    #[allow(unsafe_code)]
    fn create_program(&mut self, vertex: &str, fragment: &str) -> Result<ProgramId, SpriteError> {
        use glow::HasContext;

        let program = compile_program(&self.gl, vertex, fragment)?;
        let state = match self.create_vertex_state(program) {
            Ok(state) => state,
            Err(err) => {
                // SAFETY: program was just linked and is referenced nowhere.
                unsafe { self.gl.delete_program(program) };
                return Err(SpriteError::Gpu(err));
            }
        };

        let slot = self.programs.iter().position(Option::is_none);
        let index = match slot {
            Some(index) => {
                self.programs[index] = Some(state);
                index
            }
            None => {
                self.programs.push(Some(state));
                self.programs.len() - 1
            }
        };
        Ok(ProgramId(index as u32))
    }

    #[allow(unsafe_code)]
    fn delete_program(&mut self, program: ProgramId) {
        use glow::HasContext;

        let Some(state) = self.programs.get_mut(program.0 as usize).and_then(Option::take) else {
            return;
        };
        // SAFETY: the handles were created by this context and are dropped
        // from the slab, so nothing refers to them afterwards.
        unsafe {
            self.gl.delete_vertex_array(state.vao);
            self.gl.delete_buffer(state.vertex_buffer);
            self.gl.delete_buffer(state.index_buffer);
            self.gl.delete_program(state.program);
        }
    }

    #[allow(unsafe_code)]
    fn use_program(&mut self, program: ProgramId) {
        use glow::HasContext;

        let handle = self.program(program).ok().map(|state| state.program);
        // SAFETY: handle is a live program of this context, or None.
        unsafe { self.gl.use_program(handle) };
    }

    #[allow(unsafe_code)]
    fn set_uniform(&mut self, program: ProgramId, name: &str, value: &UniformValue) {
        use glow::HasContext;

        let Ok(state) = self.program(program) else {
            return;
        };
        // SAFETY: the program is in use (use_program precedes every call)
        // and the location was looked up on that same program.
        unsafe {
            let Some(location) = self.gl.get_uniform_location(state.program, name) else {
                return;
            };
            let location = Some(&location);
            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, *v),
                UniformValue::Uint(v) => self.gl.uniform_1_u32(location, *v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, *v),
                UniformValue::IntArray(values) => self.gl.uniform_1_i32_slice(location, values),
                UniformValue::Mat3(m) => {
                    self.gl
                        .uniform_matrix_3_f32_slice(location, false, &m.to_cols_array())
                }
            }
        }
    }

    #[allow(unsafe_code)]
    fn bind_texture(&mut self, unit: u32, texture: TextureId) -> Result<(), SpriteError> {
        use glow::HasContext;

        let handle = self
            .textures
            .get(texture.0 as usize)
            .copied()
            .flatten()
            .ok_or_else(|| SpriteError::Gpu(format!("texture {} is not registered", texture.0)))?;
        // SAFETY: handle is a registered texture of this context and unit is
        // below the unit count the batch was sized with.
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(handle));
        }
        Ok(())
    }

    #[allow(unsafe_code)]
    fn unbind_texture(&mut self, unit: u32) {
        use glow::HasContext;

        // SAFETY: binding None to a unit is always valid.
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }
    }

    #[allow(unsafe_code)]
    fn draw_quads(&mut self, program: ProgramId, vertices: &[SpriteVertex]) -> Result<(), SpriteError> {
        use glow::HasContext;

        let quads = vertices.len() / VERTICES_PER_QUAD;
        if quads == 0 {
            return Ok(());
        }
        if quads > MAX_QUADS_PER_DRAW {
            return Err(SpriteError::Gpu(format!(
                "{quads} quads exceed the {MAX_QUADS_PER_DRAW} a 16-bit index buffer can address"
            )));
        }

        let slot = self
            .programs
            .get_mut(program.0 as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| SpriteError::Gpu(format!("unknown program {}", program.0)))?;

        // SAFETY: the buffers belong to this program's vertex array, the
        // vertex bytes come from a Pod type, and the index buffer covers at
        // least `quads` quads before drawing.
        unsafe {
            self.gl.use_program(Some(slot.program));
            self.gl.bind_vertex_array(Some(slot.vao));

            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(slot.vertex_buffer));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STREAM_DRAW,
            );

            if slot.indexed_quads < quads {
                let indices = quad_indices(quads);
                self.gl.buffer_data_u8_slice(
                    glow::ELEMENT_ARRAY_BUFFER,
                    bytemuck::cast_slice(&indices),
                    glow::STATIC_DRAW,
                );
                slot.indexed_quads = quads;
            }

            self.gl
                .draw_elements(glow::TRIANGLES, (quads * 6) as i32, glow::UNSIGNED_SHORT, 0);
            self.gl.bind_vertex_array(None);
        }
        Ok(())
    }
}
