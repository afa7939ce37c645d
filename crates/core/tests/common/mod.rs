#![allow(dead_code)]

use typed_sprite_core::{
    GpuBackend, GpuCapabilities, ProgramId, ShaderCompiler, ShaderError, ShaderStage, SpriteError,
    SpriteVertex, TextureId, UniformValue,
};

/// A GPU call as seen by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CompileFragment { branches: u32, accepted: bool },
    CreateProgram(ProgramId),
    DeleteProgram(ProgramId),
    UseProgram(ProgramId),
    SetUniform(String, UniformValue),
    BindTexture(u32, TextureId),
    UnbindTexture(u32),
    DrawQuads { quads: usize, texture_ids: Vec<f32> },
}

/// Backend double that records every call and emulates a driver branch
/// limit for probe shaders.
pub struct RecordingBackend {
    pub capabilities: GpuCapabilities,
    /// Probe shaders with more branches fail to compile; `None` rejects all.
    pub branch_limit: Option<u32>,
    pub fail_link: bool,
    pub calls: Vec<Call>,
    pub programs: Vec<(String, String)>,
}

impl RecordingBackend {
    pub fn webgl2(max_texture_image_units: u32) -> Self {
        Self {
            capabilities: GpuCapabilities {
                max_texture_image_units,
                supports_glsl_es3: true,
            },
            branch_limit: Some(u32::MAX),
            fail_link: false,
            calls: Vec::new(),
            programs: Vec::new(),
        }
    }

    pub fn webgl1() -> Self {
        Self {
            capabilities: GpuCapabilities {
                max_texture_image_units: 16,
                supports_glsl_es3: false,
            },
            ..Self::webgl2(16)
        }
    }

    pub fn with_branch_limit(mut self, limit: Option<u32>) -> Self {
        self.branch_limit = limit;
        self
    }

    pub fn probes(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::CompileFragment { branches, .. } => Some(*branches),
                _ => None,
            })
            .collect()
    }

    pub fn draws(&self) -> Vec<(usize, Vec<f32>)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::DrawQuads { quads, texture_ids } => Some((*quads, texture_ids.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn unbinds(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::UnbindTexture(unit) => Some(*unit),
                _ => None,
            })
            .collect()
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::SetUniform(n, value) if n == name => Some(value),
            _ => None,
        })
    }

    /// Index of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }
}

impl ShaderCompiler for RecordingBackend {
    fn compile_fragment(&mut self, source: &str) -> Result<(), ShaderError> {
        let branches = source.matches("{}").count() as u32;
        let accepted = matches!(self.branch_limit, Some(limit) if branches <= limit);
        self.calls.push(Call::CompileFragment { branches, accepted });
        if accepted {
            Ok(())
        } else {
            Err(ShaderError::CompileError {
                stage: ShaderStage::Fragment,
                log: format!("ERROR: too many branches ({branches})"),
            })
        }
    }
}

impl GpuBackend for RecordingBackend {
    fn capabilities(&self) -> GpuCapabilities {
        self.capabilities
    }

    fn create_program(&mut self, vertex: &str, fragment: &str) -> Result<ProgramId, SpriteError> {
        if self.fail_link {
            return Err(ShaderError::LinkError("mock link failure".into()).into());
        }
        self.programs.push((vertex.to_string(), fragment.to_string()));
        let id = ProgramId(self.programs.len() as u32);
        self.calls.push(Call::CreateProgram(id));
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.calls.push(Call::DeleteProgram(program));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(Call::UseProgram(program));
    }

    fn set_uniform(&mut self, _program: ProgramId, name: &str, value: &UniformValue) {
        self.calls.push(Call::SetUniform(name.to_string(), value.clone()));
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) -> Result<(), SpriteError> {
        self.calls.push(Call::BindTexture(unit, texture));
        Ok(())
    }

    fn unbind_texture(&mut self, unit: u32) {
        self.calls.push(Call::UnbindTexture(unit));
    }

    fn draw_quads(&mut self, _program: ProgramId, vertices: &[SpriteVertex]) -> Result<(), SpriteError> {
        self.calls.push(Call::DrawQuads {
            quads: vertices.len() / 4,
            texture_ids: vertices.chunks(4).map(|quad| quad[0].texture_id).collect(),
        });
        Ok(())
    }
}
