//! Shader compilation and linking with glow.
//!
//! Sources are passed to the driver unchanged. Nothing is prepended, so a
//! `#version 300 es` directive stays on the first line.

use crate::shader::{format_shader_error, ShaderError, ShaderStage};

fn gl_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// Compiles a single shader stage.
///
/// # Errors
///
/// `ShaderError::CompileError` with the numbered source and the driver's
/// info log.
#[allow(unsafe_code)]
pub fn compile_shader(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    use glow::HasContext;

    // SAFETY: glow wraps raw GL calls as unsafe. The stage constant is one
    // of the two valid shader types and the shader is deleted on failure.
    let shader = unsafe {
        gl.create_shader(gl_stage(stage))
            .map_err(|log| ShaderError::CompileError { stage, log })?
    };

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    if unsafe { gl.get_shader_compile_status(shader) } {
        Ok(shader)
    } else {
        let info_log = unsafe { gl.get_shader_info_log(shader) };
        unsafe { gl.delete_shader(shader) };
        Err(ShaderError::CompileError {
            stage,
            log: format_shader_error(source, &info_log),
        })
    }
}

/// Links a vertex and fragment shader into a program.
///
/// # Errors
///
/// `ShaderError::LinkError` with the driver's info log.
#[allow(unsafe_code)]
pub fn link_program(
    gl: &glow::Context,
    vertex: glow::Shader,
    fragment: glow::Shader,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    // SAFETY: both handles come from successful compile_shader calls; the
    // program is deleted on failure.
    let program = unsafe { gl.create_program().map_err(ShaderError::LinkError)? };

    unsafe {
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
    }

    if unsafe { gl.get_program_link_status(program) } {
        Ok(program)
    } else {
        let info_log = unsafe { gl.get_program_info_log(program) };
        unsafe { gl.delete_program(program) };
        Err(ShaderError::LinkError(info_log))
    }
}

/// Compiles both stages and links them. Shader objects are deleted
/// afterwards whatever the outcome.
#[allow(unsafe_code)]
pub fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    let vert = compile_shader(gl, ShaderStage::Vertex, vertex_src)?;
    let frag = match compile_shader(gl, ShaderStage::Fragment, fragment_src) {
        Ok(frag) => frag,
        Err(err) => {
            // SAFETY: vert is a valid shader from a successful compile.
            unsafe { gl.delete_shader(vert) };
            return Err(err);
        }
    };

    let result = link_program(gl, vert, frag);

    // SAFETY: the linked program keeps its own copies of the stages.
    unsafe {
        gl.delete_shader(vert);
        gl.delete_shader(frag);
    }

    result
}

/// Compiles `source` as a fragment shader and deletes it right away.
#[allow(unsafe_code)]
pub fn trial_compile_fragment(gl: &glow::Context, source: &str) -> Result<(), ShaderError> {
    use glow::HasContext;

    let shader = compile_shader(gl, ShaderStage::Fragment, source)?;
    // SAFETY: shader is a valid handle that nothing else references.
    unsafe { gl.delete_shader(shader) };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_map_to_gl_constants() {
        assert_eq!(gl_stage(ShaderStage::Vertex), glow::VERTEX_SHADER);
        assert_eq!(gl_stage(ShaderStage::Fragment), glow::FRAGMENT_SHADER);
    }

    #[test]
    #[ignore = "requires GL context"]
    fn sprite_program_links_for_every_data_type() {
        // Would test: compile_program accepts assemble() output for each tag.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn broken_fragment_reports_numbered_source() {
        // Would test: a syntax error yields CompileError { stage: Fragment }
        // whose log starts with "1: #version 300 es".
    }
}
