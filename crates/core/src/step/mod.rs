//! Composable per-pixel fragment stages.
//!
//! A [`ShaderStep`] contributes uniform declarations and one block of GLSL
//! to the generated fragment shader. Steps are chained by index: step `i`
//! reads the variable `step{i}` and writes `step{i + 1}`, where `step0` is
//! the raw sample taken from the bound texture.
//!
//! Step templates use three placeholders:
//!
//! - `%output_type%` -- the resolved output type of the step,
//! - `%input%` -- the variable holding the previous stage's value,
//! - `%output%` -- the variable this step declares.

pub mod types;
pub mod uniform;

use std::borrow::Cow;

use crate::data_type::BaseDataType;
use crate::error::SpriteError;
use crate::uniforms::UniformBindings;

pub use types::TypeResolver;
pub use uniform::{DefaultGen, UniformDescriptor};

/// Type of the fragment shader's final output variable.
pub const FRAGMENT_OUTPUT_TYPE: &str = "vec4";

// `vec4(float(...))` assigns the single channel value to all four channels
// for grayscale. Without it the result is a red-channel image.
const MIN_MAX_TEMPLATE: &str = "%output_type% %output% = vec4(float(clamp(%input%, minValue, maxValue) - minValue) / float(maxValue - minValue));";

/// One stage of fragment processing with typed input and output.
#[derive(Debug, Clone)]
pub struct ShaderStep {
    uniforms: Vec<UniformDescriptor>,
    input_type: TypeResolver,
    template: Cow<'static, str>,
    output_type: TypeResolver,
}

impl ShaderStep {
    pub fn new(
        uniforms: Vec<UniformDescriptor>,
        input_type: TypeResolver,
        template: impl Into<Cow<'static, str>>,
        output_type: TypeResolver,
    ) -> Self {
        Self {
            uniforms,
            input_type,
            template: template.into(),
            output_type,
        }
    }

    /// Linear normalization of the sampled value from
    /// `[minValue, maxValue]` to `[0, 1]`, broadcast to every channel.
    pub fn min_max() -> Self {
        Self::new(
            vec![
                UniformDescriptor::new("minValue", TypeResolver::DependentScalar, |b| b.min_value() as f64),
                UniformDescriptor::new("maxValue", TypeResolver::DependentScalar, |b| b.max_value() as f64),
            ],
            TypeResolver::dependent("vec4"),
            MIN_MAX_TEMPLATE,
            TypeResolver::independent("vec4"),
        )
    }

    pub fn uniforms(&self) -> &[UniformDescriptor] {
        &self.uniforms
    }

    pub fn uniforms_mut(&mut self) -> &mut [UniformDescriptor] {
        &mut self.uniforms
    }

    pub fn input_type(&self) -> &TypeResolver {
        &self.input_type
    }

    pub fn output_type(&self) -> &TypeResolver {
        &self.output_type
    }

    /// Uniform declarations, one per line.
    pub fn glsl_headers(&self, base: &BaseDataType) -> String {
        self.uniforms
            .iter()
            .map(|u| u.glsl(base))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The step's statement block for position `index` in the chain.
    pub fn glsl(&self, base: &BaseDataType, index: usize) -> String {
        self.template
            .replace("%output_type%", &self.output_type.resolve(base))
            .replace("%input%", &format!("step{index}"))
            .replace("%output%", &format!("step{}", index + 1))
    }

    pub fn set_attrs(
        &mut self,
        bindings: &mut UniformBindings,
        base: &BaseDataType,
    ) -> Result<(), SpriteError> {
        self.uniforms
            .iter_mut()
            .try_for_each(|u| u.set_attr(bindings, base))
    }
}

/// Checks that each step accepts what the previous one produces, starting
/// from the sampler's color type and ending at the fragment output type.
pub fn check_chain(steps: &[ShaderStep], base: &BaseDataType) -> Result<(), SpriteError> {
    let mut current = base.glsl_color_type();

    for (i, step) in steps.iter().enumerate() {
        let expected = step.input_type.resolve(base);
        if expected != current {
            return Err(SpriteError::ChainTypeMismatch {
                step: i,
                expected,
                found: current,
            });
        }
        current = step.output_type.resolve(base);
    }

    if current != FRAGMENT_OUTPUT_TYPE {
        return Err(SpriteError::ChainTypeMismatch {
            step: steps.len(),
            expected: FRAGMENT_OUTPUT_TYPE.to_string(),
            found: current,
        });
    }

    Ok(())
}
