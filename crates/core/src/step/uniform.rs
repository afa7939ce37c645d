//! Uniforms declared by shader steps.

use std::borrow::Cow;

use crate::data_type::{BaseDataType, ScalarKind};
use crate::error::SpriteError;
use crate::step::types::TypeResolver;
use crate::uniforms::{UniformBindings, UniformValue};

/// Produces a uniform's default from the data type being rendered.
pub type DefaultGen = fn(&BaseDataType) -> f64;

/// A uniform a step declares, with a lazily generated and then cached value.
#[derive(Debug, Clone)]
pub struct UniformDescriptor {
    name: Cow<'static, str>,
    ty: TypeResolver,
    default_gen: DefaultGen,
    value: Option<UniformValue>,
}

impl UniformDescriptor {
    pub fn new(name: &'static str, ty: TypeResolver, default_gen: DefaultGen) -> Self {
        Self {
            name: Cow::Borrowed(name),
            ty,
            default_gen,
            value: None,
        }
    }

    /// Starts with an explicit value instead of the generated default.
    pub fn with_value(mut self, value: UniformValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeResolver {
        &self.ty
    }

    /// The cached value, once generated or set.
    pub fn value(&self) -> Option<&UniformValue> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: UniformValue) {
        self.value = Some(value);
    }

    /// Declaration line, e.g. `uniform uint maxValue;`.
    pub fn glsl(&self, base: &BaseDataType) -> String {
        format!("uniform {} {};", self.ty.resolve(base), self.name)
    }

    /// Writes the uniform's value into `bindings`, generating the default
    /// on first use. A cached zero is kept as is.
    pub fn set_attr(
        &mut self,
        bindings: &mut UniformBindings,
        base: &BaseDataType,
    ) -> Result<(), SpriteError> {
        let value = match &self.value {
            Some(value) => value.clone(),
            None => {
                let glsl_type = self.ty.resolve(base);
                let kind = ScalarKind::from_glsl(&glsl_type).ok_or_else(|| {
                    SpriteError::UnsupportedUniformType {
                        name: self.name.to_string(),
                        glsl_type: glsl_type.clone(),
                    }
                })?;
                let value = UniformValue::scalar(kind, (self.default_gen)(base));
                log::debug!("uniform {} defaults to {value:?} for {}", self.name, base.data_type());
                self.value = Some(value.clone());
                value
            }
        };
        bindings.set(&*self.name, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn max_of(base: &BaseDataType) -> f64 {
        base.max_value() as f64
    }

    #[test]
    fn glsl_declares_resolved_type() {
        let uniform = UniformDescriptor::new("maxValue", TypeResolver::DependentScalar, max_of);
        assert_eq!(uniform.glsl(&DataType::Int16.into()), "uniform int maxValue;");
        assert_eq!(uniform.glsl(&DataType::Uint32.into()), "uniform uint maxValue;");
    }

    #[test]
    fn set_attr_binds_under_its_own_name() {
        let mut uniform = UniformDescriptor::new("maxValue", TypeResolver::DependentScalar, max_of);
        let mut bindings = UniformBindings::new();
        uniform.set_attr(&mut bindings, &DataType::Uint16.into()).unwrap();
        assert_eq!(bindings.get("maxValue"), Some(&UniformValue::Uint(65536)));
    }

    static ZERO_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn counted_zero(_: &BaseDataType) -> f64 {
        ZERO_CALLS.fetch_add(1, Ordering::SeqCst);
        0.0
    }

    #[test]
    fn zero_default_is_cached_after_first_bind() {
        let mut uniform = UniformDescriptor::new("minValue", TypeResolver::DependentScalar, counted_zero);
        let base = DataType::Int8.into();
        let mut bindings = UniformBindings::new();

        for _ in 0..3 {
            uniform.set_attr(&mut bindings, &base).unwrap();
        }

        assert_eq!(ZERO_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(uniform.value(), Some(&UniformValue::Int(0)));
        assert_eq!(bindings.get("minValue"), Some(&UniformValue::Int(0)));
    }

    #[test]
    fn explicit_value_wins_over_default() {
        let mut uniform = UniformDescriptor::new("maxValue", TypeResolver::DependentScalar, max_of)
            .with_value(UniformValue::Uint(4096));
        let mut bindings = UniformBindings::new();
        uniform.set_attr(&mut bindings, &DataType::Uint16.into()).unwrap();
        assert_eq!(bindings.get("maxValue"), Some(&UniformValue::Uint(4096)));
    }

    #[test]
    fn non_scalar_default_is_rejected() {
        let mut uniform = UniformDescriptor::new("tint", TypeResolver::independent("vec4"), max_of);
        let err = uniform
            .set_attr(&mut UniformBindings::new(), &DataType::Int16.into())
            .unwrap_err();
        assert!(matches!(err, SpriteError::UnsupportedUniformType { ref glsl_type, .. } if glsl_type == "vec4"));
    }
}
