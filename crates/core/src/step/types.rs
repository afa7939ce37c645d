//! Type resolvers: how a shader step names a type that may depend on the
//! sampled data type.

use std::borrow::Cow;

use crate::data_type::BaseDataType;

/// Strategy mapping a [`BaseDataType`] to a concrete GLSL type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeResolver {
    /// A type that never varies, e.g. the `vec4` a step outputs.
    Independent(Cow<'static, str>),
    /// The data type's prefix followed by a suffix: `"vec4"` becomes
    /// `ivec4` or `uvec4`.
    Dependent(Cow<'static, str>),
    /// The data type's scalar, `int` or `uint`.
    DependentScalar,
}

impl TypeResolver {
    pub const fn independent(name: &'static str) -> Self {
        TypeResolver::Independent(Cow::Borrowed(name))
    }

    pub const fn dependent(suffix: &'static str) -> Self {
        TypeResolver::Dependent(Cow::Borrowed(suffix))
    }

    pub fn resolve(&self, base: &BaseDataType) -> String {
        match self {
            TypeResolver::Independent(name) => name.to_string(),
            TypeResolver::Dependent(suffix) => format!("{}{}", base.prefix(), suffix),
            TypeResolver::DependentScalar => base.glsl_scalar().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;

    #[test]
    fn independent_ignores_data_type() {
        let resolver = TypeResolver::independent("vec4");
        for dt in DataType::ALL {
            assert_eq!(resolver.resolve(&BaseDataType::new(dt)), "vec4");
        }
    }

    #[test]
    fn dependent_prepends_prefix() {
        let resolver = TypeResolver::dependent("vec4");
        assert_eq!(resolver.resolve(&DataType::Uint16.into()), "uvec4");
        assert_eq!(resolver.resolve(&DataType::Int32.into()), "ivec4");
    }

    #[test]
    fn dependent_scalar_matches_base_scalar() {
        for dt in DataType::ALL {
            let base = BaseDataType::new(dt);
            assert_eq!(TypeResolver::DependentScalar.resolve(&base), base.glsl_scalar());
        }
    }

    #[test]
    fn owned_names_resolve_like_borrowed_ones() {
        let owned = TypeResolver::Dependent(Cow::Owned(String::from("sampler2D")));
        assert_eq!(owned.resolve(&DataType::Int8.into()), "isampler2D");
    }
}
