//! Uniform values and the per-program binding table.

use std::collections::BTreeMap;

use glam::Mat3;

use crate::data_type::ScalarKind;

/// A value that can be written to a program uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Uint(u32),
    Float(f32),
    IntArray(Vec<i32>),
    Mat3(Mat3),
}

impl UniformValue {
    /// Converts a numeric value to the representation of `kind`, saturating
    /// at the bounds of the 32-bit GLSL scalar.
    pub fn scalar(kind: ScalarKind, value: f64) -> Self {
        match kind {
            ScalarKind::Int => UniformValue::Int(value.clamp(i32::MIN as f64, i32::MAX as f64) as i32),
            ScalarKind::Uint => UniformValue::Uint(value.clamp(0.0, u32::MAX as f64) as u32),
            ScalarKind::Float => UniformValue::Float(value as f32),
        }
    }
}

/// Uniform name to value table applied to a program after it is linked.
///
/// Iteration is ordered by name so that the calls a backend receives are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformBindings {
    values: BTreeMap<String, UniformValue>,
}

impl UniformBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: UniformValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
