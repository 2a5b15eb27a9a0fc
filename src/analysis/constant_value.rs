//! Values produced by compile-time evaluation

use super::ecma;
use std::fmt;

/// A value known at decompile time
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    /// Some object whose contents are not tracked. Also the marker for a
    /// conversion to a type outside the primitive set: it is truthy, never
    /// equal to anything, and folding stops at it.
    Opaque,
}

impl ConstantValue {
    /// Whether this value can be turned back into a literal
    pub fn is_foldable(&self) -> bool {
        !matches!(self, ConstantValue::Opaque)
    }

    pub fn to_boolean(&self) -> bool {
        ecma::to_boolean(self)
    }

    pub fn to_number(&self) -> f64 {
        ecma::to_number(self)
    }

    pub fn to_int32(&self) -> i32 {
        ecma::to_int32(ecma::to_number(self))
    }

    pub fn to_uint32(&self) -> u32 {
        ecma::to_uint32(ecma::to_number(self))
    }

    pub fn to_ecma_string(&self) -> String {
        ecma::to_string(self)
    }

    pub fn type_of(&self) -> &'static str {
        ecma::type_of(self)
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::String(s) => write!(f, "{:?}", s),
            other => f.write_str(&ecma::to_string(other)),
        }
    }
}
