//! Type model used for type-directed rendering decisions
//!
//! `TypeItem` is deliberately small: the primitive kinds the runtime coerces
//! between, the untyped `*`, and named classes for everything else.

use crate::abc::QualifiedName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A static type as known to the decompiler
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeItem {
    Boolean,
    Int,
    UInt,
    Number,
    String,
    Object,
    /// The untyped `*`
    Unbounded,
    Class(QualifiedName),
}

impl TypeItem {
    pub const BOOLEAN: TypeItem = TypeItem::Boolean;
    pub const INT: TypeItem = TypeItem::Int;
    pub const UINT: TypeItem = TypeItem::UInt;
    pub const NUMBER: TypeItem = TypeItem::Number;
    pub const STRING: TypeItem = TypeItem::String;
    pub const OBJECT: TypeItem = TypeItem::Object;
    pub const UNBOUNDED: TypeItem = TypeItem::Unbounded;

    /// Build a type from its source-level name.
    ///
    /// Top-level primitive names map onto the primitive kinds so that
    /// `Class("int")` never coexists with `Int`.
    pub fn from_name(name: &QualifiedName) -> Self {
        if !name.namespace.is_top_level() {
            return TypeItem::Class(name.clone());
        }
        match name.name.as_str() {
            "Boolean" => TypeItem::Boolean,
            "int" => TypeItem::Int,
            "uint" => TypeItem::UInt,
            "Number" => TypeItem::Number,
            "String" => TypeItem::String,
            "Object" => TypeItem::Object,
            "*" => TypeItem::Unbounded,
            _ => TypeItem::Class(name.clone()),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::from_name(&QualifiedName::public(name))
    }

    /// Number, int or uint
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeItem::Int | TypeItem::UInt | TypeItem::Number)
    }
}

impl Default for TypeItem {
    fn default() -> Self {
        TypeItem::Unbounded
    }
}

/// Canonical source name; the conversion rules dispatch on it.
impl fmt::Display for TypeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeItem::Boolean => f.write_str("Boolean"),
            TypeItem::Int => f.write_str("int"),
            TypeItem::UInt => f.write_str("uint"),
            TypeItem::Number => f.write_str("Number"),
            TypeItem::String => f.write_str("String"),
            TypeItem::Object => f.write_str("Object"),
            TypeItem::Unbounded => f.write_str("*"),
            TypeItem::Class(name) => write!(f, "{}", name),
        }
    }
}
