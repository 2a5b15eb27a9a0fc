//! Explicit conversions and implicit coercions
//!
//! `ConvertItem` comes from the `convert_*` instructions. It prints as a
//! cast (`int(x)`) only when the operand's inferred type does not already
//! guarantee the target type. `CoerceItem` comes from `coerce*`, which the
//! compiler inserts on its own; it never prints.

use super::{Node, TypeItem};
use crate::analysis::{ecma, ConstantValue, VisitedSet};
use crate::writer::{Cancelled, GraphTextWriter, LocalData};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Conversion elision policy.
///
/// Returns whether converting a value of type `operand` to `target` has to
/// be written out. Operands typed `*` are accepted everywhere a primitive is
/// expected; class targets always print.
pub fn needs_explicit_conversion(target: &TypeItem, operand: &TypeItem) -> bool {
    match target {
        TypeItem::Boolean => !matches!(operand, TypeItem::Boolean | TypeItem::Unbounded),
        TypeItem::Number | TypeItem::Int | TypeItem::UInt => !matches!(
            operand,
            TypeItem::Int | TypeItem::Number | TypeItem::UInt | TypeItem::Unbounded
        ),
        TypeItem::String => !matches!(operand, TypeItem::String | TypeItem::Unbounded),
        _ => true,
    }
}

/// `Type(value)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertItem {
    pub ty: TypeItem,
    pub value: Box<Node>,
}

impl ConvertItem {
    pub fn new(value: Node, ty: TypeItem) -> Self {
        Self {
            ty,
            value: Box::new(value),
        }
    }

    /// Whether the cast must appear in the output
    pub fn display_convert(&self) -> bool {
        needs_explicit_conversion(&self.ty, &self.value.return_type())
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        if self.display_convert() {
            writer.append(&self.ty.to_string()).append("(");
            writer.render_node(&self.value, local_data)?;
            writer.append(")");
            Ok(())
        } else {
            writer.render_node(&self.value, local_data)
        }
    }

    /// Compile-time value of the conversion.
    ///
    /// Conversions to `Object` pass the value through; rejecting
    /// non-objects is left to whoever consumes the result. Targets outside
    /// the primitive set give `Opaque`, and so does any conversion of an
    /// `Opaque` operand.
    pub fn result(&self) -> ConstantValue {
        if !self.value.result().is_foldable() {
            return ConstantValue::Opaque;
        }
        match self.ty {
            TypeItem::Boolean => ConstantValue::Boolean(self.value.result().to_boolean()),
            TypeItem::Number => ConstantValue::Number(self.value.result_as_number()),
            TypeItem::Int => {
                ConstantValue::Number(ecma::to_int32(self.value.result_as_number()) as f64)
            }
            TypeItem::UInt => ConstantValue::Number(self.value.result().to_uint32() as f64),
            TypeItem::String => ConstantValue::String(self.value.result_as_string()),
            TypeItem::Object => self.value.result(),
            _ => ConstantValue::Opaque,
        }
    }

    pub fn is_compile_time(&self, visited: &mut VisitedSet) -> bool {
        if visited.contains(&self.value) {
            return false;
        }
        visited.insert(&self.value);
        self.value.is_compile_time(visited)
    }
}

/// Equal when the target type and the operand are structurally equal
impl PartialEq for ConvertItem {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.value == other.value
    }
}

impl Eq for ConvertItem {}

/// Only the target type is hashed. Equal conversions still hash equally;
/// conversions of different operands to one type share a bucket.
impl Hash for ConvertItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
    }
}

/// Implicit coercion inserted by the compiler
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoerceItem {
    pub ty: TypeItem,
    pub value: Box<Node>,
}

impl CoerceItem {
    pub fn new(value: Node, ty: TypeItem) -> Self {
        Self {
            ty,
            value: Box::new(value),
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        writer.render_node(&self.value, local_data)
    }

    /// `coerce_s` keeps `null` and `undefined` as `null`; the numeric and
    /// boolean coercions behave like the conversions.
    pub fn result(&self) -> ConstantValue {
        let value = self.value.result();
        if !value.is_foldable() {
            return value;
        }
        match self.ty {
            TypeItem::String => match value {
                ConstantValue::Null | ConstantValue::Undefined => ConstantValue::Null,
                other => ConstantValue::String(other.to_ecma_string()),
            },
            TypeItem::Boolean => ConstantValue::Boolean(value.to_boolean()),
            TypeItem::Number => ConstantValue::Number(value.to_number()),
            TypeItem::Int => ConstantValue::Number(value.to_int32() as f64),
            TypeItem::UInt => ConstantValue::Number(value.to_uint32() as f64),
            _ => value,
        }
    }

    pub fn is_compile_time(&self, visited: &mut VisitedSet) -> bool {
        if !visited.insert(&self.value) {
            return false;
        }
        self.value.is_compile_time(visited)
    }
}
