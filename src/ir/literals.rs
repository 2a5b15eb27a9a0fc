//! Leaf nodes: literal values, registers and scope lookups

use super::precedence::{self, Precedence};
use super::property::FullMultinameItem;
use super::TypeItem;
use crate::analysis::ecma;
use crate::writer::{Cancelled, GraphTextWriter, LocalData};
use serde::{Deserialize, Serialize};

/// A local register read (`getlocal`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalRegisterItem {
    pub register: u32,
    /// Declared type of the local, `*` when unknown
    #[serde(default)]
    pub ty: TypeItem,
}

impl LocalRegisterItem {
    pub fn new(register: u32) -> Self {
        Self {
            register,
            ty: TypeItem::Unbounded,
        }
    }

    pub fn typed(register: u32, ty: TypeItem) -> Self {
        Self { register, ty }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        writer.append(&local_data.local_name(self.register));
        Ok(())
    }
}

/// Scope chain lookup (`findproperty` / `findpropstrict`).
///
/// Only ever appears as the receiver of a property access; accesses omit it
/// and print the bare property name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FindPropertyItem {
    pub property: FullMultinameItem,
}

impl FindPropertyItem {
    pub fn new(property: FullMultinameItem) -> Self {
        Self { property }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        self.property.render_bare(writer, local_data)
    }
}

/// Quote a string the way the source language writes it
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{0008}' => escaped.push_str("\\b"),
            '\u{000C}' => escaped.push_str("\\f"),
            c if (c as u32) < 0x20 => escaped.push_str(&format!("\\x{:02X}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

/// Source text of a number literal.
///
/// Unlike ToString this keeps the sign of negative zero.
pub fn number_literal_text(value: f64) -> String {
    if value == 0.0 && value.is_sign_negative() {
        return "-0".to_string();
    }
    ecma::number_to_string(value)
}

/// Negative literals print with a leading minus and bind like unary minus
pub fn numeric_literal_precedence(negative: bool) -> Precedence {
    if negative {
        precedence::UNARY
    } else {
        precedence::PRIMARY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("plain"), "\"plain\"");
        assert_eq!(escape_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(escape_string("line\nbreak\\"), "\"line\\nbreak\\\\\"");
        assert_eq!(escape_string("\u{1}"), "\"\\x01\"");
    }

    #[test]
    fn test_number_literal_text() {
        assert_eq!(number_literal_text(1.0), "1");
        assert_eq!(number_literal_text(-2.5), "-2.5");
        assert_eq!(number_literal_text(f64::NAN), "NaN");
        assert_eq!(number_literal_text(-0.0), "-0");
        assert_eq!(number_literal_text(0.0), "0");
    }
}
