//! ECMAScript type coercion rules
//!
//! The runtime converts between primitives the ECMA-262 way; folding and
//! conversion elision are only correct if these match it exactly.

use super::ConstantValue;

/// ToBoolean
pub fn to_boolean(value: &ConstantValue) -> bool {
    match value {
        ConstantValue::Undefined | ConstantValue::Null => false,
        ConstantValue::Boolean(b) => *b,
        ConstantValue::Number(n) => *n != 0.0 && !n.is_nan(),
        ConstantValue::String(s) => !s.is_empty(),
        ConstantValue::Opaque => true,
    }
}

/// ToNumber
pub fn to_number(value: &ConstantValue) -> f64 {
    match value {
        ConstantValue::Undefined => f64::NAN,
        ConstantValue::Null => 0.0,
        ConstantValue::Boolean(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        ConstantValue::Number(n) => *n,
        ConstantValue::String(s) => string_to_number(s),
        ConstantValue::Opaque => f64::NAN,
    }
}

/// ToNumber applied to a string (StringNumericLiteral grammar)
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    // Hex literals take no sign
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return hex_to_number(hex);
    }
    let (sign, digits) = match trimmed.as_bytes()[0] {
        b'-' => (-1.0, &trimmed[1..]),
        b'+' => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if digits == "Infinity" {
        return sign * f64::INFINITY;
    }
    // Only the exponent may carry a second sign, and Rust accepts
    // "inf"/"nan" spellings that ECMAScript does not
    if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        || !digits
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }
    match digits.parse::<f64>() {
        Ok(v) => sign * v,
        Err(_) => f64::NAN,
    }
}

/// Hex digits of any length, accumulated in floating point
fn hex_to_number(hex: &str) -> f64 {
    if hex.is_empty() {
        return f64::NAN;
    }
    hex.chars()
        .try_fold(0.0, |acc, c| c.to_digit(16).map(|d| acc * 16.0 + d as f64))
        .unwrap_or(f64::NAN)
}

/// ToInt32: modulo 2^32, reinterpreted as signed
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// ToUint32: truncate toward zero, then modulo 2^32
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() || n == 0.0 {
        return 0;
    }
    let truncated = n.trunc();
    let modulo = truncated.rem_euclid(4294967296.0);
    modulo as u32
}

/// ToString
pub fn to_string(value: &ConstantValue) -> String {
    match value {
        ConstantValue::Undefined => "undefined".to_string(),
        ConstantValue::Null => "null".to_string(),
        ConstantValue::Boolean(b) => b.to_string(),
        ConstantValue::Number(n) => number_to_string(*n),
        ConstantValue::String(s) => s.clone(),
        ConstantValue::Opaque => "[object Object]".to_string(),
    }
}

/// Number::toString for radix 10
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        // Rust prints `1e21`, ECMAScript `1e+21`
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    // f64's Display never uses exponent notation and drops a zero fraction
    format!("{}", n)
}

/// The `typeof` operator
pub fn type_of(value: &ConstantValue) -> &'static str {
    match value {
        ConstantValue::Undefined => "undefined",
        ConstantValue::Null => "object",
        ConstantValue::Boolean(_) => "boolean",
        ConstantValue::Number(_) => "number",
        ConstantValue::String(_) => "string",
        ConstantValue::Opaque => "object",
    }
}

/// Strict equality (`===`)
pub fn strict_equals(left: &ConstantValue, right: &ConstantValue) -> bool {
    match (left, right) {
        (ConstantValue::Undefined, ConstantValue::Undefined) => true,
        (ConstantValue::Null, ConstantValue::Null) => true,
        (ConstantValue::Boolean(l), ConstantValue::Boolean(r)) => l == r,
        (ConstantValue::Number(l), ConstantValue::Number(r)) => l == r,
        (ConstantValue::String(l), ConstantValue::String(r)) => l == r,
        _ => false,
    }
}

/// Abstract equality (`==`) restricted to primitives
pub fn loose_equals(left: &ConstantValue, right: &ConstantValue) -> bool {
    use ConstantValue::*;
    match (left, right) {
        (Opaque, _) | (_, Opaque) => false,
        (Undefined | Null, Undefined | Null) => true,
        (Undefined | Null, _) | (_, Undefined | Null) => false,
        (Number(_), String(_)) | (String(_), Number(_)) | (Boolean(_), _) | (_, Boolean(_)) => {
            let (l, r) = (to_number(left), to_number(right));
            l == r
        }
        _ => strict_equals(left, right),
    }
}

/// Abstract relational comparison `left < right`; `None` when a NaN is involved
pub fn less_than(left: &ConstantValue, right: &ConstantValue) -> Option<bool> {
    if let (ConstantValue::String(l), ConstantValue::String(r)) = (left, right) {
        // Strings compare by UTF-16 code units
        return Some(l.encode_utf16().lt(r.encode_utf16()));
    }
    let (l, r) = (to_number(left), to_number(right));
    if l.is_nan() || r.is_nan() {
        None
    } else {
        Some(l < r)
    }
}
