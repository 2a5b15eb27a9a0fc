//! Operator precedence levels
//!
//! Lower numbers bind tighter. An operand is parenthesized when its level is
//! greater than the level of the context it is embedded in.

pub type Precedence = u8;

pub const PRIMARY: Precedence = 0;
pub const UNARY: Precedence = 1;
pub const MULTIPLICATIVE: Precedence = 2;
pub const ADDITIVE: Precedence = 3;
pub const BITWISE_SHIFT: Precedence = 4;
pub const RELATIONAL: Precedence = 5;
pub const EQUALITY: Precedence = 6;
pub const BITWISE_AND: Precedence = 7;
pub const BITWISE_XOR: Precedence = 8;
pub const BITWISE_OR: Precedence = 9;
pub const LOGICAL_AND: Precedence = 10;
pub const LOGICAL_OR: Precedence = 11;
pub const CONDITIONAL: Precedence = 12;
pub const ASSIGNMENT: Precedence = 13;
/// Top-level context: nothing needs parentheses
pub const NONE: Precedence = 14;
