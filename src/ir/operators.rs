//! Operator expressions: binary, unary, conditional, compound assignment

use super::precedence::{self, Precedence};
use super::{Node, NodeKind, TypeItem};
use crate::writer::{Cancelled, GraphTextWriter, LocalData};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    Equals,
    NotEquals,
    StrictEquals,
    StrictNotEquals,
    LessThan,
    LessEquals,
    GreaterThan,
    GreaterEquals,
    LogicalAnd,
    LogicalOr,
    In,
    InstanceOf,
    Is,
    As,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::UnsignedRightShift => ">>>",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::StrictEquals => "===",
            BinaryOperator::StrictNotEquals => "!==",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::LogicalAnd => "&&",
            BinaryOperator::LogicalOr => "||",
            BinaryOperator::In => "in",
            BinaryOperator::InstanceOf => "instanceof",
            BinaryOperator::Is => "is",
            BinaryOperator::As => "as",
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => {
                precedence::MULTIPLICATIVE
            }
            BinaryOperator::Add | BinaryOperator::Subtract => precedence::ADDITIVE,
            BinaryOperator::LeftShift
            | BinaryOperator::RightShift
            | BinaryOperator::UnsignedRightShift => precedence::BITWISE_SHIFT,
            BinaryOperator::LessThan
            | BinaryOperator::LessEquals
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterEquals
            | BinaryOperator::In
            | BinaryOperator::InstanceOf
            | BinaryOperator::Is
            | BinaryOperator::As => precedence::RELATIONAL,
            BinaryOperator::Equals
            | BinaryOperator::NotEquals
            | BinaryOperator::StrictEquals
            | BinaryOperator::StrictNotEquals => precedence::EQUALITY,
            BinaryOperator::BitAnd => precedence::BITWISE_AND,
            BinaryOperator::BitXor => precedence::BITWISE_XOR,
            BinaryOperator::BitOr => precedence::BITWISE_OR,
            BinaryOperator::LogicalAnd => precedence::LOGICAL_AND,
            BinaryOperator::LogicalOr => precedence::LOGICAL_OR,
        }
    }

    /// Operators whose result depends on runtime type information only
    pub fn is_type_operator(&self) -> bool {
        matches!(
            self,
            BinaryOperator::In | BinaryOperator::InstanceOf | BinaryOperator::Is | BinaryOperator::As
        )
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Negate,
    BitNot,
    TypeOf,
    Void,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Negate => "-",
            UnaryOperator::BitNot => "~",
            UnaryOperator::TypeOf => "typeof ",
            UnaryOperator::Void => "void ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinaryOpItem {
    pub operator: BinaryOperator,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl BinaryOpItem {
    pub fn new(operator: BinaryOperator, left: Node, right: Node) -> Self {
        Self {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn return_type(&self) -> TypeItem {
        let left = self.left.return_type();
        let right = self.right.return_type();
        match self.operator {
            BinaryOperator::Add => {
                if left == TypeItem::String || right == TypeItem::String {
                    TypeItem::String
                } else if left.is_numeric() && right.is_numeric() {
                    TypeItem::Number
                } else {
                    TypeItem::Unbounded
                }
            }
            BinaryOperator::Subtract
            | BinaryOperator::Multiply
            | BinaryOperator::Divide
            | BinaryOperator::Modulo => TypeItem::Number,
            BinaryOperator::BitAnd
            | BinaryOperator::BitOr
            | BinaryOperator::BitXor
            | BinaryOperator::LeftShift
            | BinaryOperator::RightShift => TypeItem::Int,
            BinaryOperator::UnsignedRightShift => TypeItem::UInt,
            BinaryOperator::Equals
            | BinaryOperator::NotEquals
            | BinaryOperator::StrictEquals
            | BinaryOperator::StrictNotEquals
            | BinaryOperator::LessThan
            | BinaryOperator::LessEquals
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterEquals
            | BinaryOperator::In
            | BinaryOperator::InstanceOf
            | BinaryOperator::Is => TypeItem::Boolean,
            BinaryOperator::LogicalAnd | BinaryOperator::LogicalOr => {
                if left == right {
                    left
                } else {
                    TypeItem::Unbounded
                }
            }
            BinaryOperator::As => TypeItem::Unbounded,
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        let precedence = self.operator.precedence();
        writer.render_operand(&self.left, local_data, precedence)?;
        writer.append(" ").append(self.operator.symbol()).append(" ");
        writer.render_right_operand(&self.right, local_data, precedence)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnaryOpItem {
    pub operator: UnaryOperator,
    pub value: Box<Node>,
}

impl UnaryOpItem {
    pub fn new(operator: UnaryOperator, value: Node) -> Self {
        Self {
            operator,
            value: Box::new(value),
        }
    }

    pub fn return_type(&self) -> TypeItem {
        match self.operator {
            UnaryOperator::Not => TypeItem::Boolean,
            UnaryOperator::Negate => TypeItem::Number,
            UnaryOperator::BitNot => TypeItem::Int,
            UnaryOperator::TypeOf => TypeItem::String,
            UnaryOperator::Void => TypeItem::Unbounded,
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        writer.append(self.operator.symbol());
        // `-(-x)` must not collapse into `--x`
        if self.operator == UnaryOperator::Negate && starts_with_minus(&self.value) {
            writer.append("(");
            writer.render_node(&self.value, local_data)?;
            writer.append(")");
            return Ok(());
        }
        writer.render_operand(&self.value, local_data, precedence::UNARY)
    }
}

fn starts_with_minus(node: &Node) -> bool {
    match &node.not_coerced().kind {
        NodeKind::Integer(v) => *v < 0,
        NodeKind::Number(v) => v.0.is_sign_negative() && !v.0.is_nan(),
        NodeKind::UnaryOp(inner) => inner.operator == UnaryOperator::Negate,
        _ => false,
    }
}

/// `condition ? on_true : on_false`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TernaryItem {
    pub condition: Box<Node>,
    pub on_true: Box<Node>,
    pub on_false: Box<Node>,
}

impl TernaryItem {
    pub fn new(condition: Node, on_true: Node, on_false: Node) -> Self {
        Self {
            condition: Box::new(condition),
            on_true: Box::new(on_true),
            on_false: Box::new(on_false),
        }
    }

    pub fn return_type(&self) -> TypeItem {
        let on_true = self.on_true.return_type();
        if on_true == self.on_false.return_type() {
            on_true
        } else {
            TypeItem::Unbounded
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        writer.render_operand(&self.condition, local_data, precedence::LOGICAL_OR)?;
        writer.append(" ? ");
        writer.render_operand(&self.on_true, local_data, precedence::ASSIGNMENT)?;
        writer.append(" : ");
        writer.render_operand(&self.on_false, local_data, precedence::ASSIGNMENT)
    }
}

/// Right-hand side of `target op= value`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompoundAssignment {
    pub operator: BinaryOperator,
    pub value: Box<Node>,
}

impl CompoundAssignment {
    pub fn new(operator: BinaryOperator, value: Node) -> Self {
        Self {
            operator,
            value: Box::new(value),
        }
    }

    /// Renders ` op= value`
    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        writer.append(" ").append(self.operator.symbol()).append("= ");
        writer.render_operand(&self.value, local_data, precedence::ASSIGNMENT)
    }
}

/// Renders the tail of an assignment: ` op= compound` if present, else ` = value`
pub fn render_assignment_tail(
    writer: &mut GraphTextWriter,
    local_data: &LocalData,
    value: &Node,
    compound: Option<&CompoundAssignment>,
) -> Result<(), Cancelled> {
    match compound {
        Some(compound) => compound.render(writer, local_data),
        None => {
            writer.append(" = ");
            writer.render_operand(value, local_data, precedence::ASSIGNMENT)
        }
    }
}
