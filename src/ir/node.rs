//! The IR node type and the contract every kind fulfils

use super::convert::{CoerceItem, ConvertItem};
use super::equality::NumberLiteral;
use super::literals::{
    escape_string, number_literal_text, numeric_literal_precedence, FindPropertyItem,
    LocalRegisterItem,
};
use super::operators::{
    BinaryOpItem, BinaryOperator, TernaryItem, UnaryOpItem, UnaryOperator,
};
use super::precedence::{self, Precedence};
use super::property::{CallPropertyItem, FullMultinameItem, GetPropertyItem, SetPropertyItem};
use super::statements::{DeclarationItem, DuplicateItem, ReturnValueItem, SetLocalItem, ThrowItem};
use super::super_access::{
    CallSuperItem, ConstructSuperItem, GetSuperItem, SetSuperItem,
};
use super::TypeItem;
use crate::abc::SourceRef;
use crate::writer::{CancellationToken, Cancelled, GraphTextWriter, LocalData};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// One expression or statement reconstructed from the operand stack.
///
/// `source` is provenance only. It takes no part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default)]
    pub source: SourceRef,
}

/// Every node kind the expression builder can produce
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Integer(i32),
    UInteger(u32),
    Number(NumberLiteral),
    String(String),
    Boolean(bool),
    Null,
    Undefined,
    This,
    LocalRegister(LocalRegisterItem),
    FindProperty(FindPropertyItem),
    Duplicate(DuplicateItem),
    Convert(ConvertItem),
    Coerce(CoerceItem),
    GetProperty(GetPropertyItem),
    SetProperty(SetPropertyItem),
    CallProperty(CallPropertyItem),
    GetSuper(GetSuperItem),
    SetSuper(SetSuperItem),
    CallSuper(CallSuperItem),
    ConstructSuper(ConstructSuperItem),
    BinaryOp(BinaryOpItem),
    UnaryOp(UnaryOpItem),
    Ternary(TernaryItem),
    SetLocal(SetLocalItem),
    Declaration(DeclarationItem),
    ReturnValue(ReturnValueItem),
    ReturnVoid,
    Throw(ThrowItem),
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl Node {
    pub fn new(kind: NodeKind, source: SourceRef) -> Self {
        Self { kind, source }
    }

    /// A node with no instruction behind it
    pub fn synthetic(kind: NodeKind) -> Self {
        Self::new(kind, SourceRef::synthetic())
    }

    pub fn with_source(mut self, source: SourceRef) -> Self {
        self.source = source;
        self
    }

    pub fn integer(value: i32) -> Self {
        Self::synthetic(NodeKind::Integer(value))
    }

    pub fn uinteger(value: u32) -> Self {
        Self::synthetic(NodeKind::UInteger(value))
    }

    pub fn number(value: f64) -> Self {
        Self::synthetic(NodeKind::Number(NumberLiteral(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::synthetic(NodeKind::String(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Self::synthetic(NodeKind::Boolean(value))
    }

    pub fn null() -> Self {
        Self::synthetic(NodeKind::Null)
    }

    pub fn undefined() -> Self {
        Self::synthetic(NodeKind::Undefined)
    }

    pub fn this() -> Self {
        Self::synthetic(NodeKind::This)
    }

    pub fn local(register: u32) -> Self {
        Self::synthetic(NodeKind::LocalRegister(LocalRegisterItem::new(register)))
    }

    pub fn local_typed(register: u32, ty: TypeItem) -> Self {
        Self::synthetic(NodeKind::LocalRegister(LocalRegisterItem::typed(register, ty)))
    }

    pub fn find_property(property: FullMultinameItem) -> Self {
        Self::synthetic(NodeKind::FindProperty(FindPropertyItem::new(property)))
    }

    pub fn duplicate(value: Node) -> Self {
        Self::synthetic(NodeKind::Duplicate(DuplicateItem::new(value)))
    }

    pub fn convert(value: Node, ty: TypeItem) -> Self {
        Self::synthetic(NodeKind::Convert(ConvertItem::new(value, ty)))
    }

    pub fn coerce(value: Node, ty: TypeItem) -> Self {
        Self::synthetic(NodeKind::Coerce(CoerceItem::new(value, ty)))
    }

    pub fn get_property(object: Node, property: FullMultinameItem) -> Self {
        Self::synthetic(NodeKind::GetProperty(GetPropertyItem::new(object, property)))
    }

    pub fn set_property(value: Node, object: Node, property: FullMultinameItem) -> Self {
        Self::synthetic(NodeKind::SetProperty(SetPropertyItem::new(value, object, property)))
    }

    pub fn call_property(object: Node, property: FullMultinameItem, arguments: Vec<Node>) -> Self {
        Self::synthetic(NodeKind::CallProperty(CallPropertyItem::new(object, property, arguments)))
    }

    pub fn get_super(object: Node, property: FullMultinameItem) -> Self {
        Self::synthetic(NodeKind::GetSuper(GetSuperItem::new(object, property)))
    }

    pub fn set_super(value: Node, object: Node, property: FullMultinameItem) -> Self {
        Self::synthetic(NodeKind::SetSuper(SetSuperItem::new(value, object, property)))
    }

    pub fn call_super(object: Node, property: FullMultinameItem, arguments: Vec<Node>) -> Self {
        Self::synthetic(NodeKind::CallSuper(CallSuperItem::new(object, property, arguments)))
    }

    pub fn construct_super(object: Node, arguments: Vec<Node>) -> Self {
        Self::synthetic(NodeKind::ConstructSuper(ConstructSuperItem::new(object, arguments)))
    }

    pub fn binary(operator: BinaryOperator, left: Node, right: Node) -> Self {
        Self::synthetic(NodeKind::BinaryOp(BinaryOpItem::new(operator, left, right)))
    }

    pub fn unary(operator: UnaryOperator, value: Node) -> Self {
        Self::synthetic(NodeKind::UnaryOp(UnaryOpItem::new(operator, value)))
    }

    pub fn ternary(condition: Node, on_true: Node, on_false: Node) -> Self {
        Self::synthetic(NodeKind::Ternary(TernaryItem::new(condition, on_true, on_false)))
    }

    pub fn set_local(register: u32, value: Node) -> Self {
        Self::synthetic(NodeKind::SetLocal(SetLocalItem::new(register, value)))
    }

    pub fn declaration(register: u32, ty: TypeItem, value: Option<Node>) -> Self {
        Self::synthetic(NodeKind::Declaration(DeclarationItem::new(register, ty, value)))
    }

    pub fn return_value(value: Node) -> Self {
        Self::synthetic(NodeKind::ReturnValue(ReturnValueItem::new(value)))
    }

    pub fn return_void() -> Self {
        Self::synthetic(NodeKind::ReturnVoid)
    }

    pub fn throw(value: Node) -> Self {
        Self::synthetic(NodeKind::Throw(ThrowItem::new(value)))
    }

    /// Parenthesization level of this node as an operand
    pub fn precedence(&self) -> Precedence {
        match &self.kind {
            NodeKind::Integer(v) => numeric_literal_precedence(*v < 0),
            NodeKind::Number(v) => numeric_literal_precedence(v.0.is_sign_negative() && !v.0.is_nan()),
            NodeKind::UInteger(_)
            | NodeKind::String(_)
            | NodeKind::Boolean(_)
            | NodeKind::Null
            | NodeKind::Undefined
            | NodeKind::This
            | NodeKind::LocalRegister(_)
            | NodeKind::FindProperty(_)
            | NodeKind::GetProperty(_)
            | NodeKind::CallProperty(_)
            | NodeKind::GetSuper(_)
            | NodeKind::CallSuper(_)
            | NodeKind::ConstructSuper(_) => precedence::PRIMARY,
            NodeKind::Duplicate(dup) => dup.value.precedence(),
            // A conversion keeps its operand's level, so it never changes how
            // the operand itself is parenthesized
            NodeKind::Convert(convert) => convert.value.precedence(),
            NodeKind::Coerce(coerce) => coerce.value.precedence(),
            NodeKind::BinaryOp(op) => op.operator.precedence(),
            NodeKind::UnaryOp(_) => precedence::UNARY,
            NodeKind::Ternary(_) => precedence::CONDITIONAL,
            NodeKind::SetProperty(_)
            | NodeKind::SetSuper(_)
            | NodeKind::SetLocal(_)
            | NodeKind::Declaration(_) => precedence::ASSIGNMENT,
            NodeKind::ReturnValue(_) | NodeKind::ReturnVoid | NodeKind::Throw(_) => precedence::NONE,
        }
    }

    /// Statically inferred type of the value this node produces
    pub fn return_type(&self) -> TypeItem {
        match &self.kind {
            NodeKind::Integer(_) => TypeItem::Int,
            NodeKind::UInteger(_) => TypeItem::UInt,
            NodeKind::Number(_) => TypeItem::Number,
            NodeKind::String(_) => TypeItem::String,
            NodeKind::Boolean(_) => TypeItem::Boolean,
            NodeKind::Null => TypeItem::Object,
            NodeKind::Undefined | NodeKind::This | NodeKind::FindProperty(_) => TypeItem::Unbounded,
            NodeKind::LocalRegister(local) => local.ty.clone(),
            NodeKind::Duplicate(dup) => dup.value.return_type(),
            NodeKind::Convert(convert) => convert.ty.clone(),
            NodeKind::Coerce(coerce) => coerce.ty.clone(),
            NodeKind::GetProperty(get) => get.ty.clone(),
            NodeKind::SetProperty(set) => set.value.return_type(),
            NodeKind::SetSuper(set) => set.value.return_type(),
            NodeKind::SetLocal(set) => set.value.return_type(),
            NodeKind::CallProperty(_)
            | NodeKind::GetSuper(_)
            | NodeKind::CallSuper(_)
            | NodeKind::ConstructSuper(_) => TypeItem::Unbounded,
            NodeKind::BinaryOp(op) => op.return_type(),
            NodeKind::UnaryOp(op) => op.return_type(),
            NodeKind::Ternary(ternary) => ternary.return_type(),
            NodeKind::Declaration(decl) => decl.ty.clone(),
            NodeKind::ReturnValue(ret) => ret.value.return_type(),
            NodeKind::ReturnVoid | NodeKind::Throw(_) => TypeItem::Unbounded,
        }
    }

    /// Whether evaluating this node can change program state
    pub fn has_side_effect(&self) -> bool {
        match &self.kind {
            NodeKind::SetProperty(_)
            | NodeKind::SetSuper(_)
            | NodeKind::SetLocal(_)
            | NodeKind::Declaration(_)
            | NodeKind::CallProperty(_)
            | NodeKind::CallSuper(_)
            | NodeKind::ConstructSuper(_)
            | NodeKind::ReturnValue(_)
            | NodeKind::ReturnVoid
            | NodeKind::Throw(_) => true,
            _ => self.children().iter().any(|child| child.has_side_effect()),
        }
    }

    /// Whether the node leaves a value that can be used as an expression
    pub fn has_return_value(&self) -> bool {
        !matches!(
            &self.kind,
            NodeKind::SetProperty(_)
                | NodeKind::SetSuper(_)
                | NodeKind::SetLocal(_)
                | NodeKind::Declaration(_)
                | NodeKind::ConstructSuper(_)
                | NodeKind::ReturnValue(_)
                | NodeKind::ReturnVoid
                | NodeKind::Throw(_)
        )
    }

    /// Strip one `dup` wrapper
    pub fn through_duplicate(&self) -> &Node {
        match &self.kind {
            NodeKind::Duplicate(dup) => &dup.value,
            _ => self,
        }
    }

    /// The value under any coercions, conversions and `dup`s
    pub fn not_coerced(&self) -> &Node {
        match &self.kind {
            NodeKind::Convert(convert) => convert.value.not_coerced(),
            NodeKind::Coerce(coerce) => coerce.value.not_coerced(),
            NodeKind::Duplicate(dup) => dup.value.not_coerced(),
            _ => self,
        }
    }

    /// Whether this is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(
            &self.kind,
            NodeKind::Integer(_)
                | NodeKind::UInteger(_)
                | NodeKind::Number(_)
                | NodeKind::String(_)
                | NodeKind::Boolean(_)
                | NodeKind::Null
                | NodeKind::Undefined
        )
    }

    /// Directly owned child nodes in evaluation order
    pub fn children(&self) -> Vec<&Node> {
        let mut children = Vec::new();
        match &self.kind {
            NodeKind::Integer(_)
            | NodeKind::UInteger(_)
            | NodeKind::Number(_)
            | NodeKind::String(_)
            | NodeKind::Boolean(_)
            | NodeKind::Null
            | NodeKind::Undefined
            | NodeKind::This
            | NodeKind::LocalRegister(_)
            | NodeKind::ReturnVoid => {}
            NodeKind::FindProperty(find) => children.extend(find.property.runtime_name.as_deref()),
            NodeKind::Duplicate(dup) => children.push(&*dup.value),
            NodeKind::Convert(convert) => children.push(&*convert.value),
            NodeKind::Coerce(coerce) => children.push(&*coerce.value),
            NodeKind::GetProperty(get) => {
                children.push(&*get.object);
                children.extend(get.property.runtime_name.as_deref());
            }
            NodeKind::SetProperty(set) => {
                children.push(&*set.object);
                children.extend(set.property.runtime_name.as_deref());
                children.push(&*set.value);
            }
            NodeKind::CallProperty(call) => {
                children.push(&*call.object);
                children.extend(call.property.runtime_name.as_deref());
                children.extend(call.arguments.iter());
            }
            NodeKind::GetSuper(get) => {
                children.push(&*get.object);
                children.extend(get.property.runtime_name.as_deref());
            }
            NodeKind::SetSuper(set) => {
                children.push(&*set.object);
                children.extend(set.property.runtime_name.as_deref());
                children.push(&*set.value);
            }
            NodeKind::CallSuper(call) => {
                children.push(&*call.object);
                children.extend(call.property.runtime_name.as_deref());
                children.extend(call.arguments.iter());
            }
            NodeKind::ConstructSuper(construct) => {
                children.push(&*construct.object);
                children.extend(construct.arguments.iter());
            }
            NodeKind::BinaryOp(op) => {
                children.push(&*op.left);
                children.push(&*op.right);
            }
            NodeKind::UnaryOp(op) => children.push(&*op.value),
            NodeKind::Ternary(ternary) => {
                children.push(&*ternary.condition);
                children.push(&*ternary.on_true);
                children.push(&*ternary.on_false);
            }
            NodeKind::SetLocal(set) => children.push(&*set.value),
            NodeKind::Declaration(decl) => children.extend(decl.value.as_deref()),
            NodeKind::ReturnValue(ret) => children.push(&*ret.value),
            NodeKind::Throw(throw) => children.push(&*throw.value),
        }
        children
    }

    /// Mutable access to the owned children, same order as `children`.
    /// Only the tree owner rewrites subtrees; passes holding `&Node` cannot.
    pub fn children_mut(&mut self) -> Vec<&mut Node> {
        let mut children: Vec<&mut Node> = Vec::new();
        match &mut self.kind {
            NodeKind::Integer(_)
            | NodeKind::UInteger(_)
            | NodeKind::Number(_)
            | NodeKind::String(_)
            | NodeKind::Boolean(_)
            | NodeKind::Null
            | NodeKind::Undefined
            | NodeKind::This
            | NodeKind::LocalRegister(_)
            | NodeKind::ReturnVoid => {}
            NodeKind::FindProperty(find) => children.extend(find.property.runtime_name.as_deref_mut()),
            NodeKind::Duplicate(dup) => children.push(&mut *dup.value),
            NodeKind::Convert(convert) => children.push(&mut *convert.value),
            NodeKind::Coerce(coerce) => children.push(&mut *coerce.value),
            NodeKind::GetProperty(get) => {
                children.push(&mut *get.object);
                children.extend(get.property.runtime_name.as_deref_mut());
            }
            NodeKind::SetProperty(set) => {
                children.push(&mut *set.object);
                children.extend(set.property.runtime_name.as_deref_mut());
                children.push(&mut *set.value);
            }
            NodeKind::CallProperty(call) => {
                children.push(&mut *call.object);
                children.extend(call.property.runtime_name.as_deref_mut());
                children.extend(call.arguments.iter_mut());
            }
            NodeKind::GetSuper(get) => {
                children.push(&mut *get.object);
                children.extend(get.property.runtime_name.as_deref_mut());
            }
            NodeKind::SetSuper(set) => {
                children.push(&mut *set.object);
                children.extend(set.property.runtime_name.as_deref_mut());
                children.push(&mut *set.value);
            }
            NodeKind::CallSuper(call) => {
                children.push(&mut *call.object);
                children.extend(call.property.runtime_name.as_deref_mut());
                children.extend(call.arguments.iter_mut());
            }
            NodeKind::ConstructSuper(construct) => {
                children.push(&mut *construct.object);
                children.extend(construct.arguments.iter_mut());
            }
            NodeKind::BinaryOp(op) => {
                children.push(&mut *op.left);
                children.push(&mut *op.right);
            }
            NodeKind::UnaryOp(op) => children.push(&mut *op.value),
            NodeKind::Ternary(ternary) => {
                children.push(&mut *ternary.condition);
                children.push(&mut *ternary.on_true);
                children.push(&mut *ternary.on_false);
            }
            NodeKind::SetLocal(set) => children.push(&mut *set.value),
            NodeKind::Declaration(decl) => children.extend(decl.value.as_deref_mut()),
            NodeKind::ReturnValue(ret) => children.push(&mut *ret.value),
            NodeKind::Throw(throw) => children.push(&mut *throw.value),
        }
        children
    }

    /// Render this node's own text. Callers go through
    /// `GraphTextWriter::render_node`, which checks for cancellation first.
    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        match &self.kind {
            NodeKind::Integer(v) => {
                writer.append(&v.to_string());
                Ok(())
            }
            NodeKind::UInteger(v) => {
                writer.append(&v.to_string());
                Ok(())
            }
            NodeKind::Number(v) => {
                writer.append(&number_literal_text(v.0));
                Ok(())
            }
            NodeKind::String(s) => {
                writer.append(&escape_string(s));
                Ok(())
            }
            NodeKind::Boolean(b) => {
                writer.append(if *b { "true" } else { "false" });
                Ok(())
            }
            NodeKind::Null => {
                writer.append("null");
                Ok(())
            }
            NodeKind::Undefined => {
                writer.append("undefined");
                Ok(())
            }
            NodeKind::This => {
                writer.append("this");
                Ok(())
            }
            NodeKind::ReturnVoid => {
                writer.append("return");
                Ok(())
            }
            NodeKind::LocalRegister(item) => item.render(writer, local_data),
            NodeKind::FindProperty(item) => item.render(writer, local_data),
            NodeKind::Duplicate(item) => item.render(writer, local_data),
            NodeKind::Convert(item) => item.render(writer, local_data),
            NodeKind::Coerce(item) => item.render(writer, local_data),
            NodeKind::GetProperty(item) => item.render(writer, local_data),
            NodeKind::SetProperty(item) => item.render(writer, local_data),
            NodeKind::CallProperty(item) => item.render(writer, local_data),
            NodeKind::GetSuper(item) => item.render(writer, local_data),
            NodeKind::SetSuper(item) => item.render(writer, local_data),
            NodeKind::CallSuper(item) => item.render(writer, local_data),
            NodeKind::ConstructSuper(item) => item.render(writer, local_data),
            NodeKind::BinaryOp(item) => item.render(writer, local_data),
            NodeKind::UnaryOp(item) => item.render(writer, local_data),
            NodeKind::Ternary(item) => item.render(writer, local_data),
            NodeKind::SetLocal(item) => item.render(writer, local_data),
            NodeKind::Declaration(item) => item.render(writer, local_data),
            NodeKind::ReturnValue(item) => item.render(writer, local_data),
            NodeKind::Throw(item) => item.render(writer, local_data),
        }
    }

    /// Render to a fresh string with a token nobody cancels
    pub fn to_source(&self, local_data: &LocalData) -> Result<String, Cancelled> {
        self.to_source_with(local_data, CancellationToken::new())
    }

    pub fn to_source_with(&self, local_data: &LocalData, token: CancellationToken) -> Result<String, Cancelled> {
        let mut writer = GraphTextWriter::new(token);
        writer.render_node(self, local_data)?;
        Ok(writer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BinaryOperator::*;

    #[test]
    fn test_precedence_parenthesization() {
        let ld = LocalData::new();
        let sum = Node::binary(Add, Node::local(1), Node::integer(2));
        let product = Node::binary(Multiply, sum, Node::integer(3));
        assert_eq!(product.to_source(&ld).unwrap(), "(_loc1_ + 2) * 3");

        let right_nested = Node::binary(
            Subtract,
            Node::integer(1),
            Node::binary(Subtract, Node::integer(2), Node::integer(3)),
        );
        assert_eq!(right_nested.to_source(&ld).unwrap(), "1 - (2 - 3)");

        let left_nested = Node::binary(
            Subtract,
            Node::binary(Subtract, Node::integer(1), Node::integer(2)),
            Node::integer(3),
        );
        assert_eq!(left_nested.to_source(&ld).unwrap(), "1 - 2 - 3");
    }

    #[test]
    fn test_negative_literal_operand() {
        let ld = LocalData::new();
        let negate = Node::unary(UnaryOperator::Negate, Node::integer(-1));
        assert_eq!(negate.to_source(&ld).unwrap(), "-(-1)");
        let member = Node::get_property(Node::number(-2.5), FullMultinameItem::public("x"));
        assert_eq!(member.to_source(&ld).unwrap(), "(-2.5).x");
    }

    #[test]
    fn test_side_effects_propagate_from_children() {
        let call = Node::call_property(Node::this(), FullMultinameItem::public("f"), vec![]);
        assert!(call.has_side_effect());
        assert!(Node::binary(Add, Node::integer(1), call).has_side_effect());
        assert!(!Node::binary(Add, Node::integer(1), Node::local(2)).has_side_effect());
    }

    #[test]
    fn test_statements_have_no_return_value() {
        assert!(!Node::set_local(1, Node::integer(1)).has_return_value());
        assert!(!Node::return_void().has_return_value());
        assert!(Node::local(1).has_return_value());
    }

    #[test]
    fn test_through_duplicate_strips_one_level() {
        let inner = Node::local(1);
        let once = Node::duplicate(inner.clone());
        let twice = Node::duplicate(once.clone());
        assert_eq!(*once.through_duplicate(), inner);
        assert_eq!(*twice.through_duplicate(), once);
        assert_eq!(*twice.not_coerced(), inner);
    }

    #[test]
    fn test_ternary_rendering() {
        let ld = LocalData::new();
        let node = Node::ternary(
            Node::binary(LogicalOr, Node::local(1), Node::local(2)),
            Node::integer(1),
            Node::set_local(3, Node::integer(4)),
        );
        assert_eq!(node.to_source(&ld).unwrap(), "_loc1_ || _loc2_ ? 1 : _loc3_ = 4");
    }

    #[test]
    fn test_json_round_trip_keeps_structure() {
        let node = Node::set_super(
            Node::convert(Node::local(1), TypeItem::Int),
            Node::this(),
            FullMultinameItem::public("x"),
        )
        .with_source(SourceRef::at(7));
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
        assert_eq!(back.source, SourceRef::at(7));
    }
}
