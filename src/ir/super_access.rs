//! Super-property access: `super.x`, `super.x = v`, `super.m()`, `super()`

use super::operators::{render_assignment_tail, CompoundAssignment};
use super::property::{is_scope_receiver, FullMultinameItem};
use super::{precedence, Node, NodeKind, SetTypeItem};
use crate::abc::{DeclarationId, SourceRef};
use crate::writer::{Cancelled, GraphTextWriter, LocalData};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Whether `object` prints as the bare identifier `this` under `local_data`
pub fn renders_as_this(object: &Node, local_data: &LocalData) -> bool {
    match &object.kind {
        NodeKind::This => true,
        NodeKind::LocalRegister(local) => local_data.local_name(local.register) == "this",
        NodeKind::Duplicate(dup) => renders_as_this(&dup.value, local_data),
        NodeKind::Coerce(coerce) => renders_as_this(&coerce.value, local_data),
        NodeKind::Convert(convert) if !convert.display_convert() => {
            renders_as_this(&convert.value, local_data)
        }
        _ => false,
    }
}

/// Prints `receiver.` unless the receiver is implicit
fn render_super_receiver(
    writer: &mut GraphTextWriter,
    local_data: &LocalData,
    object: &Node,
) -> Result<(), Cancelled> {
    if renders_as_this(object, local_data) || is_scope_receiver(object) {
        return Ok(());
    }
    writer.render_operand(object, local_data, precedence::PRIMARY)?;
    writer.append(".");
    Ok(())
}

fn render_super_member(
    writer: &mut GraphTextWriter,
    local_data: &LocalData,
    object: &Node,
    property: &FullMultinameItem,
) -> Result<(), Cancelled> {
    render_super_receiver(writer, local_data, object)?;
    writer.append("super");
    property.render_member(writer, local_data)
}

/// `super.property` (`getsuper`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GetSuperItem {
    pub object: Box<Node>,
    pub property: FullMultinameItem,
}

impl GetSuperItem {
    pub fn new(object: Node, property: FullMultinameItem) -> Self {
        Self {
            object: Box::new(object),
            property,
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        render_super_member(writer, local_data, &self.object, &self.property)
    }
}

/// `super.property = value` or `super.property op= compound` (`setsuper`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSuperItem {
    pub object: Box<Node>,
    pub property: FullMultinameItem,
    /// The value stored. With a compound operator this is the full
    /// `super.p op rhs` expression and does not print.
    pub value: Box<Node>,
    #[serde(default)]
    pub compound: Option<CompoundAssignment>,
    /// Link into the declaration table, set by the hoisting pass
    #[serde(default)]
    pub declaration: Option<DeclarationId>,
}

impl SetSuperItem {
    pub fn new(value: Node, object: Node, property: FullMultinameItem) -> Self {
        Self {
            object: Box::new(object),
            property,
            value: Box::new(value),
            compound: None,
            declaration: None,
        }
    }

    pub fn with_compound(mut self, compound: CompoundAssignment) -> Self {
        self.compound = Some(compound);
        self
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        render_super_member(writer, local_data, &self.object, &self.property)?;
        render_assignment_tail(writer, local_data, &self.value, self.compound.as_ref())
    }
}

/// Receiver, property and value decide equality. The compound form is left
/// out: `super.x += 1` and `super.x = super.x + 1` compare equal. The hash
/// covers only receiver and property.
impl PartialEq for SetSuperItem {
    fn eq(&self, other: &Self) -> bool {
        self.object == other.object && self.property == other.property && self.value == other.value
    }
}

impl Eq for SetSuperItem {}

impl Hash for SetSuperItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object.hash(state);
        self.property.hash(state);
    }
}

impl SetTypeItem for SetSuperItem {
    fn declaration(&self) -> Option<DeclarationId> {
        self.declaration
    }

    fn set_declaration(&mut self, declaration: DeclarationId) {
        self.declaration = Some(declaration);
    }

    fn value(&self) -> &Node {
        &self.value
    }

    fn compound(&self) -> Option<&CompoundAssignment> {
        self.compound.as_ref()
    }

    fn set_compound(&mut self, compound: CompoundAssignment) {
        self.compound = Some(compound);
    }

    /// A fresh `super.property` read of the same slot; nothing is cached
    fn get_object(&self, source: SourceRef) -> Node {
        Node::new(
            NodeKind::GetSuper(GetSuperItem::new(
                (*self.object).clone(),
                self.property.clone(),
            )),
            source,
        )
    }
}

/// `super.property(args)` (`callsuper` / `callsupervoid`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSuperItem {
    pub object: Box<Node>,
    pub property: FullMultinameItem,
    #[serde(default)]
    pub arguments: Vec<Node>,
}

impl CallSuperItem {
    pub fn new(object: Node, property: FullMultinameItem, arguments: Vec<Node>) -> Self {
        Self {
            object: Box::new(object),
            property,
            arguments,
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        render_super_member(writer, local_data, &self.object, &self.property)?;
        writer.render_arguments(&self.arguments, local_data)
    }
}

/// `super(args)` (`constructsuper`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructSuperItem {
    pub object: Box<Node>,
    #[serde(default)]
    pub arguments: Vec<Node>,
}

impl ConstructSuperItem {
    pub fn new(object: Node, arguments: Vec<Node>) -> Self {
        Self {
            object: Box::new(object),
            arguments,
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        writer.append("super");
        writer.render_arguments(&self.arguments, local_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinaryOperator, TypeItem};

    fn set_x(object: Node, value: Node) -> SetSuperItem {
        SetSuperItem::new(value, object, FullMultinameItem::public("x"))
    }

    #[test]
    fn test_this_receiver_is_omitted() {
        let ld = LocalData::new();
        let node = Node::synthetic(NodeKind::SetSuper(set_x(Node::this(), Node::integer(5))));
        assert_eq!(node.to_source(&ld).unwrap(), "super.x = 5");

        // Register 0 is named `this` in instance methods
        let node = Node::synthetic(NodeKind::SetSuper(set_x(Node::local(0), Node::integer(5))));
        assert_eq!(node.to_source(&ld).unwrap(), "super.x = 5");
    }

    #[test]
    fn test_compound_form() {
        let ld = LocalData::new();
        let read = Node::get_super(Node::this(), FullMultinameItem::public("x"));
        let full = Node::binary(BinaryOperator::Add, read, Node::integer(1));
        let item = set_x(Node::this(), full)
            .with_compound(CompoundAssignment::new(BinaryOperator::Add, Node::integer(1)));
        let node = Node::synthetic(NodeKind::SetSuper(item));
        assert_eq!(node.to_source(&ld).unwrap(), "super.x += 1");
    }

    #[test]
    fn test_explicit_receiver() {
        let ld = LocalData::new().with_local_name(2, "other");
        let node = Node::synthetic(NodeKind::SetSuper(set_x(Node::local(2), Node::string("a"))));
        assert_eq!(node.to_source(&ld).unwrap(), "other.super.x = \"a\"");
    }

    #[test]
    fn test_find_property_receiver_behind_dup_is_omitted() {
        let ld = LocalData::new();
        let find = Node::find_property(FullMultinameItem::public("x"));
        let node = Node::synthetic(NodeKind::SetSuper(set_x(
            Node::duplicate(find),
            Node::boolean(true),
        )));
        assert_eq!(node.to_source(&ld).unwrap(), "super.x = true");
    }

    #[test]
    fn test_contract_flags() {
        let node = Node::synthetic(NodeKind::SetSuper(set_x(
            Node::this(),
            Node::local_typed(1, TypeItem::String),
        )));
        assert!(node.has_side_effect());
        assert!(!node.has_return_value());
        assert_eq!(node.return_type(), TypeItem::String);
        assert_eq!(node.precedence(), precedence::ASSIGNMENT);
    }

    #[test]
    fn test_get_object_synthesizes_read() {
        let item = set_x(Node::this(), Node::integer(1));
        let read = item.get_object(SourceRef::at(4));
        assert_eq!(read, Node::get_super(Node::this(), FullMultinameItem::public("x")));
        assert_eq!(read.source, SourceRef::at(4));
        // Unchanged original
        assert!(item.compound.is_none());
    }

    #[test]
    fn test_equality_ignores_compound_and_declaration() {
        let plain = set_x(Node::this(), Node::integer(2));
        let mut compound = set_x(Node::this(), Node::integer(2))
            .with_compound(CompoundAssignment::new(BinaryOperator::Multiply, Node::integer(2)));
        compound.set_declaration(DeclarationId(3));
        assert_eq!(plain, compound);

        let other_value = set_x(Node::this(), Node::integer(9));
        assert_ne!(plain, other_value);
    }

    #[test]
    fn test_call_and_construct_super() {
        let ld = LocalData::new();
        let call = Node::call_super(Node::this(), FullMultinameItem::public("init"), vec![Node::integer(1)]);
        assert_eq!(call.to_source(&ld).unwrap(), "super.init(1)");
        let construct = Node::construct_super(Node::this(), vec![]);
        assert_eq!(construct.to_source(&ld).unwrap(), "super()");
    }
}
