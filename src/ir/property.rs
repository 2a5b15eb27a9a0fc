//! Property names and ordinary property access

use super::literals::escape_string;
use super::operators::{render_assignment_tail, CompoundAssignment};
use super::precedence;
use super::{Node, NodeKind, SetTypeItem, TypeItem};
use crate::abc::{DeclarationId, QualifiedName, SourceRef};
use crate::writer::{Cancelled, GraphTextWriter, LocalData};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// Whether `name` can follow a dot
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// A property name as it appears in an access.
///
/// Static names come resolved from the constant pool. Late-bound names
/// (`obj[expr]`) carry the expression that computes the name at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FullMultinameItem {
    pub name: QualifiedName,
    #[serde(default)]
    pub runtime_name: Option<Box<Node>>,
}

impl FullMultinameItem {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            runtime_name: None,
        }
    }

    pub fn public(name: impl Into<String>) -> Self {
        Self::new(QualifiedName::public(name))
    }

    pub fn runtime(name_expression: Node) -> Self {
        Self {
            name: QualifiedName::public(""),
            runtime_name: Some(Box::new(name_expression)),
        }
    }

    pub fn is_runtime(&self) -> bool {
        self.runtime_name.is_some()
    }

    /// Renders the member part of `receiver.name` / `receiver[expr]`
    pub fn render_member(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        match &self.runtime_name {
            Some(expression) => {
                writer.append("[");
                writer.render_node(expression, local_data)?;
                writer.append("]");
            }
            None if is_identifier(&self.name.name) => {
                writer.append(".").append(&self.name.name);
            }
            None => {
                writer.append("[").append(&escape_string(&self.name.name)).append("]");
            }
        }
        Ok(())
    }

    /// Whether the name can stand alone as a scope reference
    pub fn has_bare_form(&self) -> bool {
        self.runtime_name.is_none() && is_identifier(&self.name.name)
    }

    /// Renders the name without any receiver. Names that cannot stand alone
    /// are written as members of `this`.
    pub fn render_bare(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        if self.has_bare_form() {
            writer.append(&self.name.name);
            return Ok(());
        }
        writer.append("this");
        self.render_member(writer, local_data)
    }
}

/// True when an access on `object` should print no receiver: the object is
/// a scope lookup, possibly behind one `dup`.
pub fn is_scope_receiver(object: &Node) -> bool {
    matches!(object.through_duplicate().kind, NodeKind::FindProperty(_))
}

fn render_receiver(
    writer: &mut GraphTextWriter,
    local_data: &LocalData,
    object: &Node,
    property: &FullMultinameItem,
) -> Result<(), Cancelled> {
    if is_scope_receiver(object) {
        return property.render_bare(writer, local_data);
    }
    writer.render_operand(object, local_data, precedence::PRIMARY)?;
    property.render_member(writer, local_data)
}

/// `object.property` (`getproperty`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GetPropertyItem {
    pub object: Box<Node>,
    pub property: FullMultinameItem,
    /// Declared type of the slot if the resolver knows it
    #[serde(default)]
    pub ty: TypeItem,
}

impl GetPropertyItem {
    pub fn new(object: Node, property: FullMultinameItem) -> Self {
        Self {
            object: Box::new(object),
            property,
            ty: TypeItem::Unbounded,
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        render_receiver(writer, local_data, &self.object, &self.property)
    }
}

/// `object.property = value` (`setproperty` / `initproperty`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPropertyItem {
    pub object: Box<Node>,
    pub property: FullMultinameItem,
    pub value: Box<Node>,
    #[serde(default)]
    pub compound: Option<CompoundAssignment>,
    #[serde(default)]
    pub declaration: Option<DeclarationId>,
}

impl SetPropertyItem {
    pub fn new(value: Node, object: Node, property: FullMultinameItem) -> Self {
        Self {
            object: Box::new(object),
            property,
            value: Box::new(value),
            compound: None,
            declaration: None,
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        render_receiver(writer, local_data, &self.object, &self.property)?;
        render_assignment_tail(writer, local_data, &self.value, self.compound.as_ref())
    }
}

impl PartialEq for SetPropertyItem {
    fn eq(&self, other: &Self) -> bool {
        self.object == other.object
            && self.property == other.property
            && self.value == other.value
            && self.compound == other.compound
    }
}

impl Eq for SetPropertyItem {}

impl Hash for SetPropertyItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object.hash(state);
        self.property.hash(state);
    }
}

impl SetTypeItem for SetPropertyItem {
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

    fn get_object(&self, source: SourceRef) -> Node {
        Node::new(
            NodeKind::GetProperty(GetPropertyItem::new(
                (*self.object).clone(),
                self.property.clone(),
            )),
            source,
        )
    }
}

/// `object.property(args)` (`callproperty` / `callproplex`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallPropertyItem {
    pub object: Box<Node>,
    pub property: FullMultinameItem,
    #[serde(default)]
    pub arguments: Vec<Node>,
}

impl CallPropertyItem {
    pub fn new(object: Node, property: FullMultinameItem, arguments: Vec<Node>) -> Self {
        Self {
            object: Box::new(object),
            property,
            arguments,
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        render_receiver(writer, local_data, &self.object, &self.property)?;
        writer.render_arguments(&self.arguments, local_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_pattern() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_private$1"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier("with space"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_render_member_forms() {
        let ld = LocalData::new();
        let object = Node::local(1);

        let plain = Node::get_property(object.clone(), FullMultinameItem::public("width"));
        assert_eq!(plain.to_source(&ld).unwrap(), "_loc1_.width");

        let quoted = Node::get_property(object.clone(), FullMultinameItem::public("my-key"));
        assert_eq!(quoted.to_source(&ld).unwrap(), "_loc1_[\"my-key\"]");

        let late = Node::get_property(object, FullMultinameItem::runtime(Node::local(2)));
        assert_eq!(late.to_source(&ld).unwrap(), "_loc1_[_loc2_]");
    }

    #[test]
    fn test_scope_receiver_is_omitted() {
        let ld = LocalData::new();
        let find = Node::find_property(FullMultinameItem::public("trace"));
        let call = Node::call_property(
            Node::duplicate(find),
            FullMultinameItem::public("trace"),
            vec![Node::string("hi"), Node::integer(1)],
        );
        assert_eq!(call.to_source(&ld).unwrap(), "trace(\"hi\", 1)");
    }

    #[test]
    fn test_scope_receiver_with_unwritable_name() {
        let ld = LocalData::new();
        let quoted = Node::set_property(
            Node::integer(1),
            Node::find_property(FullMultinameItem::public("my-var")),
            FullMultinameItem::public("my-var"),
        );
        assert_eq!(quoted.to_source(&ld).unwrap(), "this[\"my-var\"] = 1");

        let late = Node::get_property(
            Node::find_property(FullMultinameItem::runtime(Node::local(2))),
            FullMultinameItem::runtime(Node::local(2)),
        );
        assert_eq!(late.to_source(&ld).unwrap(), "this[_loc2_]");
    }

    #[test]
    fn test_set_property_compound() {
        let ld = LocalData::new();
        let mut set = SetPropertyItem::new(
            Node::integer(3),
            Node::this(),
            FullMultinameItem::public("count"),
        );
        set.set_compound(CompoundAssignment::new(
            crate::ir::BinaryOperator::Multiply,
            Node::integer(3),
        ));
        let node = Node::synthetic(NodeKind::SetProperty(set));
        assert_eq!(node.to_source(&ld).unwrap(), "this.count *= 3");
    }
}
