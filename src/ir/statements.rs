//! Statement nodes and stack plumbing

use super::operators::{render_assignment_tail, CompoundAssignment};
use super::precedence;
use super::{Node, NodeKind, SetTypeItem, TypeItem};
use crate::abc::{DeclarationId, SourceRef};
use crate::writer::{Cancelled, GraphTextWriter, LocalData};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// `name = value` (`setlocal`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLocalItem {
    pub register: u32,
    pub value: Box<Node>,
    #[serde(default)]
    pub compound: Option<CompoundAssignment>,
    #[serde(default)]
    pub declaration: Option<DeclarationId>,
}

impl SetLocalItem {
    pub fn new(register: u32, value: Node) -> Self {
        Self {
            register,
            value: Box::new(value),
            compound: None,
            declaration: None,
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        writer.append(&local_data.local_name(self.register));
        render_assignment_tail(writer, local_data, &self.value, self.compound.as_ref())
    }
}

impl PartialEq for SetLocalItem {
    fn eq(&self, other: &Self) -> bool {
        self.register == other.register
            && self.value == other.value
            && self.compound == other.compound
    }
}

impl Eq for SetLocalItem {}

impl Hash for SetLocalItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.register.hash(state);
        self.value.hash(state);
    }
}

impl SetTypeItem for SetLocalItem {
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
            NodeKind::LocalRegister(super::literals::LocalRegisterItem::new(self.register)),
            source,
        )
    }
}

/// `var name:Type = value`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclarationItem {
    pub register: u32,
    #[serde(default)]
    pub ty: TypeItem,
    #[serde(default)]
    pub value: Option<Box<Node>>,
}

impl DeclarationItem {
    pub fn new(register: u32, ty: TypeItem, value: Option<Node>) -> Self {
        Self {
            register,
            ty,
            value: value.map(Box::new),
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        writer
            .append("var ")
            .append(&local_data.local_name(self.register))
            .append(":")
            .append(&self.ty.to_string());
        if let Some(value) = &self.value {
            writer.append(" = ");
            writer.render_operand(value, local_data, precedence::ASSIGNMENT)?;
        }
        Ok(())
    }
}

/// `return value`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnValueItem {
    pub value: Box<Node>,
}

impl ReturnValueItem {
    pub fn new(value: Node) -> Self {
        Self {
            value: Box::new(value),
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        writer.append("return ");
        writer.render_node(&self.value, local_data)
    }
}

/// `throw value`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThrowItem {
    pub value: Box<Node>,
}

impl ThrowItem {
    pub fn new(value: Node) -> Self {
        Self {
            value: Box::new(value),
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        writer.append("throw ");
        writer.render_node(&self.value, local_data)
    }
}

/// A `dup` of a stack value. Prints and evaluates as the value itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DuplicateItem {
    pub value: Box<Node>,
}

impl DuplicateItem {
    pub fn new(value: Node) -> Self {
        Self {
            value: Box::new(value),
        }
    }

    pub fn render(&self, writer: &mut GraphTextWriter, local_data: &LocalData) -> Result<(), Cancelled> {
        writer.render_node(&self.value, local_data)
    }
}
