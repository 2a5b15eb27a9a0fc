//! Expression/statement IR
//!
//! The expression builder combines stack operands bottom-up into `Node`
//! trees. The module is organized by node family:
//!
//! - `types`: the static type model
//! - `node`: the node type, its constructors and the shared contract
//! - `literals`, `property`, `super_access`, `operators`, `statements`,
//!   `convert`: per-family data and rendering
//! - `visitor`: the traversal protocol used by analysis passes
//! - `equality`: structural equality helpers

pub mod convert;
pub mod equality;
pub mod literals;
pub mod node;
pub mod operators;
pub mod precedence;
pub mod property;
pub mod statements;
pub mod super_access;
pub mod types;
pub mod visitor;

use crate::abc::{DeclarationId, SourceRef};

pub use convert::{needs_explicit_conversion, CoerceItem, ConvertItem};
pub use equality::{structural_hash, NumberLiteral};
pub use literals::{FindPropertyItem, LocalRegisterItem};
pub use node::{Node, NodeKind};
pub use operators::{
    BinaryOpItem, BinaryOperator, CompoundAssignment, TernaryItem, UnaryOpItem, UnaryOperator,
};
pub use property::{CallPropertyItem, FullMultinameItem, GetPropertyItem, SetPropertyItem};
pub use statements::{DeclarationItem, DuplicateItem, ReturnValueItem, SetLocalItem, ThrowItem};
pub use super_access::{CallSuperItem, ConstructSuperItem, GetSuperItem, SetSuperItem};
pub use types::TypeItem;
pub use visitor::{walk_multiname, walk_node, Visitor};

/// Assignment-like nodes: a slot written with a value, optionally in
/// compound form, linked late to the declaration that introduces the slot.
pub trait SetTypeItem {
    fn declaration(&self) -> Option<DeclarationId>;

    fn set_declaration(&mut self, declaration: DeclarationId);

    fn value(&self) -> &Node;

    fn compound(&self) -> Option<&CompoundAssignment>;

    fn set_compound(&mut self, compound: CompoundAssignment);

    /// A new node reading the slot this assignment writes. Def/use
    /// analysis uses it to model the read hidden in `x op= v`.
    fn get_object(&self, source: SourceRef) -> Node;
}

impl Node {
    /// The assignment view of this node, if it is one
    pub fn as_set_type(&self) -> Option<&dyn SetTypeItem> {
        match &self.kind {
            NodeKind::SetProperty(item) => Some(item),
            NodeKind::SetSuper(item) => Some(item),
            NodeKind::SetLocal(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_set_type_mut(&mut self) -> Option<&mut dyn SetTypeItem> {
        match &mut self.kind {
            NodeKind::SetProperty(item) => Some(item),
            NodeKind::SetSuper(item) => Some(item),
            NodeKind::SetLocal(item) => Some(item),
            _ => None,
        }
    }
}
