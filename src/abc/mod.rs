//! Interface types consumed from the ABC (ActionScript Byte Code) layer
//!
//! The bytecode reader and CFG builder live outside this crate. What reaches
//! the IR is already resolved: instruction positions for provenance and
//! qualified names for properties and declared types.

pub mod instruction_types;
pub mod multiname;

pub use instruction_types::{DeclarationId, InstructionIndex, SourceRef};
pub use multiname::{Namespace, NamespaceKind, QualifiedName};
