//! Analysis passes over the expression IR
//!
//! - `ecma`: the runtime's primitive coercion and comparison rules
//! - `constant_value`: values known at decompile time
//! - `constant_folding`: compile-time evaluation and the folding pass
//! - `dependencies`: def/use collection built on the visitor

pub mod constant_folding;
pub mod constant_value;
pub mod dependencies;
pub mod ecma;

pub use constant_folding::{fold_binary, fold_unary, literal_for, ConstantFolder, VisitedSet};
pub use constant_value::ConstantValue;
pub use dependencies::{collect_dependencies, Dependencies, DependencyCollector, Slot};
