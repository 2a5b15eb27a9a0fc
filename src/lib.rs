//! avm2-dec-rs: expression IR for a stack-bytecode decompiler
//!
//! This library models the expressions and statements reconstructed from
//! AVM2 operand stacks, folds constants with the runtime's coercion rules,
//! decides which conversions must be printed, and renders trees back to
//! source text with cooperative cancellation.

pub mod abc;
pub mod analysis;
pub mod cli;
pub mod decompiler;
pub mod error;
pub mod importers;
pub mod ir;
pub mod writer;

pub use decompiler::{DecompileOptions, Decompiler, MethodBody};
pub use error::{Error as DecompilerError, Result as DecompilerResult};

// Re-export commonly used types
pub use ir::{Node, NodeKind, TypeItem, Visitor};
pub use writer::{CancellationToken, Cancelled, GraphTextWriter, LocalData};
