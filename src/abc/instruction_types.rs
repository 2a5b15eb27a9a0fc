//! Type-safe wrappers for instruction provenance
//!
//! IR nodes never own instructions. They carry plain indices into the
//! instruction list of the method body they were built from, plus a
//! separate index for the declaration table used by the hoisting pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction index within a method body (0-based position in the instruction list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct InstructionIndex(pub usize);

impl InstructionIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl From<usize> for InstructionIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl From<InstructionIndex> for usize {
    fn from(index: InstructionIndex) -> usize {
        index.0
    }
}

impl fmt::Display for InstructionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a node came from in the instruction stream.
///
/// `instruction` is the instruction that produced the node, `line_start` the
/// first instruction of the source line it belongs to (used for bucketing
/// rendered lines by debug line). Both are optional because synthesized nodes
/// (folded literals, hoisted declarations) have no single origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    #[serde(default)]
    pub instruction: Option<InstructionIndex>,
    #[serde(default)]
    pub line_start: Option<InstructionIndex>,
}

impl SourceRef {
    pub fn new(instruction: InstructionIndex, line_start: InstructionIndex) -> Self {
        Self {
            instruction: Some(instruction),
            line_start: Some(line_start),
        }
    }

    pub fn at(instruction: usize) -> Self {
        Self {
            instruction: Some(InstructionIndex(instruction)),
            line_start: Some(InstructionIndex(instruction)),
        }
    }

    /// Provenance for nodes created by a pass rather than by an instruction
    pub fn synthetic() -> Self {
        Self::default()
    }

    pub fn is_synthetic(&self) -> bool {
        self.instruction.is_none()
    }
}

/// Index into the externally owned declaration table.
///
/// Assignment nodes get this link late, once the hoisting pass has decided
/// where the local is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct DeclarationId(pub usize);

impl fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decl#{}", self.0)
    }
}
