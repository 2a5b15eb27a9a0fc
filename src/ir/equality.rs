//! Structural equality support
//!
//! Node equality ignores provenance: two nodes built from different
//! instructions are equal when they compute the same thing. Common
//! subexpression caches and output diffing key on this.

use super::Node;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// `f64` with bitwise equality, so literals can live in hashed sets
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumberLiteral(pub f64);

impl PartialEq for NumberLiteral {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for NumberLiteral {}

impl Hash for NumberLiteral {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl From<f64> for NumberLiteral {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// Hash of a node's structure, stable for equal nodes within one process
pub fn structural_hash(node: &Node) -> u64 {
    let mut hasher = DefaultHasher::new();
    node.hash(&mut hasher);
    hasher.finish()
}
