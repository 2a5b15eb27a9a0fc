//! Resolved multiname descriptors
//!
//! The constant pool resolver produces these; the IR only compares and
//! prints them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// AVM2 namespace kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NamespaceKind {
    #[default]
    Package,
    PackageInternal,
    Protected,
    Private,
    Explicit,
    StaticProtected,
    Namespace,
}

/// A namespace as resolved from the constant pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Namespace {
    #[serde(default)]
    pub kind: NamespaceKind,
    /// Dotted package name, empty for the top-level package
    #[serde(default)]
    pub name: String,
}

impl Namespace {
    pub fn package(name: impl Into<String>) -> Self {
        Self {
            kind: NamespaceKind::Package,
            name: name.into(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.name.is_empty()
    }
}

/// A fully resolved qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    #[serde(default)]
    pub namespace: Namespace,
    pub name: String,
}

impl QualifiedName {
    /// Name in the top-level public package
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            namespace: Namespace::default(),
            name: name.into(),
        }
    }

    pub fn in_package(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Namespace::package(package),
            name: name.into(),
        }
    }

    /// `flash.display.Sprite` style name, or the bare name at top level
    pub fn full_name(&self) -> String {
        if self.namespace.is_top_level() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace.name, self.name)
        }
    }
}

/// Displays the bare name; imports take care of the package.
impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
