//! Local rendering context
//!
//! Everything a node needs to know about its enclosing method while it is
//! being rendered: how registers are named and which class it belongs to.
//! Naming is a pure function of this table, so rendering the same tree twice
//! with the same `LocalData` gives the same text.

use crate::abc::QualifiedName;
use std::collections::HashMap;

/// Default prefix for registers without a debug name
pub const DEFAULT_LOCAL_PREFIX: &str = "_loc";

#[derive(Debug, Clone)]
pub struct LocalData {
    /// Register names recovered from debug info or assigned by a naming pass
    local_names: HashMap<u32, String>,
    /// Prefix for synthesized names (`_loc3_`)
    local_name_prefix: String,
    /// Class whose method is being rendered, if any
    class_name: Option<QualifiedName>,
    /// Whether the method is static (register 0 is then the class, not `this`)
    is_static: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalData {
    pub fn new() -> Self {
        Self {
            local_names: HashMap::new(),
            local_name_prefix: DEFAULT_LOCAL_PREFIX.to_string(),
            class_name: None,
            is_static: false,
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            local_name_prefix: prefix.into(),
            ..Self::new()
        }
    }

    pub fn with_local_name(mut self, register: u32, name: impl Into<String>) -> Self {
        self.set_local_name(register, name);
        self
    }

    pub fn with_class(mut self, class_name: QualifiedName, is_static: bool) -> Self {
        self.class_name = Some(class_name);
        self.is_static = is_static;
        self
    }

    pub fn set_local_name(&mut self, register: u32, name: impl Into<String>) {
        self.local_names.insert(register, name.into());
    }

    pub fn class_name(&self) -> Option<&QualifiedName> {
        self.class_name.as_ref()
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Name of a local register.
    ///
    /// Register 0 holds the receiver: `this` in instance methods, the class
    /// name in static ones.
    pub fn local_name(&self, register: u32) -> String {
        if let Some(name) = self.local_names.get(&register) {
            return name.clone();
        }
        if register == 0 {
            return match (&self.class_name, self.is_static) {
                (Some(class_name), true) => class_name.name.clone(),
                _ => "this".to_string(),
            };
        }
        format!("{}{}_", self.local_name_prefix, register)
    }

    /// Number of explicitly named registers
    pub fn named_count(&self) -> usize {
        self.local_names.len()
    }
}
