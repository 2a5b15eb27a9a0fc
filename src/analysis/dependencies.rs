//! Def/use collection over statement trees
//!
//! Records which slots a statement reads and writes. A compound assignment
//! `x op= v` reads `x` before writing it; the read is modeled through
//! `SetTypeItem::get_object` so it is seen even when the stored value no
//! longer mentions the slot.

use crate::ir::{walk_node, FullMultinameItem, Node, NodeKind, SetTypeItem, Visitor};
use crate::writer::{CancellationToken, Cancelled};
use serde::Serialize;

/// A storage location an expression can touch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    Local(u32),
    Property(String),
    SuperProperty(String),
}

impl Slot {
    /// Runtime-computed names collapse into one wildcard slot
    fn property_key(property: &FullMultinameItem) -> String {
        if property.is_runtime() {
            "[]".to_string()
        } else {
            property.name.full_name()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dependencies {
    pub reads: Vec<Slot>,
    pub writes: Vec<Slot>,
}

impl Dependencies {
    fn read(&mut self, slot: Slot) {
        if !self.reads.contains(&slot) {
            self.reads.push(slot);
        }
    }

    fn write(&mut self, slot: Slot) {
        if !self.writes.contains(&slot) {
            self.writes.push(slot);
        }
    }

    pub fn reads_slot(&self, slot: &Slot) -> bool {
        self.reads.contains(slot)
    }

    pub fn writes_slot(&self, slot: &Slot) -> bool {
        self.writes.contains(slot)
    }

    /// Whether a statement with these dependencies must stay after one with
    /// `earlier`: it reads what `earlier` writes, or writes what `earlier`
    /// reads or writes.
    pub fn depends_on(&self, earlier: &Dependencies) -> bool {
        self.reads.iter().any(|slot| earlier.writes_slot(slot))
            || self
                .writes
                .iter()
                .any(|slot| earlier.reads_slot(slot) || earlier.writes_slot(slot))
    }
}

pub struct DependencyCollector<'a> {
    token: &'a CancellationToken,
    dependencies: Dependencies,
}

impl<'a> DependencyCollector<'a> {
    pub fn new(token: &'a CancellationToken) -> Self {
        Self {
            token,
            dependencies: Dependencies::default(),
        }
    }

    pub fn finish(self) -> Dependencies {
        self.dependencies
    }

    /// Visit an assignment: the implicit read of a compound form, then the
    /// operands, then the write itself
    fn visit_assignment(&mut self, node: &Node, set: &dyn SetTypeItem, written: Slot) -> Result<(), Cancelled> {
        if set.compound().is_some() {
            let read = set.get_object(node.source);
            self.visit_node(&read)?;
        }
        walk_node(self, node)?;
        self.dependencies.write(written);
        Ok(())
    }
}

impl Visitor for DependencyCollector<'_> {
    fn visit_node(&mut self, node: &Node) -> Result<(), Cancelled> {
        self.token.check()?;
        match &node.kind {
            NodeKind::LocalRegister(local) => {
                self.dependencies.read(Slot::Local(local.register));
                Ok(())
            }
            NodeKind::GetProperty(get) => {
                walk_node(self, node)?;
                self.dependencies.read(Slot::Property(Slot::property_key(&get.property)));
                Ok(())
            }
            NodeKind::GetSuper(get) => {
                walk_node(self, node)?;
                self.dependencies
                    .read(Slot::SuperProperty(Slot::property_key(&get.property)));
                Ok(())
            }
            NodeKind::SetLocal(set) => self.visit_assignment(node, set, Slot::Local(set.register)),
            NodeKind::SetProperty(set) => {
                let slot = Slot::Property(Slot::property_key(&set.property));
                self.visit_assignment(node, set, slot)
            }
            NodeKind::SetSuper(set) => {
                let slot = Slot::SuperProperty(Slot::property_key(&set.property));
                self.visit_assignment(node, set, slot)
            }
            NodeKind::Declaration(decl) => {
                walk_node(self, node)?;
                if decl.value.is_some() {
                    self.dependencies.write(Slot::Local(decl.register));
                }
                Ok(())
            }
            _ => walk_node(self, node),
        }
    }
}

/// Reads and writes performed by `node`
pub fn collect_dependencies(node: &Node, token: &CancellationToken) -> Result<Dependencies, Cancelled> {
    let mut collector = DependencyCollector::new(token);
    collector.visit_node(node)?;
    Ok(collector.finish())
}
