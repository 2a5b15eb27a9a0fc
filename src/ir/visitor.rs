//! Traversal protocol shared by every analysis pass
//!
//! `Node::visit_children` hands a node's direct parts to a visitor in the
//! order the operand stack evaluated them. The default `Visitor` methods
//! recurse, so a pass overrides only what it cares about and calls the
//! matching `walk_*` function to keep descending.

use super::property::FullMultinameItem;
use super::{Node, NodeKind, TypeItem};
use crate::writer::Cancelled;

pub trait Visitor {
    fn visit_node(&mut self, node: &Node) -> Result<(), Cancelled> {
        walk_node(self, node)
    }

    fn visit_type(&mut self, _ty: &TypeItem) -> Result<(), Cancelled> {
        Ok(())
    }

    fn visit_multiname(&mut self, name: &FullMultinameItem) -> Result<(), Cancelled> {
        walk_multiname(self, name)
    }
}

pub fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, node: &Node) -> Result<(), Cancelled> {
    node.visit_children(visitor)
}

pub fn walk_multiname<V: Visitor + ?Sized>(
    visitor: &mut V,
    name: &FullMultinameItem,
) -> Result<(), Cancelled> {
    match &name.runtime_name {
        Some(expression) => visitor.visit_node(expression),
        None => Ok(()),
    }
}

impl Node {
    /// Forward each owned part to `visitor`, in evaluation order.
    ///
    /// Conversions give the target type before the operand. Assignments give
    /// receiver, property name, then the stored value. The compound
    /// right-hand side is not visited; the stored value already contains it.
    pub fn visit_children<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<(), Cancelled> {
        match &self.kind {
            NodeKind::Integer(_)
            | NodeKind::UInteger(_)
            | NodeKind::Number(_)
            | NodeKind::String(_)
            | NodeKind::Boolean(_)
            | NodeKind::Null
            | NodeKind::Undefined
            | NodeKind::This
            | NodeKind::LocalRegister(_)
            | NodeKind::ReturnVoid => Ok(()),
            NodeKind::FindProperty(find) => visitor.visit_multiname(&find.property),
            NodeKind::Duplicate(dup) => visitor.visit_node(&dup.value),
            NodeKind::Convert(convert) => {
                visitor.visit_type(&convert.ty)?;
                visitor.visit_node(&convert.value)
            }
            NodeKind::Coerce(coerce) => {
                visitor.visit_type(&coerce.ty)?;
                visitor.visit_node(&coerce.value)
            }
            NodeKind::GetProperty(get) => {
                visitor.visit_node(&get.object)?;
                visitor.visit_multiname(&get.property)
            }
            NodeKind::SetProperty(set) => {
                visitor.visit_node(&set.object)?;
                visitor.visit_multiname(&set.property)?;
                visitor.visit_node(&set.value)
            }
            NodeKind::CallProperty(call) => {
                visitor.visit_node(&call.object)?;
                visitor.visit_multiname(&call.property)?;
                call.arguments.iter().try_for_each(|arg| visitor.visit_node(arg))
            }
            NodeKind::GetSuper(get) => {
                visitor.visit_node(&get.object)?;
                visitor.visit_multiname(&get.property)
            }
            NodeKind::SetSuper(set) => {
                visitor.visit_node(&set.object)?;
                visitor.visit_multiname(&set.property)?;
                visitor.visit_node(&set.value)
            }
            NodeKind::CallSuper(call) => {
                visitor.visit_node(&call.object)?;
                visitor.visit_multiname(&call.property)?;
                call.arguments.iter().try_for_each(|arg| visitor.visit_node(arg))
            }
            NodeKind::ConstructSuper(construct) => {
                visitor.visit_node(&construct.object)?;
                construct.arguments.iter().try_for_each(|arg| visitor.visit_node(arg))
            }
            NodeKind::BinaryOp(op) => {
                visitor.visit_node(&op.left)?;
                visitor.visit_node(&op.right)
            }
            NodeKind::UnaryOp(op) => visitor.visit_node(&op.value),
            NodeKind::Ternary(ternary) => {
                visitor.visit_node(&ternary.condition)?;
                visitor.visit_node(&ternary.on_true)?;
                visitor.visit_node(&ternary.on_false)
            }
            NodeKind::SetLocal(set) => visitor.visit_node(&set.value),
            NodeKind::Declaration(decl) => {
                visitor.visit_type(&decl.ty)?;
                match &decl.value {
                    Some(value) => visitor.visit_node(value),
                    None => Ok(()),
                }
            }
            NodeKind::ReturnValue(ret) => visitor.visit_node(&ret.value),
            NodeKind::Throw(throw) => visitor.visit_node(&throw.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BinaryOperator;

    /// Records a trace of what it sees
    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Visitor for Trace {
        fn visit_node(&mut self, node: &Node) -> Result<(), Cancelled> {
            match &node.kind {
                NodeKind::This => self.0.push("this".to_string()),
                NodeKind::Integer(v) => self.0.push(v.to_string()),
                NodeKind::LocalRegister(l) => self.0.push(format!("r{}", l.register)),
                _ => {}
            }
            walk_node(self, node)
        }

        fn visit_type(&mut self, ty: &TypeItem) -> Result<(), Cancelled> {
            self.0.push(format!("type:{}", ty));
            Ok(())
        }

        fn visit_multiname(&mut self, name: &FullMultinameItem) -> Result<(), Cancelled> {
            self.0.push(format!("name:{}", name.name));
            walk_multiname(self, name)
        }
    }

    #[test]
    fn test_convert_visits_type_first() {
        let node = Node::convert(Node::local(1), TypeItem::Int);
        let mut trace = Trace::default();
        node.visit_children(&mut trace).unwrap();
        assert_eq!(trace.0, vec!["type:int", "r1"]);
    }

    #[test]
    fn test_set_super_visit_order() {
        let node = Node::set_super(
            Node::integer(5),
            Node::this(),
            FullMultinameItem::public("x"),
        );
        let mut trace = Trace::default();
        node.visit_children(&mut trace).unwrap();
        assert_eq!(trace.0, vec!["this", "name:x", "5"]);
    }

    #[test]
    fn test_recursive_walk_is_left_to_right() {
        let node = Node::binary(
            BinaryOperator::Add,
            Node::binary(BinaryOperator::Multiply, Node::local(1), Node::local(2)),
            Node::get_property(Node::local(3), FullMultinameItem::runtime(Node::local(4))),
        );
        let mut trace = Trace::default();
        trace.visit_node(&node).unwrap();
        assert_eq!(trace.0, vec!["r1", "r2", "r3", "name:", "r4"]);
    }

    #[test]
    fn test_visitor_can_stop_with_cancelled() {
        struct StopAtLocals;
        impl Visitor for StopAtLocals {
            fn visit_node(&mut self, node: &Node) -> Result<(), Cancelled> {
                if matches!(node.kind, NodeKind::LocalRegister(_)) {
                    return Err(Cancelled);
                }
                walk_node(self, node)
            }
        }
        let node = Node::binary(BinaryOperator::Add, Node::integer(1), Node::local(2));
        assert_eq!(StopAtLocals.visit_node(&node), Err(Cancelled));
    }
}
