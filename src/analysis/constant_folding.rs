//! Compile-time evaluation of IR subtrees
//!
//! `Node::is_compile_time` decides whether a subtree's value is known
//! without running the program. `Node::result` computes that value with the
//! runtime's coercion rules. `ConstantFolder` replaces foldable subtrees with
//! literals.

use super::{ecma, ConstantValue};
use crate::ir::{BinaryOperator, Node, NodeKind, TypeItem, UnaryOperator};
use crate::writer::{CancellationToken, Cancelled};
use std::collections::HashSet;

/// Nodes already entered during one foldability check.
///
/// Membership is by node identity. A node met a second time in the same
/// traversal counts as not constant, which keeps shared or self-referencing
/// input from recursing forever.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<usize>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(node: &Node) -> usize {
        node as *const Node as usize
    }

    /// Returns false if the node was already present
    pub fn insert(&mut self, node: &Node) -> bool {
        self.seen.insert(Self::key(node))
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.seen.contains(&Self::key(node))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Enter `child` and check it, or fail if it was entered before
fn child_is_compile_time(child: &Node, visited: &mut VisitedSet) -> bool {
    if !visited.insert(child) {
        return false;
    }
    child.is_compile_time(visited)
}

impl Node {
    /// Whether this subtree's value is known at decompile time
    pub fn is_compile_time(&self, visited: &mut VisitedSet) -> bool {
        match &self.kind {
            NodeKind::Integer(_)
            | NodeKind::UInteger(_)
            | NodeKind::Number(_)
            | NodeKind::String(_)
            | NodeKind::Boolean(_)
            | NodeKind::Null
            | NodeKind::Undefined => true,
            NodeKind::Duplicate(dup) => child_is_compile_time(&dup.value, visited),
            NodeKind::Convert(convert) => convert.is_compile_time(visited),
            NodeKind::Coerce(coerce) => coerce.is_compile_time(visited),
            NodeKind::BinaryOp(op) => {
                !op.operator.is_type_operator()
                    && child_is_compile_time(&op.left, visited)
                    && child_is_compile_time(&op.right, visited)
            }
            NodeKind::UnaryOp(op) => child_is_compile_time(&op.value, visited),
            NodeKind::Ternary(ternary) => {
                if !child_is_compile_time(&ternary.condition, visited) {
                    return false;
                }
                let condition = ternary.condition.result();
                // The branch taken cannot be known from an opaque condition
                if !condition.is_foldable() {
                    return false;
                }
                let taken = if condition.to_boolean() {
                    &ternary.on_true
                } else {
                    &ternary.on_false
                };
                child_is_compile_time(taken, visited)
            }
            NodeKind::This
            | NodeKind::LocalRegister(_)
            | NodeKind::FindProperty(_)
            | NodeKind::GetProperty(_)
            | NodeKind::SetProperty(_)
            | NodeKind::CallProperty(_)
            | NodeKind::GetSuper(_)
            | NodeKind::SetSuper(_)
            | NodeKind::CallSuper(_)
            | NodeKind::ConstructSuper(_)
            | NodeKind::SetLocal(_)
            | NodeKind::Declaration(_)
            | NodeKind::ReturnValue(_)
            | NodeKind::ReturnVoid
            | NodeKind::Throw(_) => false,
        }
    }

    /// Value of this subtree. Only meaningful when `is_compile_time` holds;
    /// anything unknown evaluates to `Opaque`.
    pub fn result(&self) -> ConstantValue {
        match &self.kind {
            NodeKind::Integer(v) => ConstantValue::Number(*v as f64),
            NodeKind::UInteger(v) => ConstantValue::Number(*v as f64),
            NodeKind::Number(v) => ConstantValue::Number(v.0),
            NodeKind::String(s) => ConstantValue::String(s.clone()),
            NodeKind::Boolean(b) => ConstantValue::Boolean(*b),
            NodeKind::Null => ConstantValue::Null,
            NodeKind::Undefined => ConstantValue::Undefined,
            NodeKind::Duplicate(dup) => dup.value.result(),
            NodeKind::Convert(convert) => convert.result(),
            NodeKind::Coerce(coerce) => coerce.result(),
            NodeKind::BinaryOp(op) => fold_binary(op.operator, &op.left.result(), &op.right.result()),
            NodeKind::UnaryOp(op) => fold_unary(op.operator, &op.value.result()),
            NodeKind::Ternary(ternary) => match ternary.condition.result() {
                condition if !condition.is_foldable() => ConstantValue::Opaque,
                condition if condition.to_boolean() => ternary.on_true.result(),
                _ => ternary.on_false.result(),
            },
            _ => ConstantValue::Opaque,
        }
    }

    pub fn result_as_number(&self) -> f64 {
        self.result().to_number()
    }

    pub fn result_as_string(&self) -> String {
        self.result().to_ecma_string()
    }
}

/// Evaluate a binary operator over known operands
pub fn fold_binary(operator: BinaryOperator, left: &ConstantValue, right: &ConstantValue) -> ConstantValue {
    if !left.is_foldable() || !right.is_foldable() {
        return ConstantValue::Opaque;
    }
    let number = ConstantValue::Number;
    match operator {
        BinaryOperator::Add => match (left, right) {
            (ConstantValue::String(_), _) | (_, ConstantValue::String(_)) => {
                ConstantValue::String(left.to_ecma_string() + &right.to_ecma_string())
            }
            _ => number(left.to_number() + right.to_number()),
        },
        BinaryOperator::Subtract => number(left.to_number() - right.to_number()),
        BinaryOperator::Multiply => number(left.to_number() * right.to_number()),
        BinaryOperator::Divide => number(left.to_number() / right.to_number()),
        BinaryOperator::Modulo => number(left.to_number() % right.to_number()),
        BinaryOperator::BitAnd => number((left.to_int32() & right.to_int32()) as f64),
        BinaryOperator::BitOr => number((left.to_int32() | right.to_int32()) as f64),
        BinaryOperator::BitXor => number((left.to_int32() ^ right.to_int32()) as f64),
        BinaryOperator::LeftShift => {
            number(left.to_int32().wrapping_shl(right.to_uint32() & 31) as f64)
        }
        BinaryOperator::RightShift => {
            number(left.to_int32().wrapping_shr(right.to_uint32() & 31) as f64)
        }
        BinaryOperator::UnsignedRightShift => {
            number(left.to_uint32().wrapping_shr(right.to_uint32() & 31) as f64)
        }
        BinaryOperator::Equals => ConstantValue::Boolean(ecma::loose_equals(left, right)),
        BinaryOperator::NotEquals => ConstantValue::Boolean(!ecma::loose_equals(left, right)),
        BinaryOperator::StrictEquals => ConstantValue::Boolean(ecma::strict_equals(left, right)),
        BinaryOperator::StrictNotEquals => ConstantValue::Boolean(!ecma::strict_equals(left, right)),
        BinaryOperator::LessThan => {
            ConstantValue::Boolean(ecma::less_than(left, right).unwrap_or(false))
        }
        BinaryOperator::GreaterThan => {
            ConstantValue::Boolean(ecma::less_than(right, left).unwrap_or(false))
        }
        BinaryOperator::LessEquals => {
            ConstantValue::Boolean(ecma::less_than(right, left).map_or(false, |gt| !gt))
        }
        BinaryOperator::GreaterEquals => {
            ConstantValue::Boolean(ecma::less_than(left, right).map_or(false, |lt| !lt))
        }
        BinaryOperator::LogicalAnd => {
            if left.to_boolean() {
                right.clone()
            } else {
                left.clone()
            }
        }
        BinaryOperator::LogicalOr => {
            if left.to_boolean() {
                left.clone()
            } else {
                right.clone()
            }
        }
        BinaryOperator::In | BinaryOperator::InstanceOf | BinaryOperator::Is | BinaryOperator::As => {
            ConstantValue::Opaque
        }
    }
}

/// Evaluate a unary operator over a known operand
pub fn fold_unary(operator: UnaryOperator, value: &ConstantValue) -> ConstantValue {
    if !value.is_foldable() {
        return ConstantValue::Opaque;
    }
    match operator {
        UnaryOperator::Not => ConstantValue::Boolean(!value.to_boolean()),
        UnaryOperator::Void => ConstantValue::Undefined,
        UnaryOperator::Negate => ConstantValue::Number(-value.to_number()),
        UnaryOperator::BitNot => ConstantValue::Number(!value.to_int32() as f64),
        UnaryOperator::TypeOf => ConstantValue::String(value.type_of().to_string()),
    }
}

/// Literal node for a folded value, typed after the subtree it replaces
pub fn literal_for(value: ConstantValue, ty: &TypeItem) -> Option<Node> {
    let node = match value {
        ConstantValue::Undefined => Node::undefined(),
        ConstantValue::Null => Node::null(),
        ConstantValue::Boolean(b) => Node::boolean(b),
        ConstantValue::String(s) => Node::string(s),
        ConstantValue::Number(n) => {
            let integral = n.fract() == 0.0 && !(n == 0.0 && n.is_sign_negative());
            match ty {
                TypeItem::Int if integral && n >= i32::MIN as f64 && n <= i32::MAX as f64 => {
                    Node::integer(n as i32)
                }
                TypeItem::UInt if integral && n >= 0.0 && n <= u32::MAX as f64 => {
                    Node::uinteger(n as u32)
                }
                _ => Node::number(n),
            }
        }
        ConstantValue::Opaque => return None,
    };
    Some(node)
}

/// Rewrites trees so that every maximal side-effect-free constant subtree
/// becomes a literal
pub struct ConstantFolder;

impl ConstantFolder {
    /// Fold `node`, consuming it. Checks `token` before each node.
    pub fn fold(mut node: Node, token: &CancellationToken) -> Result<Node, Cancelled> {
        Self::fold_in_place(&mut node, token)?;
        Ok(node)
    }

    fn fold_in_place(node: &mut Node, token: &CancellationToken) -> Result<(), Cancelled> {
        token.check()?;
        if let Some(literal) = Self::try_fold(node) {
            log::debug!(
                "Folded {:?} at {:?} into {:?}",
                std::mem::discriminant(&node.kind),
                node.source.instruction,
                literal.kind
            );
            *node = literal;
            return Ok(());
        }
        for child in node.children_mut() {
            Self::fold_in_place(child, token)?;
        }
        let compound = match &mut node.kind {
            NodeKind::SetProperty(set) => set.compound.as_mut(),
            NodeKind::SetSuper(set) => set.compound.as_mut(),
            NodeKind::SetLocal(set) => set.compound.as_mut(),
            _ => None,
        };
        if let Some(compound) = compound {
            Self::fold_in_place(&mut compound.value, token)?;
        }
        Ok(())
    }

    fn try_fold(node: &Node) -> Option<Node> {
        if node.is_literal() || node.has_side_effect() {
            return None;
        }
        let mut visited = VisitedSet::new();
        if !node.is_compile_time(&mut visited) {
            return None;
        }
        literal_for(node.result(), &node.return_type()).map(|literal| literal.with_source(node.source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::FullMultinameItem;
    use crate::writer::LocalData;

    #[test]
    fn test_literals_are_compile_time() {
        let mut visited = VisitedSet::new();
        assert!(Node::integer(1).is_compile_time(&mut visited));
        assert!(Node::string("a").is_compile_time(&mut visited));
        assert!(!Node::local(1).is_compile_time(&mut visited));
    }

    #[test]
    fn test_repeated_literal_values_are_distinct_nodes() {
        // Two equal operands are still separate nodes
        let node = Node::binary(BinaryOperator::Add, Node::integer(1), Node::integer(1));
        let mut visited = VisitedSet::new();
        assert!(node.is_compile_time(&mut visited));
        assert_eq!(visited.len(), 2);
        assert_eq!(node.result(), ConstantValue::Number(2.0));
    }

    #[test]
    fn test_second_encounter_is_not_constant() {
        let node = Node::unary(UnaryOperator::Not, Node::boolean(true));
        let mut visited = VisitedSet::new();
        assert!(node.is_compile_time(&mut visited));
        assert!(!node.is_compile_time(&mut visited));
    }

    #[test]
    fn test_fold_binary_semantics() {
        let s = |v: &str| ConstantValue::String(v.into());
        let n = ConstantValue::Number;
        assert_eq!(fold_binary(BinaryOperator::Add, &s("a"), &n(1.0)), s("a1"));
        assert_eq!(fold_binary(BinaryOperator::Add, &ConstantValue::Boolean(true), &n(1.0)), n(2.0));
        assert_eq!(fold_binary(BinaryOperator::UnsignedRightShift, &n(-1.0), &n(0.0)), n(4294967295.0));
        assert_eq!(fold_binary(BinaryOperator::LeftShift, &n(1.0), &n(33.0)), n(2.0));
        assert_eq!(fold_binary(BinaryOperator::Modulo, &n(-7.0), &n(2.0)), n(-1.0));
        assert_eq!(
            fold_binary(BinaryOperator::LessEquals, &ConstantValue::Undefined, &n(1.0)),
            ConstantValue::Boolean(false)
        );
        assert_eq!(fold_binary(BinaryOperator::LogicalOr, &n(0.0), &s("x")), s("x"));
        assert_eq!(
            fold_binary(BinaryOperator::Add, &ConstantValue::Opaque, &n(1.0)),
            ConstantValue::Opaque
        );
    }

    #[test]
    fn test_fold_unary_semantics() {
        assert_eq!(
            fold_unary(UnaryOperator::TypeOf, &ConstantValue::Null),
            ConstantValue::String("object".into())
        );
        assert_eq!(
            fold_unary(UnaryOperator::BitNot, &ConstantValue::Number(0.0)),
            ConstantValue::Number(-1.0)
        );
        assert_eq!(
            fold_unary(UnaryOperator::Not, &ConstantValue::String(String::new())),
            ConstantValue::Boolean(true)
        );
    }

    #[test]
    fn test_folder_replaces_constant_subtrees_only() {
        let tree = Node::set_local(
            1,
            Node::binary(
                BinaryOperator::Add,
                Node::local(2),
                Node::binary(BinaryOperator::Multiply, Node::integer(2), Node::integer(3)),
            ),
        );
        let folded = ConstantFolder::fold(tree, &CancellationToken::new()).unwrap();
        let expected = Node::set_local(
            1,
            Node::binary(BinaryOperator::Add, Node::local(2), Node::number(6.0)),
        );
        assert_eq!(folded, expected);
    }

    #[test]
    fn test_folder_keeps_integer_typing() {
        let tree = Node::convert(Node::number(3000000000.0), TypeItem::Int);
        let folded = ConstantFolder::fold(tree, &CancellationToken::new()).unwrap();
        assert_eq!(folded, Node::integer(-1294967296));
    }

    #[test]
    fn test_folder_leaves_side_effects_alone() {
        let call = Node::call_property(Node::this(), FullMultinameItem::public("f"), vec![Node::integer(1)]);
        let tree = Node::binary(BinaryOperator::Add, call.clone(), Node::integer(0));
        let folded = ConstantFolder::fold(tree.clone(), &CancellationToken::new()).unwrap();
        assert_eq!(folded, tree);
    }

    #[test]
    fn test_folder_observes_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let tree = Node::binary(BinaryOperator::Add, Node::integer(1), Node::integer(2));
        assert_eq!(ConstantFolder::fold(tree, &token), Err(Cancelled));
    }

    #[test]
    fn test_fold_unary_stops_at_opaque() {
        assert_eq!(fold_unary(UnaryOperator::Not, &ConstantValue::Opaque), ConstantValue::Opaque);
        assert_eq!(fold_unary(UnaryOperator::Void, &ConstantValue::Opaque), ConstantValue::Opaque);
    }

    #[test]
    fn test_negation_of_class_conversion_is_not_folded() {
        let tree = Node::unary(
            UnaryOperator::Not,
            Node::convert(Node::null(), TypeItem::class("Sprite")),
        );
        let folded = ConstantFolder::fold(tree.clone(), &CancellationToken::new()).unwrap();
        assert_eq!(folded, tree);
        assert_eq!(folded.to_source(&LocalData::new()).unwrap(), "!Sprite(null)");
    }

    #[test]
    fn test_ternary_on_class_conversion_is_not_compile_time() {
        let tree = Node::ternary(
            Node::convert(Node::null(), TypeItem::class("Sprite")),
            Node::integer(1),
            Node::integer(2),
        );
        let mut visited = VisitedSet::new();
        assert!(!tree.is_compile_time(&mut visited));
        assert_eq!(tree.result(), ConstantValue::Opaque);
        let folded = ConstantFolder::fold(tree.clone(), &CancellationToken::new()).unwrap();
        assert_eq!(folded, tree);
    }

    #[test]
    fn test_boolean_of_class_conversion_is_not_folded() {
        let tree = Node::convert(Node::convert(Node::null(), TypeItem::class("Sprite")), TypeItem::Boolean);
        let folded = ConstantFolder::fold(tree.clone(), &CancellationToken::new()).unwrap();
        assert_eq!(folded, tree);
    }

    #[test]
    fn test_negative_zero_survives_folding() {
        let tree = Node::binary(
            BinaryOperator::Divide,
            Node::local(1),
            Node::unary(UnaryOperator::Negate, Node::integer(0)),
        );
        let folded = ConstantFolder::fold(tree, &CancellationToken::new()).unwrap();
        assert_eq!(folded.to_source(&LocalData::new()).unwrap(), "_loc1_ / -0");
    }

    #[test]
    fn test_conversion_to_class_is_not_folded() {
        let tree = Node::convert(Node::integer(1), TypeItem::class("Sprite"));
        let folded = ConstantFolder::fold(tree.clone(), &CancellationToken::new()).unwrap();
        assert_eq!(folded, tree);
    }
}
