use avm2_dec_rs::abc::{QualifiedName, SourceRef};
use avm2_dec_rs::ir::{
    structural_hash, BinaryOperator, CompoundAssignment, FullMultinameItem, Node, TypeItem,
};
use avm2_dec_rs::writer::{CancellationToken, Cancelled, GraphTextWriter, LocalData};
use std::collections::HashSet;

fn render(node: &Node) -> String {
    node.to_source(&LocalData::new()).unwrap()
}

#[test]
fn test_conversion_elision_by_operand_type() {
    let int_to_number = Node::convert(Node::local_typed(1, TypeItem::Int), TypeItem::Number);
    assert_eq!(render(&int_to_number), "_loc1_");

    let string_to_boolean = Node::convert(Node::local_typed(1, TypeItem::String), TypeItem::Boolean);
    assert_eq!(render(&string_to_boolean), "Boolean(_loc1_)");

    let unbounded_to_string = Node::convert(Node::local(2), TypeItem::String);
    assert_eq!(render(&unbounded_to_string), "_loc2_");

    let to_class = Node::convert(Node::local_typed(3, TypeItem::Int), TypeItem::class("Sprite"));
    assert_eq!(render(&to_class), "Sprite(_loc3_)");
}

#[test]
fn test_conversion_keeps_operand_precedence() {
    let sum = Node::binary(
        BinaryOperator::Add,
        Node::local_typed(1, TypeItem::Int),
        Node::integer(1),
    );
    let hidden = Node::convert(sum, TypeItem::Number);
    let product = Node::binary(BinaryOperator::Multiply, hidden, Node::integer(2));
    assert_eq!(render(&product), "(_loc1_ + 1) * 2");
}

#[test]
fn test_super_assignments() {
    let plain = Node::set_super(Node::integer(5), Node::this(), FullMultinameItem::public("x"));
    assert_eq!(render(&plain), "super.x = 5");

    let mut compound = plain.clone();
    compound
        .as_set_type_mut()
        .unwrap()
        .set_compound(CompoundAssignment::new(BinaryOperator::Add, Node::integer(1)));
    assert_eq!(render(&compound), "super.x += 1");

    // A register debug-named `this` is omitted the same way
    let ld = LocalData::new().with_local_name(0, "this");
    let via_register = Node::set_super(Node::integer(5), Node::local(0), FullMultinameItem::public("x"));
    assert_eq!(via_register.to_source(&ld).unwrap(), "super.x = 5");
}

#[test]
fn test_static_method_locals_use_class_name() {
    let ld = LocalData::new().with_class(QualifiedName::in_package("game", "World"), true);
    let node = Node::call_property(Node::local(0), FullMultinameItem::public("reset"), vec![]);
    assert_eq!(node.to_source(&ld).unwrap(), "World.reset()");
}

#[test]
fn test_method_statements_render_in_order() {
    let ld = LocalData::new().with_local_name(1, "i");
    let statements = vec![
        Node::declaration(1, TypeItem::Int, Some(Node::integer(0))),
        Node::set_property(
            Node::local(1),
            Node::find_property(FullMultinameItem::public("count")),
            FullMultinameItem::public("count"),
        ),
        Node::return_value(Node::local(1)),
    ];
    let mut writer = GraphTextWriter::new(CancellationToken::new());
    for statement in &statements {
        writer.render_node(statement, &ld).unwrap();
        writer.append(";").new_line();
    }
    assert_eq!(writer.finish(), "var i:int = 0;\ncount = i;\nreturn i;\n");
}

#[test]
fn test_structural_equality_and_hash() {
    let a = Node::convert(Node::local(1), TypeItem::Int).with_source(SourceRef::at(3));
    let b = Node::convert(Node::local(1), TypeItem::Int).with_source(SourceRef::at(9));
    let c = Node::convert(Node::local(1), TypeItem::Int);
    assert_eq!(a, a);
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_eq!(b, c);
    assert_eq!(a, c);
    assert_eq!(structural_hash(&a), structural_hash(&b));

    let other_operand = Node::convert(Node::local(2), TypeItem::Int);
    assert_ne!(a, other_operand);

    let set: HashSet<Node> = [a, b, c, other_operand].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_super_assignment_equality_ignores_compound_form() {
    let plain = Node::set_super(Node::local(1), Node::this(), FullMultinameItem::public("x"));
    let mut compound = plain.clone();
    compound
        .as_set_type_mut()
        .unwrap()
        .set_compound(CompoundAssignment::new(BinaryOperator::Subtract, Node::integer(1)));
    assert_eq!(plain, compound);
    assert_eq!(structural_hash(&plain), structural_hash(&compound));
}

#[test]
fn test_pre_cancelled_deep_tree_renders_nothing() {
    let mut node = Node::local(0);
    for i in 0..500 {
        node = Node::binary(BinaryOperator::Add, node, Node::integer(i));
    }
    let token = CancellationToken::new();
    token.cancel();
    let mut writer = GraphTextWriter::new(token);
    assert_eq!(writer.render_node(&node, &LocalData::new()), Err(Cancelled));
    assert_eq!(writer.nodes_rendered(), 0);
}

#[test]
fn test_cancellation_during_render() {
    let count = 200_000;
    let arguments: Vec<Node> = (0..count).map(Node::integer).collect();
    let node = Node::call_property(Node::this(), FullMultinameItem::public("f"), arguments);

    let token = CancellationToken::new();
    let observer = token.clone();
    let limit = 100;
    let mut writer = GraphTextWriter::new(token).with_node_limit(limit);

    assert_eq!(writer.render_node(&node, &LocalData::new()), Err(Cancelled));
    assert_eq!(writer.nodes_rendered(), limit);
    assert!(observer.is_cancelled());
    // Once cancelled, any later render stops before the first node
    assert_eq!(writer.render_node(&Node::integer(1), &LocalData::new()), Err(Cancelled));
    assert_eq!(writer.nodes_rendered(), limit);
}
