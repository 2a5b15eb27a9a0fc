use avm2_dec_rs::analysis::ConstantFolder;
use avm2_dec_rs::decompiler::{DecompileOptions, Decompiler, MethodBody};
use avm2_dec_rs::ir::{BinaryOperator, FullMultinameItem, Node, TypeItem};
use avm2_dec_rs::writer::{CancellationToken, LocalData};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn arithmetic_chain(depth: i32) -> Node {
    let mut node = Node::convert(Node::local_typed(1, TypeItem::Int), TypeItem::Number);
    for i in 0..depth {
        let operator = if i % 2 == 0 {
            BinaryOperator::Add
        } else {
            BinaryOperator::Multiply
        };
        node = Node::binary(operator, node, Node::integer(i));
    }
    node
}

fn constant_chain(depth: i32) -> Node {
    let mut node = Node::integer(1);
    for i in 0..depth {
        node = Node::binary(BinaryOperator::Add, node, Node::integer(i));
    }
    node
}

fn render_benchmark(c: &mut Criterion) {
    let ld = LocalData::new();
    let expression = arithmetic_chain(200);
    c.bench_function("render_arithmetic_chain", |b| {
        b.iter(|| black_box(expression.to_source(&ld).unwrap()));
    });

    let constant = constant_chain(200);
    let token = CancellationToken::new();
    c.bench_function("fold_constant_chain", |b| {
        b.iter(|| black_box(ConstantFolder::fold(constant.clone(), &token).unwrap()));
    });

    let methods: Vec<MethodBody> = (0..64)
        .map(|i| {
            MethodBody::new(
                format!("m{}", i),
                vec![
                    Node::set_super(arithmetic_chain(50), Node::this(), FullMultinameItem::public("v")),
                    Node::return_void(),
                ],
            )
        })
        .collect();
    let decompiler = Decompiler::new(DecompileOptions::default());
    c.bench_function("decompile_batch_64", |b| {
        b.iter(|| black_box(decompiler.decompile_all(&methods, &token)));
    });
}

criterion_group!(benches, render_benchmark);
criterion_main!(benches);
