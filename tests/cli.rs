use assert_cmd::Command;
use avm2_dec_rs::decompiler::MethodBody;
use avm2_dec_rs::ir::{BinaryOperator, FullMultinameItem, Node};
use predicates::prelude::*;
use std::fs;

fn write_method(dir: &std::path::Path) -> std::path::PathBuf {
    let method = MethodBody::new(
        "init",
        vec![
            Node::set_super(
                Node::binary(BinaryOperator::Multiply, Node::integer(6), Node::integer(7)),
                Node::this(),
                FullMultinameItem::public("answer"),
            ),
            Node::return_void(),
        ],
    );
    let path = dir.join("init.json");
    fs::write(&path, serde_json::to_string(&method).unwrap()).unwrap();
    path
}

#[test]
fn test_render_command() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_method(dir.path());

    Command::cargo_bin("avm2-dec-rs")
        .unwrap()
        .arg("render")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("super.answer = 6 * 7;"));
}

#[test]
fn test_render_command_with_fold_and_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_method(dir.path());
    let output = dir.path().join("out.as");

    Command::cargo_bin("avm2-dec-rs")
        .unwrap()
        .args(["render", "--fold", "-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("super.answer = 42;"));
}

#[test]
fn test_render_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_method(dir.path());
    let config = dir.path().join("options.json");
    fs::write(&config, "{ not json").unwrap();

    Command::cargo_bin("avm2-dec-rs")
        .unwrap()
        .arg("render")
        .arg("--config")
        .arg(&config)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_render_node_limit_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_method(dir.path());

    Command::cargo_bin("avm2-dec-rs")
        .unwrap()
        .args(["render", "--max-nodes", "2"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cancelled"));
}

#[test]
fn test_fold_command() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("expr.json");
    let expr = Node::binary(BinaryOperator::Add, Node::string("a"), Node::integer(1));
    fs::write(&input, serde_json::to_string(&expr).unwrap()).unwrap();

    Command::cargo_bin("avm2-dec-rs")
        .unwrap()
        .arg("fold")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a1\""));
}

#[test]
fn test_import_shapes_command() {
    let dir = tempfile::tempdir().unwrap();
    let shapes_dir = dir.path().join("shapes");
    fs::create_dir(&shapes_dir).unwrap();
    fs::write(shapes_dir.join("3.svg"), "<svg/>").unwrap();
    fs::write(shapes_dir.join("3.png"), b"\x89PNG\r\n\x1a\n").unwrap();
    let characters = dir.path().join("characters.json");
    fs::write(
        &characters,
        r#"{"tags":[{"id":3,"code":32,"content":{"type":"shape"}}]}"#,
    )
    .unwrap();

    Command::cargo_bin("avm2-dec-rs")
        .unwrap()
        .arg("import-shapes")
        .arg(&shapes_dir)
        .arg(&characters)
        .assert()
        .success()
        .stderr(predicate::str::contains("3.svg selected"))
        .stderr(predicate::str::contains("Imported 1 shape(s)"))
        .stdout(predicate::str::contains("\"modified\": true"));
}
