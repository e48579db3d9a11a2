//! End-to-end scenarios: whole programs in, whole modules out.
//!
//! Expected output is written out in full so any change to the emitted
//! shape shows up as a readable diff.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use quill_codegen::{
    generate, CodegenConfig, CodegenErrorKind, Intrinsics, IrModule, SymbolTypeResolver,
};
use quill_ir::{Node, Param, Span, Type};

const PREAMBLE: &[&str] = &[
    "; ModuleID = 'quill'",
    "source_filename = \"main.ql\"",
    "",
    "declare i64 @strlen(ptr)",
    "declare i32 @strcmp(ptr, ptr)",
    "declare ptr @malloc(i64)",
    "declare ptr @memcpy(ptr, ptr, i64)",
    "declare i32 @printf(ptr, ...)",
    "",
    "@.fmt.println = private unnamed_addr constant [4 x i8] c\"%s\\0A\\00\"",
    "define void @println(ptr %fmt, ptr %value) {",
    "entry:",
    "  %r = call i32 (ptr, ...) @printf(ptr %fmt, ptr %value)",
    "  ret void",
    "}",
    "",
    "@.fmt.print_int = private unnamed_addr constant [4 x i8] c\"%d\\0A\\00\"",
    "define void @print_int(ptr %fmt, i32 %value) {",
    "entry:",
    "  %r = call i32 (ptr, ...) @printf(ptr %fmt, i32 %value)",
    "  ret void",
    "}",
];

fn compile(program: &Node) -> IrModule {
    generate(
        program,
        &Intrinsics::with_builtins(),
        &SymbolTypeResolver,
        &CodegenConfig::default(),
    )
    .expect("generation should succeed")
}

fn module_text(definitions: &[&str]) -> String {
    let mut lines: Vec<&str> = PREAMBLE.to_vec();
    lines.push("");
    lines.extend_from_slice(definitions);
    lines.join("\n")
}

#[test]
fn add_two_integers() {
    let program = Node::root(vec![Node::function(
        "add",
        vec![Param::new("a", Type::Int32), Param::new("b", Type::Int32)],
        Type::Int32,
        vec![Node::ret(Node::binary("+", Node::var("a"), Node::var("b")))],
    )]);

    assert_eq!(
        compile(&program).to_text(),
        module_text(&[
            "define i32 @add(i32 %v1, i32 %v2) {",
            "entry:",
            "  %v3 = add i32 %v1, %v2",
            "  ret i32 %v3",
            "}",
        ])
    );
}

#[test]
fn println_a_literal() {
    let program = Node::root(vec![
        Node::intrinsic("println", vec![Param::new("s", Type::String)], Type::Void),
        Node::function(
            "main",
            vec![],
            Type::Void,
            vec![Node::call("println", vec![Node::string("hi")])],
        ),
    ]);

    assert_eq!(
        compile(&program).to_text(),
        module_text(&[
            "define void @main() {",
            "entry:",
            "  %v1 = alloca i8, i64 3",
            "  store i8 104, ptr %v1",
            "  %v2 = getelementptr inbounds i8, ptr %v1, i64 1",
            "  store i8 105, ptr %v2",
            "  %v3 = getelementptr inbounds i8, ptr %v1, i64 2",
            "  store i8 0, ptr %v3",
            "  call void @println(ptr @.fmt.println, ptr %v1)",
            "  ret void",
            "}",
        ])
    );
}

#[test]
fn greeting_with_concatenation_and_comparison() {
    let program = Node::root(vec![
        Node::function(
            "greet",
            vec![Param::new("name", Type::String)],
            Type::String,
            vec![Node::ret(Node::binary(
                "+",
                Node::string("hi "),
                Node::var("name"),
            ))],
        ),
        Node::function(
            "main",
            vec![],
            Type::Void,
            vec![
                Node::assign(
                    "msg",
                    Type::String,
                    Node::call("greet", vec![Node::string("bo")]),
                ),
                Node::if_(
                    Node::equals(Node::var("msg"), Node::string("hi bo")),
                    vec![Node::call("println", vec![Node::var("msg")])],
                    Some(vec![Node::call("print_int", vec![Node::number(0)])]),
                ),
            ],
        ),
    ]);

    assert_eq!(
        compile(&program).to_text(),
        module_text(&[
            "define ptr @greet(ptr %v1) {",
            "entry:",
            "  %v2 = alloca i8, i64 4",
            "  store i8 104, ptr %v2",
            "  %v3 = getelementptr inbounds i8, ptr %v2, i64 1",
            "  store i8 105, ptr %v3",
            "  %v4 = getelementptr inbounds i8, ptr %v2, i64 2",
            "  store i8 32, ptr %v4",
            "  %v5 = getelementptr inbounds i8, ptr %v2, i64 3",
            "  store i8 0, ptr %v5",
            "  %v6 = call i64 @strlen(ptr %v2)",
            "  %v7 = call i64 @strlen(ptr %v1)",
            "  %v8 = add i64 %v6, %v7",
            "  %v9 = add i64 %v8, 1",
            "  %v10 = call ptr @malloc(i64 %v9)",
            "  call ptr @memcpy(ptr %v10, ptr %v2, i64 %v6)",
            "  %v11 = getelementptr inbounds i8, ptr %v10, i64 %v6",
            "  %v12 = add i64 %v7, 1",
            "  call ptr @memcpy(ptr %v11, ptr %v1, i64 %v12)",
            "  ret ptr %v10",
            "}",
            "",
            "define void @main() {",
            "entry:",
            "  %v1 = alloca i8, i64 3",
            "  store i8 98, ptr %v1",
            "  %v2 = getelementptr inbounds i8, ptr %v1, i64 1",
            "  store i8 111, ptr %v2",
            "  %v3 = getelementptr inbounds i8, ptr %v1, i64 2",
            "  store i8 0, ptr %v3",
            "  %v4 = call ptr @greet(ptr %v1)",
            "  %v5 = alloca ptr",
            "  store ptr %v4, ptr %v5",
            "  %v6 = alloca i8, i64 6",
            "  store i8 104, ptr %v6",
            "  %v7 = getelementptr inbounds i8, ptr %v6, i64 1",
            "  store i8 105, ptr %v7",
            "  %v8 = getelementptr inbounds i8, ptr %v6, i64 2",
            "  store i8 32, ptr %v8",
            "  %v9 = getelementptr inbounds i8, ptr %v6, i64 3",
            "  store i8 98, ptr %v9",
            "  %v10 = getelementptr inbounds i8, ptr %v6, i64 4",
            "  store i8 111, ptr %v10",
            "  %v11 = getelementptr inbounds i8, ptr %v6, i64 5",
            "  store i8 0, ptr %v11",
            "  %v12 = call i32 @strcmp(ptr %v4, ptr %v6)",
            "  %v13 = icmp eq i32 %v12, 0",
            "  %v14 = icmp ne i1 %v13, 0",
            "  br i1 %v14, label %then1, label %else1",
            "then1:",
            "  call void @println(ptr @.fmt.println, ptr %v4)",
            "  br label %end1",
            "else1:",
            "  %v15 = add i32 0, 0",
            "  call void @print_int(ptr @.fmt.print_int, i32 %v15)",
            "  br label %end1",
            "end1:",
            "  ret void",
            "}",
        ])
    );
}

#[test]
fn target_triple_lands_in_header() {
    let config = CodegenConfig::default()
        .with_module_name("demo")
        .with_target_triple("x86_64-unknown-linux-gnu");
    let module = generate(
        &Node::root(vec![]),
        &Intrinsics::with_builtins(),
        &SymbolTypeResolver,
        &config,
    )
    .expect("generation should succeed");

    assert_eq!(
        &module.lines()[..4],
        &[
            "; ModuleID = 'demo'".to_string(),
            "source_filename = \"main.ql\"".to_string(),
            "target triple = \"x86_64-unknown-linux-gnu\"".to_string(),
            String::new(),
        ]
    );
    assert_eq!(module.to_string(), module.to_text());
}

#[test]
fn empty_registry_still_declares_runtime() {
    let module = generate(
        &Node::root(vec![]),
        &Intrinsics::new(),
        &SymbolTypeResolver,
        &CodegenConfig::default(),
    )
    .expect("generation should succeed");

    assert_eq!(module.to_text(), PREAMBLE[..7].join("\n"));
}

#[test]
fn errors_carry_the_offending_span() {
    let span = Span::new(40, 45);
    let program = Node::root(vec![Node::function(
        "f",
        vec![],
        Type::Int32,
        vec![Node::ret(Node::var("ghost").with_span(span))],
    )]);

    let err = generate(
        &program,
        &Intrinsics::with_builtins(),
        &SymbolTypeResolver,
        &CodegenConfig::default(),
    )
    .expect_err("undefined variable must fail");

    assert_eq!(err.kind, CodegenErrorKind::UndefinedVariable("ghost".into()));
    assert_eq!(err.span, span);
    assert_eq!(
        err.to_string(),
        "error[E9002] at 40..45: undefined variable `ghost`"
    );
}
