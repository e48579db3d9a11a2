//! Property-based tests for the IR generator.
//!
//! Random programs are generated over the small source language and the
//! emitted IR is checked for structural invariants:
//! 1. Flat strings store every byte plus one terminator.
//! 2. Registers are defined once and used only after their definition.
//! 3. Labels are unique across the module.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use std::collections::HashSet;

use proptest::prelude::*;
use quill_codegen::{generate, CodegenConfig, Intrinsics, IrModule, SymbolTypeResolver};
use quill_ir::{Node, Param, Type};

fn compile(program: &Node) -> IrModule {
    generate(
        program,
        &Intrinsics::with_builtins(),
        &SymbolTypeResolver,
        &CodegenConfig::default(),
    )
    .expect("generation should succeed")
}

/// Instruction lines of the definition of `name`.
fn body_of(module: &IrModule, name: &str) -> Vec<String> {
    let header = format!("@{name}(");
    module
        .lines()
        .iter()
        .skip_while(|l| !(l.starts_with("define") && l.contains(&header)))
        .skip(1)
        .take_while(|l| l.as_str() != "}")
        .cloned()
        .collect()
}

/// Every `%vN` token in `text`.
fn registers_in(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '%'))
        .filter(|tok| {
            tok.len() > 2 && tok.starts_with("%v") && tok[2..].chars().all(|c| c.is_ascii_digit())
        })
        .map(str::to_string)
        .collect()
}

// -- Strategies --

fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{0,24}").expect("valid regex")
}

/// Integer expressions over the parameters `a` and `b`.
fn int_expr_strategy() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        any::<i32>().prop_map(Node::number),
        Just(Node::var("a")),
        Just(Node::var("b")),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        (
            prop::sample::select(vec!["+", "-", "*", "/"]),
            inner.clone(),
            inner,
        )
            .prop_map(|(op, l, r)| Node::binary(op, l, r))
    })
}

fn int_function(body: Vec<Node>) -> Node {
    Node::function(
        "f",
        vec![Param::new("a", Type::Int32), Param::new("b", Type::Int32)],
        Type::Int32,
        body,
    )
}

// -- Property Tests --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// A flat literal of length L allocates L+1 bytes and stores L+1 times.
    #[test]
    fn prop_flat_string_stores_every_byte(text in text_strategy()) {
        let program = Node::root(vec![Node::function(
            "main",
            vec![],
            Type::Void,
            vec![Node::call("println", vec![Node::string(text.clone())])],
        )]);
        let body = body_of(&compile(&program), "main");
        let len = text.len();

        let allocas: Vec<_> = body.iter().filter(|l| l.contains("alloca i8")).collect();
        prop_assert_eq!(allocas.len(), 1);
        let alloca_sized = allocas[0].ends_with(&format!("alloca i8, i64 {}", len + 1));
        prop_assert!(alloca_sized);

        let stores = body.iter().filter(|l| l.trim_start().starts_with("store i8")).count();
        prop_assert_eq!(stores, len + 1);
        let last_store = body.iter().rev().find(|l| l.contains("store i8"));
        let nul_stored = last_store.is_some_and(|l| l.ends_with(&format!("store i8 0, ptr {}", registers_in(l)[0])));
        prop_assert!(nul_stored);
    }

    /// Concatenation allocates `strlen(l) + strlen(r) + 1`.
    #[test]
    fn prop_concat_allocates_both_lengths_plus_one(left in text_strategy(), right in text_strategy()) {
        let program = Node::root(vec![Node::function(
            "main",
            vec![],
            Type::Void,
            vec![Node::assign(
                "s",
                Type::String,
                Node::binary("+", Node::string(left), Node::string(right)),
            )],
        )]);
        let body = body_of(&compile(&program), "main");

        let strlens: Vec<String> = body
            .iter()
            .filter(|l| l.contains("@strlen"))
            .map(|l| registers_in(l)[0].clone())
            .collect();
        prop_assert_eq!(strlens.len(), 2);

        let sum_line = format!("= add i64 {}, {}", strlens[0], strlens[1]);
        let sum = body
            .iter()
            .find(|l| l.contains(&sum_line))
            .map(|l| registers_in(l)[0].clone());
        prop_assert!(sum.is_some(), "no length sum in {:#?}", body);
        let sum = sum.unwrap();

        let total = body
            .iter()
            .find(|l| l.ends_with(&format!("= add i64 {sum}, 1")))
            .map(|l| registers_in(l)[0].clone());
        prop_assert!(total.is_some(), "no total in {:#?}", body);
        let total = total.unwrap();
        let malloc_total = body.iter().any(|l| l.ends_with(&format!("@malloc(i64 {total})")));
        prop_assert!(malloc_total);
        prop_assert_eq!(body.iter().filter(|l| l.contains("@memcpy")).count(), 2);
    }

    /// Every register is assigned once, and only parameters are used
    /// before an assignment.
    #[test]
    fn prop_registers_are_single_assignment(expr in int_expr_strategy()) {
        let program = Node::root(vec![int_function(vec![Node::ret(expr)])]);
        let body = body_of(&compile(&program), "f");

        let mut defined: HashSet<String> = ["%v1".to_string(), "%v2".to_string()].into();
        for line in &body {
            let regs = registers_in(line);
            let (def, uses) = match line.trim_start().split_once(" = ") {
                Some(_) => (regs.first().cloned(), &regs[1..]),
                None => (None, &regs[..]),
            };
            for used in uses {
                prop_assert!(defined.contains(used), "{} used before definition", used);
            }
            if let Some(def) = def {
                prop_assert!(defined.insert(def.clone()), "{} defined twice", def);
            }
        }
        prop_assert!(body.last().is_some_and(|l| l.trim_start().starts_with("ret i32 %v")));
    }

    /// Sequential `if`s each get three labels nobody else has.
    #[test]
    fn prop_labels_are_unique(count in 1usize..8, with_else in any::<bool>()) {
        let ifs: Vec<Node> = (0..count)
            .map(|_| {
                Node::if_(
                    Node::equals(Node::var("a"), Node::var("b")),
                    vec![],
                    with_else.then(Vec::new),
                )
            })
            .collect();
        let mut body = ifs;
        body.push(Node::ret(Node::var("a")));
        let module = compile(&Node::root(vec![int_function(body)]));

        let labels: Vec<&String> = module
            .lines()
            .iter()
            .filter(|l| l.ends_with(':') && !l.starts_with(' ') && l.as_str() != "entry:")
            .collect();
        prop_assert_eq!(labels.len(), count * 3);
        let unique: HashSet<_> = labels.iter().collect();
        prop_assert_eq!(unique.len(), labels.len());
    }

    /// Integer equality never calls into the runtime.
    #[test]
    fn prop_integer_equality_is_a_single_compare(l in int_expr_strategy(), r in int_expr_strategy()) {
        let program = Node::root(vec![Node::function(
            "f",
            vec![Param::new("a", Type::Int32), Param::new("b", Type::Int32)],
            Type::Boolean,
            vec![Node::ret(Node::equals(l, r))],
        )]);
        let body = body_of(&compile(&program), "f");
        prop_assert_eq!(body.iter().filter(|line| line.contains("icmp eq")).count(), 1);
        prop_assert!(!body.iter().any(|line| line.contains("call")));
    }
}
