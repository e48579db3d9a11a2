//! The type-resolution query.
//!
//! Semantic analysis owns type inference; the back end only asks "what is
//! the type of expression E in scope S". [`TypeResolver`] is that seam.
//! [`SymbolTypeResolver`] answers it structurally from the AST annotations
//! and the root symbol table, which is all a fully checked tree needs.

use quill_ir::{Either, Node, NodeKind, Type};
use thiserror::Error;

use crate::memory::{MemoryRepository, ScopeId};

/// Why a type could not be resolved.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeFailure {
    #[error("no declared type for `{0}`")]
    UndeclaredSymbol(String),
    #[error("a {0} has no type")]
    NotAnExpression(&'static str),
}

/// Result of one type-resolution query.
pub type Resolution = Either<TypeFailure, Type>;

pub trait TypeResolver {
    /// Resolve the static type of `expr` as seen from `scope`.
    fn resolve(&self, memory: &MemoryRepository, scope: ScopeId, expr: &Node) -> Resolution;
}

/// Resolves types from node annotations and declared symbols.
#[derive(Copy, Clone, Debug, Default)]
pub struct SymbolTypeResolver;

impl SymbolTypeResolver {
    fn symbol(memory: &MemoryRepository, name: &str) -> Resolution {
        match memory.resolve_symbol_type(name) {
            Some(ty) => Either::Right(ty),
            None => Either::Left(TypeFailure::UndeclaredSymbol(name.to_string())),
        }
    }
}

impl TypeResolver for SymbolTypeResolver {
    fn resolve(&self, memory: &MemoryRepository, scope: ScopeId, expr: &Node) -> Resolution {
        match &expr.kind {
            NodeKind::Number(_) => Either::Right(Type::Int32),
            NodeKind::Boolean(_) | NodeKind::EqualsComparison { .. } => {
                Either::Right(Type::Boolean)
            }
            NodeKind::String(_) => Either::Right(Type::String),
            NodeKind::VariableReference { name, ty } if !ty.is_known() => {
                Self::symbol(memory, &memory.qualified_name(scope, name))
            }
            NodeKind::VariableReference { ty, .. } => Either::Right(*ty),
            NodeKind::Assignment { ty, value, .. } => {
                if ty.is_known() {
                    Either::Right(*ty)
                } else {
                    self.resolve(memory, scope, value)
                }
            }
            // `+` on strings concatenates, everything else keeps the operand type.
            NodeKind::BinaryOperator { left, .. } => self.resolve(memory, scope, left),
            NodeKind::Call { callee, .. } => Self::symbol(memory, callee),
            other => Either::Left(TypeFailure::NotAnExpression(other.name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(memory: &MemoryRepository, scope: ScopeId, node: &Node) -> Resolution {
        SymbolTypeResolver.resolve(memory, scope, node)
    }

    #[test]
    fn literals_resolve_to_their_type() {
        let memory = MemoryRepository::new();
        let root = ScopeId::ROOT;
        assert_eq!(resolve(&memory, root, &Node::number(1)), Either::Right(Type::Int32));
        assert_eq!(resolve(&memory, root, &Node::boolean(true)), Either::Right(Type::Boolean));
        assert_eq!(resolve(&memory, root, &Node::string("s")), Either::Right(Type::String));
    }

    #[test]
    fn unannotated_variable_uses_qualified_symbol() {
        let mut memory = MemoryRepository::new();
        let f = memory.add_function_scope("f");
        memory.declare_symbol("f::x", Type::String);
        assert_eq!(resolve(&memory, f, &Node::var("x")), Either::Right(Type::String));
        assert_eq!(
            resolve(&memory, f, &Node::var("y")),
            Either::Left(TypeFailure::UndeclaredSymbol("f::y".into()))
        );
    }

    #[test]
    fn annotated_variable_wins_over_symbol() {
        let mut memory = MemoryRepository::new();
        let f = memory.add_function_scope("f");
        memory.declare_symbol("f::x", Type::String);
        let node = Node::typed_var("x", Type::Int32);
        assert_eq!(resolve(&memory, f, &node), Either::Right(Type::Int32));
    }

    #[test]
    fn binary_follows_left_operand() {
        let memory = MemoryRepository::new();
        let node = Node::binary("+", Node::string("a"), Node::string("b"));
        assert_eq!(resolve(&memory, ScopeId::ROOT, &node), Either::Right(Type::String));
    }

    #[test]
    fn call_uses_declared_return_type() {
        let mut memory = MemoryRepository::new();
        memory.declare_symbol("add", Type::Int32);
        let call = Node::call("add", vec![]);
        assert_eq!(resolve(&memory, ScopeId::ROOT, &call), Either::Right(Type::Int32));
        assert!(resolve(&memory, ScopeId::ROOT, &Node::call("nope", vec![])).is_left());
    }

    #[test]
    fn unannotated_assignment_falls_through_to_value() {
        let memory = MemoryRepository::new();
        let node = Node::assign("x", Type::Unknown, Node::boolean(false));
        assert_eq!(resolve(&memory, ScopeId::ROOT, &node), Either::Right(Type::Boolean));
    }

    #[test]
    fn statements_have_no_type() {
        let memory = MemoryRepository::new();
        assert_eq!(
            resolve(&memory, ScopeId::ROOT, &Node::block(vec![])),
            Either::Left(TypeFailure::NotAnExpression("block"))
        );
    }
}
