//! The code generation engine.
//!
//! `Codegen` walks the AST once, depth first, appending IR lines to the
//! buffer. Each node kind dispatches to a focused `lower_*` method
//! implemented in a separate file.
//!
//! # Architecture
//!
//! ```text
//! Codegen
//!   ├── function_compiler.rs  (Function definitions)
//!   ├── lower_literals.rs     (Boolean, Number, String, VariableReference)
//!   ├── lower_operators.rs    (BinaryOperator, EqualsComparison)
//!   ├── lower_control_flow.rs (Block, Assignment, Return, If)
//!   └── lower_calls.rs        (Call: user functions and intrinsics)
//! ```
//!
//! Every lowering returns `Ok(Some(register))` when the node produces a
//! value and `Ok(None)` when it does not. The first error aborts the pass.

mod function_compiler;
mod lower_calls;
mod lower_control_flow;
mod lower_literals;
mod lower_operators;

use quill_ir::{Node, NodeKind, Span, Type};
use tracing::{debug, trace};

use crate::config::CodegenConfig;
use crate::emitter::{IrBuffer, IrModule, Label};
use crate::error::{CodegenError, CodegenErrorKind};
use crate::intrinsics::Intrinsics;
use crate::ir_type::IrType;
use crate::memory::{MemoryRepository, Register, ScopeId};
use crate::resolve::TypeResolver;
use crate::setup::{emit_module_header, setup};

/// Generate a complete compilation unit for `program`.
///
/// Runs setup on a fresh scope tree, then lowers the whole tree.
pub fn generate(
    program: &Node,
    intrinsics: &Intrinsics,
    resolver: &dyn TypeResolver,
    config: &CodegenConfig,
) -> Result<IrModule, CodegenError> {
    let mut memory = MemoryRepository::new();
    let mut buffer = IrBuffer::new();

    emit_module_header(&mut buffer, config);
    setup(program, intrinsics, &mut memory, &mut buffer)?;
    Codegen::new(&mut memory, &mut buffer, intrinsics, resolver, config)
        .lower(program, ScopeId::ROOT)?;

    let module = buffer.finish();
    debug!(lines = module.lines().len(), "generation finished");
    if config.debug_ir {
        eprintln!("{module}");
    }
    Ok(module)
}

/// Lowering state for one generation pass.
pub struct Codegen<'a> {
    pub(crate) memory: &'a mut MemoryRepository,
    pub(crate) buffer: &'a mut IrBuffer,
    pub(crate) intrinsics: &'a Intrinsics,
    pub(crate) resolver: &'a dyn TypeResolver,
    pub(crate) config: &'a CodegenConfig,
    /// Last label suffix handed out; unique across the whole pass.
    label_counter: u32,
    /// Whether the current block already ended in a `ret`.
    pub(crate) terminated: bool,
}

impl<'a> Codegen<'a> {
    /// A generator over a scope tree that setup has already populated.
    pub fn new(
        memory: &'a mut MemoryRepository,
        buffer: &'a mut IrBuffer,
        intrinsics: &'a Intrinsics,
        resolver: &'a dyn TypeResolver,
        config: &'a CodegenConfig,
    ) -> Self {
        Codegen {
            memory,
            buffer,
            intrinsics,
            resolver,
            config,
            label_counter: 0,
            terminated: false,
        }
    }

    /// Lower `node` in `scope`.
    pub fn lower(&mut self, node: &Node, scope: ScopeId) -> Result<Option<Register>, CodegenError> {
        trace!(kind = node.kind.name(), span = %node.span, "lower");
        match &node.kind {
            NodeKind::Root { items } => {
                if scope != ScopeId::ROOT {
                    return Err(unsupported(node, "a program root cannot be nested"));
                }
                for item in items {
                    if !matches!(item.kind, NodeKind::Function(_)) {
                        return Err(unsupported(
                            item,
                            "only functions may appear at the top level",
                        ));
                    }
                    self.lower(item, scope)?;
                }
                Ok(None)
            }
            NodeKind::Function(function) => {
                if scope != ScopeId::ROOT {
                    return Err(unsupported(node, "functions cannot be nested"));
                }
                self.lower_function(function, node.span)?;
                Ok(None)
            }
            NodeKind::Block { statements } => {
                self.lower_block(statements, scope)?;
                Ok(None)
            }
            NodeKind::Assignment { name, value, .. } => {
                self.lower_assignment(node, name, value, scope).map(Some)
            }
            NodeKind::BinaryOperator {
                operator,
                left,
                right,
            } => self
                .lower_binary(operator, left, right, node.span, scope)
                .map(Some),
            NodeKind::Return { value } => {
                self.lower_return(value.as_deref(), scope)?;
                Ok(None)
            }
            NodeKind::Call { callee, args } => self.lower_call(node, callee, args, scope),
            NodeKind::If {
                condition,
                then_body,
                else_body,
            } => {
                self.lower_if(condition, then_body, else_body.as_deref(), scope)?;
                Ok(None)
            }
            NodeKind::Boolean(value) => Ok(Some(self.lower_bool(*value, scope))),
            NodeKind::Number(value) => Ok(Some(self.lower_number(*value, scope))),
            NodeKind::String(literal) => self.lower_string(literal, node.span, scope).map(Some),
            NodeKind::VariableReference { name, .. } => {
                self.lower_variable(name, node.span, scope).map(Some)
            }
            NodeKind::EqualsComparison { left, right } => {
                self.lower_equals(left, right, scope).map(Some)
            }
        }
    }

    /// Lower an operand that must produce a value.
    pub(crate) fn lower_value(
        &mut self,
        node: &Node,
        scope: ScopeId,
    ) -> Result<Register, CodegenError> {
        self.lower(node, scope)?
            .ok_or_else(|| unsupported(node, "produces no value"))
    }

    /// Ask the type-resolution query; failure is fatal.
    pub(crate) fn resolve_type(&self, node: &Node, scope: ScopeId) -> Result<Type, CodegenError> {
        self.resolver.resolve(&*self.memory, scope, node).fold(
            |failure| {
                Err(CodegenErrorKind::UnresolvedType {
                    kind: node.kind.name(),
                    failure,
                }
                .at(node.span))
            },
            Ok,
        )
    }

    pub(crate) fn ir_type(ty: Type, span: Span) -> Result<IrType, CodegenError> {
        IrType::from_type(ty).map_err(|kind| kind.at(span))
    }

    #[inline]
    pub(crate) fn fresh_register(&mut self, scope: ScopeId) -> Register {
        self.memory.allocate_register(scope)
    }

    /// Next label suffix. One id is shared by all labels of one construct.
    pub(crate) fn next_label_id(&mut self) -> u32 {
        self.label_counter += 1;
        trace!(id = self.label_counter, "allocated label id");
        self.label_counter
    }

    /// Emit an instruction into the current block.
    #[inline]
    pub(crate) fn emit(&mut self, text: impl std::fmt::Display) {
        self.buffer.instr(text);
    }

    /// Start a new basic block.
    ///
    /// Memoized literals from earlier blocks may not dominate this one, so
    /// they are dropped.
    pub(crate) fn start_block(&mut self, label: Label, scope: ScopeId) {
        self.buffer.label(label);
        self.memory.forget_literals(scope);
        self.terminated = false;
    }
}

fn unsupported(node: &Node, reason: &'static str) -> CodegenError {
    CodegenErrorKind::UnsupportedNode {
        kind: node.kind.name(),
        reason,
    }
    .at(node.span)
}
