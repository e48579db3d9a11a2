//! Statement and control flow lowering.
//!
//! Blocks do not open a scope: everything in a function body, including
//! `if` branches, lowers against the function's scope node.

use quill_ir::Node;

use super::Codegen;
use crate::emitter::Label;
use crate::error::{CodegenError, CodegenErrorKind};
use crate::memory::{Register, ScopeId, ScopeKey};
use crate::resolve::TypeFailure;

impl Codegen<'_> {
    pub(crate) fn lower_block(
        &mut self,
        statements: &[Node],
        scope: ScopeId,
    ) -> Result<(), CodegenError> {
        for statement in statements {
            self.lower(statement, scope)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Assignment
    // -----------------------------------------------------------------------

    /// Lower `name = value`.
    ///
    /// The name is bound to the value register itself. The stack slot
    /// written alongside (when `emit_assignment_slots` is on) is never read.
    pub(crate) fn lower_assignment(
        &mut self,
        node: &Node,
        name: &str,
        value: &Node,
        scope: ScopeId,
    ) -> Result<Register, CodegenError> {
        let value_reg = self.lower_value(value, scope)?;

        let symbol = self.memory.qualified_name(scope, name);
        let static_ty = self
            .resolver
            .resolve(&*self.memory, scope, node)
            .right()
            .filter(|ty| ty.is_known());
        let ty = match static_ty.or_else(|| self.memory.resolve_symbol_type(&symbol)) {
            Some(ty) if ty.is_known() => ty,
            _ => {
                return Err(CodegenErrorKind::UnresolvedType {
                    kind: node.kind.name(),
                    failure: TypeFailure::UndeclaredSymbol(symbol),
                }
                .at(node.span));
            }
        };

        if self.config.emit_assignment_slots {
            let ir = Self::ir_type(ty, node.span)?;
            let slot = self.fresh_register(scope);
            self.emit(format_args!("{slot} = alloca {ir}"));
            self.emit(format_args!("store {ir} {value_reg}, ptr {slot}"));
        }

        self.memory.declare_symbol(symbol, ty);
        self.memory.bind(scope, ScopeKey::variable(name), value_reg);
        Ok(value_reg)
    }

    // -----------------------------------------------------------------------
    // Return
    // -----------------------------------------------------------------------

    pub(crate) fn lower_return(
        &mut self,
        value: Option<&Node>,
        scope: ScopeId,
    ) -> Result<(), CodegenError> {
        match value {
            None => self.emit("ret void"),
            Some(value) => {
                let reg = self.lower_value(value, scope)?;
                let ty = self.resolve_type(value, scope)?;
                let ir = Self::ir_type(ty, value.span)?;
                self.emit(format_args!("ret {ir} {reg}"));
            }
        }
        self.terminated = true;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // If / else
    // -----------------------------------------------------------------------

    /// Lower `if`. The shape never varies: three labels, both branches
    /// ending in a jump to the end label, and an (empty) else block even
    /// when the source has no `else`.
    pub(crate) fn lower_if(
        &mut self,
        condition: &Node,
        then_body: &Node,
        else_body: Option<&Node>,
        scope: ScopeId,
    ) -> Result<(), CodegenError> {
        let cond = self.lower_value(condition, scope)?;
        let test = self.fresh_register(scope);
        self.emit(format_args!("{test} = icmp ne i1 {cond}, 0"));

        let id = self.next_label_id();
        let then_label = Label::new("then", id);
        let else_label = Label::new("else", id);
        let end_label = Label::new("end", id);
        self.emit(format_args!(
            "br i1 {test}, label %{then_label}, label %{else_label}"
        ));

        self.start_block(then_label, scope);
        self.lower(then_body, scope)?;
        self.emit(format_args!("br label %{end_label}"));

        self.start_block(else_label, scope);
        if let Some(else_body) = else_body {
            self.lower(else_body, scope)?;
        }
        self.emit(format_args!("br label %{end_label}"));

        self.start_block(end_label, scope);
        Ok(())
    }
}

