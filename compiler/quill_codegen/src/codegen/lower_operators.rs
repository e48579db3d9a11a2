//! Binary operator and equality lowering.
//!
//! Both dispatch on the resolved type of the left operand. On strings,
//! every arithmetic operator means concatenation and `==` compares contents
//! through `strcmp`.

use quill_ir::{Node, Span, Type};

use super::Codegen;
use crate::error::{CodegenError, CodegenErrorKind};
use crate::memory::{Register, ScopeId};

/// Arithmetic operators the source language has.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub(crate) fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            _ => None,
        }
    }

    pub(crate) fn opcode(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "sdiv",
        }
    }
}

impl Codegen<'_> {
    pub(crate) fn lower_binary(
        &mut self,
        operator: &str,
        left: &Node,
        right: &Node,
        span: Span,
        scope: ScopeId,
    ) -> Result<Register, CodegenError> {
        let op = ArithOp::from_token(operator)
            .ok_or_else(|| CodegenErrorKind::UnsupportedOperator(operator.to_string()).at(span))?;

        let lhs = self.lower_value(left, scope)?;
        let rhs = self.lower_value(right, scope)?;
        let ty = self.resolve_type(left, scope)?;

        if ty == Type::String {
            return Ok(self.lower_concat(lhs, rhs, scope));
        }

        let ir = Self::ir_type(ty, left.span)?;
        let dst = self.fresh_register(scope);
        self.emit(format_args!("{dst} = {} {ir} {lhs}, {rhs}", op.opcode()));
        Ok(dst)
    }

    /// `lhs ++ rhs` into a fresh heap buffer of `len(lhs) + len(rhs) + 1`.
    ///
    /// The left copy takes `len(lhs)` bytes; the right copy takes
    /// `len(rhs) + 1` so the terminator comes along.
    fn lower_concat(&mut self, lhs: Register, rhs: Register, scope: ScopeId) -> Register {
        let lhs_len = self.fresh_register(scope);
        self.emit(format_args!("{lhs_len} = call i64 @strlen(ptr {lhs})"));
        let rhs_len = self.fresh_register(scope);
        self.emit(format_args!("{rhs_len} = call i64 @strlen(ptr {rhs})"));

        let sum = self.fresh_register(scope);
        self.emit(format_args!("{sum} = add i64 {lhs_len}, {rhs_len}"));
        let total = self.fresh_register(scope);
        self.emit(format_args!("{total} = add i64 {sum}, 1"));

        let dst = self.fresh_register(scope);
        self.emit(format_args!("{dst} = call ptr @malloc(i64 {total})"));
        self.emit(format_args!(
            "call ptr @memcpy(ptr {dst}, ptr {lhs}, i64 {lhs_len})"
        ));

        let tail = self.fresh_register(scope);
        self.emit(format_args!(
            "{tail} = getelementptr inbounds i8, ptr {dst}, i64 {lhs_len}"
        ));
        let rhs_with_nul = self.fresh_register(scope);
        self.emit(format_args!("{rhs_with_nul} = add i64 {rhs_len}, 1"));
        self.emit(format_args!(
            "call ptr @memcpy(ptr {tail}, ptr {rhs}, i64 {rhs_with_nul})"
        ));
        dst
    }

    pub(crate) fn lower_equals(
        &mut self,
        left: &Node,
        right: &Node,
        scope: ScopeId,
    ) -> Result<Register, CodegenError> {
        let lhs = self.lower_value(left, scope)?;
        let rhs = self.lower_value(right, scope)?;
        let ty = self.resolve_type(left, scope)?;

        if ty == Type::String {
            let cmp = self.fresh_register(scope);
            self.emit(format_args!("{cmp} = call i32 @strcmp(ptr {lhs}, ptr {rhs})"));
            let dst = self.fresh_register(scope);
            self.emit(format_args!("{dst} = icmp eq i32 {cmp}, 0"));
            return Ok(dst);
        }

        let ir = Self::ir_type(ty, left.span)?;
        let dst = self.fresh_register(scope);
        self.emit(format_args!("{dst} = icmp eq {ir} {lhs}, {rhs}"));
        Ok(dst)
    }
}
