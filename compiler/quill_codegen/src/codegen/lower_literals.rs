//! Literal and variable lowering.
//!
//! Numbers and booleans are materialized with an identity `add`. Flat
//! string literals become a NUL-terminated stack buffer written byte by
//! byte; segmented literals are assembled on the heap.
//!
//! With `memoize_literals`, a number or flat string is materialized once per
//! function: later occurrences of the same literal text reuse the register.

use std::iter;

use quill_ir::{Span, StringLiteral, StringSegment};

use super::Codegen;
use crate::error::{CodegenError, CodegenErrorKind};
use crate::memory::{Register, ScopeId, ScopeKey};

impl Codegen<'_> {
    // -----------------------------------------------------------------------
    // Scalars
    // -----------------------------------------------------------------------

    pub(crate) fn lower_bool(&mut self, value: bool, scope: ScopeId) -> Register {
        let dst = self.fresh_register(scope);
        self.emit(format_args!("{dst} = add i1 0, {}", u8::from(value)));
        dst
    }

    pub(crate) fn lower_number(&mut self, value: i32, scope: ScopeId) -> Register {
        let key = ScopeKey::NumberLiteral(value.to_string());
        if let Some(cached) = self.cached_literal(scope, &key) {
            return cached;
        }
        let dst = self.fresh_register(scope);
        self.emit(format_args!("{dst} = add i32 0, {value}"));
        self.memory.bind(scope, key, dst);
        dst
    }

    fn cached_literal(&self, scope: ScopeId, key: &ScopeKey) -> Option<Register> {
        if self.config.memoize_literals {
            self.memory.lookup(scope, key)
        } else {
            None
        }
    }

    // -----------------------------------------------------------------------
    // Variables
    // -----------------------------------------------------------------------

    /// A variable is whatever register its name is bound to; no load.
    pub(crate) fn lower_variable(
        &mut self,
        name: &str,
        span: Span,
        scope: ScopeId,
    ) -> Result<Register, CodegenError> {
        self.memory
            .lookup_variable(scope, name)
            .ok_or_else(|| CodegenErrorKind::UndefinedVariable(name.to_string()).at(span))
    }

    // -----------------------------------------------------------------------
    // Strings
    // -----------------------------------------------------------------------

    pub(crate) fn lower_string(
        &mut self,
        literal: &StringLiteral,
        span: Span,
        scope: ScopeId,
    ) -> Result<Register, CodegenError> {
        match literal.flat_text() {
            Some(text) => Ok(self.lower_flat_string(text, scope)),
            None => self.lower_segmented_string(&literal.segments, span, scope),
        }
    }

    fn lower_flat_string(&mut self, text: String, scope: ScopeId) -> Register {
        if let Some(cached) = self.cached_literal(scope, &ScopeKey::StringLiteral(text.clone())) {
            return cached;
        }
        let buf = self.emit_stack_string(text.as_bytes(), scope);
        self.memory.bind(scope, ScopeKey::StringLiteral(text), buf);
        buf
    }

    /// Stack-allocate `bytes.len() + 1` bytes and store every byte plus the
    /// terminator. Returns the pointer to the first byte.
    pub(crate) fn emit_stack_string(&mut self, bytes: &[u8], scope: ScopeId) -> Register {
        let buf = self.fresh_register(scope);
        self.emit(format_args!("{buf} = alloca i8, i64 {}", bytes.len() + 1));
        for (index, byte) in bytes.iter().copied().chain(iter::once(0)).enumerate() {
            let ptr = if index == 0 {
                buf
            } else {
                let elem = self.fresh_register(scope);
                self.emit(format_args!(
                    "{elem} = getelementptr inbounds i8, ptr {buf}, i64 {index}"
                ));
                elem
            };
            self.emit(format_args!(
                "store i8 {}, ptr {ptr}",
                i8::from_ne_bytes([byte])
            ));
        }
        buf
    }

    /// Build an interpolated string on the heap.
    ///
    /// First pass: give every segment a source pointer and a length, keeping
    /// a running total that starts at 1 for the terminator. Then `malloc`
    /// the total and copy each segment in at a running offset.
    fn lower_segmented_string(
        &mut self,
        segments: &[StringSegment],
        span: Span,
        scope: ScopeId,
    ) -> Result<Register, CodegenError> {
        let mut pieces: Vec<(Register, String)> = Vec::with_capacity(segments.len());
        let mut total = "1".to_string();
        for segment in segments {
            let (source, len) = match segment {
                StringSegment::Text(text) => {
                    let buf = self.emit_stack_string(text.as_bytes(), scope);
                    (buf, text.len().to_string())
                }
                StringSegment::Reference(name) => {
                    let source = self.lower_variable(name, span, scope)?;
                    let len = self.fresh_register(scope);
                    self.emit(format_args!("{len} = call i64 @strlen(ptr {source})"));
                    (source, len.to_string())
                }
                StringSegment::Expression(expr) => {
                    return Err(CodegenErrorKind::UnimplementedInterpolation.at(expr.span));
                }
            };
            let sum = self.fresh_register(scope);
            self.emit(format_args!("{sum} = add i64 {total}, {len}"));
            total = sum.to_string();
            pieces.push((source, len));
        }

        let dst = self.fresh_register(scope);
        self.emit(format_args!("{dst} = call ptr @malloc(i64 {total})"));

        let mut offset = "0".to_string();
        for (source, len) in pieces {
            let at = self.fresh_register(scope);
            self.emit(format_args!(
                "{at} = getelementptr inbounds i8, ptr {dst}, i64 {offset}"
            ));
            self.emit(format_args!(
                "call ptr @memcpy(ptr {at}, ptr {source}, i64 {len})"
            ));
            let next = self.fresh_register(scope);
            self.emit(format_args!("{next} = add i64 {offset}, {len}"));
            offset = next.to_string();
        }

        let end = self.fresh_register(scope);
        self.emit(format_args!(
            "{end} = getelementptr inbounds i8, ptr {dst}, i64 {offset}"
        ));
        self.emit(format_args!("store i8 0, ptr {end}"));
        Ok(dst)
    }
}
