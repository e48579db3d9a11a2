//! Code generation errors.
//!
//! Every failure here is fatal: the upstream phases should have rejected the
//! program, so reaching one of these means the front end and back end
//! disagree. The offending node's span is attached so the report still
//! points at source.

use quill_ir::{Span, Type};
use thiserror::Error;

use crate::resolve::TypeFailure;

/// What went wrong.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CodegenErrorKind {
    /// The type-resolution query returned its failure variant.
    #[error("cannot resolve the type of {kind}: {failure}")]
    UnresolvedType {
        kind: &'static str,
        failure: TypeFailure,
    },
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),
    #[error("undefined function `{0}`")]
    UndefinedFunction(String),
    #[error("unsupported {kind}: {reason}")]
    UnsupportedNode {
        kind: &'static str,
        reason: &'static str,
    },
    #[error("unsupported operator `{0}`")]
    UnsupportedOperator(String),
    #[error("unsupported type `{0}`")]
    UnsupportedType(Type),
    #[error("string interpolation with embedded expressions is not implemented")]
    UnimplementedInterpolation,
}

impl CodegenErrorKind {
    /// Stable error code, in the internal-compiler-error range.
    pub fn code(&self) -> &'static str {
        match self {
            CodegenErrorKind::UnresolvedType { .. } => "E9001",
            CodegenErrorKind::UndefinedVariable(_) => "E9002",
            CodegenErrorKind::UndefinedFunction(_) => "E9003",
            CodegenErrorKind::UnsupportedNode { .. } => "E9004",
            CodegenErrorKind::UnsupportedOperator(_) => "E9005",
            CodegenErrorKind::UnsupportedType(_) => "E9006",
            CodegenErrorKind::UnimplementedInterpolation => "E9007",
        }
    }

    /// Attach a source location.
    #[inline]
    pub fn at(self, span: Span) -> CodegenError {
        CodegenError { kind: self, span }
    }
}

/// A fatal code generation error with its source location.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("error[{}] at {span}: {kind}", .kind.code())]
pub struct CodegenError {
    pub kind: CodegenErrorKind,
    pub span: Span,
}

impl CodegenError {
    pub fn new(kind: CodegenErrorKind, span: Span) -> Self {
        CodegenError { kind, span }
    }
}
