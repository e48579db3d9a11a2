//! Quill IR - data consumed by the back end
//!
//! This crate contains the shared data structures the Quill code generator
//! reads:
//! - Spans for source locations
//! - Source-level types
//! - The typed AST (`Node`, `NodeKind`, `Function`, ...)
//! - `Either`, the carrier for type-resolution results
//!
//! # Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` on every type, so a front end
//!   running elsewhere can hand over a checked tree.

pub mod ast;
mod either;
mod span;
mod types;

pub use ast::{Function, Node, NodeKind, Param, StringLiteral, StringSegment};
pub use either::{Either, EitherError};
pub use span::Span;
pub use types::Type;
