//! LLVM IR Text Backend for Quill
//!
//! Walks a type-checked AST and emits textual LLVM IR, one line per
//! instruction, together with the scope and register bookkeeping that keeps
//! the emission consistent.
//!
//! # Architecture
//!
//! ```text
//! Node (Root) + Intrinsics + TypeResolver + CodegenConfig
//!        ↓
//!     setup          (runtime + intrinsic preamble, scope node per function)
//!        ↓
//!     Codegen        (one depth-first walk, type-directed lowering)
//!        ↓
//!     IrModule       (ordered IR lines, joined with `\n`)
//! ```
//!
//! # Debugging
//!
//! - `RUST_LOG=quill_codegen=debug`: function-level tracing (needs a
//!   subscriber installed by the embedding driver).
//! - `RUST_LOG=quill_codegen=trace`: every node, register and label.
//! - `QUILL_DEBUG_IR=1`: print the finished IR to stderr
//!   (via [`CodegenConfig::from_env`]).
//!
//! # Example
//!
//! ```ignore
//! use quill_codegen::{generate, CodegenConfig, Intrinsics, SymbolTypeResolver};
//! use quill_ir::{Node, Type};
//!
//! let program = Node::root(vec![Node::function(
//!     "main",
//!     vec![],
//!     Type::Void,
//!     vec![Node::call("println", vec![Node::string("hi")])],
//! )]);
//! let module = generate(
//!     &program,
//!     &Intrinsics::with_builtins(),
//!     &SymbolTypeResolver,
//!     &CodegenConfig::default(),
//! )?;
//! println!("{}", module.to_text());
//! ```

pub mod codegen;
mod config;
pub mod emitter;
mod error;
pub mod intrinsics;
mod ir_type;
pub mod memory;
pub mod resolve;
pub mod runtime_decl;
pub mod setup;

pub use codegen::{generate, Codegen};
pub use config::CodegenConfig;
pub use emitter::{IrBuffer, IrModule, Label};
pub use error::{CodegenError, CodegenErrorKind};
pub use intrinsics::{Intrinsic, Intrinsics, PrintfIntrinsic};
pub use ir_type::IrType;
pub use memory::{MemoryRepository, Register, ScopeId, ScopeKey, SymbolTable};
pub use resolve::{Resolution, SymbolTypeResolver, TypeFailure, TypeResolver};
pub use setup::setup;
