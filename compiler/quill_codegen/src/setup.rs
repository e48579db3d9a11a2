//! Setup phase.
//!
//! Runs once before generation: emits the module preamble (runtime and
//! intrinsic declarations, intrinsic definitions), declares every callable
//! into the root symbol table, and creates one scope node per user-defined
//! function so the generator finds them ready.

use quill_ir::{Function, Node, NodeKind};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::config::CodegenConfig;
use crate::emitter::IrBuffer;
use crate::error::{CodegenError, CodegenErrorKind};
use crate::intrinsics::Intrinsics;
use crate::memory::{param_slot, MemoryRepository};
use crate::runtime_decl::declare_runtime;

/// Module header lines driven by configuration.
pub fn emit_module_header(buffer: &mut IrBuffer, config: &CodegenConfig) {
    buffer.line(format!("; ModuleID = '{}'", config.module_name));
    buffer.line(format!("source_filename = \"{}\"", config.source_filename));
    if let Some(triple) = &config.target_triple {
        buffer.line(format!("target triple = \"{triple}\""));
    }
    buffer.blank();
}

/// Prepare `memory` and `buffer` for generating `program`.
///
/// `program` must be a `Root`. Fails with `UndefinedFunction` when the
/// program declares an intrinsic the registry does not provide.
pub fn setup(
    program: &Node,
    intrinsics: &Intrinsics,
    memory: &mut MemoryRepository,
    buffer: &mut IrBuffer,
) -> Result<(), CodegenError> {
    let NodeKind::Root { items } = &program.kind else {
        return Err(CodegenErrorKind::UnsupportedNode {
            kind: program.kind.name(),
            reason: "a program must be a root node",
        }
        .at(program.span));
    };

    declare_runtime(buffer);
    declare_intrinsics(intrinsics, memory, buffer);

    for item in items {
        if let NodeKind::Function(function) = &item.kind {
            declare_function(function, item, intrinsics, memory)?;
        }
    }

    debug!(
        intrinsics = intrinsics.len(),
        functions = items.len(),
        "setup finished"
    );
    Ok(())
}

fn declare_intrinsics(
    intrinsics: &Intrinsics,
    memory: &mut MemoryRepository,
    buffer: &mut IrBuffer,
) {
    let mut seen = FxHashSet::default();
    for intrinsic in intrinsics.iter() {
        for decl in intrinsic.declarations() {
            if seen.insert(decl.clone()) {
                buffer.line(decl);
            }
        }
    }

    for intrinsic in intrinsics.iter() {
        let name = intrinsic.name();
        memory.declare_symbol(name, intrinsic.return_type());
        for (index, ty) in intrinsic.params().iter().enumerate() {
            memory.declare_symbol(param_slot(name, index), *ty);
        }
        buffer.blank();
        for line in intrinsic.emit_body() {
            buffer.line(line);
        }
    }
}

fn declare_function(
    function: &Function,
    node: &Node,
    intrinsics: &Intrinsics,
    memory: &mut MemoryRepository,
) -> Result<(), CodegenError> {
    if function.intrinsic {
        // Body and symbols come from the registry.
        if intrinsics.contains(&function.name) {
            return Ok(());
        }
        return Err(CodegenErrorKind::UndefinedFunction(function.name.clone()).at(node.span));
    }

    let scope = memory.add_function_scope(&function.name);
    memory.declare_symbol(function.name.as_str(), function.return_type);
    for (index, param) in function.params.iter().enumerate() {
        memory.declare_symbol(param_slot(&function.name, index), param.ty);
        let local = memory.qualified_name(scope, &param.name);
        memory.declare_symbol(local, param.ty);
    }
    Ok(())
}
