//! Call lowering.
//!
//! User functions and intrinsics resolve their return type the same way,
//! through the root symbol table. Only the call text differs: intrinsics
//! build their own through [`Intrinsic::emit_call`].
//!
//! [`Intrinsic::emit_call`]: crate::intrinsics::Intrinsic::emit_call

use quill_ir::Node;
use tracing::trace;

use super::Codegen;
use crate::error::{CodegenError, CodegenErrorKind};
use crate::memory::{Register, ScopeId};

impl Codegen<'_> {
    /// Lower a call. A `void` call is a bare statement and yields no value.
    pub(crate) fn lower_call(
        &mut self,
        node: &Node,
        callee: &str,
        args: &[Node],
        scope: ScopeId,
    ) -> Result<Option<Register>, CodegenError> {
        let mut arg_types = Vec::with_capacity(args.len());
        let mut arg_text = Vec::with_capacity(args.len());
        for arg in args {
            let ty = self.resolve_type(arg, scope)?;
            let reg = self.lower_value(arg, scope)?;
            let ir = Self::ir_type(ty, arg.span)?;
            arg_types.push(ty);
            arg_text.push(format!("{ir} {reg}"));
        }
        let args_joined = arg_text.join(", ");

        let return_ty = self
            .memory
            .resolve_symbol_type(callee)
            .ok_or_else(|| CodegenErrorKind::UndefinedFunction(callee.to_string()).at(node.span))?;
        let return_ir = Self::ir_type(return_ty, node.span)?;

        let call = match self.intrinsics.get(callee) {
            Some(intrinsic) => {
                trace!(callee, "intrinsic call");
                intrinsic.emit_call(node, &arg_types, &args_joined)
            }
            None => format!("call {return_ir} @{callee}({args_joined})"),
        };

        if return_ty.is_void() {
            self.emit(call);
            return Ok(None);
        }
        let dst = self.fresh_register(scope);
        self.emit(format_args!("{dst} = {call}"));
        Ok(Some(dst))
    }
}
