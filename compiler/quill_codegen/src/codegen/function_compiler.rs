//! Function definitions.

use quill_ir::{Function, Span};
use tracing::{debug, instrument};

use super::Codegen;
use crate::error::{CodegenError, CodegenErrorKind};
use crate::memory::ScopeKey;

impl Codegen<'_> {
    /// Emit `define ... { ... }` for a user function.
    ///
    /// Parameters get the first registers of the function's scope and are
    /// bound by name directly; they are values already, so nothing is
    /// loaded. A `void` function whose body did not end in a `ret` gets a
    /// trailing `ret void`.
    #[instrument(level = "debug", skip_all, fields(function = %function.name))]
    pub(crate) fn lower_function(
        &mut self,
        function: &Function,
        span: Span,
    ) -> Result<(), CodegenError> {
        if function.intrinsic {
            debug!("intrinsic, body emitted during setup");
            return Ok(());
        }

        let scope = self
            .memory
            .child_scope(&function.name)
            .ok_or_else(|| CodegenErrorKind::UndefinedFunction(function.name.clone()).at(span))?;
        let return_ty = Self::ir_type(function.return_type, span)?;

        let mut params = Vec::with_capacity(function.params.len());
        for param in &function.params {
            let ty = Self::ir_type(param.ty, param.span)?;
            let register = self.fresh_register(scope);
            self.memory
                .bind(scope, ScopeKey::variable(param.name.as_str()), register);
            params.push(format!("{ty} {register}"));
        }

        debug!(params = params.len(), "defining function body");
        self.buffer.blank();
        self.buffer.line(format!(
            "define {return_ty} @{}({}) {{",
            function.name,
            params.join(", ")
        ));
        self.buffer.label("entry");
        self.terminated = false;

        self.lower(&function.body, scope)?;

        if function.return_type.is_void() && !self.terminated {
            self.emit("ret void");
        }
        self.buffer.line("}");
        Ok(())
    }
}
