//! Runtime function declarations.
//!
//! Declares the C library functions the generated code calls for strings
//! and heap memory. They are resolved at link time.

use crate::emitter::IrBuffer;

/// `declare` lines for every runtime function, in emission order.
pub const RUNTIME_DECLARATIONS: [&str; 4] = [
    "declare i64 @strlen(ptr)",
    "declare i32 @strcmp(ptr, ptr)",
    "declare ptr @malloc(i64)",
    "declare ptr @memcpy(ptr, ptr, i64)",
];

/// Emit the runtime declarations. Call once per module, before any
/// function definition.
pub fn declare_runtime(buffer: &mut IrBuffer) {
    for decl in RUNTIME_DECLARATIONS {
        buffer.line(decl);
    }
}
