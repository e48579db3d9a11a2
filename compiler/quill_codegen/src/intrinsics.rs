//! Intrinsic functions.
//!
//! An intrinsic is a callable whose IR body and call-site text come from
//! the back end instead of a user-written AST. Setup emits each one's
//! external declarations (deduplicated across intrinsics) and body once;
//! call lowering hands call-text construction to [`Intrinsic::emit_call`].

use std::fmt::Write as _;

use quill_ir::{Node, Type};
use rustc_hash::FxHashMap;

use crate::error::CodegenErrorKind;
use crate::ir_type::IrType;

/// The contract every intrinsic satisfies.
pub trait Intrinsic {
    fn name(&self) -> &str;

    /// Declared parameter types, positionally.
    fn params(&self) -> &[Type];

    fn return_type(&self) -> Type;

    /// Top-level `declare` lines the body depends on.
    fn declarations(&self) -> Vec<String>;

    /// Self-contained definition: any globals it needs plus the `define`.
    fn emit_body(&self) -> Vec<String>;

    /// Right-hand side of the call instruction.
    ///
    /// `args` is the already formatted `type register` list of the
    /// user-supplied arguments; the intrinsic may splice hidden arguments
    /// ahead of it.
    fn emit_call(&self, call: &Node, arg_types: &[Type], args: &str) -> String;
}

// ---------------------------------------------------------------------------
// printf-backed printers
// ---------------------------------------------------------------------------

const PRINTF_DECL: &str = "declare i32 @printf(ptr, ...)";

/// A one-argument printer that forwards to `printf` with a fixed format.
///
/// The format string lives in a private global `@.fmt.<name>`, passed as a
/// hidden first argument.
#[derive(Clone, Debug)]
pub struct PrintfIntrinsic {
    name: &'static str,
    params: [Type; 1],
    arg_ty: IrType,
    format: &'static str,
}

impl PrintfIntrinsic {
    /// A printer taking one `param`. Fails with `UnsupportedType` unless
    /// `param` maps to a value-carrying IR type.
    pub fn new(
        name: &'static str,
        param: Type,
        format: &'static str,
    ) -> Result<Self, CodegenErrorKind> {
        match IrType::from_type(param)? {
            IrType::Void => Err(CodegenErrorKind::UnsupportedType(param)),
            arg_ty => Ok(PrintfIntrinsic {
                name,
                params: [param],
                arg_ty,
                format,
            }),
        }
    }

    /// `println(s: string)`: the string followed by a newline.
    pub const fn println() -> Self {
        PrintfIntrinsic {
            name: "println",
            params: [Type::String],
            arg_ty: IrType::Ptr,
            format: "%s\n",
        }
    }

    /// `print_int(n: int32)`: the decimal value followed by a newline.
    pub const fn print_int() -> Self {
        PrintfIntrinsic {
            name: "print_int",
            params: [Type::Int32],
            arg_ty: IrType::I32,
            format: "%d\n",
        }
    }

    fn format_global(&self) -> String {
        format!("@.fmt.{}", self.name)
    }
}

impl Intrinsic for PrintfIntrinsic {
    fn name(&self) -> &str {
        self.name
    }

    fn params(&self) -> &[Type] {
        &self.params
    }

    fn return_type(&self) -> Type {
        Type::Void
    }

    fn declarations(&self) -> Vec<String> {
        vec![PRINTF_DECL.to_string()]
    }

    fn emit_body(&self) -> Vec<String> {
        let bytes = self.format.as_bytes();
        let arg_ty = self.arg_ty;
        vec![
            format!(
                "{} = private unnamed_addr constant [{} x i8] {}",
                self.format_global(),
                bytes.len() + 1,
                c_string_literal(bytes)
            ),
            format!("define void @{}(ptr %fmt, {arg_ty} %value) {{", self.name),
            "entry:".to_string(),
            format!("  %r = call i32 (ptr, ...) @printf(ptr %fmt, {arg_ty} %value)"),
            "  ret void".to_string(),
            "}".to_string(),
        ]
    }

    fn emit_call(&self, _call: &Node, _arg_types: &[Type], args: &str) -> String {
        format!("call void @{}(ptr {}, {args})", self.name, self.format_global())
    }
}

/// Encode bytes as an LLVM `c"..."` constant with a trailing NUL.
pub fn c_string_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 6);
    out.push_str("c\"");
    for &b in bytes {
        if (b.is_ascii_graphic() && b != b'"' && b != b'\\') || b == b' ' {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "\\{b:02X}");
        }
    }
    out.push_str("\\00\"");
    out
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Intrinsics by name, in registration order.
#[derive(Default)]
pub struct Intrinsics {
    entries: Vec<Box<dyn Intrinsic>>,
    by_name: FxHashMap<String, usize>,
}

impl Intrinsics {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// `println` and `print_int`.
    pub fn with_builtins() -> Self {
        let mut intrinsics = Self::new();
        intrinsics.register(Box::new(PrintfIntrinsic::println()));
        intrinsics.register(Box::new(PrintfIntrinsic::print_int()));
        intrinsics
    }

    /// Register an intrinsic, replacing any earlier one with the same name.
    pub fn register(&mut self, intrinsic: Box<dyn Intrinsic>) {
        let name = intrinsic.name().to_string();
        if let Some(&index) = self.by_name.get(&name) {
            self.entries[index] = intrinsic;
        } else {
            self.by_name.insert(name, self.entries.len());
            self.entries.push(intrinsic);
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Intrinsic> {
        self.by_name.get(name).map(|&i| &*self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Intrinsic> {
        self.entries.iter().map(|entry| &**entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
