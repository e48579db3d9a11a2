//! Source type to IR type mapping.

use std::fmt;

use quill_ir::Type;

use crate::error::CodegenErrorKind;

/// Scalar IR types the generator emits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IrType {
    I32,
    I1,
    /// Opaque pointer; strings are `ptr` to NUL-terminated bytes.
    Ptr,
    Void,
}

impl IrType {
    /// Map a resolved source type. `Unknown` is never mapped.
    pub fn from_type(ty: Type) -> Result<IrType, CodegenErrorKind> {
        match ty {
            Type::Int32 => Ok(IrType::I32),
            Type::Boolean => Ok(IrType::I1),
            Type::String => Ok(IrType::Ptr),
            Type::Void => Ok(IrType::Void),
            Type::Unknown => Err(CodegenErrorKind::UnsupportedType(ty)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IrType::I32 => "i32",
            IrType::I1 => "i1",
            IrType::Ptr => "ptr",
            IrType::Void => "void",
        }
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
