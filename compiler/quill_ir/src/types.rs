//! Source-level types as reported by semantic analysis.

use std::fmt;

/// A resolved (or not yet resolved) source type.
///
/// `Unknown` is what an unannotated node carries before the type-resolution
/// query has been asked about it. The back end never maps it to IR.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Int32,
    Boolean,
    String,
    Void,
    #[default]
    Unknown,
}

impl Type {
    /// Returns `true` for every type except `Unknown`.
    #[inline]
    pub fn is_known(self) -> bool {
        !matches!(self, Type::Unknown)
    }

    #[inline]
    pub fn is_void(self) -> bool {
        matches!(self, Type::Void)
    }

    /// Source-level spelling, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Type::Int32 => "int32",
            Type::Boolean => "bool",
            Type::String => "string",
            Type::Void => "void",
            Type::Unknown => "<unknown>",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
