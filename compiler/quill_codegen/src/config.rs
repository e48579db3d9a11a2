//! Code generation configuration.
//!
//! # Environment Variables
//!
//! - `QUILL_DEBUG_IR`: print the finished IR to stderr. Any non-empty value
//!   enables this.
//! - `QUILL_TARGET_TRIPLE`: emit a `target triple` line with this value.

use std::env;

/// Options for one generation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenConfig {
    /// Emitted as the `; ModuleID` comment.
    pub module_name: String,
    /// Emitted as `source_filename`.
    pub source_filename: String,
    pub target_triple: Option<String>,
    /// Reuse the register of an identical literal already materialized in
    /// the same function.
    pub memoize_literals: bool,
    /// Emit the `alloca`/`store` pair on assignment. Variables are always
    /// bound to their value register, so the slot is never read back.
    pub emit_assignment_slots: bool,
    /// Print the finished IR to stderr.
    pub debug_ir: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        CodegenConfig {
            module_name: "quill".to_string(),
            source_filename: "main.ql".to_string(),
            target_triple: None,
            memoize_literals: true,
            emit_assignment_slots: true,
            debug_ir: false,
        }
    }
}

impl CodegenConfig {
    /// Defaults, overridden by `QUILL_DEBUG_IR` and `QUILL_TARGET_TRIPLE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns for the
    /// environment variable names. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = CodegenConfig::default();
        let set = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if set("QUILL_DEBUG_IR").is_some() {
            config.debug_ir = true;
        }
        if let Some(triple) = set("QUILL_TARGET_TRIPLE") {
            config.target_triple = Some(triple);
        }
        config
    }

    #[must_use]
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    #[must_use]
    pub fn with_source_filename(mut self, file: impl Into<String>) -> Self {
        self.source_filename = file.into();
        self
    }

    #[must_use]
    pub fn with_target_triple(mut self, triple: impl Into<String>) -> Self {
        self.target_triple = Some(triple.into());
        self
    }

    #[must_use]
    pub fn with_memoize_literals(mut self, enabled: bool) -> Self {
        self.memoize_literals = enabled;
        self
    }

    #[must_use]
    pub fn with_assignment_slots(mut self, enabled: bool) -> Self {
        self.emit_assignment_slots = enabled;
        self
    }
}
