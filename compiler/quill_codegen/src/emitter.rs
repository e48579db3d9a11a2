//! The append-only IR buffer.
//!
//! One line of text per instruction. Instructions are indented two spaces;
//! labels, definitions and top-level declarations are not.

use std::fmt;

/// A basic block label, printed as `<prefix><id>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Label {
    prefix: &'static str,
    id: u32,
}

impl Label {
    pub const fn new(prefix: &'static str, id: u32) -> Self {
        Label { prefix, id }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.id)
    }
}

/// Lines emitted so far.
#[derive(Clone, Debug, Default)]
pub struct IrBuffer {
    lines: Vec<String>,
}

impl IrBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top-level line verbatim.
    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Append an instruction inside a function body.
    pub fn instr(&mut self, text: impl fmt::Display) {
        self.lines.push(format!("  {text}"));
    }

    /// Start a basic block.
    pub fn label(&mut self, label: impl fmt::Display) {
        self.lines.push(format!("{label}:"));
    }

    /// Append a blank separator line.
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn finish(self) -> IrModule {
        IrModule { lines: self.lines }
    }
}

/// A finished compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IrModule {
    lines: Vec<String>,
}

impl IrModule {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// The module as one text artifact, lines joined with `\n`.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for IrModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
