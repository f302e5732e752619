//! JavaScript code emitter - builds target source strings
//!
//! This module provides an indentation-aware buffer for building generated code.

use std::fmt::Write;

/// A buffer for building target source with proper indentation
#[derive(Debug, Clone)]
pub struct JsEmitter {
    buffer: String,
    indent_level: usize,
    indent_str: String,
}

impl Default for JsEmitter {
    fn default() -> Self {
        Self::new(2)
    }
}

impl JsEmitter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_str: " ".repeat(indent_width),
        }
    }

    /// An empty buffer at the same indentation, for rendering a nested construct into a string.
    pub fn nested(&self) -> Self {
        Self {
            buffer: String::new(),
            indent_level: self.indent_level,
            indent_str: self.indent_str.clone(),
        }
    }

    /// Get the generated code
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Get current buffer as string slice
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Write a line with current indentation
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write text without newline
    pub fn write(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    /// Write formatted text
    pub fn writef(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = self.buffer.write_fmt(args);
    }

    /// Write indentation only
    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(&self.indent_str);
        }
    }

    /// Increase indent level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indent level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write `header {` and indent.
    pub fn open_block(&mut self, header: &str) {
        self.line(&format!("{} {{", header));
        self.indent();
    }

    /// Dedent and write `}`.
    pub fn close_block(&mut self) {
        self.dedent();
        self.line("}");
    }

    /// Close the current block and open a sibling on the same line, as in `} else {`.
    pub fn reopen_block(&mut self, header: &str) {
        self.dedent();
        self.line(&format!("}} {} {{", header));
        self.indent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_uses_indentation() {
        let mut emitter = JsEmitter::new(2);
        emitter.line("a;");
        emitter.indent();
        emitter.line("b;");
        emitter.dedent();
        emitter.line("c;");
        assert_eq!(emitter.finish(), "a;\n  b;\nc;\n");
    }

    #[test]
    fn test_reopen_block() {
        let mut emitter = JsEmitter::new(2);
        emitter.open_block("if (x)");
        emitter.line("y();");
        emitter.reopen_block("else");
        emitter.line("z();");
        emitter.close_block();
        assert_eq!(emitter.finish(), "if (x) {\n  y();\n} else {\n  z();\n}\n");
    }

    #[test]
    fn test_close_block() {
        let mut emitter = JsEmitter::new(4);
        emitter.open_block("if (a)");
        emitter.line("b;");
        emitter.close_block();
        assert_eq!(emitter.as_str(), "if (a) {\n    b;\n}\n");
    }

    #[test]
    fn test_nested_keeps_level() {
        let mut emitter = JsEmitter::new(2);
        emitter.indent();
        let mut nested = emitter.nested();
        assert_eq!(nested.indent_level(), 1);
        nested.line("x;");
        assert_eq!(nested.finish(), "  x;\n");
        assert!(emitter.as_str().is_empty());
    }

    #[test]
    fn test_dedent_saturates() {
        let mut emitter = JsEmitter::default();
        emitter.dedent();
        assert_eq!(emitter.indent_level(), 0);
        emitter.writef(format_args!("{}-{}", 1, 2));
        assert_eq!(emitter.finish(), "1-2");
    }
}
