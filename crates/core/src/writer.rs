//! Scope-tracking text buffer for generated source.
//!
//! [`CodeWriter`] owns the text of one generated file. Indentation and braces
//! are tracked by the writer itself; callers open blocks through
//! [`CodeWriter::block_scope`] and [`CodeWriter::indent_scope`], whose guards
//! close the scope exactly once when they go out of scope, including when the
//! caller bails out early with `?`.

use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Mutable text buffer with an indentation cursor.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    buffer: String,
    indent_level: usize,
    indent_unit: String,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    /// Create an empty writer indenting with [`DEFAULT_INDENT_WIDTH`] spaces.
    pub fn new() -> Self {
        Self::with_indent_width(DEFAULT_INDENT_WIDTH)
    }

    /// Create an empty writer indenting with `width` spaces per level.
    pub fn with_indent_width(width: usize) -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_unit: " ".repeat(width),
        }
    }

    /// Current indentation depth.
    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Text written so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Whether nothing has been written since the last reset.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(&self.indent_unit);
        }
    }

    /// Append a fragment, optionally prefixed by the current indentation.
    pub fn append(&mut self, value: &str, indent: bool) {
        if indent {
            self.push_indent();
        }
        self.buffer.push_str(value);
    }

    /// Append a line break. With `indent`, the next line is pre-indented.
    pub fn append_line_break(&mut self, indent: bool) {
        self.buffer.push('\n');
        if indent {
            self.push_indent();
        }
    }

    /// Append a full line. An empty `value` yields a bare line break with no
    /// trailing whitespace.
    pub fn append_line(&mut self, value: &str, indent: bool) {
        if !value.is_empty() {
            self.append(value, indent);
        }
        self.buffer.push('\n');
    }

    /// Append `bytes` as a brace-delimited, comma-separated literal.
    pub fn append_byte_array(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            self.buffer.push_str("{ }");
            return;
        }
        let items = bytes
            .iter()
            .map(|byte| byte.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        self.buffer.push_str("{ ");
        self.buffer.push_str(&items);
        self.buffer.push_str(" }");
    }

    /// Increase the indentation depth by one level.
    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease the indentation depth by one level. Never goes below zero.
    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write an opening brace on its own line and indent.
    pub fn begin_block(&mut self) {
        self.append_line("{", true);
        self.increase_indent();
    }

    /// Dedent and write a closing brace on its own line.
    pub fn end_block(&mut self) {
        self.decrease_indent();
        self.append_line("}", true);
    }

    /// Write `start_line` (if any) and indent until the guard is dropped.
    pub fn indent_scope(&mut self, start_line: Option<&str>) -> IndentScope<'_> {
        if let Some(line) = start_line {
            self.append_line(line, true);
        }
        self.increase_indent();
        IndentScope { writer: self }
    }

    /// Write `start_line` (if any) followed by an opening brace; the matching
    /// closing brace is written when the guard is dropped.
    pub fn block_scope(&mut self, start_line: Option<&str>) -> BlockScope<'_> {
        if let Some(line) = start_line {
            self.append_line(line, true);
        }
        self.begin_block();
        BlockScope { writer: self }
    }

    /// Discard all text and reset the indentation depth.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.indent_level = 0;
    }

    /// Take the written text out of the writer, leaving it empty.
    pub fn take(&mut self) -> String {
        self.indent_level = 0;
        mem::take(&mut self.buffer)
    }
}

impl fmt::Display for CodeWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buffer)
    }
}

/// Guard returned by [`CodeWriter::indent_scope`].
#[derive(Debug)]
#[must_use = "the indentation is undone as soon as the guard is dropped"]
pub struct IndentScope<'a> {
    writer: &'a mut CodeWriter,
}

impl Drop for IndentScope<'_> {
    fn drop(&mut self) {
        self.writer.decrease_indent();
    }
}

impl Deref for IndentScope<'_> {
    type Target = CodeWriter;

    fn deref(&self) -> &CodeWriter {
        &*self.writer
    }
}

impl DerefMut for IndentScope<'_> {
    fn deref_mut(&mut self) -> &mut CodeWriter {
        &mut *self.writer
    }
}

/// Guard returned by [`CodeWriter::block_scope`].
#[derive(Debug)]
#[must_use = "the block is closed as soon as the guard is dropped"]
pub struct BlockScope<'a> {
    writer: &'a mut CodeWriter,
}

impl Drop for BlockScope<'_> {
    fn drop(&mut self) {
        self.writer.end_block();
    }
}

impl Deref for BlockScope<'_> {
    type Target = CodeWriter;

    fn deref(&self) -> &CodeWriter {
        &*self.writer
    }
}

impl DerefMut for BlockScope<'_> {
    fn deref_mut(&mut self) -> &mut CodeWriter {
        &mut *self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_line_indents_at_current_depth() {
        let mut writer = CodeWriter::new();
        writer.append_line("a", true);
        writer.increase_indent();
        writer.append_line("b", true);
        writer.append_line("c", false);
        assert_eq!(writer.as_str(), "a\n    b\nc\n");
    }

    #[test]
    fn test_empty_line_has_no_trailing_whitespace() {
        let mut writer = CodeWriter::new();
        writer.increase_indent();
        writer.append_line("", true);
        assert_eq!(writer.as_str(), "\n");
    }

    #[test]
    fn test_append_fragments_on_one_line() {
        let mut writer = CodeWriter::with_indent_width(2);
        writer.increase_indent();
        writer.append("void Run(", true);
        writer.append("int x", false);
        writer.append(")", false);
        writer.append_line_break(false);
        assert_eq!(writer.as_str(), "  void Run(int x)\n");
    }

    #[test]
    fn test_line_break_with_indent_prefixes_next_line() {
        let mut writer = CodeWriter::with_indent_width(2);
        writer.increase_indent();
        writer.append_line_break(true);
        writer.append("x", false);
        assert_eq!(writer.as_str(), "\n  x");
    }

    #[test]
    fn test_byte_array_literal() {
        let mut writer = CodeWriter::new();
        writer.append_byte_array(&[1, 2, 255]);
        assert_eq!(writer.as_str(), "{ 1, 2, 255 }");

        writer.clear();
        writer.append_byte_array(&[]);
        assert_eq!(writer.as_str(), "{ }");
    }

    #[test]
    fn test_decrease_indent_saturates_at_zero() {
        let mut writer = CodeWriter::new();
        writer.decrease_indent();
        writer.decrease_indent();
        assert_eq!(writer.indent_level(), 0);
        writer.end_block();
        assert_eq!(writer.indent_level(), 0);
        assert_eq!(writer.as_str(), "}\n");
    }

    #[test]
    fn test_block_scope_closes_on_drop() {
        let mut writer = CodeWriter::new();
        {
            let mut outer = writer.block_scope(Some("namespace Demo"));
            {
                let mut inner = outer.block_scope(Some("class Foo"));
                inner.append_line("int x;", true);
            }
            assert_eq!(outer.indent_level(), 1);
        }
        assert_eq!(writer.indent_level(), 0);
        assert_eq!(
            writer.as_str(),
            "namespace Demo\n{\n    class Foo\n    {\n        int x;\n    }\n}\n"
        );
    }

    #[test]
    fn test_block_scope_closes_on_early_return() {
        fn write_then_fail(writer: &mut CodeWriter) -> Result<(), String> {
            let mut block = writer.block_scope(Some("class Foo"));
            block.append_line("int x;", true);
            let failed: Result<(), String> = Err("boom".to_string());
            failed?;
            block.append_line("never written", true);
            Ok(())
        }

        let mut writer = CodeWriter::new();
        assert!(write_then_fail(&mut writer).is_err());
        assert_eq!(writer.indent_level(), 0);
        assert_eq!(writer.as_str(), "class Foo\n{\n    int x;\n}\n");
    }

    #[test]
    fn test_indent_scope_without_start_line() {
        let mut writer = CodeWriter::new();
        {
            let mut scope = writer.indent_scope(None);
            scope.append_line("body", true);
        }
        writer.append_line("after", true);
        assert_eq!(writer.as_str(), "    body\nafter\n");
    }

    #[test]
    fn test_take_resets_writer() {
        let mut writer = CodeWriter::new();
        writer.increase_indent();
        writer.append_line("x", true);
        let text = writer.take();
        assert_eq!(text, "    x\n");
        assert!(writer.is_empty());
        assert_eq!(writer.indent_level(), 0);
    }

    #[test]
    fn test_display_matches_buffer() {
        let mut writer = CodeWriter::new();
        writer.append_line("abc", false);
        assert_eq!(writer.to_string(), "abc\n");
    }
}
