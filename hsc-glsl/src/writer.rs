//! Line-oriented output sink
//!
//! The generator drives this writer exclusively; it never formats columns
//! itself. The writer owns line discipline: indentation at line begin,
//! newline at line end, and a pushable option frame that can suspend both
//! (used while writing the clauses of a `for` header on one line).

/// A formatting option frame
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    pub enable_newline: bool,
    pub enable_indent: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            enable_newline: true,
            enable_indent: true,
        }
    }
}

/// Collects generated source text line by line
#[derive(Debug)]
pub struct SourceWriter {
    output: String,
    indent_unit: String,
    indent_level: usize,
    options: Vec<WriteOptions>,
    line_open: bool,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::with_indent("    ")
    }

    pub fn with_indent(indent_unit: &str) -> Self {
        Self {
            output: String::new(),
            indent_unit: indent_unit.to_string(),
            indent_level: 0,
            options: Vec::new(),
            line_open: false,
        }
    }

    fn current_options(&self) -> WriteOptions {
        self.options.last().copied().unwrap_or_default()
    }

    /// Open a line, writing the current indentation
    ///
    /// A no-op if a line is already open.
    pub fn begin_ln(&mut self) {
        if self.line_open {
            return;
        }
        if self.current_options().enable_indent {
            for _ in 0..self.indent_level {
                self.output.push_str(&self.indent_unit);
            }
        }
        self.line_open = true;
    }

    /// Close the current line with a newline (if enabled)
    pub fn end_ln(&mut self) {
        if self.current_options().enable_newline {
            self.output.push('\n');
        }
        self.line_open = false;
    }

    /// Write text into the current line, opening one if necessary
    pub fn write(&mut self, text: &str) {
        if !self.line_open {
            self.begin_ln();
        }
        self.output.push_str(text);
    }

    /// Write a complete line
    pub fn write_ln(&mut self, text: &str) {
        self.begin_ln();
        self.write(text);
        self.end_ln();
    }

    /// Write an empty line
    pub fn blank(&mut self) {
        if self.line_open {
            self.end_ln();
        }
        if self.current_options().enable_newline {
            self.output.push('\n');
        }
    }

    pub fn inc_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dec_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn push_options(&mut self, enable_newline: bool, enable_indent: bool) {
        self.options.push(WriteOptions {
            enable_newline,
            enable_indent,
        });
    }

    pub fn pop_options(&mut self) {
        self.options.pop();
    }

    /// Finish writing and return the produced source text
    pub fn into_source(mut self) -> String {
        if self.line_open {
            self.end_ln();
        }
        self.output
    }
}

impl Default for SourceWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_lines() {
        let mut writer = SourceWriter::new();
        writer.write_ln("void main()");
        writer.write_ln("{");
        writer.inc_indent();
        writer.write_ln("return;");
        writer.dec_indent();
        writer.write_ln("}");

        assert_eq!(
            writer.into_source(),
            "void main()\n{\n    return;\n}\n"
        );
    }

    #[test]
    fn test_split_line_writes() {
        let mut writer = SourceWriter::new();
        writer.begin_ln();
        writer.write("if (");
        writer.write("x");
        writer.write(")");
        writer.end_ln();

        assert_eq!(writer.into_source(), "if (x)\n");
    }

    #[test]
    fn test_suspended_newlines() {
        let mut writer = SourceWriter::new();
        writer.inc_indent();
        writer.begin_ln();
        writer.write("for (");
        writer.push_options(false, false);
        writer.write("int i = 0;");
        writer.end_ln();
        writer.write(" ");
        writer.write("i < 4");
        writer.pop_options();
        writer.write(")");
        writer.end_ln();

        assert_eq!(writer.into_source(), "    for (int i = 0; i < 4)\n");
    }

    #[test]
    fn test_blank_line() {
        let mut writer = SourceWriter::new();
        writer.write_ln("a;");
        writer.blank();
        writer.write_ln("b;");

        assert_eq!(writer.into_source(), "a;\n\nb;\n");
    }

    #[test]
    fn test_unterminated_line_flushed() {
        let mut writer = SourceWriter::new();
        writer.write("end");
        assert_eq!(writer.into_source(), "end\n");
    }
}
