//! Column-aware line printer
//!
//! Indentation is written lazily: a newline only records the column the next
//! line should start at, so consecutive breaks never leave trailing
//! whitespace and a later break can still move the pending line.

/// Indentation size (4 spaces)
pub const INDENT_SIZE: usize = super::rules::INDENT_WIDTH;

/// Pretty printer state
pub struct Printer {
    output: String,
    current_line_width: usize,
    /// Leading whitespace of the current line
    line_indent: usize,
    at_line_start: bool,
    /// Column the pending line will start at
    pending_column: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            current_line_width: 0,
            line_indent: 0,
            at_line_start: true,
            pending_column: 0,
        }
    }

    /// Write text to output
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            self.output.push_str(&" ".repeat(self.pending_column));
            self.current_line_width = self.pending_column;
            self.line_indent = self.pending_column;
            self.at_line_start = false;
        }
        self.output.push_str(text);
        self.current_line_width += text.chars().count();
    }

    /// Start a new line at column 0
    pub fn newline(&mut self) {
        self.newline_to(0);
    }

    /// Start a new line whose text begins at `column`
    pub fn newline_to(&mut self, column: usize) {
        self.output.push('\n');
        self.current_line_width = 0;
        self.at_line_start = true;
        self.pending_column = column;
    }

    /// Make the next text start a line at `column`, breaking the current
    /// line only if something has been written on it
    pub fn break_to(&mut self, column: usize) {
        if self.at_line_start {
            self.pending_column = column;
        } else {
            self.newline_to(column);
        }
    }

    /// True when nothing has been written on the current line yet
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// Column the next character will be written at
    pub fn column(&self) -> usize {
        if self.at_line_start {
            self.pending_column
        } else {
            self.current_line_width
        }
    }

    /// Leading whitespace of the current (or pending) line
    pub fn line_indent(&self) -> usize {
        if self.at_line_start {
            self.pending_column
        } else {
            self.line_indent
        }
    }

    /// Get the output string, without trailing whitespace
    pub fn finish(self) -> String {
        let mut output = self.output;
        output.truncate(output.trim_end().len());
        output
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}
