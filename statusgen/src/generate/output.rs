use serde::Serialize;

/// Line-level mapping from generated code back to the declaration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mapping {
    /// Generated line (0-indexed)
    pub gen_line: usize,
    /// Declaration file line the generated line came from (0-indexed)
    pub src_line: usize,
}

/// Line-oriented output builder with indentation
pub struct Output {
    lines: Vec<String>,
    current_line: String,
    line_number: usize,
    indent: usize,
    mappings: Vec<Mapping>,
}

impl Output {
    const INDENT: &'static str = "    ";

    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            current_line: String::new(),
            line_number: 0,
            indent: 0,
            mappings: Vec::new(),
        }
    }

    /// Add text to the current line
    pub fn push(&mut self, text: &str) {
        if self.current_line.is_empty() && !text.is_empty() {
            self.current_line.push_str(&Self::INDENT.repeat(self.indent));
        }
        self.current_line.push_str(text);
    }

    /// Add a newline
    pub fn newline(&mut self) {
        self.current_line.push('\n');
        self.lines.push(std::mem::take(&mut self.current_line));
        self.line_number += 1;
    }

    /// Add a full line at the current indentation
    pub fn line(&mut self, text: &str) {
        self.push(text);
        self.newline();
    }

    /// Add a full line that originates from `src_line` of the declaration file
    pub fn line_mapped(&mut self, text: &str, src_line: usize) {
        self.mappings.push(Mapping {
            gen_line: self.line_number,
            src_line,
        });
        self.line(text);
    }

    /// Add an empty line (no indentation)
    pub fn blank(&mut self) {
        self.newline();
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Finish and return the generated code
    pub fn finish(mut self) -> (String, Vec<Mapping>) {
        if !self.current_line.is_empty() {
            self.lines.push(std::mem::take(&mut self.current_line));
        }
        (self.lines.concat(), self.mappings)
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
