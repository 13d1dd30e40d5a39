//! Line-oriented block capture.
//!
//! A block opens on the first line whose trimmed text *contains* the start
//! marker and closes on the first later line whose trimmed text *equals* the
//! end marker. Lines in between are captured trimmed, in order.

use super::tokenizer::{Position, Span};
use crate::error::{ErrorKind, ParseError};
use tracing::debug;

/// A captured source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    /// Trimmed text of the line
    pub text: String,
    /// Span of the trimmed text in the source
    pub span: Span,
}

/// Lines captured between one start marker and its end marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedBlock {
    /// Span of the line that opened the block
    pub open: Span,
    /// Span of the line that closed the block
    pub close: Span,
    pub lines: Vec<ScannedLine>,
}

impl ScannedBlock {
    /// Captured texts, in source order
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

#[derive(Debug)]
enum ScanState {
    Outside,
    Inside { open: Span, lines: Vec<ScannedLine> },
}

/// Captures every block delimited by a pair of markers
#[derive(Debug, Clone)]
pub struct BlockScanner<'m> {
    start: &'m str,
    end: &'m str,
}

impl<'m> BlockScanner<'m> {
    pub fn new(start: &'m str, end: &'m str) -> Self {
        Self { start, end }
    }

    /// Scanner for `enum <name> {` ... `}`
    pub fn for_enum(marker: &'m str) -> Self {
        Self::new(marker, "}")
    }

    /// Scan `source`, returning every block in source order.
    ///
    /// An end marker outside a block is ignored. A start marker inside a block
    /// and end of input inside a block are errors.
    pub fn scan(&self, source: &str) -> Result<Vec<ScannedBlock>, ParseError> {
        let mut blocks = Vec::new();
        let mut state = ScanState::Outside;
        let mut byte = 0;

        for (line_no, raw) in source.split_inclusive('\n').enumerate() {
            let line_start = byte;
            byte += raw.len();

            let line = raw.trim_end_matches(['\n', '\r']);
            let trimmed = line.trim();
            let span = trimmed_span(line, trimmed, line_no, line_start);

            state = match state {
                ScanState::Outside => {
                    if trimmed.contains(self.start) {
                        debug!(line = line_no + 1, marker = self.start, "block start");
                        ScanState::Inside { open: span, lines: Vec::new() }
                    } else {
                        ScanState::Outside
                    }
                }
                ScanState::Inside { open, mut lines } => {
                    if trimmed.contains(self.start) {
                        return Err(ParseError::new(
                            ErrorKind::NestedBlock,
                            format!("'{}' appears again before the block is closed.", self.start),
                            span,
                        )
                        .with_related(open)
                        .with_related_label("outer block opened here")
                        .with_help(format!("Close the first block with '{}'", self.end)));
                    }

                    if trimmed == self.end {
                        debug!(line = line_no + 1, captured = lines.len(), "block end");
                        blocks.push(ScannedBlock { open, close: span, lines });
                        ScanState::Outside
                    } else {
                        lines.push(ScannedLine {
                            text: trimmed.to_string(),
                            span,
                        });
                        ScanState::Inside { open, lines }
                    }
                }
            };
        }

        if let ScanState::Inside { open, .. } = state {
            let end = end_of_source(source);
            return Err(ParseError::new(
                ErrorKind::UnclosedBlock,
                format!("This block is never closed with '{}'.", self.end),
                Span::point(end),
            )
            .with_related(open)
            .with_help(format!("Close with '{}'", self.end)));
        }

        Ok(blocks)
    }

    /// Scan `source` and return the first block, failing when there is none.
    pub fn scan_one(&self, source: &str) -> Result<ScannedBlock, ParseError> {
        self.scan(source)?.into_iter().next().ok_or_else(|| {
            ParseError::new(
                ErrorKind::MissingBlock,
                format!("No line contains '{}'.", self.start),
                Span::point(Position::new()),
            )
        })
    }
}

fn trimmed_span(line: &str, trimmed: &str, line_no: usize, line_start: usize) -> Span {
    let leading = line.len() - line.trim_start().len();
    let start_col = line[..leading].chars().count();
    let width = trimmed.chars().count();
    Span::new(
        Position {
            byte: line_start + leading,
            line: line_no,
            col: start_col,
        },
        Position {
            byte: line_start + leading + trimmed.len(),
            line: line_no,
            col: start_col + width,
        },
    )
}

fn end_of_source(source: &str) -> Position {
    let line = source.lines().count().saturating_sub(1);
    let col = source.lines().last().map(|l| l.chars().count()).unwrap_or(0);
    Position {
        byte: source.len(),
        line,
        col,
    }
}
