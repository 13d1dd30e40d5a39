use crate::parser::tokenizer::Span;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Kind of parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnclosedBlock,
    NestedBlock,
    MissingBlock,
    MalformedLine,
    DuplicateKey,
    UnexpectedToken,
    UnterminatedComment,
    InvalidNumber,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnclosedBlock => "Unclosed block",
            ErrorKind::NestedBlock => "Nested block",
            ErrorKind::MissingBlock => "Missing block",
            ErrorKind::MalformedLine => "Malformed line",
            ErrorKind::DuplicateKey => "Duplicate key",
            ErrorKind::UnexpectedToken => "Unexpected token",
            ErrorKind::UnterminatedComment => "Unterminated comment",
            ErrorKind::InvalidNumber => "Invalid number",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error while scanning or parsing one input file
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub related_span: Option<Span>,
    pub related_label: Option<String>,
    pub help: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            related_span: None,
            related_label: None,
            help: None,
        }
    }

    /// Add a related span (e.g. where a block was opened)
    pub fn with_related(mut self, span: Span) -> Self {
        self.related_span = Some(span);
        self
    }

    /// Set the label for the related span
    pub fn with_related_label(mut self, label: impl Into<String>) -> Self {
        self.related_label = Some(label.into());
        self
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error with source context
    pub fn render(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, true)
    }

    fn render_inner(&self, source: &str, filename: &str, color: bool) -> String {
        let red = if color { "\x1b[1;31m" } else { "" };
        let dim = if color { "\x1b[2m" } else { "" };
        let cyan = if color { "\x1b[1;36m" } else { "" };
        let reset = if color { "\x1b[0m" } else { "" };

        let mut output = String::new();

        let location = format!(
            "{}:{}:{}",
            filename,
            self.span.start.line + 1,
            self.span.start.col + 1
        );
        output.push_str(&format!(" {}file:{} {}\n", dim, reset, location));
        output.push_str(&format!(
            "{}error:{} {}: {}\n",
            red, reset, self.kind, self.message
        ));

        if let Some(source_line) = source.lines().nth(self.span.start.line) {
            let err_line = self.span.start.line + 1;
            let width = format!("{}", err_line).len().max(2);
            output.push_str(&format!("{}{:>width$} |{}\n", dim, "", reset, width = width));
            output.push_str(&format!(
                "{}{:>width$} |{} {}\n",
                dim, err_line, reset, source_line, width = width
            ));
            output.push_str(&underline(&self.span, source_line, width, dim, red, reset, None));
        }

        if let Some(ref related) = self.related_span {
            if let Some(related_line) = source.lines().nth(related.start.line) {
                let line_no = related.start.line + 1;
                let width = format!("{}", line_no).len().max(2);
                output.push_str(&format!(
                    "{}{:>width$} |{} {}\n",
                    dim, line_no, reset, related_line, width = width
                ));
                let label = self.related_label.as_deref().unwrap_or("opened here");
                output.push_str(&underline(related, related_line, width, dim, dim, reset, Some(label)));
            }
        }

        if let Some(ref help) = self.help {
            output.push('\n');
            for (i, help_line) in help.lines().enumerate() {
                if i == 0 {
                    output.push_str(&format!(" {}help:{} {}\n", cyan, reset, help_line));
                } else {
                    output.push_str(&format!("       {}\n", help_line));
                }
            }
        }

        output
    }
}

fn underline(
    span: &Span,
    source_line: &str,
    width: usize,
    dim: &str,
    caret_color: &str,
    reset: &str,
    label: Option<&str>,
) -> String {
    let start = span.start.col;
    let len = if span.end.line == span.start.line {
        span.end.col.saturating_sub(start).max(1)
    } else {
        source_line.chars().count().saturating_sub(start).max(1)
    };
    let label = label.map(|l| format!(" {}", l)).unwrap_or_default();
    format!(
        "{}{:>width$} |{} {}{}{}{}{}\n",
        dim,
        "",
        reset,
        " ".repeat(start),
        caret_color,
        "^".repeat(len),
        label,
        reset,
        width = width
    )
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.span.start.line + 1,
            self.span.start.col + 1,
            self.kind,
            self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Error raised by the generation pipeline
#[derive(Debug)]
pub enum Error {
    /// An input path does not exist
    MissingInput { path: PathBuf },
    /// An input exists but could not be read
    Read { path: PathBuf, source: io::Error },
    /// An input was read but its contents are not usable
    Parse {
        path: PathBuf,
        text: Arc<str>,
        error: ParseError,
    },
    /// The output file could not be written
    Write { path: PathBuf, source: io::Error },
    /// The configuration file is unreadable or invalid
    Config { path: PathBuf, message: String },
}

impl Error {
    /// Kind of the underlying parse error, if any
    pub fn parse_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Parse { error, .. } => Some(error.kind),
            _ => None,
        }
    }

    /// Render the error with source context (no color)
    pub fn render(&self) -> String {
        match self {
            Error::Parse { path, text, error } => error.render(text, &path.display().to_string()),
            other => format!("error: {}\n", other),
        }
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self) -> String {
        match self {
            Error::Parse { path, text, error } => {
                error.render_color(text, &path.display().to_string())
            }
            other => format!("\x1b[1;31merror:\x1b[0m \x1b[1m{}\x1b[0m\n", other),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingInput { path } => write!(f, "{} does not exist", path.display()),
            Error::Read { path, source } => write!(f, "failed to read {}: {}", path.display(), source),
            Error::Parse { path, error, .. } => {
                let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                write!(f, "{}:{}", name, error)
            }
            Error::Write { path, source } => write!(f, "failed to write {}: {}", path.display(), source),
            Error::Config { path, message } => {
                write!(f, "invalid config {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { source, .. } | Error::Write { source, .. } => Some(source),
            Error::Parse { error, .. } => Some(error),
            _ => None,
        }
    }
}
