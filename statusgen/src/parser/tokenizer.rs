use crate::error::{ErrorKind, ParseError};
use serde::Serialize;

/// Position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    /// Byte offset in source
    pub byte: usize,
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters)
    pub col: usize,
}

impl Position {
    pub fn new() -> Self {
        Self { byte: 0, line: 0, col: 0 }
    }
}

/// Span in source code (a range from start position to end position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Empty span at a single position
    pub fn point(position: Position) -> Self {
        Self { start: position, end: position }
    }
}

/// Tokens of the `.proto` definition language
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier or keyword: message, enum, OK, int32
    Ident { name: String, span: Span },
    /// Numeric literal, kept verbatim (decimal, hex, octal or float)
    Number { text: String, span: Span },
    /// Quoted string literal, quotes removed
    Str { value: String, span: Span },
    /// Single punctuation character: { } = ; [ ] ( ) < > , . -
    Symbol { ch: char, span: Span },
    /// `/** ... */` block, one entry per content line
    DocComment { lines: Vec<String>, span: Span },
    /// `// ...` comment, text after the slashes
    LineComment { text: String, span: Span },
    /// End of file
    Eof { position: Position },
}

impl Token {
    pub fn span(&self) -> Span {
        match self {
            Token::Ident { span, .. } => *span,
            Token::Number { span, .. } => *span,
            Token::Str { span, .. } => *span,
            Token::Symbol { span, .. } => *span,
            Token::DocComment { span, .. } => *span,
            Token::LineComment { span, .. } => *span,
            Token::Eof { position } => Span::point(*position),
        }
    }

    /// Short human-readable description for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Ident { name, .. } => format!("'{}'", name),
            Token::Number { text, .. } => format!("number {}", text),
            Token::Str { value, .. } => format!("string \"{}\"", value),
            Token::Symbol { ch, .. } => format!("'{}'", ch),
            Token::DocComment { .. } => "doc comment".to_string(),
            Token::LineComment { .. } => "comment".to_string(),
            Token::Eof { .. } => "end of file".to_string(),
        }
    }
}

/// Tokenizer for `.proto` source files
pub struct Tokenizer<'a> {
    source: &'a str,
    position: Position,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: Position::new(),
        }
    }

    /// Tokenize the entire source
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else { break };

            let token = match ch {
                '/' if self.peek_at(1) == Some('/') => self.line_comment(),
                '/' if self.peek_at(1) == Some('*') => match self.block_comment()? {
                    Some(doc) => doc,
                    None => continue,
                },
                '"' | '\'' => self.string(ch)?,
                c if c.is_ascii_alphabetic() || c == '_' => self.ident(),
                c if c.is_ascii_digit() => self.number(),
                _ => {
                    let start = self.position;
                    self.advance();
                    Token::Symbol { ch, span: Span::new(start, self.position) }
                }
            };
            tokens.push(token);
        }

        tokens.push(Token::Eof { position: self.position });
        Ok(tokens)
    }

    fn rest(&self) -> &'a str {
        let source = self.source;
        &source[self.position.byte..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position.byte += ch.len_utf8();
        if ch == '\n' {
            self.position.line += 1;
            self.position.col = 0;
        } else {
            self.position.col += 1;
        }
        Some(ch)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let source = self.source;
        let start = self.position.byte;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.advance();
        }
        &source[start..self.position.byte]
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(char::is_whitespace);
    }

    fn ident(&mut self) -> Token {
        let start = self.position;
        let name = self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        Token::Ident {
            name: name.to_string(),
            span: Span::new(start, self.position),
        }
    }

    fn number(&mut self) -> Token {
        let start = self.position;
        let text = self.advance_while(|c| c.is_ascii_alphanumeric() || c == '.');
        Token::Number {
            text: text.to_string(),
            span: Span::new(start, self.position),
        }
    }

    fn string(&mut self, quote: char) -> Result<Token, ParseError> {
        let start = self.position;
        self.advance();
        let mut value = String::new();

        loop {
            match self.advance() {
                Some(c) if c == quote => break,
                Some('\\') => {
                    if let Some(escaped) = self.advance() {
                        value.push(escaped);
                    }
                }
                Some('\n') | None => {
                    return Err(ParseError::new(
                        ErrorKind::UnexpectedToken,
                        "String literal is never closed",
                        Span::new(start, self.position),
                    )
                    .with_help(format!("Close the string with {}", quote)));
                }
                Some(c) => value.push(c),
            }
        }

        Ok(Token::Str {
            value,
            span: Span::new(start, self.position),
        })
    }

    fn line_comment(&mut self) -> Token {
        let start = self.position;
        let text = self.advance_while(|c| c != '\n');
        Token::LineComment {
            text: text.trim_start_matches('/').trim().to_string(),
            span: Span::new(start, self.position),
        }
    }

    /// Consume a `/* */` comment. Only `/** */` blocks produce a token.
    fn block_comment(&mut self) -> Result<Option<Token>, ParseError> {
        let start = self.position;
        let is_doc = self.rest().starts_with("/**") && !self.rest().starts_with("/**/");
        self.advance();
        self.advance();

        let body_start = self.position.byte;
        loop {
            if self.rest().starts_with("*/") {
                break;
            }
            if self.advance().is_none() {
                return Err(ParseError::new(
                    ErrorKind::UnterminatedComment,
                    "Comment is never closed",
                    Span::new(start, self.position),
                )
                .with_related(Span::new(start, start))
                .with_help("Close the comment with '*/'"));
            }
        }
        let source = self.source;
        let body = &source[body_start..self.position.byte];
        self.advance();
        self.advance();

        if !is_doc {
            return Ok(None);
        }

        Ok(Some(Token::DocComment {
            lines: doc_lines(body),
            span: Span::new(start, self.position),
        }))
    }
}

/// Strip the leading `*` decoration from each line of a doc comment body and
/// drop blank lines at either end.
pub fn doc_lines(body: &str) -> Vec<String> {
    let mut lines: Vec<String> = body
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.trim().to_string()
        })
        .collect();

    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Tokenize `.proto` source
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Tokenizer::new(source).tokenize()
}
