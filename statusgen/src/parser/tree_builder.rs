use super::tokenizer::{Span, Token};
use crate::ast::*;
use crate::error::{ErrorKind, ParseError};

/// Builds a [`ProtoFile`] from a token stream.
///
/// Only messages, enums and their doc comments are kept. Fields, options,
/// services and the rest of the language are skipped structurally so that
/// braces stay balanced.
pub struct TreeBuilder {
    tokens: Vec<Token>,
    pos: usize,
}

impl TreeBuilder {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn build(&mut self) -> Result<ProtoFile, ParseError> {
        let mut file = ProtoFile::default();

        loop {
            let doc = self.take_doc();
            let token = self.peek().clone();

            match &token {
                Token::Eof { .. } => break,
                Token::Symbol { ch: ';', .. } => {
                    self.advance();
                }
                Token::Ident { name, .. } => match name.as_str() {
                    "message" => {
                        let message = self.parse_message(doc)?;
                        file.messages.push(message);
                    }
                    "enum" => {
                        let parsed = self.parse_enum(doc)?;
                        file.enums.push(parsed);
                    }
                    "package" => {
                        self.advance();
                        file.package = Some(self.dotted_name()?);
                        self.expect_symbol(';')?;
                    }
                    "syntax" | "edition" | "import" | "option" => self.skip_statement()?,
                    "service" | "extend" => self.skip_declaration()?,
                    _ => return Err(unexpected(&token, "a top-level declaration")),
                },
                _ => return Err(unexpected(&token, "a top-level declaration")),
            }
        }

        Ok(file)
    }

    fn peek(&self) -> &Token {
        // The stream always ends with Eof and `advance` never moves past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if !matches!(self.tokens[index], Token::Eof { .. }) {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    fn skip_comments(&mut self) {
        while matches!(self.peek(), Token::LineComment { .. } | Token::DocComment { .. }) {
            self.advance();
        }
    }

    /// Consume the comments in front of a declaration, returning the lines
    /// of the last doc comment among them.
    fn take_doc(&mut self) -> Vec<String> {
        let mut doc = Vec::new();
        loop {
            match self.peek() {
                Token::DocComment { lines, .. } => {
                    doc = lines.clone();
                    self.advance();
                }
                Token::LineComment { .. } => {
                    self.advance();
                }
                _ => return doc,
            }
        }
    }

    fn expect_symbol(&mut self, expected: char) -> Result<Span, ParseError> {
        self.skip_comments();
        match self.peek() {
            Token::Symbol { ch, span } if *ch == expected => {
                let span = *span;
                self.advance();
                Ok(span)
            }
            other => Err(unexpected(other, &format!("'{}'", expected))),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<(String, Span), ParseError> {
        self.skip_comments();
        match self.peek() {
            Token::Ident { name, span } => {
                let result = (name.clone(), *span);
                self.advance();
                Ok(result)
            }
            other => Err(unexpected(other, what)),
        }
    }

    /// `a.b.c`
    fn dotted_name(&mut self) -> Result<String, ParseError> {
        let (mut name, _) = self.expect_ident("a name")?;
        while matches!(self.peek(), Token::Symbol { ch: '.', .. }) {
            self.advance();
            let (part, _) = self.expect_ident("a name")?;
            name.push('.');
            name.push_str(&part);
        }
        Ok(name)
    }

    fn parse_number(&mut self) -> Result<i64, ParseError> {
        self.skip_comments();
        let negative = matches!(self.peek(), Token::Symbol { ch: '-', .. });
        if negative {
            self.advance();
        }

        match self.peek() {
            Token::Number { text, span } => {
                let value = parse_int(text).ok_or_else(|| {
                    ParseError::new(
                        ErrorKind::InvalidNumber,
                        format!("'{}' is not an integer", text),
                        *span,
                    )
                })?;
                self.advance();
                Ok(if negative { -value } else { value })
            }
            other => Err(unexpected(other, "an integer")),
        }
    }

    fn parse_message(&mut self, doc: Vec<String>) -> Result<Message, ParseError> {
        let keyword = self.advance().span();
        let (name, _) = self.expect_ident("a message name")?;
        let open = self.expect_symbol('{')?;

        let mut message = Message {
            name,
            doc,
            messages: Vec::new(),
            enums: Vec::new(),
            span: keyword,
        };

        loop {
            let doc = self.take_doc();
            let token = self.peek().clone();

            match &token {
                Token::Symbol { ch: '}', span } => {
                    self.advance();
                    message.span = Span::new(keyword.start, span.end);
                    return Ok(message);
                }
                Token::Eof { .. } => {
                    return Err(unclosed("message", &message.name, token.span(), open));
                }
                Token::Symbol { ch: ';', .. } => {
                    self.advance();
                }
                Token::Ident { name, .. } => match name.as_str() {
                    "message" => {
                        let nested = self.parse_message(doc)?;
                        message.messages.push(nested);
                    }
                    "enum" => {
                        let nested = self.parse_enum(doc)?;
                        message.enums.push(nested);
                    }
                    "oneof" | "extend" => self.skip_declaration()?,
                    // fields, map<..>, option, reserved, extensions
                    _ => self.skip_statement()?,
                },
                _ => return Err(unexpected(&token, "a field or nested declaration")),
            }
        }
    }

    fn parse_enum(&mut self, doc: Vec<String>) -> Result<Enum, ParseError> {
        let keyword = self.advance().span();
        let (name, _) = self.expect_ident("an enum name")?;
        let open = self.expect_symbol('{')?;

        let mut values = Vec::new();

        loop {
            let value_doc = self.take_doc();
            let token = self.peek().clone();

            match &token {
                Token::Symbol { ch: '}', span } => {
                    self.advance();
                    return Ok(Enum {
                        name,
                        doc,
                        values,
                        span: Span::new(keyword.start, span.end),
                    });
                }
                Token::Eof { .. } => {
                    return Err(unclosed("enum", &name, token.span(), open));
                }
                Token::Symbol { ch: ';', .. } => {
                    self.advance();
                }
                Token::Ident { name: ident, .. } if ident == "option" || ident == "reserved" => {
                    self.skip_statement()?;
                }
                Token::Ident { name: ident, span } => {
                    self.advance();
                    self.expect_symbol('=')?;
                    let number = self.parse_number()?;
                    if matches!(self.peek(), Token::Symbol { ch: '[', .. }) {
                        self.skip_options()?;
                    }
                    let semi = self.expect_symbol(';')?;

                    let mut value_doc = value_doc;
                    let trailing = match self.peek() {
                        Token::LineComment { text, span: comment }
                            if comment.start.line == semi.end.line =>
                        {
                            Some(text.clone())
                        }
                        _ => None,
                    };
                    if let Some(text) = trailing {
                        if value_doc.is_empty() {
                            value_doc = vec![text];
                        }
                        self.advance();
                    }

                    values.push(EnumValue {
                        name: ident.clone(),
                        number,
                        doc: value_doc,
                        span: Span::new(span.start, semi.end),
                    });
                }
                _ => return Err(unexpected(&token, "an enum value")),
            }
        }
    }

    /// Skip a `[ ... ]` option list, leaving the terminating `;` in place
    fn skip_options(&mut self) -> Result<(), ParseError> {
        let open = self.advance().span();
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                Token::Symbol { ch: '[', .. } => depth += 1,
                Token::Symbol { ch: ']', .. } => depth -= 1,
                Token::Eof { position } => {
                    return Err(ParseError::new(
                        ErrorKind::UnclosedBlock,
                        "This option list is never closed.",
                        Span::point(*position),
                    )
                    .with_related(open)
                    .with_help("Close with ']'"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Skip tokens up to and including the `;` that ends the statement.
    ///
    /// A statement whose body is a brace block (proto2 groups) ends at the
    /// closing brace instead.
    fn skip_statement(&mut self) -> Result<(), ParseError> {
        let start = self.peek().span();
        let mut depth = 0usize;

        loop {
            let token = self.peek().clone();
            match &token {
                Token::Eof { .. } => {
                    return Err(ParseError::new(
                        ErrorKind::UnexpectedToken,
                        "Statement is never terminated.",
                        token.span(),
                    )
                    .with_related(start)
                    .with_related_label("statement starts here")
                    .with_help("End the statement with ';'"));
                }
                Token::Symbol { ch: ';', .. } if depth == 0 => {
                    self.advance();
                    return Ok(());
                }
                Token::Symbol { ch: '}', .. } if depth == 0 => {
                    return Err(unexpected(&token, "';'"));
                }
                Token::Symbol { ch: '{' | '[' | '(' | '<', .. } => {
                    depth += 1;
                    self.advance();
                }
                Token::Symbol { ch: '}', .. } => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Token::Symbol { ch: ']' | ')' | '>', .. } => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip `keyword name ... { ... }` including nested braces
    fn skip_declaration(&mut self) -> Result<(), ParseError> {
        let keyword = self.advance().clone();

        loop {
            match self.advance() {
                Token::Symbol { ch: '{', .. } => break,
                Token::Eof { position } => {
                    return Err(unexpected(&Token::Eof { position: *position }, "'{'"));
                }
                _ => {}
            }
        }

        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                Token::Symbol { ch: '{', .. } => depth += 1,
                Token::Symbol { ch: '}', .. } => depth -= 1,
                Token::Eof { position } => {
                    let keyword_name = match &keyword {
                        Token::Ident { name, .. } => name.clone(),
                        other => other.describe(),
                    };
                    return Err(ParseError::new(
                        ErrorKind::UnclosedBlock,
                        format!("This '{}' block is never closed.", keyword_name),
                        Span::point(*position),
                    )
                    .with_related(keyword.span())
                    .with_help("Close with '}'"));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Parse a `.proto` integer literal: decimal, `0x` hex or leading-zero octal
pub fn parse_int(text: &str) -> Option<i64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else if text.len() > 1 && text.starts_with('0') {
        i64::from_str_radix(&text[1..], 8).ok()
    } else {
        text.parse().ok()
    }
}

fn unexpected(token: &Token, expected: &str) -> ParseError {
    ParseError::new(
        ErrorKind::UnexpectedToken,
        format!("Expected {}, found {}.", expected, token.describe()),
        token.span(),
    )
}

fn unclosed(keyword: &str, name: &str, at: Span, open: Span) -> ParseError {
    ParseError::new(
        ErrorKind::UnclosedBlock,
        format!("This '{} {}' block is never closed.", keyword, name),
        at,
    )
    .with_related(open)
    .with_help("Close with '}'")
}
