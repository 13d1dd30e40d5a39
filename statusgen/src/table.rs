//! Identifier/code pairs derived from captured enum lines.
//!
//! A captured line has the column layout `NAME = CODE` where CODE may carry a
//! single trailing `,` (type declarations) or `;` (proto sources).

use crate::error::{ErrorKind, ParseError};
use crate::parser::scanner::{ScannedBlock, ScannedLine};
use crate::parser::tokenizer::{Position, Span};
use crate::parser::parse_int;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One `NAME = CODE` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumEntry {
    pub name: String,
    /// Code text with the trailing delimiter removed
    pub code: String,
    pub number: i64,
    #[serde(skip)]
    pub span: Span,
}

/// Which column keys a [`CodeTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyColumn {
    /// Column 0, the identifier
    Name,
    /// Column 2, the numeric code
    Code,
}

/// What to do when two entries produce the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    /// Later entries replace the value of earlier ones, keeping the first position
    LastWriteWins,
}

/// Remove one trailing `,` or `;`
pub fn strip_delimiter(token: &str) -> &str {
    token
        .strip_suffix(',')
        .or_else(|| token.strip_suffix(';'))
        .unwrap_or(token)
}

fn is_comment(text: &str) -> bool {
    text.starts_with("//") || text.starts_with("/*") || text.starts_with('*')
}

/// Whitespace-separated fields with their character offsets
fn fields(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    let mut col = 0;

    for (byte, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some((b, c)) = start.take() {
                out.push((c, &text[b..byte]));
            }
        } else if start.is_none() {
            start = Some((byte, col));
        }
        col += 1;
    }
    if let Some((b, c)) = start {
        out.push((c, &text[b..]));
    }
    out
}

fn field_span(line: &ScannedLine, col: usize, field: &str) -> Span {
    let start = line.span.start;
    let prefix_bytes: usize = line.text.chars().take(col).map(char::len_utf8).sum();
    Span::new(
        Position {
            byte: start.byte + prefix_bytes,
            line: start.line,
            col: start.col + col,
        },
        Position {
            byte: start.byte + prefix_bytes + field.len(),
            line: start.line,
            col: start.col + col + field.chars().count(),
        },
    )
}

/// Parse one captured line. Blank and comment lines yield `None`.
pub fn parse_entry(line: &ScannedLine) -> Result<Option<EnumEntry>, ParseError> {
    let text = line.text.as_str();
    if text.is_empty() || is_comment(text) {
        return Ok(None);
    }

    let fields = fields(text);
    if fields.len() < 3 {
        return Err(ParseError::new(
            ErrorKind::MalformedLine,
            format!(
                "Expected 'NAME = CODE', found {} field{}.",
                fields.len(),
                if fields.len() == 1 { "" } else { "s" }
            ),
            line.span,
        )
        .with_help("Each enum line needs a name, '=' and a code, separated by spaces"));
    }

    let (_, name) = fields[0];
    let (eq_col, eq) = fields[1];
    if eq != "=" {
        return Err(ParseError::new(
            ErrorKind::MalformedLine,
            format!("Expected '=' after '{}', found '{}'.", name, eq),
            field_span(line, eq_col, eq),
        ));
    }

    if let Some(&(extra_col, extra)) = fields.get(3) {
        if !is_comment(extra) {
            return Err(ParseError::new(
                ErrorKind::MalformedLine,
                format!("Unexpected '{}' after the code.", extra),
                field_span(line, extra_col, extra),
            ));
        }
    }

    let (code_col, raw_code) = fields[2];
    let code = strip_delimiter(raw_code);
    let number = parse_int(code).ok_or_else(|| {
        ParseError::new(
            ErrorKind::InvalidNumber,
            format!("'{}' is not an integer code.", raw_code),
            field_span(line, code_col, raw_code),
        )
    })?;

    Ok(Some(EnumEntry {
        name: name.to_string(),
        code: code.to_string(),
        number,
        span: line.span,
    }))
}

/// Parse every captured line of a block
pub fn parse_entries(block: &ScannedBlock) -> Result<Vec<EnumEntry>, ParseError> {
    let mut entries = Vec::with_capacity(block.lines.len());
    for line in &block.lines {
        if let Some(entry) = parse_entry(line)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Insertion-ordered key → identifier table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    column: KeyColumn,
    pairs: IndexMap<String, String>,
}

impl CodeTable {
    pub fn column(&self) -> KeyColumn {
        self.column
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Build a table keyed by `column`, valued by the identifier.
///
/// Code keys are the decimal rendering of the parsed number.
pub fn derive_pairs(
    entries: &[EnumEntry],
    column: KeyColumn,
    policy: DuplicatePolicy,
) -> Result<CodeTable, ParseError> {
    let mut pairs: IndexMap<String, String> = IndexMap::with_capacity(entries.len());
    let mut first_seen: IndexMap<String, Span> = IndexMap::new();

    for entry in entries {
        // Codes are keyed by value so `1`, `0x1` and `01` collide
        let key = match column {
            KeyColumn::Name => entry.name.clone(),
            KeyColumn::Code => entry.number.to_string(),
        };

        if let Some(previous) = first_seen.get(&key) {
            match policy {
                DuplicatePolicy::Reject => {
                    return Err(ParseError::new(
                        ErrorKind::DuplicateKey,
                        format!("'{}' is defined more than once.", key),
                        entry.span,
                    )
                    .with_related(*previous)
                    .with_related_label("first defined here")
                    .with_help("Remove the duplicate or allow duplicates (last one wins)"));
                }
                DuplicatePolicy::LastWriteWins => {
                    debug!(key = %key, replaced_by = %entry.name, "duplicate key, last write wins");
                }
            }
        } else {
            first_seen.insert(key.clone(), entry.span);
        }

        pairs.insert(key, entry.name.clone());
    }

    Ok(CodeTable { column, pairs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scanner::BlockScanner;

    fn line(text: &str) -> ScannedLine {
        ScannedLine {
            text: text.trim().to_string(),
            span: Span::default(),
        }
    }

    fn entries(source: &str) -> Vec<EnumEntry> {
        let block = BlockScanner::for_enum("enum E {").scan_one(source).unwrap();
        parse_entries(&block).unwrap()
    }

    #[test]
    fn test_proto_line() {
        let entry = parse_entry(&line("  SUCCESS = 22;")).unwrap().unwrap();
        assert_eq!((entry.name.as_str(), entry.code.as_str()), ("SUCCESS", "22"));
        assert_eq!(entry.number, 22);
    }

    #[test]
    fn test_declaration_line() {
        let entry = parse_entry(&line("INVALID_TRANSACTION = 1,")).unwrap().unwrap();
        assert_eq!(entry.code, "1");
    }

    #[test]
    fn test_last_line_without_delimiter() {
        let entry = parse_entry(&line("SUCCESS = 22")).unwrap().unwrap();
        assert_eq!(entry.code, "22");
    }

    #[test]
    fn test_trailing_comment_allowed() {
        let entry = parse_entry(&line("CryptoTransfer = 1; // crypto transfer"))
            .unwrap()
            .unwrap();
        assert_eq!(entry.number, 1);
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        assert_eq!(parse_entry(&line("")).unwrap(), None);
        assert_eq!(parse_entry(&line("/** OK value */")).unwrap(), None);
        assert_eq!(parse_entry(&line("* continued")).unwrap(), None);
    }

    #[test]
    fn test_too_few_fields() {
        let err = parse_entry(&line("SUCCESS=22;")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedLine);
        assert!(err.message.contains("found 1 field."));
    }

    #[test]
    fn test_missing_equals() {
        let err = parse_entry(&line("SUCCESS : 22")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedLine);
        assert_eq!(err.span.start.col, 8);
    }

    #[test]
    fn test_non_numeric_code() {
        let err = parse_entry(&line("SUCCESS = twenty;")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumber);
        assert_eq!(err.span.start.col, 10);
        assert_eq!(err.span.end.col, 17);
    }

    #[test]
    fn test_only_one_delimiter_removed() {
        let err = parse_entry(&line("SUCCESS = 22;;")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumber);
    }

    #[test]
    fn test_tables_keep_insertion_order() {
        let entries = entries("enum E {\n  B = 2,\n  A = 1,\n  C = 3\n}\n");

        let by_name = derive_pairs(&entries, KeyColumn::Name, DuplicatePolicy::Reject).unwrap();
        let names: Vec<_> = by_name.iter().collect();
        assert_eq!(names, vec![("B", "B"), ("A", "A"), ("C", "C")]);

        let by_code = derive_pairs(&entries, KeyColumn::Code, DuplicatePolicy::Reject).unwrap();
        let codes: Vec<_> = by_code.iter().collect();
        assert_eq!(codes, vec![("2", "B"), ("1", "A"), ("3", "C")]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let entries = entries("enum E {\n  A = 1,\n  B = 1\n}\n");
        let err = derive_pairs(&entries, KeyColumn::Code, DuplicatePolicy::Reject).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateKey);
        assert_eq!(err.span.start.line, 2);
        assert_eq!(err.related_span.unwrap().start.line, 1);
    }

    #[test]
    fn test_codes_compare_by_value() {
        let entries = entries("enum E {\n  A = 1,\n  B = 0x1\n}\n");
        let err = derive_pairs(&entries, KeyColumn::Code, DuplicatePolicy::Reject).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateKey);
        assert_eq!(err.message, "'1' is defined more than once.");
    }

    #[test]
    fn test_code_keys_are_decimal() {
        let entries = entries("enum E {\n  A = 0x10,\n  B = 010,\n  C = 7\n}\n");
        let table = derive_pairs(&entries, KeyColumn::Code, DuplicatePolicy::Reject).unwrap();
        let codes: Vec<_> = table.iter().collect();
        assert_eq!(codes, vec![("16", "A"), ("8", "B"), ("7", "C")]);
    }

    #[test]
    fn test_duplicate_last_write_wins_keeps_position() {
        let entries = entries("enum E {\n  A = 1,\n  B = 2,\n  C = 1\n}\n");
        let table = derive_pairs(&entries, KeyColumn::Code, DuplicatePolicy::LastWriteWins).unwrap();
        let codes: Vec<_> = table.iter().collect();
        assert_eq!(codes, vec![("1", "C"), ("2", "B")]);
    }
}
