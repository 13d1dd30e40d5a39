pub mod scanner;
pub mod tokenizer;
mod tree_builder;

pub use scanner::{BlockScanner, ScannedBlock, ScannedLine};
pub use tokenizer::{Position, Span, Token, tokenize};
pub use tree_builder::parse_int;
use tree_builder::TreeBuilder;

use crate::ast::ProtoFile;
use crate::error::ParseError;

/// Parser trait - converts source code to AST
pub trait Parser {
    fn parse(&self, source: &str) -> Result<ProtoFile, ParseError>;
}

/// Parser for the message/enum subset of `.proto` files
pub struct ProtoParser {
    // Configuration only, no state
}

impl ProtoParser {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ProtoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for ProtoParser {
    fn parse(&self, source: &str) -> Result<ProtoFile, ParseError> {
        let tokens = tokenize(source)?;
        let mut builder = TreeBuilder::new(tokens);
        builder.build()
    }
}
