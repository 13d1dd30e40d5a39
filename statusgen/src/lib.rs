//! Generates status-code classes from protocol-buffer enums.
//!
//! The enum values are scraped from a generated type-declaration file
//! (`proto.d.ts`) and documented from the `.proto` sources; the result is a
//! JavaScript class whose `toString()` and `_fromCode()` switch over every
//! value.
//!
//! ```no_run
//! use statusgen::{Options, Pipeline};
//!
//! let generated = Pipeline::new(Options::default()).generate()?;
//! println!("{} constants", generated.constants.len());
//! # Ok::<(), statusgen::Error>(())
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod generate;
pub mod parser;
pub mod pipeline;
pub mod table;

pub use ast::{Enum, EnumValue, Message, ProtoFile};
pub use config::{NameStyle, Options, Target};
pub use error::{Error, ErrorKind, ParseError};
pub use generate::{Constant, GenerateOptions, Generator, StatusClassGenerator, StatusModel};
pub use parser::{BlockScanner, Parser, ProtoParser, ScannedBlock};
pub use pipeline::{Drift, Generated, Pipeline, Source, discover_protos, message_docs};
pub use table::{CodeTable, DuplicatePolicy, EnumEntry, KeyColumn, derive_pairs, parse_entries, parse_entry};

/// Parse `.proto` source text
pub fn parse_proto(source: &str) -> Result<ProtoFile, ParseError> {
    ProtoParser::new().parse(source)
}
