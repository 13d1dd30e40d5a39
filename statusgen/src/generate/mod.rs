mod naming;
mod output;
mod status_class;

pub use naming::member_name;
pub use output::{Mapping, Output};
pub use status_class::StatusClassGenerator;

use crate::config::{NameStyle, Options};
use crate::table::CodeTable;
use serde::Serialize;

/// Generator options
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub class_name: String,
    pub enum_name: String,
    pub name_style: NameStyle,
    pub license_header: bool,
}

impl From<&Options> for GenerateOptions {
    fn from(options: &Options) -> Self {
        Self {
            class_name: options.target.class_name().to_string(),
            enum_name: options.target.enum_name().to_string(),
            name_style: options.name_style,
            license_header: options.license_header,
        }
    }
}

/// One static member of the generated class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constant {
    /// Enum identifier as declared (`INVALID_TRANSACTION`)
    pub name: String,
    pub number: i64,
    /// Doc comment lines taken from the `.proto` sources
    pub doc: Vec<String>,
    /// Declaration file line (0-indexed)
    #[serde(skip)]
    pub src_line: usize,
}

/// Everything the generator needs
#[derive(Debug, Clone)]
pub struct StatusModel {
    /// identifier → identifier, drives `toString()`
    pub to_string: CodeTable,
    /// code → identifier, drives `_fromCode()`
    pub from_code: CodeTable,
    pub constants: Vec<Constant>,
}

/// Generation result
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub code: String,
    pub mappings: Vec<Mapping>,
}

/// Generator trait - converts the model to code
pub trait Generator {
    fn generate(&self, model: &StatusModel, options: &GenerateOptions) -> GenerateResult;
}
