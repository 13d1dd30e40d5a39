use crate::error::Error;
use crate::table::DuplicatePolicy;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which enum is scraped and which class is generated from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// `ResponseCodeEnum` → `Status`
    #[default]
    Status,
    /// `HederaFunctionality` → `RequestType`
    RequestType,
}

impl Target {
    pub fn enum_name(&self) -> &'static str {
        match self {
            Target::Status => "ResponseCodeEnum",
            Target::RequestType => "HederaFunctionality",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Target::Status => "Status",
            Target::RequestType => "RequestType",
        }
    }

    /// Line marker that opens the enum block in the declaration file
    pub fn start_marker(&self) -> String {
        format!("enum {} {{", self.enum_name())
    }
}

/// How generated member names are spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NameStyle {
    /// `INVALID_TRANSACTION` → `InvalidTransaction`
    #[default]
    Pascal,
    /// Identifier kept as written
    Raw,
}

/// Configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Directory holding the `*.proto` sources
    pub proto_dir: PathBuf,
    /// Generated type-declaration file holding the enum
    pub declarations: PathBuf,
    /// File the generated class is written to
    pub output: PathBuf,
    pub target: Target,
    pub name_style: NameStyle,
    pub duplicates: DuplicatePolicy,
    /// Emit the license comment at the top of the output
    pub license_header: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            proto_dir: PathBuf::from("packages/proto/src/proto/services"),
            declarations: PathBuf::from("packages/proto/src/proto.d.ts"),
            output: PathBuf::from("StatusCodes"),
            target: Target::default(),
            name_style: NameStyle::default(),
            duplicates: DuplicatePolicy::default(),
            license_header: true,
        }
    }
}

impl Options {
    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Resolve relative input and output paths against `base`
    pub fn relative_to(mut self, base: &Path) -> Self {
        for path in [&mut self.proto_dir, &mut self.declarations, &mut self.output] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}
