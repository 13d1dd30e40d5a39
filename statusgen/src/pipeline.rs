use crate::ast::ProtoFile;
use crate::config::Options;
use crate::error::{Error, ParseError};
use crate::generate::{Constant, GenerateOptions, Generator, Mapping, StatusClassGenerator, StatusModel};
use crate::parser::{BlockScanner, Parser, ProtoParser};
use crate::table::{KeyColumn, derive_pairs, parse_entries};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A file read into memory
#[derive(Debug, Clone)]
pub struct Source {
    pub path: PathBuf,
    pub text: Arc<str>,
}

impl Source {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a file, distinguishing a missing path from an unreadable one
    pub fn read(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::MissingInput { path: path.to_path_buf() });
        }
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, text))
    }

    /// Attach this file to a parse error
    pub fn error(&self, error: ParseError) -> Error {
        Error::Parse {
            path: self.path.clone(),
            text: self.text.clone(),
            error,
        }
    }
}

/// Enum value names found in only one of the two sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Drift {
    pub missing_in_proto: Vec<String>,
    pub missing_in_declarations: Vec<String>,
}

impl Drift {
    pub fn is_empty(&self) -> bool {
        self.missing_in_proto.is_empty() && self.missing_in_declarations.is_empty()
    }
}

/// Result of one run, before or after it is written
#[derive(Debug, Clone, Serialize)]
pub struct Generated {
    #[serde(skip)]
    pub code: String,
    pub output: PathBuf,
    pub class_name: String,
    pub proto_files: usize,
    pub constants: Vec<Constant>,
    /// Constants that received a doc comment from the `.proto` sources
    pub documented: usize,
    /// `None` when the enum is not defined in any `.proto` source
    pub drift: Option<Drift>,
    pub mappings: Vec<Mapping>,
}

/// The scrape → derive → template pipeline
pub struct Pipeline {
    options: Options,
    parser: ProtoParser,
    generator: StatusClassGenerator,
}

impl Pipeline {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            parser: ProtoParser::new(),
            generator: StatusClassGenerator::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Read every input and generate the output text without writing it
    pub fn run(&self) -> Result<Generated, Error> {
        info!(path = %self.options.declarations.display(), "reading declarations");
        let declarations = Source::read(&self.options.declarations)?;
        let protos = self.load_protos()?;
        self.compile(&declarations, &protos)
    }

    /// Run and write the output file
    pub fn generate(&self) -> Result<Generated, Error> {
        let generated = self.run()?;
        self.write(&generated)?;
        Ok(generated)
    }

    /// Write the generated text in one go, truncating any previous output
    pub fn write(&self, generated: &Generated) -> Result<(), Error> {
        fs::write(&generated.output, &generated.code).map_err(|source| Error::Write {
            path: generated.output.clone(),
            source,
        })?;
        info!(path = %generated.output.display(), bytes = generated.code.len(), "wrote output");
        Ok(())
    }

    /// Parse every `*.proto` file in the configured directory
    pub fn load_protos(&self) -> Result<Vec<ProtoFile>, Error> {
        discover_protos(&self.options.proto_dir)?
            .iter()
            .map(|path| self.parse_proto_file(path))
            .collect()
    }

    pub fn parse_proto_file(&self, path: &Path) -> Result<ProtoFile, Error> {
        let source = Source::read(path)?;
        let mut file = self.parser.parse(&source.text).map_err(|e| source.error(e))?;
        debug!(
            path = %path.display(),
            messages = file.messages.len(),
            enums = file.enums.len(),
            "parsed proto"
        );
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Generate from in-memory inputs
    pub fn compile(&self, declarations: &Source, protos: &[ProtoFile]) -> Result<Generated, Error> {
        let options = &self.options;
        let enum_name = options.target.enum_name();
        let marker = options.target.start_marker();

        let block = BlockScanner::for_enum(&marker)
            .scan_one(&declarations.text)
            .map_err(|e| declarations.error(e))?;
        let entries = parse_entries(&block).map_err(|e| declarations.error(e))?;
        if entries.is_empty() {
            warn!(enum_name, "enum block is empty");
        }

        let to_string = derive_pairs(&entries, KeyColumn::Name, options.duplicates)
            .map_err(|e| declarations.error(e))?;
        let from_code = derive_pairs(&entries, KeyColumn::Code, options.duplicates)
            .map_err(|e| declarations.error(e))?;

        let proto_enum = protos.iter().find_map(|p| p.find_enum(enum_name));
        let docs: IndexMap<&str, &[String]> = proto_enum
            .map(|e| {
                e.values
                    .iter()
                    .map(|v| (v.name.as_str(), v.doc.as_slice()))
                    .collect()
            })
            .unwrap_or_default();

        let mut constants: IndexMap<&str, Constant> = IndexMap::new();
        for entry in &entries {
            let constant = Constant {
                name: entry.name.clone(),
                number: entry.number,
                doc: docs.get(entry.name.as_str()).map(|d| d.to_vec()).unwrap_or_default(),
                src_line: entry.span.start.line,
            };
            // Duplicates only get here under last-write-wins
            constants.insert(entry.name.as_str(), constant);
        }
        let constants: Vec<Constant> = constants.into_values().collect();
        let documented = constants.iter().filter(|c| !c.doc.is_empty()).count();

        let drift = proto_enum.map(|e| {
            let drift = compare_names(
                constants.iter().map(|c| c.name.as_str()),
                e.values.iter().map(|v| v.name.as_str()),
            );
            for name in &drift.missing_in_proto {
                warn!(enum_name, name = %name, "value declared but not found in .proto sources");
            }
            for name in &drift.missing_in_declarations {
                warn!(enum_name, name = %name, "value defined in .proto sources but not declared");
            }
            drift
        });
        if drift.is_none() && !protos.is_empty() {
            warn!(enum_name, "enum not found in .proto sources, constants are undocumented");
        }

        let model = StatusModel {
            to_string,
            from_code,
            constants,
        };
        let result = self.generator.generate(&model, &GenerateOptions::from(options));

        info!(
            class = options.target.class_name(),
            constants = model.constants.len(),
            documented,
            "generated"
        );

        Ok(Generated {
            code: result.code,
            output: options.output.clone(),
            class_name: options.target.class_name().to_string(),
            proto_files: protos.len(),
            constants: model.constants,
            documented,
            drift,
            mappings: result.mappings,
        })
    }
}

/// `*.proto` files directly inside `dir`, in file-name order
pub fn discover_protos(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    if !dir.is_dir() {
        return Err(Error::MissingInput { path: dir.to_path_buf() });
    }

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "proto"))
        .map(|e| e.into_path())
        .collect();

    info!(dir = %dir.display(), count = files.len(), "found proto files");
    Ok(files)
}

/// Doc comment of every message, keyed by its dotted name
pub fn message_docs(protos: &[ProtoFile]) -> IndexMap<String, Vec<String>> {
    let mut docs = IndexMap::new();
    for file in protos {
        for (name, message) in file.all_messages() {
            if !message.doc.is_empty() {
                docs.insert(name, message.doc.clone());
            }
        }
    }
    docs
}

fn compare_names<'a>(
    declared: impl Iterator<Item = &'a str>,
    defined: impl Iterator<Item = &'a str>,
) -> Drift {
    let declared: Vec<&str> = declared.collect();
    let defined: Vec<&str> = defined.collect();
    let declared_set: HashSet<&str> = declared.iter().copied().collect();
    let defined_set: HashSet<&str> = defined.iter().copied().collect();

    Drift {
        missing_in_proto: declared
            .iter()
            .filter(|n| !defined_set.contains(*n))
            .map(|n| n.to_string())
            .collect(),
        missing_in_declarations: defined
            .iter()
            .filter(|n| !declared_set.contains(*n))
            .map(|n| n.to_string())
            .collect(),
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
