use serde::Serialize;
use std::path::PathBuf;

pub use crate::parser::tokenizer::{Position, Span};

/// One parsed `.proto` file
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProtoFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    pub messages: Vec<Message>,
    pub enums: Vec<Enum>,
}

impl ProtoFile {
    /// Find an enum by name, searching nested messages too
    pub fn find_enum(&self, name: &str) -> Option<&Enum> {
        self.enums
            .iter()
            .find(|e| e.name == name)
            .or_else(|| self.messages.iter().find_map(|m| m.find_enum(name)))
    }

    /// Every message in the file, pre-order, with its dotted path
    pub fn all_messages(&self) -> Vec<(String, &Message)> {
        let mut out = Vec::new();
        for message in &self.messages {
            message.collect(None, &mut out);
        }
        out
    }
}

/// `message Name { ... }`
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub name: String,
    pub doc: Vec<String>,
    pub messages: Vec<Message>,
    pub enums: Vec<Enum>,
    #[serde(skip)]
    pub span: Span,
}

impl Message {
    fn find_enum(&self, name: &str) -> Option<&Enum> {
        self.enums
            .iter()
            .find(|e| e.name == name)
            .or_else(|| self.messages.iter().find_map(|m| m.find_enum(name)))
    }

    fn collect<'a>(&'a self, parent: Option<&str>, out: &mut Vec<(String, &'a Message)>) {
        let path = match parent {
            Some(parent) => format!("{}.{}", parent, self.name),
            None => self.name.clone(),
        };
        out.push((path.clone(), self));
        for nested in &self.messages {
            nested.collect(Some(&path), out);
        }
    }
}

/// `enum Name { ... }`
#[derive(Debug, Clone, Serialize)]
pub struct Enum {
    pub name: String,
    pub doc: Vec<String>,
    pub values: Vec<EnumValue>,
    #[serde(skip)]
    pub span: Span,
}

/// `NAME = 3;` inside an enum
#[derive(Debug, Clone, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i64,
    pub doc: Vec<String>,
    #[serde(skip)]
    pub span: Span,
}
