use crate::config::NameStyle;
use convert_case::{Case, Casing};

/// Member name used for an enum identifier in the generated class.
///
/// Identifiers that already contain lowercase letters (`CryptoTransfer`) are
/// kept; screaming-snake identifiers are converted word by word, splitting on
/// underscores only.
pub fn member_name(ident: &str, style: NameStyle) -> String {
    match style {
        NameStyle::Raw => ident.to_string(),
        NameStyle::Pascal if ident.chars().any(|c| c.is_ascii_lowercase()) => ident.to_string(),
        NameStyle::Pascal => ident.from_case(Case::UpperSnake).to_case(Case::Pascal),
    }
}
