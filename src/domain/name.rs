//! Name Validation
//!
//! Tag and value names double as tokens of the query language and as path
//! segments of the virtual filesystem, so some names and characters are
//! reserved. Every create or rename goes through here; reads never do.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_general_category::{get_general_category, GeneralCategory};

use super::entity::{DomainError, DomainResult};

/// Which entity a name belongs to. Only tags reserve a leading minus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameKind {
    Tag,
    Value,
}

impl NameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameKind::Tag => "tag",
            NameKind::Value => "value",
        }
    }
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const LOGICAL_OPERATORS: [&str; 3] = ["and", "or", "not"];
const COMPARISON_OPERATORS: [&str; 6] = ["eq", "ne", "lt", "gt", "le", "ge"];

/// Validate a tag name
pub fn validate_tag_name(name: &str) -> DomainResult<()> {
    validate(NameKind::Tag, name)
}

/// Validate a value name
pub fn validate_value_name(name: &str) -> DomainResult<()> {
    validate(NameKind::Value, name)
}

/// Check `name` against the reserved tokens and characters for `kind`.
pub fn validate(kind: NameKind, name: &str) -> DomainResult<()> {
    match reason_invalid(kind, name) {
        Some(reason) => Err(DomainError::InvalidName { kind, reason }),
        None => Ok(()),
    }
}

fn reason_invalid(kind: NameKind, name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("cannot be empty".into());
    }

    // Path segments in the VFS
    if name == "." || name == ".." {
        return Some("cannot be '.' or '..'".into());
    }

    if LOGICAL_OPERATORS.iter().any(|op| name.eq_ignore_ascii_case(op)) {
        return Some("cannot be a logical operator: 'and', 'or' or 'not'".into());
    }

    if COMPARISON_OPERATORS.iter().any(|op| name.eq_ignore_ascii_case(op)) {
        return Some(
            "cannot be a comparison operator: 'eq', 'ne', 'lt', 'gt', 'le' or 'ge'".into(),
        );
    }

    // Negation prefix in queries
    if kind == NameKind::Tag && name.starts_with('-') {
        return Some("cannot start with a minus: '-'".into());
    }

    name.chars().find_map(reason_invalid_char)
}

fn reason_invalid_char(ch: char) -> Option<String> {
    let reason = match ch {
        '(' | ')' => "cannot contain parentheses: '(' or ')'",
        ',' => "cannot contain comma: ','",
        '=' | '!' | '<' | '>' => "cannot contain a comparison operator: '=', '!', '<' or '>'",
        ' ' | '\t' => "cannot contain space or tab",
        '/' => "cannot contain slash: '/'",
        _ if is_permitted_class(ch) => return None,
        _ => return Some(format!("cannot contain '{}'", ch.escape_debug())),
    };
    Some(reason.into())
}

/// Letters, numbers, punctuation and symbols; everything else (separators,
/// controls, marks, unassigned code points) is rejected.
fn is_permitted_class(ch: char) -> bool {
    use GeneralCategory as Gc;

    matches!(
        get_general_category(ch),
        Gc::UppercaseLetter
            | Gc::LowercaseLetter
            | Gc::TitlecaseLetter
            | Gc::ModifierLetter
            | Gc::OtherLetter
            | Gc::DecimalNumber
            | Gc::LetterNumber
            | Gc::OtherNumber
            | Gc::ConnectorPunctuation
            | Gc::DashPunctuation
            | Gc::OpenPunctuation
            | Gc::ClosePunctuation
            | Gc::InitialPunctuation
            | Gc::FinalPunctuation
            | Gc::OtherPunctuation
            | Gc::MathSymbol
            | Gc::CurrencySymbol
            | Gc::ModifierSymbol
            | Gc::OtherSymbol
    )
}
