//! Formatting outcome types.

use serde::{Deserialize, Serialize};

/// Outcome of formatting a single value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "literal", rename_all = "snake_case")]
pub enum Formatted {
    /// A literal ready to be placed in JSON output.
    Representable(String),
    /// The declared type cannot be rendered; the setting belongs in diagnostics.
    Unrepresentable,
}

impl Formatted {
    /// The literal, if any.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Formatted::Representable(s) => Some(s),
            Formatted::Unrepresentable => None,
        }
    }
}

/// Fatal formatting errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// A reserved-namespace type has no rule in the table.
    #[error("Type {type_name} is unhandled: add a rule for it to the type table")]
    UnhandledSystemType { type_name: String },
}
