//! Type table: declared type name -> formatting rule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Namespace reserved for platform types unless configured otherwise.
pub const DEFAULT_RESERVED_NAMESPACE: &str = "System";

/// Built-in rules for the platform's own types.
const BUILTIN_RULES: &[(&str, FormatRule)] = &[
    ("System.String", FormatRule::Quoted),
    ("System.Char", FormatRule::Quoted),
    ("System.TimeSpan", FormatRule::Quoted),
    ("System.Guid", FormatRule::Quoted),
    ("System.DateTime", FormatRule::Quoted),
    ("System.Uri", FormatRule::Quoted),
    ("System.Byte", FormatRule::Raw),
    ("System.Int16", FormatRule::Raw),
    ("System.Int32", FormatRule::Raw),
    ("System.Int64", FormatRule::Raw),
    ("System.UInt32", FormatRule::Raw),
    ("System.UInt64", FormatRule::Raw),
    ("System.Single", FormatRule::Raw),
    ("System.Double", FormatRule::Raw),
    ("System.Decimal", FormatRule::Raw),
    ("System.Boolean", FormatRule::Lowercase),
    (
        "System.Collections.Specialized.StringCollection",
        FormatRule::Unsupported,
    ),
];

/// How a value of a given declared type is rendered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FormatRule {
    /// Rendered as a JSON string.
    Quoted,
    /// Passed through unquoted (numeric literals).
    Raw,
    /// Lowercased and passed through (booleans).
    Lowercase,
    /// Known type that is deliberately not rendered.
    Unsupported,
}

/// Lookup table from declared type name to [`FormatRule`].
///
/// Types missing from the table are unrepresentable, except inside a
/// reserved namespace where a missing rule is a hard error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeTable {
    /// Namespaces whose types must all have a rule.
    #[serde(default = "default_reserved_namespaces")]
    pub reserved_namespaces: Vec<String>,

    /// Type name -> rule.
    #[serde(default)]
    pub rules: BTreeMap<String, FormatRule>,
}

fn default_reserved_namespaces() -> Vec<String> {
    vec![DEFAULT_RESERVED_NAMESPACE.to_string()]
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeTable {
    /// Table with only the built-in platform rules.
    pub fn builtin() -> Self {
        Self {
            reserved_namespaces: default_reserved_namespaces(),
            rules: BUILTIN_RULES
                .iter()
                .map(|(name, rule)| (name.to_string(), *rule))
                .collect(),
        }
    }

    /// Table with no rules and no reserved namespaces.
    pub fn empty() -> Self {
        Self {
            reserved_namespaces: Vec::new(),
            rules: BTreeMap::new(),
        }
    }

    /// Add or replace a rule.
    pub fn with_rule(mut self, type_name: impl Into<String>, rule: FormatRule) -> Self {
        self.rules.insert(type_name.into(), rule);
        self
    }

    /// Layer `other` on top of this table. Rules in `other` win and its
    /// reserved namespaces replace ours.
    pub fn extend(&mut self, other: TypeTable) {
        self.reserved_namespaces = other.reserved_namespaces;
        self.rules.extend(other.rules);
    }

    /// Rule for a declared type, if any.
    pub fn rule(&self, type_name: &str) -> Option<FormatRule> {
        self.rules.get(type_name).copied()
    }

    /// Whether the type belongs to a reserved namespace.
    pub fn is_reserved(&self, type_name: &str) -> bool {
        self.reserved_namespaces.iter().any(|ns| {
            type_name == ns
                || type_name
                    .strip_prefix(ns.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}
