//! Formatting of legacy setting values into JSON literals.
//!
//! Each value is escaped, then dispatched on its declared type through a
//! [`TypeTable`]. Unknown user types are reported as unrepresentable; unknown
//! types in a reserved namespace are a hard error because the table is
//! expected to cover them.

mod config;
mod result;

pub use config::{FormatRule, TypeTable, DEFAULT_RESERVED_NAMESPACE};
pub use result::{FormatError, Formatted};

/// XML entities decoded before dispatch, in replacement order.
const XML_ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&apos;", "'"),
];

/// Decode the five standard XML entities.
///
/// Replacement is sequential, so `&amp;lt;` decodes once to `&lt;`.
pub fn decode_entities(value: &str) -> String {
    XML_ENTITIES
        .iter()
        .fold(value.to_string(), |acc, (entity, literal)| {
            acc.replace(entity, literal)
        })
}

/// Double backslashes, then decode XML entities.
pub fn escape_value(value: &str) -> String {
    decode_entities(&value.replace('\\', "\\\\"))
}

/// Format a raw value according to its declared type.
///
/// A `None` value is treated as the empty string.
pub fn format_value(
    value: Option<&str>,
    declared_type: &str,
    table: &TypeTable,
) -> Result<Formatted, FormatError> {
    let value = value.unwrap_or_default();

    let rule = match table.rule(declared_type) {
        Some(rule) => rule,
        None if table.is_reserved(declared_type) => {
            return Err(FormatError::UnhandledSystemType {
                type_name: declared_type.to_string(),
            });
        }
        None => return Ok(Formatted::Unrepresentable),
    };

    let formatted = match rule {
        // serde_json doubles backslashes itself, so quote the decoded text
        FormatRule::Quoted => Formatted::Representable(
            serde_json::Value::String(decode_entities(value)).to_string(),
        ),
        // An empty literal would leave the JSON member without a value
        FormatRule::Raw | FormatRule::Lowercase if value.trim().is_empty() => {
            Formatted::Unrepresentable
        }
        FormatRule::Raw => Formatted::Representable(escape_value(value)),
        FormatRule::Lowercase => Formatted::Representable(escape_value(value).to_lowercase()),
        FormatRule::Unsupported => Formatted::Unrepresentable,
    };

    Ok(formatted)
}
