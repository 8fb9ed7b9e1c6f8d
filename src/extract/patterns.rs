//! Extraction patterns for the two dialects.
//!
//! Group 1 is the name, group 2 the type (or serialization kind), group 4
//! the value. Group 4 does not participate for self-closing value elements.
//!
//! `\w` is ASCII-only in `regex_lite`, so names and types are matched as any
//! run of characters that cannot end the attribute.

/// `<Setting Name="X" Type="T" ...><Value ...>v</Value></Setting>`
pub const SETTINGS_DEFINITION: &str = r#"<Setting\s*\w*Name="([^"\s<>]*)"\s*\w*Type="([^"\s<>]*)"[\s\w.=()"]*>\s*(<Value[\s\w.=()"]*>([^<]*)</Value>|<Value [\s\w.=()"]*/>)\s*</Setting>"#;

/// `<setting name="X" serializeAs="K"><value>v</value></setting>`
pub const CONFIGURATION: &str = r#"<setting\s*\w*name="([^"\s<>]*)"[^<]*serializeAs="(\w*)"[^<]*>\s*(<value>([^<]*)</value>|<value[ ]*/>)\s*</setting>"#;

/// Greedy match of the outermost element whose tag contains `section`.
pub fn section(section: &str) -> String {
    let name = regex_lite::escape(section);
    format!(r"<[ \w.]*{name}[ \w.]*>([\s\S]*)</[ \w.]*{name}[ \w.]*>")
}
