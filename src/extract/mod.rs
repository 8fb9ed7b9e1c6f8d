//! Pattern-based extraction of settings from the two legacy XML dialects.
//!
//! Extraction is textual: values that contain markup are not supported.
//! Callers go through the [`Extractor`] trait so a structural parser can be
//! substituted without touching the merge logic.

mod patterns;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::merge::TypeOrigin;

/// Errors raised while extracting settings from a document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}

/// The two document shapes understood by the extractor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `<Setting Name=".." Type="..">` documents (`Settings.settings`).
    SettingsDefinition,
    /// `<setting name=".." serializeAs="..">` documents (`app.config`, `Web.config`).
    Configuration,
}

impl Dialect {
    /// Authority of the type captured by this dialect.
    pub fn type_origin(self) -> TypeOrigin {
        match self {
            Dialect::SettingsDefinition => TypeOrigin::Declared,
            Dialect::Configuration => TypeOrigin::Provisional,
        }
    }
}

/// One `(name, type, value)` triple as captured from a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawSetting {
    pub name: String,
    /// Declared type, or the serialization kind for the configuration dialect.
    pub declared_type: String,
    /// Raw value; empty for a self-closing value element.
    pub value: String,
}

impl RawSetting {
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            value: value.into(),
        }
    }
}

/// Capability to turn document text into raw setting triples.
pub trait Extractor {
    /// Extract every setting of `dialect` from `document`, optionally scoped
    /// to the inner content of the section named `section`.
    fn extract(
        &self,
        document: &str,
        dialect: Dialect,
        section: Option<&str>,
    ) -> Result<Vec<RawSetting>, ExtractError>;
}

/// Regex-backed [`Extractor`].
#[derive(Debug, Clone)]
pub struct RegexExtractor {
    settings_definition: Regex,
    configuration: Regex,
}

impl RegexExtractor {
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            settings_definition: Regex::new(patterns::SETTINGS_DEFINITION)?,
            configuration: Regex::new(patterns::CONFIGURATION)?,
        })
    }

    fn pattern(&self, dialect: Dialect) -> &Regex {
        match dialect {
            Dialect::SettingsDefinition => &self.settings_definition,
            Dialect::Configuration => &self.configuration,
        }
    }
}

impl Extractor for RegexExtractor {
    fn extract(
        &self,
        document: &str,
        dialect: Dialect,
        section: Option<&str>,
    ) -> Result<Vec<RawSetting>, ExtractError> {
        let text = match section {
            Some(name) if !name.is_empty() => scope_to_section(document, name)?,
            _ => document,
        };

        let settings: Vec<RawSetting> = self
            .pattern(dialect)
            .captures_iter(text)
            .map(|caps| {
                let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
                RawSetting::new(group(1), group(2), group(4))
            })
            .collect();

        debug!(
            ?dialect,
            section = section.unwrap_or(""),
            count = settings.len(),
            "extracted settings"
        );
        Ok(settings)
    }
}

/// Narrow `document` to the inner content of the outermost element whose
/// tag contains `section`.
///
/// An absent section yields the empty string.
pub fn scope_to_section<'a>(document: &'a str, section: &str) -> Result<&'a str, ExtractError> {
    let re = Regex::new(&patterns::section(section))?;
    Ok(re
        .captures(document)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str()))
}
