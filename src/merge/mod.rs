//! Settings map and base-vs-override merge semantics.
//!
//! Merge rules:
//! - reset mode: a later value replaces the stored one
//! - no-reset mode: stored values are untouched; new names are recorded
//!   with their type but no value
//! - types from the settings-definition dialect always replace the stored
//!   type; provisional types never do

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

use crate::extract::RawSetting;

/// Where a setting's declared type came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TypeOrigin {
    /// Settings-definition dialect: the canonical type.
    Declared,
    /// Configuration dialect: only the serialization kind.
    Provisional,
}

/// A named, typed, valued configuration entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Setting {
    pub name: String,
    pub declared_type: String,
    pub type_origin: TypeOrigin,
    /// `None` when a no-reset load introduced the name.
    pub value: Option<String>,
}

/// Name-ordered collection of settings for one merge session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsMap {
    settings: BTreeMap<String, Setting>,
}

impl SettingsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Setting> {
        self.settings.get(name)
    }

    /// Settings in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.settings.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    /// Merge one document's matches into the map.
    pub fn ingest<I>(&mut self, matches: I, origin: TypeOrigin, reset_values: bool)
    where
        I: IntoIterator<Item = RawSetting>,
    {
        for raw in matches {
            match self.settings.get_mut(&raw.name) {
                Some(stored) => {
                    if reset_values && stored.value.as_deref() != Some(raw.value.as_str()) {
                        trace!(name = %raw.name, "value overridden");
                        stored.value = Some(raw.value);
                    }
                    if origin == TypeOrigin::Declared {
                        stored.declared_type = raw.declared_type;
                        stored.type_origin = origin;
                    }
                }
                None => {
                    let value = reset_values.then_some(raw.value);
                    self.settings.insert(
                        raw.name.clone(),
                        Setting {
                            name: raw.name,
                            declared_type: raw.declared_type,
                            type_origin: origin,
                            value,
                        },
                    );
                }
            }
        }
    }

    /// Copy declared types from `baseline` onto every setting it also knows.
    pub fn restore_types(&mut self, baseline: &SettingsMap) {
        for setting in self.settings.values_mut() {
            if let Some(typed) = baseline.get(&setting.name) {
                setting.declared_type = typed.declared_type.clone();
                setting.type_origin = typed.type_origin;
            }
        }
    }
}

impl<'a> IntoIterator for &'a SettingsMap {
    type Item = &'a Setting;
    type IntoIter = std::collections::btree_map::Values<'a, String, Setting>;

    fn into_iter(self) -> Self::IntoIter {
        self.settings.values()
    }
}
