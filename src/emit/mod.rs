//! Rendering of a merged settings map into the three output artifacts.
//!
//! - declaration document: a class of typed public properties
//! - JSON document: a flat object, one field per representable setting
//! - diagnostics: names of settings that could not be represented
//!
//! Rendering is a single pass over the map in name order and never mutates
//! it. Writing goes through a temp file and a rename per artifact.

use serde::{Deserialize, Serialize};
use settings_formatter::{format_value, Formatted, TypeTable};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::OutputSettings;
use crate::error::MigrateError;
use crate::merge::SettingsMap;

/// Artifacts rendered from one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub declarations: String,
    pub json: String,
    pub diagnostics: String,
    /// Names present in the declaration and JSON documents.
    pub representable: BTreeSet<String>,
    /// Names routed to diagnostics.
    pub unhandled: BTreeSet<String>,
}

/// Record of one output-generation event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Emission {
    /// Transform token; `None` outside a transform family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,

    pub output_dir: PathBuf,

    /// Files written, in write order.
    pub written: Vec<PathBuf>,

    pub representable: usize,

    pub unhandled: Vec<String>,
}

/// Render the artifacts for `settings`.
///
/// Fails only when a reserved-namespace type has no rule.
pub fn render(
    settings: &SettingsMap,
    output: &OutputSettings,
    table: &TypeTable,
) -> Result<Rendered, MigrateError> {
    let mut declarations = format!(
        "using System;\n\nnamespace {}\n{{\n    public class {}\n    {{\n",
        output.options_namespace, output.options_class_name
    );
    let mut fields = Vec::new();
    let mut representable = BTreeSet::new();
    let mut unhandled = BTreeSet::new();

    for setting in settings {
        match format_value(setting.value.as_deref(), &setting.declared_type, table)? {
            Formatted::Representable(literal) => {
                declarations.push_str(&format!(
                    "        public {} {} {{ get; set; }}\n",
                    setting.declared_type, setting.name
                ));
                fields.push(format!(
                    "    {}: {}",
                    serde_json::to_string(&setting.name)?,
                    literal
                ));
                representable.insert(setting.name.clone());
            }
            Formatted::Unrepresentable => {
                debug!(name = %setting.name, ty = %setting.declared_type, "unrepresentable setting");
                unhandled.insert(setting.name.clone());
            }
        }
    }

    declarations.push_str("    }\n}\n");

    let json = if fields.is_empty() {
        "{\n}\n".to_string()
    } else {
        format!("{{\n{}\n}}\n", fields.join(",\n"))
    };

    let diagnostics = diagnostics_text(&unhandled, output);

    Ok(Rendered {
        declarations,
        json,
        diagnostics,
        representable,
        unhandled,
    })
}

/// Diagnostics listing; empty when nothing is unhandled.
pub fn diagnostics_text(unhandled: &BTreeSet<String>, output: &OutputSettings) -> String {
    if unhandled.is_empty() {
        return String::new();
    }

    let mut text = format!(
        "\nUnhandled settings for {}:\n",
        output.json_path().display()
    );
    for name in unhandled {
        text.push_str(name);
        text.push('\n');
    }
    text
}

/// Write the enabled artifacts, creating the output directory if needed.
pub fn write_artifacts(
    rendered: &Rendered,
    output: &OutputSettings,
) -> Result<Vec<PathBuf>, MigrateError> {
    let mut written = Vec::new();
    let artifacts = [
        (output.create_options, output.options_path(), &rendered.declarations),
        (output.create_json, output.json_path(), &rendered.json),
        (
            output.create_unhandled_output,
            output.unhandled_path(),
            &rendered.diagnostics,
        ),
    ];

    for (enabled, path, contents) in artifacts {
        if !enabled {
            continue;
        }
        fs::create_dir_all(&output.output_dir).map_err(|source| MigrateError::Write {
            path: output.output_dir.clone(),
            source,
        })?;
        write_atomic(&path, contents)?;
        debug!(path = %path.display(), "wrote artifact");
        written.push(path);
    }

    Ok(written)
}

/// Write to a sibling temp file, then rename over the target.
fn write_atomic(path: &Path, contents: &str) -> Result<(), MigrateError> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let to_write_error = |source| MigrateError::Write {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&temp_path, contents).map_err(to_write_error)?;
    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        to_write_error(source)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::RawSetting;
    use crate::merge::TypeOrigin;
    use settings_formatter::FormatRule;

    fn sample() -> SettingsMap {
        let mut map = SettingsMap::new();
        map.ingest(
            [
                RawSetting::new("SiteName", "System.String", "Shop &amp; Co"),
                RawSetting::new("MaxItems", "System.Int32", "25"),
                RawSetting::new("Enabled", "System.Boolean", "True"),
                RawSetting::new("Mirrors", "System.Collections.Specialized.StringCollection", ""),
                RawSetting::new("Period", "Acme.Billing.Period", "Monthly"),
            ],
            TypeOrigin::Declared,
            true,
        );
        map
    }

    fn output() -> OutputSettings {
        OutputSettings {
            options_namespace: "Shop.JsonConfiguration".to_string(),
            ..OutputSettings::in_dir("out/Shop")
        }
    }

    #[test]
    fn test_render_declarations() {
        let rendered = render(&sample(), &output(), &TypeTable::builtin()).unwrap();
        let expected = "using System;\n\nnamespace Shop.JsonConfiguration\n{\n    public class CommonOptions\n    {\n        public System.Boolean Enabled { get; set; }\n        public System.Int32 MaxItems { get; set; }\n        public System.String SiteName { get; set; }\n    }\n}\n";
        assert_eq!(rendered.declarations, expected);
    }

    #[test]
    fn test_render_json_parses_without_trailing_comma() {
        let rendered = render(&sample(), &output(), &TypeTable::builtin()).unwrap();
        assert_eq!(
            rendered.json,
            "{\n    \"Enabled\": true,\n    \"MaxItems\": 25,\n    \"SiteName\": \"Shop & Co\"\n}\n"
        );
        let value: serde_json::Value = serde_json::from_str(&rendered.json).unwrap();
        assert_eq!(value["MaxItems"], 25);
        assert_eq!(value["Enabled"], true);
    }

    #[test]
    fn test_empty_number_and_boolean_stay_out_of_json() {
        let mut map = SettingsMap::new();
        map.ingest(
            [
                RawSetting::new("MaxItems", "System.Int32", ""),
                RawSetting::new("Flag", "System.Boolean", ""),
                RawSetting::new("Title", "System.String", "t"),
            ],
            TypeOrigin::Declared,
            true,
        );
        // no-reset load leaves the value absent
        map.ingest(
            [RawSetting::new("Retries", "Int32", "7")],
            TypeOrigin::Provisional,
            false,
        );
        let table = TypeTable::builtin().with_rule("Int32", FormatRule::Raw);

        let rendered = render(&map, &output(), &table).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered.json).unwrap();
        assert_eq!(value, serde_json::json!({"Title": "t"}));
        assert_eq!(
            rendered.unhandled.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Flag", "MaxItems", "Retries"]
        );
    }

    #[test]
    fn test_partition_of_settings() {
        let map = sample();
        let rendered = render(&map, &output(), &TypeTable::builtin()).unwrap();

        assert!(rendered.representable.is_disjoint(&rendered.unhandled));
        let union: BTreeSet<&str> = rendered
            .representable
            .iter()
            .chain(rendered.unhandled.iter())
            .map(String::as_str)
            .collect();
        let all: BTreeSet<&str> = map.names().collect();
        assert_eq!(union, all);

        for name in &rendered.unhandled {
            assert!(!rendered.json.contains(name.as_str()));
            assert!(!rendered.declarations.contains(name.as_str()));
            assert!(rendered.diagnostics.contains(name.as_str()));
        }
    }

    #[test]
    fn test_diagnostics_header() {
        let rendered = render(&sample(), &output(), &TypeTable::builtin()).unwrap();
        let header = format!(
            "\nUnhandled settings for {}:\n",
            PathBuf::from("out/Shop").join("settings.json").display()
        );
        assert_eq!(rendered.diagnostics, format!("{header}Mirrors\nPeriod\n"));
    }

    #[test]
    fn test_allow_listed_type_moves_out_of_diagnostics() {
        let table = TypeTable::builtin().with_rule("Acme.Billing.Period", FormatRule::Quoted);
        let rendered = render(&sample(), &output(), &table).unwrap();
        assert!(rendered.representable.contains("Period"));
        assert!(rendered.json.contains("\"Period\": \"Monthly\""));
        assert!(rendered.declarations.contains("public Acme.Billing.Period Period"));
    }

    #[test]
    fn test_empty_map() {
        let rendered = render(&SettingsMap::new(), &output(), &TypeTable::builtin()).unwrap();
        assert_eq!(rendered.json, "{\n}\n");
        assert!(rendered.diagnostics.is_empty());
        assert!(serde_json::from_str::<serde_json::Value>(&rendered.json).is_ok());
    }

    #[test]
    fn test_unknown_system_type_aborts_render() {
        let mut map = sample();
        map.ingest(
            [RawSetting::new("Future", "System.UnknownFutureType", "x")],
            TypeOrigin::Declared,
            true,
        );
        let err = render(&map, &output(), &TypeTable::builtin()).unwrap_err();
        assert!(err.is_unhandled_system_type());
    }

    #[test]
    fn test_write_respects_toggles() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = OutputSettings {
            create_options: false,
            ..OutputSettings::in_dir(dir.path().join("nested/Shop"))
        };
        let rendered = render(&sample(), &out, &TypeTable::builtin()).unwrap();

        let written = write_artifacts(&rendered, &out).unwrap();
        assert_eq!(written, vec![out.json_path(), out.unhandled_path()]);
        assert!(!out.options_path().exists());
        assert_eq!(fs::read_to_string(out.json_path()).unwrap(), rendered.json);

        // Idempotent directory creation and no temp files left behind
        write_artifacts(&rendered, &out).unwrap();
        let leftovers: Vec<_> = fs::read_dir(&out.output_dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
