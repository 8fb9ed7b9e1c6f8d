//! Output naming and artifact toggles for one emission target.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default class name for the typed declaration document.
pub const DEFAULT_CLASS_NAME: &str = "CommonOptions";

/// Where and what to emit for one merge session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputSettings {
    /// Namespace of the declaration document.
    pub options_namespace: String,

    /// Class name of the declaration document.
    pub options_class_name: String,

    /// Directory receiving all three artifacts.
    pub output_dir: PathBuf,

    /// Echo the diagnostics text to the console.
    #[serde(default)]
    pub inform_about_unhandled: bool,

    #[serde(default = "enabled")]
    pub create_options: bool,

    #[serde(default = "enabled")]
    pub create_json: bool,

    #[serde(default = "enabled")]
    pub create_unhandled_output: bool,

    pub options_file_name: String,
    pub json_file_name: String,
    pub unhandled_file_name: String,
}

fn enabled() -> bool {
    true
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            options_namespace: "JsonConfiguration".to_string(),
            options_class_name: DEFAULT_CLASS_NAME.to_string(),
            output_dir: PathBuf::from("ConfigResults"),
            inform_about_unhandled: false,
            create_options: true,
            create_json: true,
            create_unhandled_output: true,
            options_file_name: "Options.cs".to_string(),
            json_file_name: "settings.json".to_string(),
            unhandled_file_name: "unhandledSettings.txt".to_string(),
        }
    }
}

impl OutputSettings {
    /// Settings writing into `output_dir` with every other field defaulted.
    pub fn in_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn options_path(&self) -> PathBuf {
        self.output_dir.join(&self.options_file_name)
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(&self.json_file_name)
    }

    pub fn unhandled_path(&self) -> PathBuf {
        self.output_dir.join(&self.unhandled_file_name)
    }

    /// Naming for one document of a transform family.
    ///
    /// The canonical document (empty token) keeps the base naming. Otherwise
    /// the output goes to `output_dir/<token>` when grouping into folders,
    /// or each file name gets `.<token>` before its extension.
    pub fn for_transform(&self, token: &str, group_into_folders: bool) -> Self {
        let mut output = self.clone();
        if token.is_empty() {
            return output;
        }

        if output.create_options {
            output.options_class_name =
                format!("{}_{}", self.options_class_name, identifier_suffix(token));
        }

        if group_into_folders {
            output.output_dir = self.output_dir.join(token);
        } else {
            output.options_file_name = suffix_file_name(&self.options_file_name, token);
            output.json_file_name = suffix_file_name(&self.json_file_name, token);
            output.unhandled_file_name = suffix_file_name(&self.unhandled_file_name, token);
        }

        output
    }
}

/// Insert `.token` before the extension of `file_name`.
pub fn suffix_file_name(file_name: &str, token: &str) -> String {
    let path = Path::new(file_name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!(
            "{}.{}.{}",
            stem.to_string_lossy(),
            token,
            ext.to_string_lossy()
        ),
        _ => format!("{file_name}.{token}"),
    }
}

fn identifier_suffix(token: &str) -> String {
    token
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
