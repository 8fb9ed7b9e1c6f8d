//! Migration plan (`migrate.toml`)
//!
//! Describes the projects of a legacy source tree, which hosts may override
//! their settings, which projects to migrate, and the organisation's type
//! rules layered over the built-in table.

use serde::{Deserialize, Serialize};
use settings_formatter::{TypeTable, DEFAULT_RESERVED_NAMESPACE};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::output::DEFAULT_CLASS_NAME;

/// Error types for plan operations
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Failed to read plan file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// One project of the legacy source tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSpec {
    /// Project name; also the prefix of its settings section.
    pub name: String,

    /// Project directory, relative to `source_root`.
    pub path: String,

    /// Web projects use `Web.config` instead of `app.config`.
    #[serde(default)]
    pub web_app: bool,

    /// Namespace for the generated declaration document.
    pub namespace: String,

    /// Projects whose configuration overrides this project's settings.
    #[serde(default)]
    pub overrides: Vec<String>,

    /// Class name for the generated declaration document.
    #[serde(default = "default_class_name")]
    pub class_name: String,
}

fn default_class_name() -> String {
    DEFAULT_CLASS_NAME.to_string()
}

impl ProjectSpec {
    /// `Web.config` or `app.config`.
    pub fn config_file_name(&self) -> &'static str {
        if self.web_app {
            "Web.config"
        } else {
            "app.config"
        }
    }

    /// Wildcard pattern selecting this project's transform documents.
    pub fn transform_pattern(&self) -> &'static str {
        if self.web_app {
            "Web.*.config"
        } else {
            "app.*.config"
        }
    }

    /// Wrapper element holding this project's settings in a config file.
    pub fn section_name(&self) -> String {
        format!("{}.Properties.Settings", self.name)
    }

    /// Settings-definition document, relative to `source_root`.
    pub fn settings_file(&self) -> String {
        format!("{}/Properties/Settings.settings", self.path)
    }

    /// Configuration document, relative to `source_root`.
    pub fn config_file(&self) -> String {
        format!("{}/{}", self.path, self.config_file_name())
    }
}

/// Migration plan from `migrate.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationPlan {
    /// Root the project paths are relative to.
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Root of the generated output tree.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Projects allowed to act as override hosts (empty: all).
    #[serde(default)]
    pub allowed_hosts: Vec<String>,

    /// Projects to migrate, in order (empty: all, in declaration order).
    #[serde(default)]
    pub migrate: Vec<String>,

    /// Organisation type rules layered over the built-in table. Its
    /// reserved namespaces replace the built-in `System`.
    #[serde(default = "default_types")]
    pub types: TypeTable,

    #[serde(default, rename = "project")]
    pub projects: Vec<ProjectSpec>,
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("ConfigResults")
}

fn default_types() -> TypeTable {
    TypeTable {
        reserved_namespaces: vec![DEFAULT_RESERVED_NAMESPACE.to_string()],
        ..TypeTable::empty()
    }
}

impl MigrationPlan {
    /// Load and parse a plan from a TOML file.
    ///
    /// Relative roots are resolved against the plan file's directory.
    pub fn from_file(path: &Path) -> Result<Self, PlanError> {
        let contents = fs::read_to_string(path)?;
        let mut plan = Self::from_str(&contents)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        if plan.source_root.is_relative() {
            plan.source_root = base.join(&plan.source_root);
        }
        if plan.output_root.is_relative() {
            plan.output_root = base.join(&plan.output_root);
        }
        Ok(plan)
    }

    /// Parse a plan from a TOML string
    pub fn from_str(s: &str) -> Result<Self, PlanError> {
        let plan: MigrationPlan = toml::from_str(s)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Validate the plan
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.projects.is_empty() {
            return Err(PlanError::ValidationError(
                "At least one [[project]] must be defined".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for project in &self.projects {
            if project.name.trim().is_empty() {
                return Err(PlanError::ValidationError(
                    "Project name cannot be empty".to_string(),
                ));
            }
            if !names.insert(project.name.as_str()) {
                return Err(PlanError::ValidationError(format!(
                    "Duplicate project '{}'",
                    project.name
                )));
            }
        }

        for project in &self.projects {
            for over in &project.overrides {
                if !names.contains(over.as_str()) {
                    return Err(PlanError::ValidationError(format!(
                        "Project '{}' overrides unknown project '{}'",
                        project.name, over
                    )));
                }
            }
        }

        for (field, list) in [("migrate", &self.migrate), ("allowed_hosts", &self.allowed_hosts)] {
            for name in list {
                if !names.contains(name.as_str()) {
                    return Err(PlanError::ValidationError(format!(
                        "'{}' lists unknown project '{}'",
                        field, name
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn project(&self, name: &str) -> Option<&ProjectSpec> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Projects to migrate, in order.
    pub fn selected_projects(&self) -> Vec<&ProjectSpec> {
        if self.migrate.is_empty() {
            self.projects.iter().collect()
        } else {
            self.migrate.iter().filter_map(|n| self.project(n)).collect()
        }
    }

    /// Override hosts of `project` that are allowed to act as hosts.
    pub fn override_hosts(&self, project: &ProjectSpec) -> Vec<&ProjectSpec> {
        project
            .overrides
            .iter()
            .filter(|name| self.allowed_hosts.is_empty() || self.allowed_hosts.contains(name))
            .filter_map(|name| self.project(name))
            .collect()
    }

    /// Built-in type table with the plan's rules layered on top.
    pub fn type_table(&self) -> TypeTable {
        let mut table = TypeTable::builtin();
        table.extend(self.types.clone());
        table
    }
}
