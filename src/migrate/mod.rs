//! Plan-driven migration of whole projects.
//!
//! For each selected project:
//! 1. Main output: settings-definition, the project's own config, then every
//!    override host's config in no-reset mode.
//! 2. Per override host: the host's transform family (`Web.*.config` or
//!    `app.*.config`), JSON only, into `<Project>/From<Host>`.

use serde::{Deserialize, Serialize};
use settings_formatter::TypeTable;
use tracing::info;

use crate::config::{MigrationPlan, OutputSettings, ProjectSpec};
use crate::emit::Emission;
use crate::error::MigrateError;
use crate::paths::PathResolver;
use crate::session::ConfigSession;

/// Outcome of migrating one project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectReport {
    pub name: String,
    pub emissions: Vec<Emission>,
}

/// Outcome of a migration run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationReport {
    pub projects: Vec<ProjectReport>,
}

impl MigrationReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_human(&self) -> String {
        let mut lines = Vec::new();
        for project in &self.projects {
            lines.push(format!("{}:", project.name));
            for emission in &project.emissions {
                let label = match &emission.transform {
                    Some(t) if !t.is_empty() => format!(" [{t}]"),
                    _ => String::new(),
                };
                lines.push(format!(
                    "  {}{}: {} settings, {} unhandled, {} files",
                    emission.output_dir.display(),
                    label,
                    emission.representable,
                    emission.unhandled.len(),
                    emission.written.len()
                ));
            }
        }
        lines.join("\n")
    }

    pub fn unhandled_count(&self) -> usize {
        self.projects
            .iter()
            .flat_map(|p| &p.emissions)
            .map(|e| e.unhandled.len())
            .sum()
    }
}

/// Runs a [`MigrationPlan`].
#[derive(Debug, Clone)]
pub struct Migrator {
    plan: MigrationPlan,
    table: TypeTable,
    resolver: PathResolver,
    inform_about_unhandled: bool,
}

impl Migrator {
    pub fn new(plan: MigrationPlan) -> Self {
        let table = plan.type_table();
        let resolver = PathResolver::new(plan.source_root.clone());
        Self {
            plan,
            table,
            resolver,
            inform_about_unhandled: true,
        }
    }

    /// Do not echo unhandled settings to standard output.
    pub fn quiet(mut self) -> Self {
        self.inform_about_unhandled = false;
        self
    }

    /// Migrate the plan's selected projects, or only `only` when non-empty.
    pub fn run(&self, only: &[String]) -> Result<MigrationReport, MigrateError> {
        let projects: Vec<&ProjectSpec> = if only.is_empty() {
            self.plan.selected_projects()
        } else {
            only.iter()
                .map(|name| {
                    self.plan
                        .project(name)
                        .ok_or_else(|| MigrateError::UnknownProject(name.clone()))
                })
                .collect::<Result<_, _>>()?
        };

        let mut report = MigrationReport::default();
        for project in projects {
            report.projects.push(self.migrate_project(project)?);
        }
        Ok(report)
    }

    pub fn migrate_project(&self, project: &ProjectSpec) -> Result<ProjectReport, MigrateError> {
        info!(project = %project.name, "migrating project");
        let section = project.section_name();
        let hosts = self.plan.override_hosts(project);
        let project_root = self.plan.output_root.join(&project.name);

        let mut main = self.session(OutputSettings {
            options_namespace: project.namespace.clone(),
            options_class_name: project.class_name.clone(),
            inform_about_unhandled: self.inform_about_unhandled,
            ..OutputSettings::in_dir(&project_root)
        })?;
        main.load_settings(&project.settings_file(), true)?
            .load_config(&project.config_file(), Some(&section), true)?;
        for host in hosts.iter().filter(|h| h.name != project.name) {
            main.load_config(&host.config_file(), Some(&section), false)?;
        }
        main.create_files()?;
        let mut emissions = main.into_emissions();

        for host in &hosts {
            let mut transforms = self.session(OutputSettings {
                options_namespace: project.namespace.clone(),
                options_class_name: project.class_name.clone(),
                inform_about_unhandled: self.inform_about_unhandled,
                create_options: false,
                create_unhandled_output: false,
                ..OutputSettings::in_dir(project_root.join(format!("From{}", host.name)))
            })?;
            transforms.load_settings(&project.settings_file(), true)?;
            emissions.extend(transforms.load_config_transformations(
                &host.path,
                host.transform_pattern(),
                Some(&section),
                false,
            )?);
        }

        Ok(ProjectReport {
            name: project.name.clone(),
            emissions,
        })
    }

    fn session(&self, output: OutputSettings) -> Result<ConfigSession, MigrateError> {
        ConfigSession::new(self.resolver.clone(), output, self.table.clone())
    }
}
