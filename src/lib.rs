//! settings-migrate - legacy XML settings to typed JSON configuration
//!
//! Extracts settings from `Settings.settings` definitions and `app.config` /
//! `Web.config` documents, merges base and override documents, and emits a
//! typed declaration class, a flat JSON document and a report of settings
//! whose type cannot be represented.

pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod merge;
pub mod migrate;
pub mod paths;
pub mod session;
pub mod transform;

pub use config::{MigrationPlan, OutputSettings, PlanError, ProjectSpec};
pub use emit::{Emission, Rendered};
pub use error::MigrateError;
pub use extract::{Dialect, ExtractError, Extractor, RawSetting, RegexExtractor};
pub use merge::{Setting, SettingsMap, TypeOrigin};
pub use migrate::{MigrationReport, Migrator, ProjectReport};
pub use paths::PathResolver;
pub use session::ConfigSession;
pub use transform::{Baseline, FamilyDocument, TransformContext, TransformFamily};

pub use settings_formatter::{FormatError, FormatRule, Formatted, TypeTable};
