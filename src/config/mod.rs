//! Migration configuration
//!
//! - `plan`: the TOML migration plan (projects, hosts, type rules)
//! - `output`: per-target output naming and artifact toggles

mod output;
mod plan;

pub use output::{suffix_file_name, OutputSettings, DEFAULT_CLASS_NAME};
pub use plan::{MigrationPlan, PlanError, ProjectSpec};
