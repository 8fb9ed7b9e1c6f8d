//! settings-migrate CLI
//!
//! Entry point for the `settings-migrate` command-line tool.

use clap::{Parser, Subcommand};
use settings_migrate::{
    FormatError, Formatted, MigrateError, MigrationPlan, Migrator, TypeTable,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "settings-migrate")]
#[command(about = "Migrate legacy XML settings to typed JSON configuration", version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the migration plan
    Run {
        /// Path to the migration plan (default: migrate.toml)
        #[arg(long, short = 'p')]
        plan: Option<PathBuf>,

        /// Only migrate these projects
        #[arg(long = "project")]
        projects: Vec<String>,

        /// Print the run report as JSON (implies --quiet)
        #[arg(long)]
        json: bool,

        /// Do not print unhandled settings
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate the migration plan
    Verify {
        /// Path to the migration plan (default: migrate.toml)
        #[arg(long, short = 'p')]
        plan: Option<PathBuf>,
    },

    /// Explain how a single value formats for a declared type
    Format {
        /// Declared type, e.g. System.Boolean
        #[arg(long = "type", short = 't')]
        type_name: String,

        /// Plan whose type rules to use (built-in rules otherwise)
        #[arg(long, short = 'p')]
        plan: Option<PathBuf>,

        /// Raw value as found in the XML document
        #[arg(last = true, default_value = "")]
        value: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Commands::Run {
            plan,
            projects,
            json,
            quiet,
        } => run_migrate(plan, &projects, json, quiet),
        Commands::Verify { plan } => run_verify(plan),
        Commands::Format {
            type_name,
            plan,
            value,
        } => run_format(&type_name, plan, &value),
    };

    process::exit(code);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn plan_path(plan: Option<PathBuf>) -> PathBuf {
    plan.unwrap_or_else(|| PathBuf::from("migrate.toml"))
}

fn load_plan(path: &Path) -> Result<MigrationPlan, MigrateError> {
    Ok(MigrationPlan::from_file(path)?)
}

fn run_migrate(plan: Option<PathBuf>, projects: &[String], json: bool, quiet: bool) -> i32 {
    let path = plan_path(plan);
    let result = load_plan(&path).and_then(|plan| {
        let mut migrator = Migrator::new(plan);
        if json || quiet {
            migrator = migrator.quiet();
        }
        migrator.run(projects)
    });

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if json {
        match report.to_json() {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                return 1;
            }
        }
    } else {
        println!();
        println!("{}", report.to_human());
    }
    0
}

fn run_verify(plan: Option<PathBuf>) -> i32 {
    let path = plan_path(plan);

    match MigrationPlan::from_file(&path) {
        Ok(plan) => {
            println!("Plan valid: {}", path.display());
            println!();
            println!("  Source root: {}", plan.source_root.display());
            println!("  Output root: {}", plan.output_root.display());
            let selected: Vec<&str> = plan
                .selected_projects()
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            println!("  Migrate: {}", selected.join(", "));
            for project in &plan.projects {
                let hosts: Vec<&str> = plan
                    .override_hosts(project)
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect();
                println!(
                    "  {} ({}): overrides [{}]",
                    project.name,
                    project.config_file_name(),
                    hosts.join(", ")
                );
            }
            if !plan.types.rules.is_empty() {
                println!("  Type rules: {}", plan.types.rules.len());
            }
            0
        }
        Err(e) => {
            eprintln!("Plan error: {}", e);
            1
        }
    }
}

fn run_format(type_name: &str, plan: Option<PathBuf>, value: &str) -> i32 {
    let table = match plan {
        Some(path) => match load_plan(&path) {
            Ok(plan) => plan.type_table(),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
        None => TypeTable::builtin(),
    };

    match settings_formatter::format_value(Some(value), type_name, &table) {
        Ok(Formatted::Representable(literal)) => {
            println!("{}", literal);
            0
        }
        Ok(Formatted::Unrepresentable) => {
            println!("unrepresentable: {} would be reported as unhandled", type_name);
            1
        }
        Err(e @ FormatError::UnhandledSystemType { .. }) => {
            eprintln!("Error: {}", e);
            2
        }
    }
}
