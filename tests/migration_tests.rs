//! End-to-end migration of the fixture source tree.

mod fixtures;

use settings_migrate::{MigrateError, MigrationPlan, Migrator};
use std::fs;
use tempfile::TempDir;

fn plan_into(out: &TempDir) -> MigrationPlan {
    let mut plan = MigrationPlan::from_file(&fixtures::plan_path()).expect("Failed to load plan");
    plan.output_root = out.path().to_path_buf();
    plan
}

#[test]
fn test_plan_resolves_against_fixture_dir() {
    let plan = MigrationPlan::from_file(&fixtures::plan_path()).unwrap();
    assert_eq!(plan.source_root, fixtures::legacy_root());
    assert_eq!(plan.selected_projects().len(), 1);
}

#[test]
fn test_main_output_merges_project_and_hosts() {
    let out = TempDir::new().unwrap();
    let report = Migrator::new(plan_into(&out)).quiet().run(&[]).unwrap();

    assert_eq!(report.projects.len(), 1);
    let common = &report.projects[0];
    assert_eq!(common.name, "CommonLib");

    let main_dir = out.path().join("CommonLib");
    let json = fixtures::read_json(&main_dir.join("settings.json"));
    assert_eq!(
        json,
        serde_json::json!({
            "ApiKey": "",
            "FeatureEnabled": true,
            "MaxRetries": 3,
            "ProjectKind": "Main",
            "SiteName": "Acme Local",
            "Timeout": "00:00:30"
        })
    );

    let options = fs::read_to_string(main_dir.join("Options.cs")).unwrap();
    assert!(options.contains("namespace CommonLib.JsonConfiguration"));
    assert!(options.contains("public class CommonOptions"));
    assert!(options.contains("public Acme.Portal.ProjectType ProjectKind { get; set; }"));

    let main = &common.emissions[0];
    assert_eq!(main.transform, None);
    assert_eq!(
        main.unhandled,
        vec!["HostOnly", "LegacyOnly", "Mirrors", "TaxSystem"]
    );
    let diagnostics = fs::read_to_string(main_dir.join("unhandledSettings.txt")).unwrap();
    assert!(diagnostics.ends_with("HostOnly\nLegacyOnly\nMirrors\nTaxSystem\n"));
}

#[test]
fn test_host_transforms_emit_json_only() {
    let out = TempDir::new().unwrap();
    let report = Migrator::new(plan_into(&out)).quiet().run(&[]).unwrap();

    // Api is not an allowed host, so only WebSite contributes transforms
    let from_web = out.path().join("CommonLib/FromWebSite");
    let transforms: Vec<_> = report.projects[0].emissions[1..].iter().collect();
    assert_eq!(transforms.len(), 3);
    assert!(!out.path().join("CommonLib/FromApi").exists());

    let canonical = fixtures::read_json(&from_web.join("settings.json"));
    assert_eq!(canonical, serde_json::json!({"SiteName": "Acme Web"}));
    assert_eq!(transforms[0].unhandled, vec!["HostOnly"]);

    let dev = fixtures::read_json(&from_web.join("settings.Dev.json"));
    assert_eq!(dev, serde_json::json!({"MaxRetries": 5, "SiteName": "Acme Dev"}));

    let staging = fixtures::read_json(&from_web.join("settings.Staging.json"));
    assert_eq!(staging, serde_json::json!({"FeatureEnabled": false}));

    let mut files: Vec<String> = fs::read_dir(&from_web)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    files.sort();
    assert_eq!(
        files,
        vec!["settings.Dev.json", "settings.Staging.json", "settings.json"]
    );
}

#[test]
fn test_report_json_round_trips() {
    let out = TempDir::new().unwrap();
    let report = Migrator::new(plan_into(&out)).quiet().run(&[]).unwrap();

    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["projects"][0]["name"], "CommonLib");
    assert_eq!(report.unhandled_count(), 5);
    assert!(report.to_human().contains("[Dev]"));
}

#[test]
fn test_unknown_project_selection() {
    let out = TempDir::new().unwrap();
    let err = Migrator::new(plan_into(&out))
        .quiet()
        .run(&["Nope".to_string()])
        .unwrap_err();
    assert!(matches!(err, MigrateError::UnknownProject(name) if name == "Nope"));
}

#[test]
fn test_missing_project_files_are_fatal() {
    let out = TempDir::new().unwrap();
    let err = Migrator::new(plan_into(&out))
        .quiet()
        .run(&["Api".to_string()])
        .unwrap_err();
    assert!(matches!(err, MigrateError::MissingDocument(_)));
}
