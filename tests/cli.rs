use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn truckflow(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("truckflow").unwrap();
    cmd.env("HOME", home).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

const BACKUP: &str = r#"{
  "version": "1.0",
  "exportDate": "2025-03-01T00:00:00.000Z",
  "loads": [
    {"load_id": "A1", "broker_name": "TQL", "pickup_city": "Fargo", "pickup_state": "ND",
     "delivery_city": "Windsor", "delivery_state": "CO", "pickup_date": "2025-01-10",
     "delivery_date": "2025-01-11", "loaded_miles": 800, "deadhead_miles": 200,
     "gross_amount": 2000, "status": "Delivered"},
    {"load_id": "A2", "broker_name": "Echo", "pickup_date": "2025-02-03",
     "delivery_date": "2025-02-04", "loaded_miles": 200, "gross_amount": 1000,
     "status": "Pending"}
  ],
  "expenses": [
    {"title": "Pilot", "amount": 500, "category": "fuel", "date": "2025-01-12"}
  ],
  "settings": {"earning_profile": "solo_per_mile", "rate_per_mile": 0.5, "driver_name": "Sam"}
}"#;

#[test]
fn test_convert_writes_import_document() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("loads.json");
    let output = dir.path().join("import.json");
    std::fs::write(
        &input,
        r#"{"loads":[{"loadId":"L1","broker":"TQL","origin":"Arrey, NM 87930","destination":"Bolingbrook IL","miles":"300","amount":900}]}"#,
    )
    .unwrap();

    truckflow(dir.path())
        .args(["convert", input.to_str().unwrap(), output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 1 loads"));

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(doc["version"], "1.0");
    let load = &doc["loads"][0];
    assert_eq!(load["pickup_city"], "Arrey");
    assert_eq!(load["pickup_state"], "NM");
    assert_eq!(load["delivery_state"], "IL");
    assert_eq!(load["loaded_miles"], 300);
    assert_eq!(load["status"], "Delivered");
}

#[test]
fn test_convert_defaults_to_working_directory_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("loads.json"), r#"[{"loadId":"X"}]"#).unwrap();

    truckflow(dir.path())
        .current_dir(dir.path())
        .args(["convert", "--status", "pending"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[0] pickup_state empty"));

    let doc: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("truckflow-import.json")).unwrap())
            .unwrap();
    assert_eq!(doc["loads"][0]["status"], "Pending");
}

#[test]
fn test_convert_without_loads_array_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("loads.json");
    let output = dir.path().join("import.json");
    std::fs::write(&input, r#"{"trips": []}"#).unwrap();

    truckflow(dir.path())
        .args(["convert", input.to_str().unwrap(), output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not find a \"loads\" array"));
    assert!(!output.exists());
}

#[test]
fn test_convert_reports_unresolved_states() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("loads.json");
    let output = dir.path().join("import.json");
    std::fs::write(&input, r#"{"loads":[{"origin":"Bolingbrook IL","destination":"Somewhereville"}]}"#).unwrap();

    truckflow(dir.path())
        .args(["convert", input.to_str().unwrap(), output.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "[0] delivery_state empty (destination: Somewhereville)",
        ));
}

#[test]
fn test_normalize() {
    let dir = tempfile::tempdir().unwrap();
    truckflow(dir.path())
        .args(["normalize", "St. George, UT, 84790"])
        .assert()
        .success()
        .stdout(predicate::str::contains("St. George").and(predicate::str::contains("UT")));
}

#[test]
fn test_summary_uses_document_settings() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("backup.json");
    std::fs::write(&file, BACKUP).unwrap();

    // 1000 loaded miles at $0.50
    truckflow(dir.path())
        .args(["summary", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Sam")
                .and(predicate::str::contains("Dashboard (solo_per_mile)"))
                .and(predicate::str::contains("$500.00"))
                .and(predicate::str::contains("16.7%")),
        );
}

#[test]
fn test_analytics_by_broker_with_flag_override() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("backup.json");
    std::fs::write(&file, BACKUP).unwrap();

    truckflow(dir.path())
        .args(["analytics", file.to_str().unwrap(), "--by", "broker", "--profile", "owner_operator"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("$3,000.00")
                .and(predicate::str::contains("TQL (66.7% of revenue)")),
        );
}

#[test]
fn test_expenses_and_loads() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("backup.json");
    std::fs::write(&file, BACKUP).unwrap();

    truckflow(dir.path())
        .args(["expenses", file.to_str().unwrap(), "--category", "fuel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pilot").and(predicate::str::contains("$500.00")));

    truckflow(dir.path())
        .args(["loads", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Fargo, ND → Windsor, CO")
                .and(predicate::str::contains("A2")),
        );
}

#[test]
fn test_settings_set_and_show() {
    let dir = tempfile::tempdir().unwrap();

    truckflow(dir.path())
        .args(["settings", "set", "--profile", "solo_percentage", "--percentage-rate", "25"])
        .assert()
        .success();
    assert!(dir.path().join(".config/truckflow/settings.json").exists());

    truckflow(dir.path())
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("solo_percentage").and(predicate::str::contains("25%")));

    truckflow(dir.path())
        .args(["settings", "set", "--percentage-rate", "140"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_report_on_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    truckflow(dir.path())
        .args(["summary", dir.path().join("nope.json").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_unrecognized_document_profile_pays_gross() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("backup.json");
    std::fs::write(
        &file,
        r#"{"loads":[{"gross_amount":1000,"loaded_miles":100}],"settings":{"earning_profile":"hourly","percentage_rate":50}}"#,
    )
    .unwrap();

    truckflow(dir.path())
        .args(["summary", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Dashboard (unrecognized)")
                .and(predicate::str::contains("$1,000.00"))
                .and(predicate::str::contains("$500.00").not()),
        );
}

#[test]
fn test_loads_search_and_status_filters() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("backup.json");
    std::fs::write(&file, BACKUP).unwrap();

    truckflow(dir.path())
        .args(["loads", file.to_str().unwrap(), "--search", "fargo"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("1 of 2")
                .and(predicate::str::contains("Week of Jan 6 – Jan 12, 2025"))
                .and(predicate::str::contains("$2.50/mi"))
                .and(predicate::str::contains("A2").not()),
        );

    truckflow(dir.path())
        .args(["loads", file.to_str().unwrap(), "--status", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A2").and(predicate::str::contains("A1").not()));

    truckflow(dir.path())
        .args(["loads", file.to_str().unwrap(), "--search", "nowhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No loads found"));
}

#[test]
fn test_unrecognized_period_shows_everything() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("backup.json");
    std::fs::write(&file, BACKUP).unwrap();

    truckflow(dir.path())
        .args(["loads", file.to_str().unwrap(), "--period", "lastDecade"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loads (All Time): 2 of 2"));
}
