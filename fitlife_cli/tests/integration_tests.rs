//! Integration tests for the fitlife binary.
//!
//! Every test runs without an API key so the AI commands take their
//! deterministic fallback path, and with an isolated config directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI command bound to `dir` for both data and config
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fitlife"));
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.arg("--json").assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout should be JSON")
}

fn log_workout(dir: &Path, group: &str) {
    cli(dir)
        .args(["workout", "log", "--group", group, "--duration", "45"])
        .args(["--exercise", "Something:3x10@50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged"));
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Personal fitness assistant"));
}

#[test]
fn test_suggest_without_history_falls_back_to_chest() {
    let temp_dir = setup_test_dir();

    let value = json_output(cli(temp_dir.path()).arg("suggest"));

    assert_eq!(value["source"]["kind"], "fallback");
    assert_eq!(value["suggestion"]["muscleGroup"], "Chest");
    assert_eq!(
        value["suggestion"]["reasoning"],
        "You haven't worked chest recently. Time to balance your routine!"
    );
    assert_eq!(value["suggestion"]["exercises"][0]["name"], "Push-ups");
    assert_eq!(value["logged"], Value::Null);

    // Fallbacks are not audited
    assert!(!temp_dir.path().join("data/audit.jsonl").exists());
}

#[test]
fn test_suggest_picks_least_worked_group() {
    let temp_dir = setup_test_dir();
    for group in ["chest", "chest", "chest", "back"] {
        log_workout(temp_dir.path(), group);
    }

    cli(temp_dir.path())
        .arg("suggest")
        .assert()
        .success()
        .stdout(predicate::str::contains("Suggested workout: Shoulders"))
        .stdout(predicate::str::contains("Source: fallback"))
        .stdout(predicate::str::contains("Push-ups: 3 x 12 (bodyweight)"));
}

#[test]
fn test_suggest_accept_logs_workout() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["suggest", "--accept"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout logged"));

    let workouts = json_output(cli(temp_dir.path()).args(["workout", "list"]));
    let workouts = workouts.as_array().unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0]["muscle_group"], "Chest");
    assert_eq!(workouts[0]["duration_minutes"], 60);
    assert_eq!(workouts[0]["notes"], "AI Suggested Workout");
}

#[test]
fn test_menu_analysis_fallback() {
    let temp_dir = setup_test_dir();
    let menu_path = temp_dir.path().join("menu.txt");
    fs::write(&menu_path, "Breakfast: eggs\nDinner: steak and rice\n").unwrap();

    let value = json_output(
        cli(temp_dir.path())
            .args(["menu", "analyze", "--goal", "bulking", "--file"])
            .arg(&menu_path),
    );
    assert_eq!(value["source"]["kind"], "fallback");
    assert_eq!(value["value"]["score"], 70);
    assert_eq!(value["value"]["goalAlignment"], "Good");

    cli(temp_dir.path())
        .args(["menu", "analyze", "--text", "oatmeal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Menu score: 70/100"));
}

#[test]
fn test_menu_analysis_requires_input() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["menu", "analyze"])
        .assert()
        .failure();

    cli(temp_dir.path())
        .args(["menu", "analyze", "--text", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("menu text is required"));
}

#[test]
fn test_workout_log_rejects_bad_input() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["workout", "log", "--group", "chest", "--exercise", "Bench"])
        .assert()
        .failure();

    cli(temp_dir.path())
        .args(["workout", "log", "--group", "glutes", "--exercise", "Bridge:3x10"])
        .assert()
        .failure();

    cli(temp_dir.path())
        .args(["workout", "log", "--group", "legs", "--exercise", "Squats:0x10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sets must be positive"));

    assert!(!temp_dir.path().join("data/workouts.jsonl").exists());
}

#[test]
fn test_medicine_workflow() {
    let temp_dir = setup_test_dir();

    let added = json_output(cli(temp_dir.path()).args([
        "med", "add", "--name", "Vitamin D", "--dosage", "1000 IU", "--time", "20:00",
    ]));
    assert_eq!(added["frequency"], "daily");
    let id = added["id"].as_str().unwrap().to_string();

    cli(temp_dir.path())
        .args(["med", "add", "--name", "Iron", "--dosage", "65mg", "--time", "08:30"])
        .args(["--frequency", "weekly"])
        .assert()
        .success();

    let list = json_output(cli(temp_dir.path()).args(["med", "list"]));
    assert_eq!(list[0]["name"], "Iron"); // ordered by time
    assert_eq!(list[1]["name"], "Vitamin D");

    // Take by id prefix
    cli(temp_dir.path())
        .args(["med", "take", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked Vitamin D taken"));

    let today = json_output(cli(temp_dir.path()).args(["med", "today"]));
    let vitamin = today
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["medicine"]["name"] == "Vitamin D")
        .unwrap();
    assert_eq!(vitamin["taken_today"], true);

    // Weekly medicines are not time-gated
    let upcoming = json_output(cli(temp_dir.path()).args(["med", "upcoming"]));
    let upcoming = upcoming.as_array().unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0]["medicine"]["name"], "Vitamin D");

    // Taken today, so never due
    let due = json_output(cli(temp_dir.path()).args(["med", "due"]));
    assert!(due.as_array().unwrap().is_empty());

    cli(temp_dir.path())
        .args(["med", "delete", id.as_str()])
        .assert()
        .success();
    cli(temp_dir.path())
        .args(["med", "delete", id.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NotFound"));
}

#[test]
fn test_medicine_requires_valid_time() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["med", "add", "--name", "Zinc", "--dosage", "25mg", "--time", "8pm"])
        .assert()
        .failure();

    assert!(!temp_dir.path().join("data/medicines.json").exists());
}

#[test]
fn test_todo_workflow() {
    let temp_dir = setup_test_dir();

    let first = json_output(cli(temp_dir.path()).args(["todo", "add", "Meal prep", "--priority", "high"]));
    assert_eq!(first["priority"], "high");
    let id = first["id"].as_str().unwrap().to_string();

    let done = json_output(cli(temp_dir.path()).args(["todo", "done", id.as_str()]));
    assert_eq!(done["completed"], true);

    cli(temp_dir.path())
        .args(["todo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] Meal prep (high)"));

    let undone = json_output(cli(temp_dir.path()).args(["todo", "undo", id.as_str()]));
    assert_eq!(undone["completed"], false);

    cli(temp_dir.path())
        .args(["todo", "delete", id.as_str()])
        .assert()
        .success();
    let list = json_output(cli(temp_dir.path()).args(["todo", "list"]));
    assert!(list.as_array().unwrap().is_empty());
}

#[test]
fn test_profile_set_and_show() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["profile", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal:   maintenance"))
        .stdout(predicate::str::contains("Weight: not set"));

    let profile = json_output(cli(temp_dir.path()).args([
        "profile", "set", "--goal", "cutting", "--weight", "72.5", "--age", "29",
    ]));
    assert_eq!(profile["fitness_goal"], "cutting");
    assert_eq!(profile["weight_kg"], 72.5);

    cli(temp_dir.path())
        .args(["profile", "set", "--height", "-3"])
        .assert()
        .failure();

    cli(temp_dir.path())
        .args(["profile", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal:   cutting"))
        .stdout(predicate::str::contains("Age:    29"));
}

#[test]
fn test_progress_summary() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ready to start your fitness journey?"));

    log_workout(temp_dir.path(), "legs");

    let value = json_output(cli(temp_dir.path()).arg("progress"));
    assert_eq!(value["weekly"]["weekly_workouts"], 1);
    assert_eq!(value["weekly"]["workout_progress"], 25);
    assert_eq!(
        value["weekly"]["message"],
        "Good start! Every step counts towards your goals!"
    );
    assert_eq!(value["workouts"]["average_duration_minutes"], 45);
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    log_workout(temp_dir.path(), "arms");

    cli(temp_dir.path())
        .args(["workout", "log", "--group", "full-body"])
        .args(["-e", "Squats:4x10@185", "-e", "Push-ups:3x12"])
        .assert()
        .success();

    cli(temp_dir.path())
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 exercise rows"));

    let csv_content = fs::read_to_string(temp_dir.path().join("data/workouts.csv")).unwrap();
    assert!(csv_content.starts_with("workout_id,date,muscle_group,duration_minutes,exercise"));
    assert!(csv_content.contains("Full Body"));
    assert_eq!(csv_content.lines().count(), 4);
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("fitlife.toml");
    fs::write(&config_path, "[ai]\nworkout_temperature = 5.0\n").unwrap();

    cli(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .arg("suggest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("workout_temperature"));
}

#[test]
fn test_config_data_dir_and_key_variable() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("from-config");
    let config_path = temp_dir.path().join("fitlife.toml");
    fs::write(
        &config_path,
        format!(
            "[data]\ndata_dir = {:?}\n\n[ai]\napi_key_env = \"FITLIFE_TEST_UNSET_KEY\"\n",
            data_dir.to_string_lossy()
        ),
    )
    .unwrap();

    Command::new(assert_cmd::cargo::cargo_bin!("fitlife"))
        .env_remove("FITLIFE_TEST_UNSET_KEY")
        .arg("--config")
        .arg(&config_path)
        .args(["suggest", "--accept", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FITLIFE_TEST_UNSET_KEY is not set"));

    assert!(data_dir.join("workouts.jsonl").exists());
}
