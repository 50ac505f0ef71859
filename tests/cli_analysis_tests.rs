// End-to-end runs of the talktime binary over small CSV exports

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const HEADER: &str = "grupo;Tipificación;Turno;TalkingTime;Nombre Agente;Sentido;Inicio";

/// byl/TT: ten calls around 10s plus a 200s call by "slow"
/// romi/TM: eight calls around 20s plus a 300s call by "ana"
fn write_export(dir: &TempDir) -> String {
    let mut lines = vec![HEADER.to_string()];
    for (i, tt) in [10, 11, 9, 10, 12, 10, 11, 9, 10, 10].iter().enumerate() {
        let agent = if i % 2 == 0 { "ana" } else { "bea" };
        lines.push(format!(
            "byl;No Contesta;TT;{};{};Manual;2024-03-04 10:{:02}:00",
            tt, agent, i
        ));
    }
    lines.push("byl;No Contesta;TT;200;slow;Manual;2024-03-05 11:00:00".to_string());
    for tt in [20, 21, 19, 20, 22, 20, 19, 20] {
        lines.push(format!("romi;No Contesta;TM;{};carla;Auto;2024-03-04 09:00:00", tt));
    }
    lines.push("romi;No Contesta;TM;300;ana;Auto;2024-03-06 09:30:00".to_string());
    lines.push("byl;Llamada Completa;TT;45;bea;Manual;2024-03-04 12:00:00".to_string());

    let path = dir.path().join("calls.csv");
    fs::write(&path, lines.join("\n")).unwrap();
    path.to_string_lossy().to_string()
}

fn talktime(data: &str) -> Command {
    let mut cmd = Command::cargo_bin("talktime").unwrap();
    cmd.arg("--data")
        .arg(data)
        .arg("--groups")
        .arg("byl")
        .arg("--classification")
        .arg("No Contesta")
        .arg("--shift")
        .arg("TT")
        .arg("--trim")
        .arg("0")
        .arg("--bin-width")
        .arg("10");
    cmd
}

fn with_comparison(cmd: &mut Command) -> &mut Command {
    cmd.arg("--compare")
        .arg("--compare-groups")
        .arg("romi")
        .arg("--compare-shift")
        .arg("TM")
        .arg("--compare-trim")
        .arg("0")
}

#[test]
fn test_text_report_primary_only() {
    let dir = TempDir::new().unwrap();
    let data = write_export(&dir);

    talktime(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Primary cohort: byl | shift TT | trim 0.0% ===",
        ))
        .stdout(predicate::str::contains("Outliers: 1"))
        .stdout(predicate::str::contains("[P] slow"))
        .stdout(predicate::str::contains("Difference").not());
}

#[test]
fn test_text_report_with_comparison() {
    let dir = TempDir::new().unwrap();
    let data = write_export(&dir);

    with_comparison(&mut talktime(&data))
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Difference (comparison - primary) ==="))
        .stdout(predicate::str::contains("Median:   +10.00"))
        .stdout(predicate::str::contains("[C] ana"))
        .stdout(predicate::str::contains("50.0%"));
}

#[test]
fn test_json_report() {
    let dir = TempDir::new().unwrap();
    let data = write_export(&dir);

    let output = with_comparison(&mut talktime(&data))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["format"], "talktime-json-v1");
    assert_eq!(value["source"]["kind"], "file");
    assert_eq!(value["records"], 21);
    assert_eq!(value["report"]["primary"]["stats"]["count"], 11);
    assert_eq!(value["report"]["comparison"]["outlier_count"], 1);
    assert_eq!(value["report"]["diff"]["median_diff"], 10.0);
}

#[test]
fn test_csv_outliers_follow_sort_flags() {
    let dir = TempDir::new().unwrap();
    let data = write_export(&dir);

    let output = with_comparison(&mut talktime(&data))
        .arg("--format")
        .arg("csv")
        .arg("--sort-outliers")
        .arg("time")
        .arg("--sort-outliers")
        .arg("time")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "cohort,talking_time,agent,classification,shift,direction,start");
    // Second click on the same column sorts descending
    assert!(lines[1].starts_with("comparison,300,ana,"));
    assert!(lines[2].starts_with("primary,200,slow,"));
}

#[test]
fn test_bad_bin_width_is_reported() {
    let dir = TempDir::new().unwrap();
    let data = write_export(&dir);

    talktime(&data)
        .arg("--bin-width")
        .arg("abc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input error"))
        .stderr(predicate::str::contains("'abc' is not a valid number for bin width"));
}

#[test]
fn test_trim_out_of_range_is_reported() {
    let dir = TempDir::new().unwrap();
    let data = write_export(&dir);

    talktime(&data)
        .arg("--trim")
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_empty_group_selection_is_reported() {
    let dir = TempDir::new().unwrap();
    let data = write_export(&dir);

    talktime(&data)
        .arg("--groups")
        .arg("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No groups selected"));
}

#[test]
fn test_no_matching_rows() {
    let dir = TempDir::new().unwrap();
    let data = write_export(&dir);

    talktime(&data)
        .arg("--classification")
        .arg("Cae Muda o Cortada")
        .assert()
        .success()
        .stdout(predicate::str::contains("No data matches the current filters."));
}

#[test]
fn test_missing_file_falls_back_to_synthetic() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.csv");

    let mut cmd = Command::cargo_bin("talktime").unwrap();
    cmd.arg("--data")
        .arg(&missing)
        .arg("--seed")
        .arg("7")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stderr(predicate::str::contains("using synthetic sample data"))
        .stdout(predicate::str::contains("\"kind\": \"synthetic\""));
}

#[test]
fn test_list_values() {
    let dir = TempDir::new().unwrap();
    let data = write_export(&dir);

    let mut cmd = Command::cargo_bin("talktime").unwrap();
    cmd.arg("--data")
        .arg(&data)
        .arg("--list-values")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Groups ===\nbyl\nromi\n"))
        .stdout(predicate::str::contains("=== Shifts ===\nTM\nTT\n"));
}

#[test]
fn test_config_file_with_cli_override() {
    let dir = TempDir::new().unwrap();
    let data = write_export(&dir);
    let config = dir.path().join("talktime.toml");
    fs::write(
        &config,
        format!(
            "data_path = {:?}\nclassification = \"No Contesta\"\nbin_width = \"10\"\n\n[primary]\ngroups = [\"byl\"]\nshift = \"TT\"\ntrim = \"0\"\n",
            data
        ),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("talktime").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("--groups")
        .arg("romi")
        .arg("--shift")
        .arg("TM")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Primary cohort: romi | shift TM | trim 0.0% ===",
        ))
        .stdout(predicate::str::contains("[P] ana"));
}

#[test]
fn test_missing_config_file_fails() {
    let mut cmd = Command::cargo_bin("talktime").unwrap();
    cmd.arg("--config")
        .arg("/nonexistent/talktime.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}
