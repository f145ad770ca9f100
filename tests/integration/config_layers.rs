use predicates::prelude::*;
use serial_test::serial;
use test_support::{cmd_bin, fixture_path, tempdir, with_env};

const NOW: &str = "2025-09-05T12:00:00";

fn week(extra: &[&str]) -> assert_cmd::Command {
  let mut cmd = cmd_bin("worklog-report");
  cmd
    .args(["--input", &fixture_path("week_batch.json"), "--start", "2025-09-01", "--end", "2025-09-05"])
    .args(["--now-override", NOW])
    .args(extra);
  cmd
}

fn json(cmd: &mut assert_cmd::Command) -> serde_json::Value {
  let out = cmd.output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn config_file_sets_hours_holidays_and_types() {
  let v = json(&mut week(&["--config", &fixture_path("part_time.toml")]));
  assert_eq!(v["config"]["working_hours_per_day"], 4.0);
  assert_eq!(v["config"]["holidays"], serde_json::json!(["2025-09-03"]));
  assert_eq!(v["completeness"]["working_days"], 4);
  assert_eq!(v["completeness"]["total_deficit_hours"], 4.0);
  let warnings = v["warnings"].as_array().unwrap();
  assert!(warnings.iter().any(|w| w.as_str().unwrap().contains("not-a-date")));
  // "Project Development" and "Support" only; OPS-102 has no estimate
  assert_eq!(v["productivity"]["included_issues"], 2);
  assert_eq!(v["productivity"]["scored_issues"], 1);
}

#[test]
fn flags_override_config_file() {
  let v = json(&mut week(&["--config", &fixture_path("part_time.toml"), "--working-hours", "6"]));
  assert_eq!(v["config"]["working_hours_per_day"], 6.0);
}

#[test]
fn env_vars_apply_and_flags_beat_them() {
  let v = json(
    week(&[])
      .env("WORKING_HOURS_PER_DAY", "7")
      .env("EXCLUDE_WEEKENDS", "false")
      .env("HOLIDAYS", "2025-09-01,2025-09-02"),
  );
  assert_eq!(v["config"]["working_hours_per_day"], 7.0);
  assert_eq!(v["config"]["exclude_weekends"], false);
  assert_eq!(v["completeness"]["working_days"], 3);

  let v = json(week(&["--working-hours", "2"]).env("WORKING_HOURS_PER_DAY", "7"));
  assert_eq!(v["config"]["working_hours_per_day"], 2.0);
}

#[test]
fn non_positive_working_hours_are_rejected() {
  week(&["--working-hours", "0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("working_hours_per_day must be a positive number"));
}

#[test]
fn explicit_missing_config_is_an_error() {
  week(&["--config", "/definitely/not/here.toml"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("config file not found"));
}

#[cfg(target_os = "linux")]
#[test]
fn default_config_location_is_used_when_present() {
  let td = tempdir();
  let dir = td.path().join("worklog-report");
  std::fs::create_dir_all(&dir).unwrap();
  std::fs::write(dir.join("config.toml"), "working_hours_per_day = 5.5\n").unwrap();

  let v = json(week(&[]).env("XDG_CONFIG_HOME", td.path()));
  assert_eq!(v["config"]["working_hours_per_day"], 5.5);
}

#[test]
#[serial]
fn rust_log_reaches_the_subscriber() {
  let _guard = with_env(&[("RUST_LOG", "info")]);
  week(&[])
    .assert()
    .success()
    .stderr(predicate::str::contains("loaded worklog batch"));
}

#[test]
#[serial]
fn verbose_wins_over_rust_log() {
  let _guard = with_env(&[("RUST_LOG", "error")]);
  week(&["--verbose"])
    .assert()
    .success()
    .stderr(predicate::str::contains("resolved calendar"));
}
