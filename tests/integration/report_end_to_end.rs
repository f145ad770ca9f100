use test_support::{cmd_bin, fixture_path, read_fixture_text, tempdir};

const NOW: &str = "2025-09-05T12:00:00";

fn run_json(args: &[&str]) -> serde_json::Value {
  let out = cmd_bin("worklog-report")
    .args(["--now-override", NOW, "--tz", "utc"])
    .args(args)
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

fn week_args() -> Vec<String> {
  vec![
    "--input".into(),
    fixture_path("week_batch.json"),
    "--start".into(),
    "2025-09-01".into(),
    "--end".into(),
    "2025-09-05".into(),
  ]
}

fn as_strs(v: &[String]) -> Vec<&str> {
  v.iter().map(String::as_str).collect()
}

#[test]
fn friday_gap_is_the_only_incomplete_day() {
  let v = run_json(&as_strs(&week_args()));
  let c = &v["completeness"];
  assert_eq!(c["working_days"], 5);
  assert_eq!(c["incomplete_days"], 1);
  assert_eq!(c["total_deficit_hours"], 8.0);
  assert_eq!(c["incomplete_dates"], serde_json::json!(["2025-09-05"]));
  assert_eq!(c["percent_days_logged"], 80);
  assert_eq!(v["days"].as_array().unwrap().len(), 5);

  // out-of-span worklog (2025-08-29) and the zero estimate both surface as warnings
  let warnings = v["warnings"].as_array().unwrap();
  assert!(warnings.iter().any(|w| w.as_str().unwrap().contains("2025-08-29")));
  assert!(warnings.iter().any(|w| w.as_str().unwrap().starts_with("OPS-102")));
}

#[test]
fn productivity_uses_only_productive_scored_issues() {
  let v = run_json(&as_strs(&week_args()));
  let issues = v["issues"].as_array().unwrap();
  assert_eq!(issues.len(), 3);

  let by_key = |k: &str| issues.iter().find(|i| i["issue_key"] == k).unwrap().clone();
  assert_eq!(by_key("OPS-101")["score"], 27.5);
  assert_eq!(by_key("OPS-101")["logged_hours"], 29.0);
  assert!(by_key("OPS-102")["score"].is_null());
  assert_eq!(by_key("OPS-102")["note"], "no original estimate");
  assert_eq!(by_key("OPS-103")["included"], false);

  let p = &v["productivity"];
  assert_eq!(p["aggregate"], serde_json::json!({ "status": "score", "value": 27.5 }));
  assert_eq!(p["scored_issues"], 1);
  assert_eq!(p["excluded_issues"], 1);
  assert_eq!(p["pooled_score"], 27.5);
}

#[test]
fn holiday_removes_expected_hours_but_keeps_logged_hours() {
  let mut args = week_args();
  args.extend(["--holiday".to_string(), "2025-09-03".to_string()]);
  let v = run_json(&as_strs(&args));
  let wed = v["days"].as_array().unwrap().iter().find(|d| d["date"] == "2025-09-03").unwrap().clone();
  assert_eq!(wed["expected_hours"], 0.0);
  assert_eq!(wed["logged_hours"], 8.0);
  assert_eq!(wed["deficit"], 0.0);
  assert_eq!(v["completeness"]["working_days"], 4);
  assert_eq!(v["completeness"]["logged_hours"], 32.0);
  assert_eq!(v["working_days"].as_array().unwrap().len(), 4);
}

#[test]
fn no_productive_issue_reports_no_data() {
  let mut args = week_args();
  args.extend(["--productive-type".to_string(), "Design".to_string()]);
  let v = run_json(&as_strs(&args));
  assert_eq!(v["productivity"]["aggregate"], serde_json::json!({ "status": "no_data" }));
  assert!(v["productivity"].get("pooled_score").is_none());
}

#[test]
fn issue_report_covers_that_issues_worklogs() {
  let v = run_json(&["--input", &fixture_path("week_batch.json"), "--issue", "OPS-103"]);
  assert_eq!(v["issue"], "OPS-103");
  assert_eq!(v["range"]["start"], "2025-09-02");
  assert_eq!(v["range"]["end"], "2025-09-04");
  assert_eq!(v["issues"].as_array().unwrap().len(), 1);
  assert_eq!(v["issues"][0]["score"], 0.0);
}

#[test]
fn stdin_input_and_identical_bytes_across_runs() {
  let batch = read_fixture_text("week_batch.json");
  let run = || {
    cmd_bin("worklog-report")
      .args(["--now-override", NOW, "--for", "this week"])
      .write_stdin(batch.clone())
      .output()
      .unwrap()
  };
  let a = run();
  let b = run();
  assert!(a.status.success());
  assert_eq!(a.stdout, b.stdout);
}

#[test]
fn out_writes_file_and_keeps_stdout_empty() {
  let td = tempdir();
  let target = td.path().join("reports/week.json");
  let mut args = week_args();
  args.extend(["--out".to_string(), target.to_string_lossy().into_owned()]);
  let out = cmd_bin("worklog-report")
    .args(["--now-override", NOW])
    .args(&args)
    .output()
    .unwrap();
  assert!(out.status.success());
  assert!(out.stdout.is_empty());
  let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&target).unwrap()).unwrap();
  assert_eq!(v["range"]["days"], 5);
}

#[test]
fn missing_input_file_is_reported() {
  let out = cmd_bin("worklog-report")
    .args(["--input", "/definitely/missing.json", "--date", "2025-09-01"])
    .output()
    .unwrap();
  assert!(!out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("reading worklog batch"));
}
