use jsonschema::validator_for;
use test_support::{cmd_bin, fixture_path, read_schema};

const NOW: &str = "2025-09-05T12:00:00";

fn compile_schema() -> jsonschema::Validator {
  let schema = read_schema("worklog-report.report.schema.json");
  validator_for(&schema).expect("compile schema")
}

fn report(args: &[&str]) -> serde_json::Value {
  let out = cmd_bin("worklog-report")
    .args(["--now-override", NOW, "--tz", "utc"])
    .args(args)
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn normalized_week_conforms_to_schema() {
  let v = report(&["--input", &fixture_path("week_batch.json"), "--period", "weekly"]);
  compile_schema().validate(&v).expect("schema validation failed for weekly report");
}

#[test]
fn raw_export_and_issue_reports_conform_to_schema() {
  let validator = compile_schema();
  let raw = report(&["--input", &fixture_path("jira_raw_batch.json"), "--for", "last 10 days"]);
  validator.validate(&raw).expect("schema validation failed for raw export report");

  let issue = report(&["--input", &fixture_path("week_batch.json"), "--issue", "OPS-101"]);
  assert!(issue["issue"].is_string());
  validator.validate(&issue).expect("schema validation failed for issue report");
}

#[test]
fn weekend_only_report_has_no_percentage_and_still_conforms() {
  let v = report(&["--input", &fixture_path("week_batch.json"), "--start", "2025-09-06", "--end", "2025-09-07"]);
  assert!(v["completeness"].get("percent_days_logged").is_none());
  assert_eq!(v["productivity"]["aggregate"]["status"], "no_data");
  compile_schema().validate(&v).expect("schema validation failed for weekend report");
}
