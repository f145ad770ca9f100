use predicates::prelude::*;
use test_support::{cmd_bin, fixture_path};

const NOW: &str = "2025-09-05T12:00:00";

fn range_of(args: &[&str]) -> (String, String, String) {
  let batch = fixture_path("week_batch.json");
  let out = cmd_bin("worklog-report")
    .args(["--input", batch.as_str(), "--tz", "utc", "--now-override", NOW])
    .args(args)
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  (
    v["range"]["label"].as_str().unwrap().to_string(),
    v["range"]["start"].as_str().unwrap().to_string(),
    v["range"]["end"].as_str().unwrap().to_string(),
  )
}

#[test]
fn errors_when_no_time_selection() {
  cmd_bin("worklog-report")
    .args(["--input", &fixture_path("week_batch.json")])
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "Provide one of --date, --period/--lookback, --for, or (--start AND --end); or --issue",
    ));
}

#[test]
fn errors_on_ambiguous_selection() {
  cmd_bin("worklog-report")
    .args(["--for", "last week", "--start", "2025-09-01", "--end", "2025-09-05"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Ambiguous time selection"));
}

#[test]
fn unparseable_date_fails_without_partial_output() {
  cmd_bin("worklog-report")
    .args(["--input", &fixture_path("week_batch.json"), "--date", "blursday", "--now-override", NOW])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("invalid date input \"blursday\""));
}

#[test]
fn strict_dates_reject_natural_language() {
  cmd_bin("worklog-report")
    .args(["--input", &fixture_path("week_batch.json"), "--date", "yesterday", "--strict-dates"])
    .args(["--now-override", NOW])
    .assert()
    .failure()
    .stderr(predicate::str::contains("expected YYYY-MM-DD"));
}

#[test]
fn single_day_tokens() {
  assert_eq!(range_of(&["--date", "yesterday"]).1, "2025-09-04");
  assert_eq!(range_of(&["--date", "last monday"]).1, "2025-09-01");
  assert_eq!(range_of(&["--date", "2025-09-02"]).2, "2025-09-02");
}

#[test]
fn lookback_presets_end_today() {
  let (label, start, end) = range_of(&["--period", "weekly"]);
  assert_eq!((label.as_str(), start.as_str(), end.as_str()), ("weekly", "2025-08-30", "2025-09-05"));

  let (_, start, end) = range_of(&["--period", "15-day", "--date", "2025-09-04"]);
  assert_eq!((start.as_str(), end.as_str()), ("2025-08-21", "2025-09-04"));

  let (label, start, _) = range_of(&["--lookback", "3"]);
  assert_eq!((label.as_str(), start.as_str()), ("last 3 days", "2025-09-03"));
}

#[test]
fn for_phrases_resolve_calendar_ranges() {
  let (_, start, end) = range_of(&["--for", "last week"]);
  assert_eq!((start.as_str(), end.as_str()), ("2025-08-25", "2025-08-31"));

  let (_, start, end) = range_of(&["--for", "this month"]);
  assert_eq!((start.as_str(), end.as_str()), ("2025-09-01", "2025-09-05"));
}

#[test]
fn reversed_bounds_are_swapped() {
  let (label, start, end) = range_of(&["--start", "2025-09-05", "--end", "2025-09-01"]);
  assert_eq!(label, "2025-09-01..2025-09-05");
  assert_eq!((start.as_str(), end.as_str()), ("2025-09-01", "2025-09-05"));
}

#[test]
fn zero_lookback_is_invalid() {
  cmd_bin("worklog-report")
    .args(["--input", &fixture_path("week_batch.json"), "--lookback", "0", "--now-override", NOW])
    .assert()
    .failure()
    .stderr(predicate::str::contains("at least one day"));
}
