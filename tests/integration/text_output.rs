use predicates::prelude::*;
use test_support::{cmd_bin, fixture_path, init_insta};

#[test]
fn text_format_summarizes_week() {
  init_insta();
  let out = cmd_bin("worklog-report")
    .args(["--input", &fixture_path("week_batch.json"), "--start", "2025-09-01", "--end", "2025-09-05"])
    .args(["--format", "text"])
    .output()
    .unwrap();
  assert!(out.status.success());
  let text = String::from_utf8(out.stdout).unwrap();
  insta::assert_snapshot!(text.trim_end(), @r###"
Worklog report: 2025-09-01..2025-09-05 (2025-09-01 to 2025-09-05, 5 days)

Timesheet
  2025-09-01 Mon    8.00 / 8.00h
  2025-09-02 Tue    8.00 / 8.00h
  2025-09-03 Wed    8.00 / 8.00h
  2025-09-04 Thu    8.00 / 8.00h
  2025-09-05 Fri    0.00 / 8.00h  short 8.00h
  working days 5, incomplete 1, deficit 8.00h, logged 32.00 of 40.00h
  days with logs 4/5 (80%)
  incomplete: 2025-09-05

Productivity
  OPS-101 | Project Development | est 40.00h | logged 29.00h | score 27.50
  OPS-102 | Support | est 0.00h | logged 1.00h | score n/a [no original estimate]
  OPS-103 | Meetings | est 2.00h | logged 2.00h | score 0.00 (excluded)
  aggregate: 27.50 over 1 scored issue(s)
  pooled: 27.50
  logged 32.00h on 3 issue(s); productive 30.00h against 40.00h estimated

Warnings
  - dropped worklog on OPS-101 dated 2025-08-29 outside 2025-09-01..2025-09-05
  - OPS-102: no original estimate; score undefined
"###);
}

#[test]
fn text_format_writes_to_out_file() {
  let td = test_support::tempdir();
  let target = td.path().join("week.txt");
  cmd_bin("worklog-report")
    .args(["--input", &fixture_path("week_batch.json"), "--date", "2025-09-05", "--format", "text"])
    .args(["--out", &target.to_string_lossy()])
    .assert()
    .success()
    .stdout(predicate::str::is_empty());
  let text = std::fs::read_to_string(&target).unwrap();
  assert!(text.starts_with("Worklog report: 2025-09-05 (2025-09-05 to 2025-09-05, 1 day)"));
  assert!(text.contains("short 8.00h"));
}
