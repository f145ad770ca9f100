// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Compare per-day logged hours with expected hours and summarize timesheet gaps
// role: completeness/checker
// inputs: date -> logged hours, date -> expected hours (both keyed by every span date)
// outputs: DayRecord per span date (ascending) + CompletenessSummary
// invariants:
// - deficit = max(0, expected - logged); a shortfall that rounds to 0.00h counts as none
// - hours are carried unrounded, so the summary totals equal the sums of the records
// - non-working days (expected 0) are always complete
// - incomplete_days == count(deficit > 0); total_deficit_hours == sum of those deficits
// errors: IncompleteData when the two maps do not cover the same dates
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{ReportError, Result};
use crate::model::{CompletenessSummary, DayRecord};
use crate::util::round_hours;

#[derive(Debug, Clone, PartialEq)]
pub struct Completeness {
  pub days: Vec<DayRecord>,
  pub summary: CompletenessSummary,
}

pub fn check(logged: &BTreeMap<NaiveDate, f64>, expected: &BTreeMap<NaiveDate, f64>) -> Result<Completeness> {
  if let Some(extra) = logged.keys().find(|d| !expected.contains_key(d)) {
    return Err(ReportError::IncompleteData(format!(
      "logged hours present for {extra}, which has no expected-hours entry"
    )));
  }

  let mut days = Vec::with_capacity(expected.len());
  for (date, expected_hours) in expected {
    let logged_hours = logged
      .get(date)
      .copied()
      .ok_or_else(|| ReportError::IncompleteData(format!("no aggregated hours for {date}")))?;
    let shortfall = expected_hours - logged_hours;
    let deficit = if round_hours(shortfall) > 0.0 { shortfall } else { 0.0 };
    days.push(DayRecord {
      date: *date,
      expected_hours: *expected_hours,
      logged_hours,
      deficit,
    });
  }

  let summary = summarize(&days);
  Ok(Completeness { days, summary })
}

fn summarize(days: &[DayRecord]) -> CompletenessSummary {
  let working: Vec<&DayRecord> = days.iter().filter(|d| d.expected_hours > 0.0).collect();
  let incomplete: Vec<&DayRecord> = days.iter().filter(|d| d.deficit > 0.0).collect();
  let days_with_logs = working.iter().filter(|d| d.logged_hours > 0.0).count();
  let percent_days_logged = if working.is_empty() {
    None
  } else {
    Some(((days_with_logs as f64 / working.len() as f64) * 100.0).round() as u32)
  };

  CompletenessSummary {
    working_days: working.len(),
    incomplete_days: incomplete.len(),
    total_deficit_hours: incomplete.iter().map(|d| d.deficit).sum(),
    incomplete_dates: incomplete.iter().map(|d| d.date).collect(),
    expected_hours: days.iter().map(|d| d.expected_hours).sum(),
    logged_hours: days.iter().map(|d| d.logged_hours).sum(),
    days_with_logs,
    percent_days_logged,
  }
}
