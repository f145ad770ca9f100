// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fold worklog entries into per-day and per-issue hour totals for one resolved span
// role: aggregation/fold
// inputs: &[WorkLogEntry], &LabeledSpan
// outputs: Aggregation { by_day (every span date), by_issue, activity_by_issue, warnings }
// invariants:
// - by_day has exactly one key per span date, zero-filled
// - entries outside the span, or with negative/non-finite hours, are dropped with a warning and never summed
// - sum(by_day) == sum(by_issue) up to float rounding
// side_effects: tracing::warn! per dropped entry
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::model::WorkLogEntry;
use crate::window::LabeledSpan;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
  pub by_day: BTreeMap<NaiveDate, f64>,
  pub by_issue: BTreeMap<String, f64>,
  /// First non-empty activity type seen on an issue's worklogs.
  pub activity_by_issue: BTreeMap<String, String>,
  pub warnings: Vec<String>,
}

impl Aggregation {
  pub fn total_by_day(&self) -> f64 {
    self.by_day.values().sum()
  }

  pub fn total_by_issue(&self) -> f64 {
    self.by_issue.values().sum()
  }
}

pub fn aggregate(entries: &[WorkLogEntry], span: &LabeledSpan) -> Aggregation {
  let mut agg = Aggregation {
    by_day: span.dates().map(|d| (d, 0.0)).collect(),
    ..Default::default()
  };

  for entry in entries {
    if !entry.hours_logged.is_finite() || entry.hours_logged < 0.0 {
      warn!(issue = %entry.issue_key, date = %entry.date, hours = entry.hours_logged, "dropping worklog with invalid hours");
      agg.warnings.push(format!(
        "dropped worklog on {} dated {} with invalid hours {}",
        entry.issue_key, entry.date, entry.hours_logged
      ));
      continue;
    }
    if !span.contains(entry.date) {
      warn!(issue = %entry.issue_key, date = %entry.date, "dropping worklog outside report span");
      agg.warnings.push(format!(
        "dropped worklog on {} dated {} outside {}..{}",
        entry.issue_key, entry.date, span.start, span.end
      ));
      continue;
    }
    *agg.by_day.entry(entry.date).or_insert(0.0) += entry.hours_logged;
    *agg.by_issue.entry(entry.issue_key.clone()).or_insert(0.0) += entry.hours_logged;

    if let Some(activity) = entry.activity_type.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
      agg
        .activity_by_issue
        .entry(entry.issue_key.clone())
        .or_insert_with(|| activity.to_string());
    }
  }

  agg
}
