// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the records consumed from the ticketing collaborator and the report model handed to renderers
// role: model/types
// outputs: Serializable structs with stable field names; derived records carry no formatting
// invariants:
// - WorkLogEntry and Issue are read-only facts; every other struct here is derived per run
// - dates serialize as YYYY-MM-DD; hours are plain f64
// - no wall-clock fields, so identical inputs serialize to identical bytes
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One worklog line as produced by the ticketing collaborator.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkLogEntry {
  pub issue_key: String,
  pub date: NaiveDate,
  pub hours_logged: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub activity_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Issue {
  pub key: String,
  #[serde(default)]
  pub estimated_hours: Option<f64>,
  #[serde(default)]
  pub activity_type: Option<String>,
  #[serde(default)]
  pub summary: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub issue_type: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
}

/// Normalized batch document: `{ "issues": [...], "worklogs": [...] }`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct WorklogBatch {
  #[serde(default)]
  pub issues: Vec<Issue>,
  #[serde(default)]
  pub worklogs: Vec<WorkLogEntry>,
}

impl WorklogBatch {
  /// Keep only the records belonging to `key`.
  pub fn retain_issue(&mut self, key: &str) {
    self.issues.retain(|i| i.key == key);
    self.worklogs.retain(|w| w.issue_key == key);
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayRecord {
  pub date: NaiveDate,
  pub expected_hours: f64,
  pub logged_hours: f64,
  pub deficit: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompletenessSummary {
  pub working_days: usize,
  pub incomplete_days: usize,
  pub total_deficit_hours: f64,
  pub incomplete_dates: Vec<NaiveDate>,
  pub expected_hours: f64,
  pub logged_hours: f64,
  pub days_with_logs: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub percent_days_logged: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IssueProductivity {
  pub issue_key: String,
  #[serde(default)]
  pub summary: String,
  pub activity_type: Option<String>,
  pub estimated_hours: Option<f64>,
  pub logged_hours: f64,
  /// `None` when the issue has no usable estimate.
  pub score: Option<f64>,
  pub included: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub issue_type: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note: Option<String>,
}

/// Mean score over the scored productive issues, or an explicit "no data" state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum AggregateScore {
  Score(f64),
  NoData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductivitySummary {
  pub aggregate: AggregateScore,
  pub scored_issues: usize,
  pub included_issues: usize,
  pub excluded_issues: usize,
  pub unscored_issues: usize,
  pub total_estimated_hours: f64,
  pub total_logged_hours: f64,
  pub productive_estimated_hours: f64,
  pub productive_logged_hours: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pooled_score: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportRange {
  pub label: String,
  pub start: NaiveDate,
  pub end: NaiveDate,
  pub days: usize,
}

/// The configuration values a report was computed with.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigSnapshot {
  pub working_hours_per_day: f64,
  pub exclude_weekends: bool,
  pub holidays: Vec<NaiveDate>,
  pub productive_activity_types: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Report {
  pub range: ReportRange,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub issue: Option<String>,
  pub config: ConfigSnapshot,
  pub working_days: Vec<NaiveDate>,
  pub days: Vec<DayRecord>,
  pub completeness: CompletenessSummary,
  pub issues: Vec<IssueProductivity>,
  pub productivity: ProductivitySummary,
  pub warnings: Vec<String>,
}
