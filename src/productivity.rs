// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Score issues as ((estimated - logged) / estimated) * 100 and average over productive activity types
// role: scoring/productivity
// inputs: &[Issue], &Aggregation (per-issue hours inside the span), &ProductiveTypes
// outputs: ScoredIssues { rows sorted by issue key, ProductivitySummary, warnings }
// invariants:
// - score is None whenever the estimate is unset, zero, or non-finite
// - aggregate is the mean over rows that are included and scored; NoData when there are none
// - negative scores are kept as-is
// - rows for non-productive issues never influence aggregate or pooled score
// side_effects: tracing::warn! per unscored issue
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::aggregate::Aggregation;
use crate::model::{AggregateScore, Issue, IssueProductivity, ProductivitySummary};

pub const DEFAULT_PRODUCTIVE_TYPES: &[&str] = &[
  "Project Development",
  "Support",
  "Engineering & R&D",
  "Testing",
  "Code Review",
  "Unit Testing",
];

pub const NOTE_NO_ESTIMATE: &str = "no original estimate";
pub const NOTE_NO_ISSUE_RECORD: &str = "no issue record";

/// Activity types that count toward the aggregate. Matching is exact after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductiveTypes(BTreeSet<String>);

impl ProductiveTypes {
  pub fn new<I, S>(types: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self(
      types
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect(),
    )
  }

  pub fn contains(&self, activity: Option<&str>) -> bool {
    activity.map(str::trim).is_some_and(|a| self.0.contains(a))
  }

  pub fn to_vec(&self) -> Vec<String> {
    self.0.iter().cloned().collect()
  }
}

impl Default for ProductiveTypes {
  fn default() -> Self {
    Self::new(DEFAULT_PRODUCTIVE_TYPES)
  }
}

/// `None` unless `estimated` is a positive finite number.
pub fn productivity_score(estimated: f64, logged: f64) -> Option<f64> {
  if !estimated.is_finite() || estimated <= 0.0 || !logged.is_finite() {
    return None;
  }
  Some((estimated - logged) * 100.0 / estimated)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredIssues {
  pub rows: Vec<IssueProductivity>,
  pub summary: ProductivitySummary,
  pub warnings: Vec<String>,
}

#[derive(Default)]
struct Totals {
  estimated: f64,
  logged: f64,
  productive_estimated: f64,
  productive_logged: f64,
  pooled_estimated: f64,
  pooled_logged: f64,
  scores: Vec<f64>,
}

/// Build one row per issue with hours inside the span.
pub fn score_issues(issues: &[Issue], agg: &Aggregation, productive: &ProductiveTypes) -> ScoredIssues {
  let records: BTreeMap<&str, &Issue> = issues.iter().map(|i| (i.key.as_str(), i)).collect();
  let mut rows = Vec::with_capacity(agg.by_issue.len());
  let mut warnings = Vec::new();
  let mut totals = Totals::default();

  for (key, logged) in &agg.by_issue {
    let record = records.get(key.as_str()).copied();
    let activity_type = record
      .and_then(|r| r.activity_type.as_deref())
      .map(str::trim)
      .filter(|a| !a.is_empty())
      .map(str::to_string)
      .or_else(|| agg.activity_by_issue.get(key).cloned());
    let estimated = record.and_then(|r| r.estimated_hours).filter(|e| e.is_finite());
    let included = productive.contains(activity_type.as_deref());
    let score = estimated.and_then(|e| productivity_score(e, *logged));

    let note = match (record, score) {
      (None, _) => Some(NOTE_NO_ISSUE_RECORD),
      (Some(_), None) => Some(NOTE_NO_ESTIMATE),
      (Some(_), Some(_)) => None,
    };
    if let Some(note) = note {
      warn!(issue = %key, reason = note, "issue has no productivity score");
      warnings.push(format!("{key}: {note}; score undefined"));
    }

    totals.logged += logged;
    totals.estimated += estimated.unwrap_or(0.0);
    if included {
      totals.productive_logged += logged;
      totals.productive_estimated += estimated.unwrap_or(0.0);
      if let (Some(s), Some(e)) = (score, estimated) {
        totals.scores.push(s);
        totals.pooled_estimated += e;
        totals.pooled_logged += logged;
      }
    }

    rows.push(IssueProductivity {
      issue_key: key.clone(),
      summary: record.map(|r| r.summary.clone()).unwrap_or_default(),
      activity_type,
      estimated_hours: estimated,
      logged_hours: *logged,
      score,
      included,
      issue_type: record.and_then(|r| r.issue_type.clone()),
      status: record.and_then(|r| r.status.clone()),
      note: note.map(str::to_string),
    });
  }

  let aggregate = if totals.scores.is_empty() {
    AggregateScore::NoData
  } else {
    let mean = totals.scores.iter().sum::<f64>() / totals.scores.len() as f64;
    AggregateScore::Score(mean)
  };

  let included_issues = rows.iter().filter(|r| r.included).count();
  let summary = ProductivitySummary {
    aggregate,
    scored_issues: totals.scores.len(),
    included_issues,
    excluded_issues: rows.len() - included_issues,
    unscored_issues: rows.iter().filter(|r| r.score.is_none()).count(),
    total_estimated_hours: totals.estimated,
    total_logged_hours: totals.logged,
    productive_estimated_hours: totals.productive_estimated,
    productive_logged_hours: totals.productive_logged,
    pooled_score: productivity_score(totals.pooled_estimated, totals.pooled_logged),
  };

  ScoredIssues { rows, summary, warnings }
}
