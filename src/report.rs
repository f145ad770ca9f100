// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Run aggregation, completeness, and productivity over one batch and bundle the results into a Report
// role: pipeline/pure
// inputs: &WorklogBatch, &ResolvedCalendar, &EngineConfig, optional issue key, upstream warnings
// outputs: Report (no wall-clock fields)
// invariants:
// - completeness and productivity read the same Aggregation
// - warnings are ordered: upstream, aggregation, productivity
// - identical inputs yield identical Reports
// errors: IncompleteData from the completeness checker aborts the whole report
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use tracing::debug;

use crate::aggregate::aggregate;
use crate::calendar::ResolvedCalendar;
use crate::completeness;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::model::{Report, ReportRange, WorklogBatch};
use crate::productivity::score_issues;

pub fn build_report(
  batch: &WorklogBatch,
  calendar: &ResolvedCalendar,
  config: &EngineConfig,
  issue: Option<&str>,
  upstream_warnings: Vec<String>,
) -> Result<Report> {
  let agg = aggregate(&batch.worklogs, &calendar.span);
  debug!(by_day = agg.total_by_day(), by_issue = agg.total_by_issue(), "aggregated worklog hours");
  let checked = completeness::check(&agg.by_day, &calendar.expected)?;
  let scored = score_issues(&batch.issues, &agg, &config.productive);

  let mut warnings = upstream_warnings;
  warnings.extend(agg.warnings.iter().cloned());
  warnings.extend(scored.warnings);

  Ok(Report {
    range: ReportRange {
      label: calendar.span.label.clone(),
      start: calendar.span.start,
      end: calendar.span.end,
      days: calendar.span.len(),
    },
    issue: issue.map(str::to_string),
    config: config.snapshot(),
    working_days: calendar.working_days.as_slice().to_vec(),
    days: checked.days,
    completeness: checked.summary,
    issues: scored.rows,
    productivity: scored.summary,
    warnings,
  })
}
