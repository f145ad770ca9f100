// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn a Report into pretty JSON or a plain-text summary
// role: rendering/presentation
// inputs: &Report, OutputFormat
// outputs: String ready for stdout or a file
// invariants:
// - rendering never recomputes figures; it only formats Report fields
// - report figures are unrounded; text output shows hundredths
// - output is deterministic for a given Report
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Write as _;

use anyhow::Result;
use clap::ValueEnum;

use crate::model::{AggregateScore, Report};
use crate::util::round_hours;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
  #[default]
  Json,
  Text,
}

pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
  match format {
    OutputFormat::Json => render_json(report),
    OutputFormat::Text => render_text(report),
  }
}

pub fn render_json(report: &Report) -> Result<String> {
  let mut s = serde_json::to_string_pretty(report)?;
  s.push('\n');
  Ok(s)
}

/// Two decimals, without a stray "-0.00".
fn fixed(v: f64) -> String {
  format!("{:.2}", round_hours(v))
}

pub fn render_text(report: &Report) -> Result<String> {
  let mut out = String::new();
  let r = &report.range;
  let plural = if r.days == 1 { "day" } else { "days" };
  writeln!(out, "Worklog report: {} ({} to {}, {} {plural})", r.label, r.start, r.end, r.days)?;
  if let Some(issue) = &report.issue {
    writeln!(out, "Issue: {issue}")?;
  }

  writeln!(out)?;
  writeln!(out, "Timesheet")?;
  for day in &report.days {
    let weekday = day.date.format("%a");
    if day.expected_hours > 0.0 {
      write!(out, "  {} {weekday} {:>7} / {}h", day.date, fixed(day.logged_hours), fixed(day.expected_hours))?;
      if day.deficit > 0.0 {
        write!(out, "  short {}h", fixed(day.deficit))?;
      }
      writeln!(out)?;
    } else {
      writeln!(out, "  {} {weekday} {:>7}h  (non-working)", day.date, fixed(day.logged_hours))?;
    }
  }
  let c = &report.completeness;
  writeln!(
    out,
    "  working days {}, incomplete {}, deficit {}h, logged {} of {}h",
    c.working_days,
    c.incomplete_days,
    fixed(c.total_deficit_hours),
    fixed(c.logged_hours),
    fixed(c.expected_hours)
  )?;
  if let Some(pct) = c.percent_days_logged {
    writeln!(out, "  days with logs {}/{} ({pct}%)", c.days_with_logs, c.working_days)?;
  }
  if !c.incomplete_dates.is_empty() {
    let dates: Vec<String> = c.incomplete_dates.iter().map(|d| d.to_string()).collect();
    writeln!(out, "  incomplete: {}", dates.join(", "))?;
  }

  writeln!(out)?;
  writeln!(out, "Productivity")?;
  for row in &report.issues {
    let activity = row.activity_type.as_deref().unwrap_or("-");
    let est = row.estimated_hours.map(|e| format!("{}h", fixed(e))).unwrap_or_else(|| "-".into());
    let score = row.score.map(fixed).unwrap_or_else(|| "n/a".into());
    write!(
      out,
      "  {} | {activity} | est {est} | logged {}h | score {score}",
      row.issue_key,
      fixed(row.logged_hours)
    )?;
    if !row.included {
      write!(out, " (excluded)")?;
    }
    if let Some(note) = &row.note {
      write!(out, " [{note}]")?;
    }
    writeln!(out)?;
  }
  let p = &report.productivity;
  match p.aggregate {
    AggregateScore::Score(v) => writeln!(out, "  aggregate: {} over {} scored issue(s)", fixed(v), p.scored_issues)?,
    AggregateScore::NoData => writeln!(out, "  aggregate: no data")?,
  }
  if let Some(pooled) = p.pooled_score {
    writeln!(out, "  pooled: {}", fixed(pooled))?;
  }
  writeln!(
    out,
    "  logged {}h on {} issue(s); productive {}h against {}h estimated",
    fixed(p.total_logged_hours),
    report.issues.len(),
    fixed(p.productive_logged_hours),
    fixed(p.productive_estimated_hours)
  )?;

  if !report.warnings.is_empty() {
    writeln!(out)?;
    writeln!(out, "Warnings")?;
    for w in &report.warnings {
      writeln!(out, "  - {w}")?;
    }
  }

  Ok(out)
}
