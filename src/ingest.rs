// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Read one worklog batch document (normalized or raw ticketing export) into Issue and WorkLogEntry records
// role: ingest/collaborator-boundary
// inputs: file path or "-" for stdin; IngestOptions (activity field, timezone, author filter)
// outputs: Ingested { batch, shape, warnings }
// side_effects: reads one file or stdin
// invariants:
// - raw timestamps map to calendar dates in the configured zone
// - a single unreadable worklog is skipped with a warning; only a structurally unusable document is an error
// - estimates in raw exports are seconds and become hours
// errors: ReportError::Batch for unusable documents; Io/Json bubble unchanged
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Read;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ReportError, Result};
use crate::ext::serde_json::JsonFetch;
use crate::model::{Issue, WorkLogEntry, WorklogBatch};
use crate::util::date_in_tz;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchShape {
  Normalized,
  Raw,
}

#[derive(Debug, Clone)]
pub struct IngestOptions<'a> {
  pub activity_field: &'a str,
  pub timezone: &'a str,
  /// Keep only raw worklogs whose author matches by accountId, name, or displayName.
  pub author: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct Ingested {
  pub batch: WorklogBatch,
  pub shape: BatchShape,
  pub warnings: Vec<String>,
}

/// Read the whole input; "-" means stdin.
pub fn read_input(input: &str) -> Result<String> {
  if input == "-" {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    return Ok(buf);
  }
  Ok(std::fs::read_to_string(input)?)
}

pub fn load_batch(input: &str, opts: &IngestOptions<'_>) -> Result<Ingested> {
  let text = read_input(input)?;
  parse_batch(&text, opts)
}

pub fn parse_batch(text: &str, opts: &IngestOptions<'_>) -> Result<Ingested> {
  let doc: Value = serde_json::from_str(text)?;
  let Some(obj) = doc.as_object() else {
    return Err(ReportError::Batch("expected a JSON object at the top level".into()));
  };
  if !obj.contains_key("issues") && !obj.contains_key("worklogs") {
    return Err(ReportError::Batch("document has neither \"issues\" nor \"worklogs\"".into()));
  }
  if obj.get("issues").is_some_and(|v| !v.is_array()) {
    return Err(ReportError::Batch("\"issues\" must be an array".into()));
  }

  let raw = !obj.contains_key("worklogs")
    && doc
      .fetch("issues")
      .to::<Vec<Value>>()
      .is_some_and(|issues| issues.iter().any(|i| i.get("fields").is_some()));

  if raw {
    Ok(parse_raw(&doc, opts))
  } else {
    if opts.author.is_some() {
      debug!("author filter applies to raw exports only; ignoring for normalized batch");
    }
    let batch: WorklogBatch = serde_json::from_value(doc)?;
    Ok(Ingested {
      batch,
      shape: BatchShape::Normalized,
      warnings: Vec::new(),
    })
  }
}

fn parse_raw(doc: &Value, opts: &IngestOptions<'_>) -> Ingested {
  let mut batch = WorklogBatch::default();
  let mut warnings = Vec::new();
  let activity_path = format!("fields.{}", opts.activity_field);

  for (idx, raw_issue) in doc.fetch("issues").to_or_default::<Vec<Value>>().iter().enumerate() {
    let Some(key) = raw_issue.fetch("key").to::<String>() else {
      warn!(index = idx, "skipping raw issue without a key");
      warnings.push(format!("skipped raw issue #{idx} without a key"));
      continue;
    };

    let activity_type = raw_issue.fetch(&activity_path).text();
    batch.issues.push(Issue {
      key: key.clone(),
      estimated_hours: raw_issue.fetch("fields.timeoriginalestimate").to::<f64>().map(|s| s / 3600.0),
      activity_type: activity_type.clone(),
      summary: raw_issue.fetch("fields.summary").to_or_default(),
      issue_type: raw_issue.fetch("fields.issuetype.name").to(),
      status: raw_issue.fetch("fields.status.name").to(),
    });

    let worklogs = raw_issue.fetch("fields.worklog.worklogs").to_or_default::<Vec<Value>>();
    if let Some(total) = raw_issue.fetch("fields.worklog.total").to::<usize>() {
      if total > worklogs.len() {
        warn!(issue = %key, total, inline = worklogs.len(), "raw export truncated worklogs");
        warnings.push(format!("{key}: export carries {} of {total} worklogs", worklogs.len()));
      }
    }

    for wl in &worklogs {
      if let Some(author) = opts.author {
        if !author_matches(wl, author) {
          continue;
        }
      }
      match raw_worklog(&key, wl, activity_type.as_deref(), opts.timezone) {
        Ok(entry) => batch.worklogs.push(entry),
        Err(reason) => {
          warn!(issue = %key, %reason, "skipping unreadable worklog");
          warnings.push(format!("{key}: skipped worklog ({reason})"));
        }
      }
    }
  }

  Ingested {
    batch,
    shape: BatchShape::Raw,
    warnings,
  }
}

fn raw_worklog(key: &str, wl: &Value, activity: Option<&str>, tz: &str) -> std::result::Result<WorkLogEntry, String> {
  let started = wl
    .fetch("started")
    .to::<String>()
    .ok_or_else(|| "missing started timestamp".to_string())?;
  let date = match parse_timestamp(&started) {
    Some(Stamp::Zoned(dt)) => date_in_tz(&dt, tz),
    Some(Stamp::Naive(ndt)) => ndt.date(),
    None => return Err(format!("unrecognized timestamp {started:?}")),
  };
  let seconds = wl
    .fetch("timeSpentSeconds")
    .to::<f64>()
    .ok_or_else(|| "missing timeSpentSeconds".to_string())?;

  Ok(WorkLogEntry {
    issue_key: key.to_string(),
    date,
    hours_logged: seconds / 3600.0,
    activity_type: activity.map(str::to_string),
  })
}

/// Matches on accountId, then name (case-insensitive), then displayName.
fn author_matches(wl: &Value, wanted: &str) -> bool {
  let field = |name: &str| wl.fetch(&format!("author.{name}")).to::<String>();
  if field("accountId").is_some_and(|id| id == wanted) {
    return true;
  }
  if field("name").is_some_and(|n| n.eq_ignore_ascii_case(wanted)) {
    return true;
  }
  field("displayName").is_some_and(|n| n == wanted)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stamp {
  Zoned(DateTime<FixedOffset>),
  Naive(NaiveDateTime),
}

/// Ticketing timestamps: optional fractional seconds; `Z`, `+00:00`, or `+0000` offsets; or no offset at all.
pub fn parse_timestamp(s: &str) -> Option<Stamp> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(Stamp::Zoned(dt));
  }
  for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%:z"] {
    if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
      return Some(Stamp::Zoned(dt));
    }
  }
  for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
      return Some(Stamp::Naive(ndt));
    }
  }
  None
}
