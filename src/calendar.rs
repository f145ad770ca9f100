// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Resolve a period selection plus weekend/holiday rules into working days and expected hours per date
// role: calendar/resolver
// inputs: PeriodSpec, DateParser, invocation instant, CalendarConfig
// outputs: ResolvedCalendar (span, WorkingDaySet, expected hours for every span date)
// invariants:
// - working days are distinct, strictly increasing, and inside the span
// - expected hours are WORKING_HOURS_PER_DAY on working days and 0 otherwise
// - malformed holiday strings are skipped with a warning, never fatal
// errors: InvalidDateInput from the parser; nothing else
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::window::{resolve_span, DateParser, LabeledSpan, PeriodSpec};

pub const DEFAULT_WORKING_HOURS_PER_DAY: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarConfig {
  pub working_hours_per_day: f64,
  pub exclude_weekends: bool,
  pub holidays: BTreeSet<NaiveDate>,
}

impl Default for CalendarConfig {
  fn default() -> Self {
    Self {
      working_hours_per_day: DEFAULT_WORKING_HOURS_PER_DAY,
      exclude_weekends: true,
      holidays: BTreeSet::new(),
    }
  }
}

impl CalendarConfig {
  pub fn is_working_day(&self, date: NaiveDate) -> bool {
    let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
    !(self.exclude_weekends && weekend) && !self.holidays.contains(&date)
  }

  pub fn expected_hours(&self, date: NaiveDate) -> f64 {
    if self.is_working_day(date) {
      self.working_hours_per_day
    } else {
      0.0
    }
  }
}

#[derive(Debug, Default)]
pub struct HolidayParse {
  pub holidays: BTreeSet<NaiveDate>,
  pub warnings: Vec<String>,
}

/// Parse ISO holiday strings, skipping malformed ones.
pub fn parse_holidays<I, S>(raw: I) -> HolidayParse
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut out = HolidayParse::default();
  for entry in raw {
    let s = entry.as_ref().trim();
    if s.is_empty() {
      continue;
    }
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
      Ok(d) => {
        out.holidays.insert(d);
      }
      Err(e) => {
        warn!(holiday = s, error = %e, "skipping malformed holiday entry");
        out.warnings.push(format!("skipped malformed holiday entry {s:?}"));
      }
    }
  }
  out
}

/// Ascending, duplicate-free working dates of one span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(transparent)]
pub struct WorkingDaySet(Vec<NaiveDate>);

impl WorkingDaySet {
  pub fn as_slice(&self) -> &[NaiveDate] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.0.binary_search(&date).is_ok()
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCalendar {
  pub span: LabeledSpan,
  pub working_days: WorkingDaySet,
  /// Expected hours for every date of the span, working or not.
  pub expected: BTreeMap<NaiveDate, f64>,
}

/// Apply weekend/holiday rules to an already-resolved span.
pub fn build_calendar(span: LabeledSpan, config: &CalendarConfig) -> ResolvedCalendar {
  let mut working = Vec::with_capacity(span.len());
  let mut expected = BTreeMap::new();
  for date in span.dates() {
    let hours = config.expected_hours(date);
    if config.is_working_day(date) {
      working.push(date);
    }
    expected.insert(date, hours);
  }
  ResolvedCalendar {
    span,
    working_days: WorkingDaySet(working),
    expected,
  }
}

/// Resolve a period selection into a calendar. Date errors surface here, before any aggregation.
pub fn resolve(
  spec: &PeriodSpec,
  parser: &dyn DateParser,
  now: NaiveDateTime,
  config: &CalendarConfig,
) -> Result<ResolvedCalendar> {
  let span = resolve_span(spec, parser, now)?;
  Ok(build_calendar(span, config))
}
