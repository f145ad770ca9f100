use chrono::{DateTime, Datelike, Days, Duration, Local, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_english::{parse_date_string, parse_duration, Dialect, Interval};
use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use two_timer::{parse as parse_natural, Config as NaturalConfig};

use crate::error::{ReportError, Result};

// Period selection and date-token resolution live here so the calendar stays purely about working days.

/// Longest span a report may cover.
pub const MAX_SPAN_DAYS: u32 = 3660;

/// Report presets from the classic menu. Each one is just a lookback length.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Period {
  Daily,
  Weekly,
  #[value(name = "15-day", alias = "fortnight")]
  #[serde(rename = "15-day")]
  FifteenDay,
  Monthly,
}

impl Period {
  pub fn lookback_days(self) -> u32 {
    match self {
      Period::Daily => 1,
      Period::Weekly => 7,
      Period::FifteenDay => 15,
      Period::Monthly => 30,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Period::Daily => "daily",
      Period::Weekly => "weekly",
      Period::FifteenDay => "15-day",
      Period::Monthly => "monthly",
    }
  }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum PeriodSpec {
  Day { token: String },
  Lookback { anchor: Option<String>, days: u32, label: String },
  Between { start: String, end: String },
  Phrase { phrase: String },
}

/// Inclusive calendar span with a human label.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct LabeledSpan {
  pub label: String,
  pub start: NaiveDate,
  pub end: NaiveDate,
}

impl LabeledSpan {
  pub fn new(label: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
    Self {
      label: label.into(),
      start,
      end,
    }
  }

  pub fn single(date: NaiveDate) -> Self {
    Self::new(date.format("%Y-%m-%d").to_string(), date, date)
  }

  /// Every calendar date in the span, ascending.
  pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
    self.start.iter_days().take_while(move |d| *d <= self.end)
  }

  pub fn len(&self) -> usize {
    ((self.end - self.start).num_days() + 1).max(0) as usize
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }
}

/// Turns one user-supplied token into a calendar date.
///
/// `now` is the invocation instant; relative tokens are resolved against it.
pub trait DateParser {
  fn parse_date(&self, input: &str, now: NaiveDateTime) -> Result<NaiveDate>;
}

/// Accepts `YYYY-MM-DD` only.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsoDateParser;

impl DateParser for IsoDateParser {
  fn parse_date(&self, input: &str, _now: NaiveDateTime) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
      .map_err(|e| ReportError::invalid_date(input, format!("expected YYYY-MM-DD ({e})")))
  }
}

/// Natural-language tokens ("today", "last friday", "3 days ago", "24th Aug") plus ISO dates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalDateParser;

static RE_LAST_WEEKDAY: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^last\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)$").unwrap());
static RE_ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})(st|nd|rd|th)\b").unwrap());
static RE_LAST_N: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^(?:last|past)\s+(\d+)\s+(days?|weeks?)$").unwrap());

impl DateParser for NaturalDateParser {
  fn parse_date(&self, input: &str, now: NaiveDateTime) -> Result<NaiveDate> {
    let phrase = input.trim().to_lowercase();
    let today = now.date();

    if phrase.is_empty() {
      return Err(ReportError::invalid_date(input, "empty date"));
    }

    match phrase.as_str() {
      "today" | "now" => return Ok(today),
      "yesterday" => return Ok(today - Duration::days(1)),
      "tomorrow" => return Ok(today + Duration::days(1)),
      _ => {}
    }

    if let Ok(d) = NaiveDate::parse_from_str(&phrase, "%Y-%m-%d") {
      return Ok(d);
    }

    // last <weekday>: strictly previous occurrence, never today
    if let Some(caps) = RE_LAST_WEEKDAY.captures(&phrase) {
      let target_idx = weekday_index(&caps[1]);
      let cur_idx = today.weekday().num_days_from_monday() as i64;
      let mut delta_days = cur_idx - target_idx;
      if delta_days <= 0 {
        delta_days += 7;
      }
      return Ok(today - Duration::days(delta_days));
    }

    // Duration/"ago" forms via chrono-english, before the date grammar can misread them
    if let Ok(interval) = parse_duration(&phrase) {
      let shifted = match interval {
        Interval::Seconds(secs) => now.checked_add_signed(Duration::seconds(secs.into())).map(|t| t.date()),
        Interval::Days(days) => today.checked_add_signed(Duration::days(days.into())),
        Interval::Months(months) => shift_months(today, months),
      };
      return shifted.ok_or_else(|| ReportError::invalid_date(input, "date out of range"));
    }

    let cleaned = RE_ORDINAL.replace_all(&phrase, "$1").to_string();
    let anchor = Utc.from_utc_datetime(&now);
    if let Ok(dt) = parse_date_string(&cleaned, anchor, Dialect::Uk) {
      return Ok(dt.naive_utc().date());
    }

    if let Ok((start, _end, _)) = parse_natural(&cleaned, Some(NaturalConfig::new().now(now))) {
      return Ok(start.date());
    }

    Err(ReportError::invalid_date(input, "unrecognized date"))
  }
}

fn weekday_index(name: &str) -> i64 {
  match name {
    "monday" => 0,
    "tuesday" => 1,
    "wednesday" => 2,
    "thursday" => 3,
    "friday" => 4,
    "saturday" => 5,
    "sunday" => 6,
    _ => 0,
  }
}

fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
  if months < 0 {
    date.checked_sub_months(Months::new(months.unsigned_abs()))
  } else {
    date.checked_add_months(Months::new(months as u32))
  }
}

fn start_of_week(date: NaiveDate) -> NaiveDate {
  date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
  date.with_day(1).unwrap_or(date)
}

fn lookback_span(label: impl Into<String>, anchor: NaiveDate, days: u32) -> Result<LabeledSpan> {
  let label = label.into();
  if days > MAX_SPAN_DAYS {
    return Err(ReportError::invalid_date(label, format!("lookback is limited to {MAX_SPAN_DAYS} days")));
  }
  let start = anchor
    .checked_sub_days(Days::new(days.saturating_sub(1).into()))
    .ok_or_else(|| ReportError::invalid_date(label.clone(), "date out of range"))?;
  Ok(LabeledSpan::new(label, start, anchor))
}

/// Resolve a natural range phrase ("last week", "this month", "last 10 days", ...).
fn phrase_span(input: &str, parser: &dyn DateParser, now: NaiveDateTime) -> Result<LabeledSpan> {
  let phrase = input.trim().to_lowercase();
  let today = now.date();

  match phrase.as_str() {
    "today" => return Ok(LabeledSpan::new(phrase.clone(), today, today)),
    "yesterday" => {
      let d = today - Duration::days(1);
      return Ok(LabeledSpan::new(phrase.clone(), d, d));
    }
    "this week" => return Ok(LabeledSpan::new(phrase.clone(), start_of_week(today), today)),
    "last week" => {
      let start_this_week = start_of_week(today);
      return Ok(LabeledSpan::new(
        phrase.clone(),
        start_this_week - Duration::days(7),
        start_this_week - Duration::days(1),
      ));
    }
    "this month" => return Ok(LabeledSpan::new(phrase.clone(), first_of_month(today), today)),
    "last month" => {
      let first_this = first_of_month(today);
      let last_prev = first_this - Duration::days(1);
      return Ok(LabeledSpan::new(phrase.clone(), first_of_month(last_prev), last_prev));
    }
    _ => {}
  }

  if let Some(caps) = RE_LAST_N.captures(&phrase) {
    let n: u32 = caps[1]
      .parse()
      .map_err(|_| ReportError::invalid_date(input, "count out of range"))?;
    let days = if caps[2].starts_with("week") { n.saturating_mul(7) } else { n };
    if days == 0 {
      return Err(ReportError::invalid_date(input, "lookback must cover at least one day"));
    }
    return lookback_span(phrase.clone(), today, days);
  }

  if let Ok((start, end, _)) = parse_natural(&phrase, Some(NaturalConfig::new().now(now))) {
    // two_timer ends are exclusive
    let start_date = start.date();
    let mut end_date = end.checked_sub_signed(Duration::seconds(1)).unwrap_or(end).date().max(start_date);
    if start_date <= today && end_date > today {
      end_date = today;
    }
    return Ok(LabeledSpan::new(phrase, start_date, end_date));
  }

  let d = parser.parse_date(input, now)?;
  Ok(LabeledSpan::new(phrase, d, d))
}

/// Resolve a period selection into a concrete inclusive span of at most `MAX_SPAN_DAYS` days.
pub fn resolve_span(spec: &PeriodSpec, parser: &dyn DateParser, now: NaiveDateTime) -> Result<LabeledSpan> {
  let span = match spec {
    PeriodSpec::Day { token } => LabeledSpan::single(parser.parse_date(token, now)?),
    PeriodSpec::Lookback { anchor, days, label } => {
      if *days == 0 {
        return Err(ReportError::invalid_date(days.to_string(), "lookback must cover at least one day"));
      }
      let anchor_date = match anchor {
        Some(token) => parser.parse_date(token, now)?,
        None => now.date(),
      };
      lookback_span(label.clone(), anchor_date, *days)?
    }
    PeriodSpec::Between { start, end } => {
      let mut s = parser.parse_date(start, now)?;
      let mut e = parser.parse_date(end, now)?;
      if s > e {
        debug!(%s, %e, "start after end; swapping");
        std::mem::swap(&mut s, &mut e);
      }
      LabeledSpan::new(format!("{s}..{e}"), s, e)
    }
    PeriodSpec::Phrase { phrase } => phrase_span(phrase, parser, now)?,
  };
  if span.len() > MAX_SPAN_DAYS as usize {
    return Err(ReportError::invalid_date(
      span.label.clone(),
      format!("span of {} days exceeds the {MAX_SPAN_DAYS}-day limit", span.len()),
    ));
  }
  Ok(span)
}

/// Smallest span covering `dates`, or `None` when there are none.
pub fn span_covering<I>(label: impl Into<String>, dates: I) -> Option<LabeledSpan>
where
  I: IntoIterator<Item = NaiveDate>,
{
  let mut it = dates.into_iter();
  let first = it.next()?;
  let (lo, hi) = it.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
  Some(LabeledSpan::new(label, lo, hi))
}

/// Parse a `--now-override` string into a local DateTime.
/// Accepts RFC3339 (e.g. 2025-08-15T12:00:00Z) or a naive local timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Local>> {
  s.and_then(|raw| {
    DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Local))
      .or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .and_then(|ndt| ndt.and_local_timezone(Local).single())
      })
  })
}
