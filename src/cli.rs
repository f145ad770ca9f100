use anyhow::{bail, Result};
use clap::builder::BoolishValueParser;
use clap::Parser;
use std::path::PathBuf;

use crate::config::Overrides;
use crate::render::OutputFormat;
use crate::window::{Period, PeriodSpec};

#[derive(Parser, Debug)]
#[command(
    name = "worklog-report",
    version,
    about = "Productivity and timesheet-completeness reports from issue worklogs",
    long_about = None
)]
pub struct Cli {
  /// Worklog batch JSON (normalized or raw ticketing export); "-" reads stdin
  #[arg(long, default_value = "-")]
  pub input: String,

  /// Single report date ("today", "yesterday", "last friday", 2025-09-01, ...);
  /// with --period/--lookback it anchors the lookback instead
  #[arg(long)]
  pub date: Option<String>,

  /// Lookback preset ending at --date or today
  #[arg(long, value_enum)]
  pub period: Option<Period>,

  /// Lookback of N days ending at --date or today
  #[arg(long)]
  pub lookback: Option<u32>,

  /// Inclusive range start; must be paired with --end
  #[arg(long)]
  pub start: Option<String>,

  /// Inclusive range end; must be paired with --start
  #[arg(long)]
  pub end: Option<String>,

  /// Natural language range, e.g. "last week", "this month", "last 10 days"
  #[arg(long = "for")]
  pub for_str: Option<String>,

  /// Report on one issue; without a period the range covers its worklogs
  #[arg(long)]
  pub issue: Option<String>,

  /// TOML configuration file (default: <config dir>/worklog-report/config.toml when present)
  #[arg(long)]
  pub config: Option<PathBuf>,

  /// Expected hours on a working day
  #[arg(long = "working-hours", env = "WORKING_HOURS_PER_DAY")]
  pub working_hours: Option<f64>,

  /// Treat Saturday and Sunday as non-working days
  #[arg(long, env = "EXCLUDE_WEEKENDS", value_parser = BoolishValueParser::new())]
  pub exclude_weekends: Option<bool>,

  /// Holiday date (YYYY-MM-DD); repeatable or comma-separated
  #[arg(long = "holiday", env = "HOLIDAYS", value_delimiter = ',')]
  pub holidays: Vec<String>,

  /// Activity type counted as productive; repeatable or comma-separated
  #[arg(long = "productive-type", env = "PRODUCTIVE_ACTIVITY_TYPES", value_delimiter = ',')]
  pub productive_types: Vec<String>,

  /// Raw export field holding the activity type
  #[arg(long)]
  pub activity_field: Option<String>,

  /// Raw exports: keep only worklogs by this accountId, name, or display name
  #[arg(long)]
  pub author: Option<String>,

  /// Zone for turning worklog timestamps into dates: local, utc, or an IANA name
  #[arg(long)]
  pub tz: Option<String>,

  /// Accept only YYYY-MM-DD dates
  #[arg(long)]
  pub strict_dates: bool,

  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
  pub format: OutputFormat,

  /// Output file (default stdout "-")
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Debug logging on stderr
  #[arg(short, long)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant for natural-language parsing (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub input: String,
  /// `None` only for issue reports without an explicit range.
  pub selection: Option<PeriodSpec>,
  pub issue: Option<String>,
  pub config_path: Option<PathBuf>,
  pub overrides: Overrides,
  pub author: Option<String>,
  pub strict_dates: bool,
  pub format: OutputFormat,
  pub out: String,
  pub now_override: Option<String>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let lookback = match (cli.period, cli.lookback) {
    (Some(_), Some(_)) => bail!("Choose only one of --period or --lookback"),
    (Some(p), None) => Some((p.lookback_days(), p.label().to_string())),
    (None, Some(n)) => Some((n, format!("last {n} days"))),
    (None, None) => None,
  };

  let between = match (&cli.start, &cli.end) {
    (Some(s), Some(e)) => Some(PeriodSpec::Between {
      start: s.clone(),
      end: e.clone(),
    }),
    (None, None) => None,
    _ => bail!("--start and --end must be given together"),
  };

  let selection = match (lookback, between, cli.for_str.clone(), cli.date.clone()) {
    (Some((days, label)), None, None, anchor) => Some(PeriodSpec::Lookback { anchor, days, label }),
    (None, Some(spec), None, None) => Some(spec),
    (None, None, Some(phrase), None) => Some(PeriodSpec::Phrase { phrase }),
    (None, None, None, Some(token)) => Some(PeriodSpec::Day { token }),
    (None, None, None, None) if cli.issue.is_some() => None,
    (None, None, None, None) => {
      bail!("Provide one of --date, --period/--lookback, --for, or (--start AND --end); or --issue")
    }
    _ => bail!("Ambiguous time selection: choose only one of --date | --period/--lookback | --for | --start/--end"),
  };

  if cli.issue.as_deref().is_some_and(|k| k.trim().is_empty()) {
    bail!("--issue must not be empty");
  }

  Ok(EffectiveConfig {
    input: cli.input,
    selection,
    issue: cli.issue.map(|k| k.trim().to_string()),
    config_path: cli.config,
    overrides: Overrides {
      working_hours_per_day: cli.working_hours,
      exclude_weekends: cli.exclude_weekends,
      productive_activity_types: cli.productive_types,
      holidays: cli.holidays,
      activity_field: cli.activity_field,
      timezone: cli.tz,
    },
    author: cli.author,
    strict_dates: cli.strict_dates,
    format: cli.format,
    out: cli.out,
    now_override: cli.now_override,
  })
}
