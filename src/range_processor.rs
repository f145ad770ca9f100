// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one report run: config, period resolution, batch ingest, pipeline, rendering, output
// role: processing/orchestrator
// inputs: EffectiveConfig, invocation instant (already resolved from --now-override or the clock)
// outputs: Rendered report on stdout or at --out
// side_effects: Reads config file and batch input; writes the report
// invariants:
// - configuration is resolved once, before anything else, and never re-read
// - an explicit period is resolved before the batch is read, so date errors abort early
// - issue reports without a period cover exactly that issue's worklog dates
// errors: Propagates config/date/ingest/render/write errors with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::calendar::{self, build_calendar};
use crate::cli::EffectiveConfig;
use crate::config::{EngineConfig, Settings};
use crate::ingest::{load_batch, IngestOptions};
use crate::model::Report;
use crate::render::render;
use crate::report::build_report;
use crate::util;
use crate::window::{span_covering, DateParser, IsoDateParser, NaturalDateParser};

pub fn resolve_engine_config(cfg: &EffectiveConfig) -> Result<EngineConfig> {
  let mut settings = Settings::load(cfg.config_path.as_deref()).context("loading configuration")?;
  settings.apply(&cfg.overrides);
  let engine = settings.into_engine().context("validating configuration")?;
  debug!(?engine, "resolved configuration");
  Ok(engine)
}

fn date_parser(strict: bool) -> Box<dyn DateParser> {
  if strict {
    Box::new(IsoDateParser)
  } else {
    Box::new(NaturalDateParser)
  }
}

/// Everything up to (not including) rendering.
pub fn run_report(cfg: &EffectiveConfig, now: NaiveDateTime) -> Result<Report> {
  let engine = resolve_engine_config(cfg)?;
  let parser = date_parser(cfg.strict_dates);

  let resolved = match &cfg.selection {
    Some(spec) => Some(calendar::resolve(spec, parser.as_ref(), now, &engine.calendar)?),
    None => None,
  };

  let opts = IngestOptions {
    activity_field: &engine.activity_field,
    timezone: &engine.timezone,
    author: cfg.author.as_deref(),
  };
  let ingested = load_batch(&cfg.input, &opts).with_context(|| format!("reading worklog batch from {}", cfg.input))?;
  info!(
    shape = ?ingested.shape,
    issues = ingested.batch.issues.len(),
    worklogs = ingested.batch.worklogs.len(),
    "loaded worklog batch"
  );

  let mut batch = ingested.batch;
  if let Some(key) = &cfg.issue {
    batch.retain_issue(key);
  }

  let calendar = match resolved {
    Some(cal) => cal,
    None => {
      let key = cfg.issue.as_deref().unwrap_or_default();
      let span = span_covering(key, batch.worklogs.iter().map(|w| w.date))
        .ok_or_else(|| anyhow!("no worklogs found for issue {key}; pass a period to report on it"))?;
      build_calendar(span, &engine.calendar)
    }
  };
  debug!(start = %calendar.span.start, end = %calendar.span.end, working_days = calendar.working_days.len(), "resolved calendar");

  let mut warnings = engine.warnings.clone();
  warnings.extend(ingested.warnings);
  Ok(build_report(&batch, &calendar, &engine, cfg.issue.as_deref(), warnings)?)
}

pub fn process(cfg: &EffectiveConfig, now: NaiveDateTime) -> Result<()> {
  let report = run_report(cfg, now)?;
  let text = render(&report, cfg.format)?;
  util::write_output(&cfg.out, &text)
}
