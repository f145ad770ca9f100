use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod calendar;
mod cli;
mod completeness;
mod config;
mod error;
mod ext;
mod ingest;
mod model;
mod productivity;
mod range_processor;
mod render;
mod report;
mod util;
mod window;

use crate::cli::{normalize, Cli};

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  init_tracing(cli.verbose);

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: pin "now" once so every relative date in this run agrees
  let now = util::effective_now(window::parse_now_override(cfg.now_override.as_deref())).naive_local();

  // Phase 3: resolve, aggregate, score, render
  range_processor::process(&cfg, now)
}
