// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for hour rounding, zone-aware calendar dates, output writing, and man page rendering
// role: utilities/helpers
// inputs: Various primitives; DateTime; output target strings; clap CommandFactory
// outputs: Rounded hours, calendar dates, written files, man page text
// side_effects: write_output creates parent directories and writes files or stdout
// invariants:
// - round_hours never yields negative zero
// - date_in_tz falls back to UTC for unknown zone names
// errors: IO errors bubble with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use clap::CommandFactory;

/// Round to hundredths of an hour.
pub fn round_hours(value: f64) -> f64 {
  let r = (value * 100.0).round() / 100.0;
  if r == 0.0 {
    0.0
  } else {
    r
  }
}

/// Calendar date of an instant in `tz` ("local", "utc", or an IANA name).
pub fn date_in_tz<Z: TimeZone>(dt: &DateTime<Z>, tz: &str) -> NaiveDate {
  let utc = dt.with_timezone(&Utc);
  if tz.eq_ignore_ascii_case("local") {
    return utc.with_timezone(&Local).date_naive();
  }
  if tz.eq_ignore_ascii_case("utc") {
    return utc.date_naive();
  }
  match tz.parse::<Tz>() {
    Ok(zone) => utc.with_timezone(&zone).date_naive(),
    Err(_) => utc.date_naive(),
  }
}

/// Whether `tz` names a zone `date_in_tz` understands without falling back.
pub fn is_known_tz(tz: &str) -> bool {
  tz.eq_ignore_ascii_case("local") || tz.eq_ignore_ascii_case("utc") || tz.parse::<Tz>().is_ok()
}

/// Returns the effective "now" given an optional override.
///
/// When `override_now` is `Some`, that instant is returned; otherwise
/// the current local time is used. Centralizes our handling of test
/// determinism without sprinkling `Local::now()` throughout the code.
pub fn effective_now(override_now: Option<DateTime<Local>>) -> DateTime<Local> {
  override_now.unwrap_or_else(Local::now)
}

/// Write `content` to stdout when `out` is "-", otherwise to the file, creating parent directories.
pub fn write_output(out: &str, content: &str) -> Result<()> {
  if out == "-" {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    lock.write_all(content.as_bytes()).context("writing report to stdout")?;
    if !content.ends_with('\n') {
      lock.write_all(b"\n").context("writing report to stdout")?;
    }
    return Ok(());
  }

  let path = Path::new(out);
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }
  std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;

  Ok(())
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
