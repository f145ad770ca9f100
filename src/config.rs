// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Layer defaults, an optional TOML file, and CLI/env overrides into one immutable EngineConfig
// role: config/loader
// inputs: optional explicit config path; Overrides collected by the CLI (flags and env vars)
// outputs: Settings (serializable, file shape) and EngineConfig (typed, validated, read-only)
// side_effects: reads at most one file
// invariants:
// - precedence: defaults < file < env < flags (env vs flags is resolved by clap before Overrides)
// - working_hours_per_day is finite and > 0 after validate
// - an explicit --config path must exist; a missing default-location file means defaults
// errors: ReportError::Config for invalid values or missing explicit file; Toml/Io bubble unchanged
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{parse_holidays, CalendarConfig, DEFAULT_WORKING_HOURS_PER_DAY};
use crate::error::{ReportError, Result};
use crate::model::ConfigSnapshot;
use crate::productivity::{ProductiveTypes, DEFAULT_PRODUCTIVE_TYPES};
use crate::util::is_known_tz;

pub const DEFAULT_ACTIVITY_FIELD: &str = "customfield_22016";
pub const APP_DIR: &str = "worklog-report";

/// On-disk configuration file shape. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
  pub working_hours_per_day: f64,
  pub exclude_weekends: bool,
  pub productive_activity_types: Vec<String>,
  /// ISO dates; malformed entries are skipped with a warning.
  pub holidays: Vec<String>,
  /// Raw export field that carries the activity type.
  pub activity_field: String,
  /// "local", "utc", or an IANA zone name.
  pub timezone: String,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      working_hours_per_day: DEFAULT_WORKING_HOURS_PER_DAY,
      exclude_weekends: true,
      productive_activity_types: DEFAULT_PRODUCTIVE_TYPES.iter().map(|s| s.to_string()).collect(),
      holidays: Vec::new(),
      activity_field: DEFAULT_ACTIVITY_FIELD.to_string(),
      timezone: "local".to_string(),
    }
  }
}

/// Values from flags or environment. `None` (or empty) leaves the lower layer untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
  pub working_hours_per_day: Option<f64>,
  pub exclude_weekends: Option<bool>,
  pub productive_activity_types: Vec<String>,
  pub holidays: Vec<String>,
  pub activity_field: Option<String>,
  pub timezone: Option<String>,
}

impl Settings {
  /// `<config_dir>/worklog-report/config.toml`, when the platform has a config dir.
  pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
  }

  /// Load from an explicit path, or the default location if present, or built-in defaults.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    match explicit {
      Some(path) => Self::load_path(path, true),
      None => match Self::default_path() {
        Some(path) => Self::load_path(&path, false),
        None => Ok(Self::default()),
      },
    }
  }

  fn load_path(path: &Path, required: bool) -> Result<Self> {
    if !path.exists() {
      if required {
        return Err(ReportError::config(format!("config file not found at: {}", path.display())));
      }
      debug!(path = %path.display(), "no config file; using defaults");
      return Ok(Self::default());
    }
    Self::load_from(path)
  }

  pub fn load_from(path: &Path) -> Result<Self> {
    let contents = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&contents)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(settings)
  }

  pub fn apply(&mut self, o: &Overrides) {
    if let Some(h) = o.working_hours_per_day {
      self.working_hours_per_day = h;
    }
    if let Some(x) = o.exclude_weekends {
      self.exclude_weekends = x;
    }
    if !o.productive_activity_types.is_empty() {
      self.productive_activity_types = o.productive_activity_types.clone();
    }
    if !o.holidays.is_empty() {
      self.holidays = o.holidays.clone();
    }
    if let Some(f) = &o.activity_field {
      self.activity_field = f.clone();
    }
    if let Some(tz) = &o.timezone {
      self.timezone = tz.clone();
    }
  }

  pub fn validate(&self) -> Result<()> {
    if !self.working_hours_per_day.is_finite() || self.working_hours_per_day <= 0.0 {
      return Err(ReportError::config(format!(
        "working_hours_per_day must be a positive number (got {})",
        self.working_hours_per_day
      )));
    }
    if self.activity_field.trim().is_empty() {
      return Err(ReportError::config("activity_field must not be empty"));
    }
    if !is_known_tz(&self.timezone) {
      return Err(ReportError::config(format!("unknown timezone {:?}", self.timezone)));
    }
    Ok(())
  }

  /// Validate and freeze into the typed configuration used for one report.
  pub fn into_engine(self) -> Result<EngineConfig> {
    self.validate()?;
    let parsed = parse_holidays(&self.holidays);
    Ok(EngineConfig {
      calendar: CalendarConfig {
        working_hours_per_day: self.working_hours_per_day,
        exclude_weekends: self.exclude_weekends,
        holidays: parsed.holidays,
      },
      productive: ProductiveTypes::new(&self.productive_activity_types),
      activity_field: self.activity_field.trim().to_string(),
      timezone: self.timezone,
      warnings: parsed.warnings,
    })
  }
}

/// Resolved, validated configuration. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
  pub calendar: CalendarConfig,
  pub productive: ProductiveTypes,
  pub activity_field: String,
  pub timezone: String,
  /// Soft warnings raised while resolving (malformed holidays).
  pub warnings: Vec<String>,
}

#[cfg(test)]
impl Default for EngineConfig {
  fn default() -> Self {
    Settings::default().into_engine().expect("built-in settings are valid")
  }
}

impl EngineConfig {
  pub fn snapshot(&self) -> ConfigSnapshot {
    ConfigSnapshot {
      working_hours_per_day: self.calendar.working_hours_per_day,
      exclude_weekends: self.calendar.exclude_weekends,
      holidays: self.calendar.holidays.iter().copied().collect(),
      productive_activity_types: self.productive.to_vec(),
    }
  }
}
