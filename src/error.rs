// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed error taxonomy for the reporting engine (date input, collaborator contract, config, batch)
// role: errors/types
// outputs: ReportError enum and the crate-wide Result alias
// invariants:
// - InvalidDateInput is only raised for user-supplied date/period text
// - IncompleteData signals a broken upstream contract, never bad user input
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
  /// A user-supplied date or period could not be turned into a calendar date.
  #[error("invalid date input {input:?}: {reason}")]
  InvalidDateInput { input: String, reason: String },

  /// An aggregated map handed to a later stage is missing data it is guaranteed to have.
  #[error("incomplete data: {0}")]
  IncompleteData(String),

  #[error("configuration error: {0}")]
  Config(String),

  /// The worklog batch document is structurally unusable.
  #[error("malformed worklog batch: {0}")]
  Batch(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error(transparent)]
  Toml(#[from] toml::de::Error),
}

impl ReportError {
  pub fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::InvalidDateInput {
      input: input.into(),
      reason: reason.into(),
    }
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }
}

pub type Result<T> = std::result::Result<T, ReportError>;
