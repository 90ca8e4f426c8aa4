//! Error types for `adage-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("quote text is too long ({0} characters)")]
  TextTooLong(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
