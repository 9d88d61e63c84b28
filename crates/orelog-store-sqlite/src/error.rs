//! Error type for `orelog-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to write a record for a character that does not exist.
  #[error("character not found: {0}")]
  CharacterNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
