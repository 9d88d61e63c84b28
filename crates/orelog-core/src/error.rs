//! Error types for `orelog-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed ledger entry date: {0:?}")]
  MalformedDate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
