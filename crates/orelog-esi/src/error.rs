//! Error type for `orelog-esi`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{path} returned {status}")]
  UnexpectedStatus {
    path:   String,
    status: reqwest::StatusCode,
  },

  #[error("invalid base URL in configuration: {0}")]
  InvalidBaseUrl(String),

  /// The SSO rejected a code or refresh-token exchange — typically a
  /// revoked grant. Callers abort the affected character's sync.
  #[error("token exchange rejected: {status}")]
  TokenRejected { status: reqwest::StatusCode },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
