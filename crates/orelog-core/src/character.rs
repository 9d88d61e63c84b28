//! Character — an authenticated game character tracked by the ledger.
//!
//! The character id is assigned by the remote game API, not by us, so there
//! is no locally generated surrogate key. The SSO credential bundle lives on
//! the character row and is mutated on every token refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked character, including its stored SSO credentials.
///
/// Not `Serialize` on purpose: tokens must never leak into API payloads.
/// Response types expose a separate summary view.
#[derive(Debug, Clone)]
pub struct Character {
  pub character_id:         i64,
  pub character_name:       String,
  /// Changes when the game account owning this character changes; used to
  /// detect account re-linking on login.
  pub owner_hash:           String,
  pub access_token:         String,
  pub access_token_expires: DateTime<Utc>,
  pub refresh_token:        String,
  pub latest_seen:          DateTime<Utc>,
}

impl Character {
  /// Whether the stored access token is still usable at `now`, with a safety
  /// margin so a token does not expire mid-request.
  pub fn token_live_at(&self, now: DateTime<Utc>, skew: chrono::Duration) -> bool {
    self.access_token_expires > now + skew
  }
}

/// Token response from the SSO authorization-code or refresh exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenBundle {
  pub access_token:  String,
  /// The SSO may omit this on refresh, in which case the previously stored
  /// refresh token remains valid.
  pub refresh_token: Option<String>,
  pub expires_in:    i64,
}

/// Identity claims returned by the SSO verify endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedCharacter {
  pub character_id:   i64,
  pub character_name: String,
  pub owner_hash:     String,
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};

  use super::Character;

  fn character(expires_in_secs: i64) -> Character {
    Character {
      character_id:         91_000_001,
      character_name:       "Retribution Endless".into(),
      owner_hash:           "abcdef".into(),
      access_token:         "tok".into(),
      access_token_expires: Utc::now() + Duration::seconds(expires_in_secs),
      refresh_token:        "refresh".into(),
      latest_seen:          Utc::now(),
    }
  }

  #[test]
  fn token_live_within_expiry() {
    let c = character(3600);
    assert!(c.token_live_at(Utc::now(), Duration::seconds(60)));
  }

  #[test]
  fn token_dead_past_expiry() {
    let c = character(-10);
    assert!(!c.token_live_at(Utc::now(), Duration::seconds(60)));
  }

  #[test]
  fn token_dead_inside_skew_window() {
    let c = character(30);
    assert!(!c.token_live_at(Utc::now(), Duration::seconds(60)));
  }
}
