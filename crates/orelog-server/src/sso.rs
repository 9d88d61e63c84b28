//! SSO login and callback handlers.
//!
//! `GET /sso/login` redirects the browser to the SSO authorize page with an
//! unguessable state token; `GET /sso/callback` checks that state (CSRF
//! guard), exchanges the code, verifies the character and upserts it with
//! fresh credentials. No browser session is kept — callback registers the
//! character and redirects to the dashboard.

use axum::{
  extract::{Query, State},
  response::Redirect,
};
use chrono::{Duration, Utc};
use orelog_core::{character::Character, client::TokenExchange, store::LedgerStore};
use rand_core::{OsRng, RngCore};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{AppState, error::ApiError};

/// Generate a non-guessable OAuth state token.
pub fn new_state_token() -> String {
  let mut buf = [0u8; 32];
  OsRng.fill_bytes(&mut buf);
  hex::encode(Sha256::digest(buf))
}

/// `GET /sso/login`
pub async fn login<S>(
  State(app): State<AppState<S>>,
) -> Result<Redirect, ApiError>
where
  S: LedgerStore,
{
  let token = new_state_token();
  let url = app
    .esi
    .authorize_url(&token)
    .map_err(|e| ApiError::Upstream(e.to_string()))?;

  app
    .login_states
    .lock()
    .expect("login state set poisoned")
    .insert(token);

  Ok(Redirect::to(&url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
  pub code:  String,
  pub state: String,
}

/// `GET /sso/callback?code=<code>&state=<state>`
pub async fn callback<S>(
  State(app): State<AppState<S>>,
  Query(params): Query<CallbackParams>,
) -> Result<Redirect, ApiError>
where
  S: LedgerStore,
{
  let known = app
    .login_states
    .lock()
    .expect("login state set poisoned")
    .remove(&params.state);
  if !known {
    return Err(ApiError::Forbidden("login state mismatch".into()));
  }

  let bundle = app
    .esi
    .exchange_code(&params.code)
    .await
    .map_err(|e| ApiError::Upstream(e.to_string()))?;
  let verified = app
    .esi
    .verify(&bundle.access_token)
    .await
    .map_err(|e| ApiError::Upstream(e.to_string()))?;

  // The code exchange always issues a refresh token; a response without one
  // cannot be synced later, so reject it here.
  let refresh_token = bundle
    .refresh_token
    .ok_or_else(|| ApiError::Upstream("SSO response missing refresh token".into()))?;

  let now = Utc::now();
  let character = Character {
    character_id:         verified.character_id,
    character_name:       verified.character_name,
    owner_hash:           verified.owner_hash,
    access_token:         bundle.access_token,
    access_token_expires: now + Duration::seconds(bundle.expires_in),
    refresh_token,
    latest_seen:          now,
  };

  tracing::info!(
    character_id = character.character_id,
    character_name = %character.character_name,
    "character registered via SSO"
  );

  app
    .store
    .upsert_character(character)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Redirect::to("/"))
}
