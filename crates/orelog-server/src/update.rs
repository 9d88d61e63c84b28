//! Handler for `GET /update` — one synchronous sync pass for one character.

use axum::{Json, extract::{Query, State}};
use orelog_core::store::LedgerStore;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError, sync::{self, SyncError}};

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
  pub character_id: i64,
}

/// `GET /update?character_id=<id>`
///
/// Responds with an empty success payload whether or not the pass fully
/// completed: a mid-pass failure keeps the records committed so far and is
/// logged rather than surfaced, so callers cannot distinguish a full sync
/// from a partial one. Only an unknown character id is a caller error.
pub async fn handler<S>(
  State(app): State<AppState<S>>,
  Query(params): Query<UpdateParams>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: LedgerStore,
{
  match sync::sync_character(
    app.store.as_ref(),
    app.esi.as_ref(),
    app.esi.as_ref(),
    app.esi.as_ref(),
    params.character_id,
  )
  .await
  {
    Ok(_) => {}
    Err(SyncError::UnknownCharacter(id)) => {
      return Err(ApiError::NotFound(format!("character {id} not found")));
    }
    Err(e) => {
      tracing::warn!(
        character_id = params.character_id,
        error = %e,
        "sync failed; records committed so far are kept"
      );
    }
  }

  Ok(Json(json!({ "result": {} })))
}
