//! Handler for `GET /` — the aggregated dashboard payload.
//!
//! Returns everything the chart frontend needs in one response: the known
//! characters, the flat record listing, the per-ore time series and the
//! character × ore matrix. Rendering is the frontend's concern.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use orelog_core::{
  character::Character,
  chart::{self, DatePoint, OreSeries},
  record::AnnotatedRecord,
  store::LedgerStore,
};
use serde::Serialize;

use crate::{AppState, error::ApiError};

/// Character view stripped of credentials — tokens never leave the store.
#[derive(Debug, Serialize)]
pub struct CharacterSummary {
  pub character_id:   i64,
  pub character_name: String,
  pub latest_seen:    DateTime<Utc>,
}

impl From<&Character> for CharacterSummary {
  fn from(c: &Character) -> Self {
    Self {
      character_id:   c.character_id,
      character_name: c.character_name.clone(),
      latest_seen:    c.latest_seen,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct DashboardPayload {
  pub characters:       Vec<CharacterSummary>,
  pub records:          Vec<AnnotatedRecord>,
  pub chart_data:       Vec<OreSeries<DatePoint>>,
  pub char_chart_names: Vec<String>,
  pub char_chart_data:  Vec<OreSeries<f64>>,
}

/// `GET /`
pub async fn handler<S>(
  State(app): State<AppState<S>>,
) -> Result<Json<DashboardPayload>, ApiError>
where
  S: LedgerStore,
{
  let characters = app
    .store
    .list_characters()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let records = app
    .store
    .list_records_with_names()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let daily = app
    .store
    .daily_ore_totals()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let per_character = app
    .store
    .character_ore_totals()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let chart_data = chart::time_series(&daily);
  let (char_chart_names, char_chart_data) =
    chart::character_matrix(&characters, &per_character);

  Ok(Json(DashboardPayload {
    characters: characters.iter().map(CharacterSummary::from).collect(),
    records,
    chart_data,
    char_chart_names,
    char_chart_data,
  }))
}
