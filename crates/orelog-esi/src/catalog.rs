//! [`CatalogLookup`] implementation — the universe type catalog.

use orelog_core::{client::CatalogLookup, record::OreType};

use crate::{Error, EsiClient, Result};

impl CatalogLookup for EsiClient {
  type Error = Error;

  /// `GET /universe/types/{type_id}/` — only `name` and `volume` are kept.
  async fn ore_type(&self, type_id: i64) -> Result<OreType> {
    let path = format!("/universe/types/{type_id}/");
    let resp = self.client().get(self.esi_url(&path)).send().await?;

    if !resp.status().is_success() {
      return Err(Error::UnexpectedStatus { path, status: resp.status() });
    }
    Ok(resp.json().await?)
  }
}
