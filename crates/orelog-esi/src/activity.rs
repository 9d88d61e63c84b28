//! [`ActivityApi`] implementation — the paginated mining-ledger listing.

use orelog_core::{client::ActivityApi, record::RawMiningEntry};

use crate::{Error, EsiClient, Result};

impl ActivityApi for EsiClient {
  type Error = Error;

  /// `GET /characters/{character_id}/mining/?page=N`
  async fn mining_ledger_page(
    &self,
    character_id: i64,
    page: u32,
    access_token: &str,
  ) -> Result<Vec<RawMiningEntry>> {
    let path = format!("/characters/{character_id}/mining/");
    tracing::debug!(character_id, page, "fetching mining ledger page");
    let resp = self
      .client()
      .get(self.esi_url(&path))
      .query(&[("page", page)])
      .bearer_auth(access_token)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::UnexpectedStatus { path, status: resp.status() });
    }
    Ok(resp.json().await?)
  }
}
