//! HTTP client for the EVE Online ESI API and SSO token endpoints.
//!
//! One [`EsiClient`] implements all three remote capabilities the sync
//! pipeline consumes: the paginated mining-ledger listing
//! ([`ActivityApi`](orelog_core::client::ActivityApi)), the universe type
//! catalog ([`CatalogLookup`](orelog_core::client::CatalogLookup)), and the
//! SSO token exchange ([`TokenExchange`](orelog_core::client::TokenExchange)).

mod activity;
mod catalog;
mod sso;

pub mod error;

pub use error::{Error, Result};
pub use sso::MINING_SCOPE;

use std::time::Duration;

use serde::Deserialize;

/// Connection settings for ESI and the SSO.
#[derive(Debug, Clone, Deserialize)]
pub struct EsiConfig {
  /// SSO application client id.
  pub client_id:    String,
  /// SSO application secret key.
  pub secret_key:   String,
  /// Registered OAuth callback, e.g. `http://localhost:8080/sso/callback`.
  pub callback_url: String,
  #[serde(default = "default_user_agent")]
  pub user_agent:   String,
  #[serde(default = "default_esi_base_url")]
  pub esi_base_url: String,
  #[serde(default = "default_sso_base_url")]
  pub sso_base_url: String,
}

fn default_user_agent() -> String {
  concat!("orelog/", env!("CARGO_PKG_VERSION")).to_owned()
}

fn default_esi_base_url() -> String {
  "https://esi.evetech.net/latest".to_owned()
}

fn default_sso_base_url() -> String {
  "https://login.eveonline.com".to_owned()
}

/// Async HTTP client for ESI and the SSO.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. Every
/// request carries an explicit timeout so a stalled remote cannot block a
/// sync indefinitely.
#[derive(Clone)]
pub struct EsiClient {
  client: reqwest::Client,
  config: EsiConfig,
}

impl EsiClient {
  pub fn new(config: EsiConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .user_agent(config.user_agent.clone())
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  pub(crate) fn client(&self) -> &reqwest::Client { &self.client }

  pub(crate) fn config(&self) -> &EsiConfig { &self.config }

  pub(crate) fn esi_url(&self, path: &str) -> String {
    format!("{}{path}", self.config.esi_base_url.trim_end_matches('/'))
  }

  pub(crate) fn sso_url(&self, path: &str) -> String {
    format!("{}{path}", self.config.sso_base_url.trim_end_matches('/'))
  }
}
