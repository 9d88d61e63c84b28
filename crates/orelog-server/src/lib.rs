//! HTTP layer and sync orchestration for orelog.
//!
//! Exposes an axum [`Router`] backed by any [`LedgerStore`] plus the
//! concrete [`EsiClient`]. There is no background scheduler: each
//! `GET /update` request runs one synchronous crawl+ingest cycle for one
//! character.

pub mod dashboard;
pub mod error;
pub mod sso;
pub mod sync;
pub mod update;


use std::{
  collections::HashSet,
  path::PathBuf,
  sync::{Arc, Mutex},
};

use axum::{Router, routing::get};
use orelog_core::store::LedgerStore;
use orelog_esi::{EsiClient, EsiConfig};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub esi:        EsiConfig,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
///
/// Holds explicit per-process handles only — no global client or session
/// singletons. Two concurrent requests share nothing mutable except the
/// store (guarded by its own constraints) and the login-state set.
pub struct AppState<S> {
  pub store:        Arc<S>,
  pub esi:          Arc<EsiClient>,
  /// Outstanding SSO state tokens awaiting a callback.
  pub login_states: Arc<Mutex<HashSet<String>>>,
}

impl<S> AppState<S> {
  pub fn new(store: S, esi: EsiClient) -> Self {
    Self {
      store:        Arc::new(store),
      esi:          Arc::new(esi),
      login_states: Arc::new(Mutex::new(HashSet::new())),
    }
  }
}

// Manual impl: `S` itself need not be `Clone` behind the `Arc`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:        self.store.clone(),
      esi:          self.esi.clone(),
      login_states: self.login_states.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the application router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: LedgerStore + 'static,
{
  Router::new()
    .route("/", get(dashboard::handler::<S>))
    .route("/update", get(update::handler::<S>))
    .route("/sso/login", get(sso::login::<S>))
    .route("/sso/callback", get(sso::callback::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
