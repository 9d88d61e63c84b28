//! The crawl → enrich → ingest pipeline for one character.
//!
//! One call to [`sync_character`] is one complete, best-effort sync pass:
//! credential gating, pagination to exhaustion, per-record catalog lookup
//! and insert-if-absent write. All failures here are scoped to the one
//! character being synced; nothing is retried within a pass.

use chrono::{Duration, Utc};
use thiserror::Error;

use orelog_core::{
  character::Character,
  client::{ActivityApi, CatalogLookup, TokenExchange},
  record::{InsertOutcome, MiningRecord, RawMiningEntry},
  store::LedgerStore,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Seconds before nominal expiry at which a token is treated as expired,
/// so it cannot lapse mid-crawl.
const REFRESH_SKEW_SECS: i64 = 60;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Failure of one character's sync pass. Never fatal to the process.
#[derive(Debug, Error)]
pub enum SyncError {
  #[error("unknown character: {0}")]
  UnknownCharacter(i64),

  /// The SSO rejected the refresh exchange (e.g. revoked grant). The
  /// stored credential is left unchanged.
  #[error("credential refresh failed: {0}")]
  CredentialRefresh(#[source] BoxError),

  /// A catalog lookup failed mid-ingest. Records committed before the
  /// failure remain committed.
  #[error("remote fetch failed: {0}")]
  RemoteFetch(#[source] BoxError),

  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

// ─── Credential gating ───────────────────────────────────────────────────────

/// Return an access token guaranteed valid for immediate use.
///
/// When the stored token is still live (beyond the skew window) it is
/// returned as-is and the SSO is not contacted. Otherwise the refresh
/// exchange runs exactly once and the new bundle is persisted before the
/// token is handed out.
pub async fn live_access_token<S, T>(
  store: &S,
  exchange: &T,
  character: &Character,
) -> Result<String, SyncError>
where
  S: LedgerStore,
  T: TokenExchange,
{
  let now = Utc::now();
  if character.token_live_at(now, Duration::seconds(REFRESH_SKEW_SECS)) {
    return Ok(character.access_token.clone());
  }

  let bundle = exchange
    .refresh(&character.refresh_token)
    .await
    .map_err(|e| SyncError::CredentialRefresh(Box::new(e)))?;

  let expires_at = now + Duration::seconds(bundle.expires_in);
  store
    .update_tokens(
      character.character_id,
      bundle.access_token.clone(),
      expires_at,
      bundle.refresh_token.clone(),
    )
    .await
    .map_err(|e| SyncError::Store(Box::new(e)))?;

  tracing::debug!(
    character_id = character.character_id,
    "access token refreshed"
  );
  Ok(bundle.access_token)
}

// ─── Crawl ───────────────────────────────────────────────────────────────────

/// Result of paginating a character's ledger.
///
/// `entries` holds everything fetched before the crawl ended; when `error`
/// is set the crawl stopped early but the partial results are still valid
/// and are handed on to ingestion.
pub struct CrawlOutcome<E> {
  pub entries: Vec<RawMiningEntry>,
  pub error:   Option<E>,
}

/// Page through the remote ledger until a page comes back empty.
///
/// Termination is decided solely by the empty page — no total-count field
/// is trusted. A failed page request ends the crawl without discarding
/// pages already fetched and without retrying (best-effort single pass).
pub async fn crawl<A>(
  api: &A,
  character_id: i64,
  access_token: &str,
) -> CrawlOutcome<A::Error>
where
  A: ActivityApi,
{
  let mut entries = Vec::new();
  let mut page = 1u32;

  loop {
    match api.mining_ledger_page(character_id, page, access_token).await {
      Ok(batch) if batch.is_empty() => {
        return CrawlOutcome { entries, error: None };
      }
      Ok(mut batch) => {
        entries.append(&mut batch);
        page += 1;
      }
      Err(e) => {
        return CrawlOutcome { entries, error: Some(e) };
      }
    }
  }
}

// ─── Ingest ──────────────────────────────────────────────────────────────────

/// Counters for one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
  pub inserted:   usize,
  pub duplicates: usize,
  /// Entries dropped for a malformed date.
  pub skipped:    usize,
}

/// Enrich and persist raw entries, strictly in input order.
///
/// Each record is one catalog lookup plus one independent insert: a
/// duplicate key is counted and skipped, and neither a duplicate nor a
/// later failure disturbs records already committed. A malformed entry
/// date skips that one entry with a warning.
pub async fn ingest<S, C>(
  store: &S,
  catalog: &C,
  character_id: i64,
  entries: &[RawMiningEntry],
) -> Result<IngestSummary, SyncError>
where
  S: LedgerStore,
  C: CatalogLookup,
{
  let mut summary = IngestSummary::default();

  for entry in entries {
    let date = match entry.parsed_date() {
      Ok(d) => d,
      Err(e) => {
        tracing::warn!(character_id, error = %e, "skipping ledger entry");
        summary.skipped += 1;
        continue;
      }
    };

    // One lookup per entry, duplicates included; the remote is the sole
    // source of ore names and unit volumes.
    let ore = catalog
      .ore_type(entry.type_id)
      .await
      .map_err(|e| SyncError::RemoteFetch(Box::new(e)))?;

    let record = MiningRecord {
      character_id,
      date,
      solar_system_id: entry.solar_system_id,
      type_id: entry.type_id,
      quantity: entry.quantity,
      ore_name: ore.name,
      volume: ore.volume,
    };

    match store
      .insert_record(record)
      .await
      .map_err(|e| SyncError::Store(Box::new(e)))?
    {
      InsertOutcome::Inserted => summary.inserted += 1,
      InsertOutcome::Duplicate => {
        tracing::debug!(
          character_id,
          date = %entry.date,
          type_id = entry.type_id,
          "duplicate ledger entry discarded"
        );
        summary.duplicates += 1;
      }
    }
  }

  Ok(summary)
}

// ─── Full pass ───────────────────────────────────────────────────────────────

/// Run one complete sync pass for `character_id`.
///
/// A crawl that fails mid-pass still ingests the pages fetched before the
/// failure; the error is logged once rather than propagated, matching the
/// records-committed-so-far contract.
pub async fn sync_character<S, A, C, T>(
  store: &S,
  api: &A,
  catalog: &C,
  exchange: &T,
  character_id: i64,
) -> Result<IngestSummary, SyncError>
where
  S: LedgerStore,
  A: ActivityApi,
  C: CatalogLookup,
  T: TokenExchange,
{
  let character = store
    .get_character(character_id)
    .await
    .map_err(|e| SyncError::Store(Box::new(e)))?
    .ok_or(SyncError::UnknownCharacter(character_id))?;

  let access_token = live_access_token(store, exchange, &character).await?;

  let outcome = crawl(api, character_id, &access_token).await;
  if let Some(e) = &outcome.error {
    tracing::warn!(
      character_id,
      error = %e,
      fetched = outcome.entries.len(),
      "crawl ended early; ingesting pages fetched so far"
    );
  }

  let summary = ingest(store, catalog, character_id, &outcome.entries).await?;

  tracing::info!(
    character_id,
    inserted = summary.inserted,
    duplicates = summary.duplicates,
    skipped = summary.skipped,
    "sync pass complete"
  );
  Ok(summary)
}
