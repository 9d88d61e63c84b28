//! The `LedgerStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `orelog-store-sqlite`).
//! Higher layers (`orelog-server`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  character::Character,
  record::{
    AnnotatedRecord, CharacterOreTotal, DailyOreTotal, InsertOutcome,
    MiningRecord,
  },
};

/// Abstraction over a mining-ledger storage backend.
///
/// Mining records are insert-once: the backend enforces uniqueness of the
/// `(character_id, date, solar_system_id, type_id)` composite key and reports
/// a re-insert as [`InsertOutcome::Duplicate`] rather than an error. That
/// constraint is the sole guard against two overlapping syncs of the same
/// character.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait LedgerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Characters ────────────────────────────────────────────────────────

  /// Create or fully replace a character row (merge semantics, keyed by
  /// `character_id`). Called from the SSO callback.
  fn upsert_character(
    &self,
    character: Character,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a character by id. Returns `None` if not found.
  fn get_character(
    &self,
    character_id: i64,
  ) -> impl Future<Output = Result<Option<Character>, Self::Error>> + Send + '_;

  /// List all characters, ordered by `character_id` ascending.
  ///
  /// The ordering is part of the contract: the character-by-ore matrix
  /// assigns one column per character and must be deterministic across
  /// calls.
  fn list_characters(
    &self,
  ) -> impl Future<Output = Result<Vec<Character>, Self::Error>> + Send + '_;

  /// Persist a refreshed credential bundle for a character.
  ///
  /// `refresh_token` is `None` when the SSO response omitted one; the
  /// stored refresh token is then left untouched.
  fn update_tokens(
    &self,
    character_id: i64,
    access_token: String,
    access_token_expires: DateTime<Utc>,
    refresh_token: Option<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Records — insert-once writes ──────────────────────────────────────

  /// Insert a record if its composite key is absent.
  ///
  /// Each call is an independent commit: a duplicate here never affects
  /// records inserted before or after it.
  fn insert_record(
    &self,
    record: MiningRecord,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All stored records annotated with the owning character's name,
  /// newest date first.
  fn list_records_with_names(
    &self,
  ) -> impl Future<Output = Result<Vec<AnnotatedRecord>, Self::Error>> + Send + '_;

  /// Total volume per (date, ore), across all characters, date ascending.
  fn daily_ore_totals(
    &self,
  ) -> impl Future<Output = Result<Vec<DailyOreTotal>, Self::Error>> + Send + '_;

  /// Total volume per (character, ore).
  fn character_ore_totals(
    &self,
  ) -> impl Future<Output = Result<Vec<CharacterOreTotal>, Self::Error>> + Send + '_;
}
