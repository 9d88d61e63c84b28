//! [`SqliteStore`] — the SQLite implementation of [`LedgerStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use orelog_core::{
  character::Character,
  record::{
    AnnotatedRecord, CharacterOreTotal, DailyOreTotal, InsertOutcome,
    MiningRecord,
  },
  store::LedgerStore,
};

use crate::{
  encode::{
    RawAnnotatedRecord, RawCharacter, RawCharacterTotal, RawDailyTotal,
    encode_date, encode_dt,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A mining-ledger store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── LedgerStore impl ────────────────────────────────────────────────────────

impl LedgerStore for SqliteStore {
  type Error = Error;

  // ── Characters ────────────────────────────────────────────────────────────

  async fn upsert_character(&self, character: Character) -> Result<()> {
    let expires_str = encode_dt(character.access_token_expires);
    let seen_str    = encode_dt(character.latest_seen);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO characters (
             character_id, character_name, owner_hash,
             access_token, access_token_expires, refresh_token, latest_seen
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT (character_id) DO UPDATE SET
             character_name       = excluded.character_name,
             owner_hash           = excluded.owner_hash,
             access_token         = excluded.access_token,
             access_token_expires = excluded.access_token_expires,
             refresh_token        = excluded.refresh_token,
             latest_seen          = excluded.latest_seen",
          rusqlite::params![
            character.character_id,
            character.character_name,
            character.owner_hash,
            character.access_token,
            expires_str,
            character.refresh_token,
            seen_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_character(&self, character_id: i64) -> Result<Option<Character>> {
    let raw: Option<RawCharacter> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT character_id, character_name, owner_hash,
                    access_token, access_token_expires, refresh_token,
                    latest_seen
             FROM characters WHERE character_id = ?1",
            rusqlite::params![character_id],
            |row| {
              Ok(RawCharacter {
                character_id:         row.get(0)?,
                character_name:       row.get(1)?,
                owner_hash:           row.get(2)?,
                access_token:         row.get(3)?,
                access_token_expires: row.get(4)?,
                refresh_token:        row.get(5)?,
                latest_seen:          row.get(6)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCharacter::into_character).transpose()
  }

  async fn list_characters(&self) -> Result<Vec<Character>> {
    let raws: Vec<RawCharacter> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT character_id, character_name, owner_hash,
                  access_token, access_token_expires, refresh_token,
                  latest_seen
           FROM characters
           ORDER BY character_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCharacter {
              character_id:         row.get(0)?,
              character_name:       row.get(1)?,
              owner_hash:           row.get(2)?,
              access_token:         row.get(3)?,
              access_token_expires: row.get(4)?,
              refresh_token:        row.get(5)?,
              latest_seen:          row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCharacter::into_character).collect()
  }

  async fn update_tokens(
    &self,
    character_id: i64,
    access_token: String,
    access_token_expires: chrono::DateTime<chrono::Utc>,
    refresh_token: Option<String>,
  ) -> Result<()> {
    let expires_str = encode_dt(access_token_expires);

    let updated = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE characters SET
             access_token         = ?2,
             access_token_expires = ?3,
             refresh_token        = COALESCE(?4, refresh_token)
           WHERE character_id = ?1",
          rusqlite::params![character_id, access_token, expires_str, refresh_token],
        )?;
        Ok(n)
      })
      .await?;

    if updated == 0 {
      return Err(Error::CharacterNotFound(character_id));
    }
    Ok(())
  }

  // ── Records — insert-once writes ──────────────────────────────────────────

  async fn insert_record(&self, record: MiningRecord) -> Result<InsertOutcome> {
    let character_id = record.character_id;
    let date_str     = encode_date(record.date);

    let outcome = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO mining_records (
             character_id, date, solar_system_id, type_id,
             quantity, ore_name, volume
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            record.character_id,
            date_str,
            record.solar_system_id,
            record.type_id,
            record.quantity,
            record.ore_name,
            record.volume,
          ],
        ) {
          Ok(_) => Ok(InsertOutcome::Inserted),
          // Re-observing a (character, date, system, type) tuple is the
          // expected outcome of re-crawling, not a failure.
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
          {
            Ok(InsertOutcome::Duplicate)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await;

    match outcome {
      Ok(o) => Ok(o),
      Err(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)))
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
      {
        Err(Error::CharacterNotFound(character_id))
      }
      Err(e) => Err(e.into()),
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_records_with_names(&self) -> Result<Vec<AnnotatedRecord>> {
    let raws: Vec<RawAnnotatedRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT m.character_id, c.character_name, m.date,
                  m.solar_system_id, m.type_id, m.quantity,
                  m.ore_name, m.volume
           FROM mining_records m
           JOIN characters c ON c.character_id = m.character_id
           ORDER BY m.date DESC, m.character_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawAnnotatedRecord {
              character_id:    row.get(0)?,
              character_name:  row.get(1)?,
              date:            row.get(2)?,
              solar_system_id: row.get(3)?,
              type_id:         row.get(4)?,
              quantity:        row.get(5)?,
              ore_name:        row.get(6)?,
              volume:          row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawAnnotatedRecord::into_annotated)
      .collect()
  }

  async fn daily_ore_totals(&self) -> Result<Vec<DailyOreTotal>> {
    let raws: Vec<RawDailyTotal> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT date, ore_name, SUM(quantity * volume)
           FROM mining_records
           GROUP BY date, ore_name
           ORDER BY date, ore_name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawDailyTotal {
              date:     row.get(0)?,
              ore_name: row.get(1)?,
              volume:   row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDailyTotal::into_total).collect()
  }

  async fn character_ore_totals(&self) -> Result<Vec<CharacterOreTotal>> {
    let raws: Vec<RawCharacterTotal> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT character_id, ore_name, SUM(quantity * volume)
           FROM mining_records
           GROUP BY character_id, ore_name
           ORDER BY character_id, ore_name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCharacterTotal {
              character_id: row.get(0)?,
              ore_name:     row.get(1)?,
              volume:       row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawCharacterTotal::into_total).collect())
  }
}
