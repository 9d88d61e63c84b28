//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, ledger dates as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};
use orelog_core::{
  character::Character,
  record::{AnnotatedRecord, CharacterOreTotal, DailyOreTotal},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `characters` row.
pub struct RawCharacter {
  pub character_id:         i64,
  pub character_name:       String,
  pub owner_hash:           String,
  pub access_token:         String,
  pub access_token_expires: String,
  pub refresh_token:        String,
  pub latest_seen:          String,
}

impl RawCharacter {
  pub fn into_character(self) -> Result<Character> {
    Ok(Character {
      character_id:         self.character_id,
      character_name:       self.character_name,
      owner_hash:           self.owner_hash,
      access_token:         self.access_token,
      access_token_expires: decode_dt(&self.access_token_expires)?,
      refresh_token:        self.refresh_token,
      latest_seen:          decode_dt(&self.latest_seen)?,
    })
  }
}

/// A `mining_records` row joined with the owning character's name.
pub struct RawAnnotatedRecord {
  pub character_id:    i64,
  pub character_name:  String,
  pub date:            String,
  pub solar_system_id: i64,
  pub type_id:         i64,
  pub quantity:        i64,
  pub ore_name:        String,
  pub volume:          f64,
}

impl RawAnnotatedRecord {
  pub fn into_annotated(self) -> Result<AnnotatedRecord> {
    Ok(AnnotatedRecord {
      character_id:    self.character_id,
      character_name:  self.character_name,
      date:            decode_date(&self.date)?,
      solar_system_id: self.solar_system_id,
      type_id:         self.type_id,
      quantity:        self.quantity,
      ore_name:        self.ore_name,
      volume:          self.volume,
    })
  }
}

/// One grouped-sum row from the daily aggregate query.
pub struct RawDailyTotal {
  pub date:     String,
  pub ore_name: String,
  pub volume:   f64,
}

impl RawDailyTotal {
  pub fn into_total(self) -> Result<DailyOreTotal> {
    Ok(DailyOreTotal {
      date:     decode_date(&self.date)?,
      ore_name: self.ore_name,
      volume:   self.volume,
    })
  }
}

/// One grouped-sum row from the per-character aggregate query.
pub struct RawCharacterTotal {
  pub character_id: i64,
  pub ore_name:     String,
  pub volume:       f64,
}

impl RawCharacterTotal {
  pub fn into_total(self) -> CharacterOreTotal {
    CharacterOreTotal {
      character_id: self.character_id,
      ore_name:     self.ore_name,
      volume:       self.volume,
    }
  }
}
