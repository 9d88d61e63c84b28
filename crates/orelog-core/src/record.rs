//! Mining record types — the atomic unit of ledger activity.
//!
//! One record is one (character, day, solar system, ore type) observation.
//! That four-part composite key is the dedup boundary: records are inserted
//! once and never updated, so re-crawling a ledger is idempotent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A raw ledger entry as returned by the remote activity API, before
/// enrichment.
///
/// The date is kept as the raw wire string so a malformed date can be
/// skipped per-record at ingest instead of failing a whole page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawMiningEntry {
  pub date:            String,
  pub solar_system_id: i64,
  pub type_id:         i64,
  pub quantity:        i64,
}

impl RawMiningEntry {
  /// Parse the wire date (`YYYY-MM-DD`).
  pub fn parsed_date(&self) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
      .map_err(|_| Error::MalformedDate(self.date.clone()))
  }
}

/// An enriched, storable mining record.
#[derive(Debug, Clone, Serialize)]
pub struct MiningRecord {
  pub character_id:    i64,
  pub date:            NaiveDate,
  pub solar_system_id: i64,
  pub type_id:         i64,
  pub quantity:        i64,
  /// Display name resolved from the type catalog at ingest time.
  pub ore_name:        String,
  /// Unit volume in m³, from the type catalog.
  pub volume:          f64,
}

impl MiningRecord {
  /// Total mined volume for this record.
  pub fn total_volume(&self) -> f64 { self.quantity as f64 * self.volume }
}

/// Ore display name and unit volume, resolved via the type catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct OreType {
  pub name:   String,
  pub volume: f64,
}

/// Outcome of an insert-if-absent write.
///
/// A duplicate composite key is an expected result of re-crawling, not an
/// error, so it is modelled in the success type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted,
  Duplicate,
}

/// A stored record annotated with its owning character's display name,
/// for the dashboard's flat record listing.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedRecord {
  pub character_id:    i64,
  pub character_name:  String,
  pub date:            NaiveDate,
  pub solar_system_id: i64,
  pub type_id:         i64,
  pub quantity:        i64,
  pub ore_name:        String,
  pub volume:          f64,
}

/// One grouped sum: total volume mined of one ore on one calendar day,
/// across all characters.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyOreTotal {
  pub date:     NaiveDate,
  pub ore_name: String,
  pub volume:   f64,
}

/// One grouped sum: total volume of one ore mined by one character.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterOreTotal {
  pub character_id: i64,
  pub ore_name:     String,
  pub volume:       f64,
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::RawMiningEntry;

  #[test]
  fn parses_wire_date() {
    let entry = RawMiningEntry {
      date:            "2024-01-31".into(),
      solar_system_id: 30002537,
      type_id:         17471,
      quantity:        7004,
    };
    assert_eq!(
      entry.parsed_date().unwrap(),
      NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    );
  }

  #[test]
  fn rejects_malformed_date() {
    let entry = RawMiningEntry {
      date:            "31/01/2024".into(),
      solar_system_id: 1,
      type_id:         1,
      quantity:        1,
    };
    assert!(entry.parsed_date().is_err());
  }
}
