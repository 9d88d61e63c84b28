//! Chart-shaped aggregation over pre-grouped ledger sums.
//!
//! Two pure transforms feed the dashboard: a per-ore time series and a dense
//! character × ore matrix. Both operate on sums already grouped by the store
//! (one row per group), so each transform is a single pass with map lookups —
//! no re-scanning of raw records.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{character::Character, record::{CharacterOreTotal, DailyOreTotal}};

// ─── Canonical ores ──────────────────────────────────────────────────────────

/// The fixed set of charted ores with their display colors, in series order.
pub const CANONICAL_ORES: [(&str, &str); 7] = [
  ("Gleaming Spodumain", "#b3b3b3"),
  ("Obsidian Ochre", "#1a1a1a"),
  ("Crystalline Crokite", "#eeee33"),
  ("Prismatic Gneiss", "#33ff33"),
  ("Prime Arkonor", "#ff3333"),
  ("Monoclinic Bistot", "#33ffff"),
  ("Vitreous Mercoxit", "#ff9933"),
];

/// Display color for a canonical ore; `None` for ores outside the chart set.
pub fn ore_color(name: &str) -> Option<&'static str> {
  CANONICAL_ORES
    .iter()
    .find(|(ore, _)| *ore == name)
    .map(|(_, color)| *color)
}

// ─── Series ──────────────────────────────────────────────────────────────────

/// One named, colored chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OreSeries<T> {
  pub name:  String,
  pub color: &'static str,
  pub data:  Vec<T>,
}

/// A single time-series point: calendar date and summed volume.
pub type DatePoint = (NaiveDate, f64);

// ─── Transforms ──────────────────────────────────────────────────────────────

/// Build the per-ore time series from date-ordered `(date, ore, volume)`
/// sums.
///
/// Produces one series per canonical ore that appears in `rows`, in
/// canonical order, each with its points in the input (date-ascending)
/// order. Rows for ores outside the canonical set have no display color and
/// are dropped with a warning.
pub fn time_series(rows: &[DailyOreTotal]) -> Vec<OreSeries<DatePoint>> {
  let mut by_ore: HashMap<&str, Vec<DatePoint>> = HashMap::new();

  for row in rows {
    if ore_color(&row.ore_name).is_none() {
      tracing::warn!(ore = %row.ore_name, "ore has no chart color, dropping");
      continue;
    }
    by_ore
      .entry(row.ore_name.as_str())
      .or_default()
      .push((row.date, row.volume));
  }

  CANONICAL_ORES
    .iter()
    .filter_map(|&(name, color)| {
      by_ore.remove(name).map(|data| OreSeries {
        name: name.to_owned(),
        color,
        data,
      })
    })
    .collect()
}

/// Build the dense character × ore matrix.
///
/// Returns the character display names (one column per character, in the
/// order given — callers pass [`LedgerStore::list_characters`] output, which
/// is `character_id`-ascending) and one series per canonical ore. Every
/// series has exactly one value per character; a character with no activity
/// for an ore contributes an explicit `0.0`, so the matrix is dense even
/// though storage is sparse.
///
/// [`LedgerStore::list_characters`]: crate::store::LedgerStore::list_characters
pub fn character_matrix(
  characters: &[Character],
  rows: &[CharacterOreTotal],
) -> (Vec<String>, Vec<OreSeries<f64>>) {
  let mut sums: HashMap<(i64, &str), f64> = HashMap::with_capacity(rows.len());
  for row in rows {
    sums.insert((row.character_id, row.ore_name.as_str()), row.volume);
  }

  let names = characters
    .iter()
    .map(|c| c.character_name.clone())
    .collect();

  let series = CANONICAL_ORES
    .iter()
    .map(|&(name, color)| OreSeries {
      name:  name.to_owned(),
      color,
      data:  characters
        .iter()
        .map(|c| sums.get(&(c.character_id, name)).copied().unwrap_or(0.0))
        .collect(),
    })
    .collect();

  (names, series)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};

  use super::*;
  use crate::{character::Character, record::{CharacterOreTotal, DailyOreTotal}};

  fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

  fn character(id: i64, name: &str) -> Character {
    Character {
      character_id:         id,
      character_name:       name.into(),
      owner_hash:           "hash".into(),
      access_token:         "tok".into(),
      access_token_expires: Utc::now(),
      refresh_token:        "refresh".into(),
      latest_seen:          Utc::now(),
    }
  }

  fn daily(date_s: &str, ore: &str, volume: f64) -> DailyOreTotal {
    DailyOreTotal { date: date(date_s), ore_name: ore.into(), volume }
  }

  fn per_char(id: i64, ore: &str, volume: f64) -> CharacterOreTotal {
    CharacterOreTotal { character_id: id, ore_name: ore.into(), volume }
  }

  // ── time_series ───────────────────────────────────────────────────────────

  #[test]
  fn time_series_groups_points_per_ore() {
    let rows = vec![
      daily("2024-01-01", "Prime Arkonor", 100.0),
      daily("2024-01-01", "Monoclinic Bistot", 40.0),
      daily("2024-01-02", "Prime Arkonor", 60.0),
    ];

    let series = time_series(&rows);
    assert_eq!(series.len(), 2);

    let arkonor = series.iter().find(|s| s.name == "Prime Arkonor").unwrap();
    assert_eq!(
      arkonor.data,
      vec![(date("2024-01-01"), 100.0), (date("2024-01-02"), 60.0)]
    );
    assert_eq!(arkonor.color, "#ff3333");

    let bistot = series.iter().find(|s| s.name == "Monoclinic Bistot").unwrap();
    assert_eq!(bistot.data, vec![(date("2024-01-01"), 40.0)]);
  }

  #[test]
  fn time_series_preserves_date_order() {
    let rows = vec![
      daily("2024-01-01", "Prime Arkonor", 1.0),
      daily("2024-01-02", "Prime Arkonor", 2.0),
      daily("2024-01-03", "Prime Arkonor", 3.0),
    ];

    let series = time_series(&rows);
    let dates: Vec<_> = series[0].data.iter().map(|(d, _)| *d).collect();
    assert_eq!(
      dates,
      vec![date("2024-01-01"), date("2024-01-02"), date("2024-01-03")]
    );
  }

  #[test]
  fn time_series_drops_ores_without_color() {
    let rows = vec![
      daily("2024-01-01", "Veldspar", 9000.0),
      daily("2024-01-01", "Prime Arkonor", 10.0),
    ];

    let series = time_series(&rows);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].name, "Prime Arkonor");
  }

  #[test]
  fn time_series_empty_input() {
    assert!(time_series(&[]).is_empty());
  }

  // ── character_matrix ──────────────────────────────────────────────────────

  #[test]
  fn matrix_is_dense_with_zero_fill() {
    // X mined Arkonor only; Y mined nothing. Every canonical ore still gets
    // a series with one value per character.
    let characters = vec![character(1, "X"), character(2, "Y")];
    let rows = vec![per_char(1, "Prime Arkonor", 10.0)];

    let (names, series) = character_matrix(&characters, &rows);

    assert_eq!(names, vec!["X", "Y"]);
    assert_eq!(series.len(), CANONICAL_ORES.len());
    for s in &series {
      assert_eq!(s.data.len(), 2);
    }

    let arkonor = series.iter().find(|s| s.name == "Prime Arkonor").unwrap();
    assert_eq!(arkonor.data, vec![10.0, 0.0]);

    let mercoxit = series.iter().find(|s| s.name == "Vitreous Mercoxit").unwrap();
    assert_eq!(mercoxit.data, vec![0.0, 0.0]);
  }

  #[test]
  fn matrix_columns_follow_character_order() {
    let characters =
      vec![character(5, "Eve"), character(7, "Mallory"), character(9, "Trent")];
    let rows = vec![
      per_char(7, "Obsidian Ochre", 3.5),
      per_char(9, "Obsidian Ochre", 1.5),
    ];

    let (names, series) = character_matrix(&characters, &rows);
    assert_eq!(names, vec!["Eve", "Mallory", "Trent"]);

    let ochre = series.iter().find(|s| s.name == "Obsidian Ochre").unwrap();
    assert_eq!(ochre.data, vec![0.0, 3.5, 1.5]);
  }

  #[test]
  fn matrix_with_no_characters_has_empty_series() {
    let (names, series) = character_matrix(&[], &[]);
    assert!(names.is_empty());
    assert_eq!(series.len(), CANONICAL_ORES.len());
    assert!(series.iter().all(|s| s.data.is_empty()));
  }

  #[test]
  fn matrix_series_carry_canonical_colors() {
    let (_, series) = character_matrix(&[character(1, "X")], &[]);
    for (s, (name, color)) in series.iter().zip(CANONICAL_ORES.iter()) {
      assert_eq!(s.name, *name);
      assert_eq!(s.color, *color);
    }
  }
}
