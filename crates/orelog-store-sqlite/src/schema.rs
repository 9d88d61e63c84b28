//! SQL schema for the orelog SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS characters (
    character_id         INTEGER PRIMARY KEY,  -- assigned by the game API
    character_name       TEXT NOT NULL,
    owner_hash           TEXT NOT NULL,
    access_token         TEXT NOT NULL,
    access_token_expires TEXT NOT NULL,        -- ISO 8601 UTC
    refresh_token        TEXT NOT NULL,
    latest_seen          TEXT NOT NULL
);

-- One row per (character, day, solar system, ore type). The composite
-- primary key is the dedup boundary; re-crawling a ledger issues duplicate
-- inserts and relies on this constraint to reject them.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS mining_records (
    character_id    INTEGER NOT NULL REFERENCES characters(character_id),
    date            TEXT NOT NULL,             -- YYYY-MM-DD
    solar_system_id INTEGER NOT NULL,
    type_id         INTEGER NOT NULL,
    quantity        INTEGER NOT NULL,
    ore_name        TEXT NOT NULL,
    volume          REAL NOT NULL,
    PRIMARY KEY (character_id, date, solar_system_id, type_id)
);

CREATE INDEX IF NOT EXISTS mining_records_date_idx ON mining_records(date);

PRAGMA user_version = 1;
";
