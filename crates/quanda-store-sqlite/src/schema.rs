//! SQL schema for the quanda SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per chat group. id_next is the per-group question-id counter;
-- it only ever grows, so deleted ids are never handed out again.
CREATE TABLE IF NOT EXISTS groups (
    groupid  TEXT PRIMARY KEY,
    id_next  INTEGER NOT NULL DEFAULT 0
);

-- One row per question, keyed by owning group and per-group id.
-- The id is allocated from groups.id_next inside the same transaction
-- that inserts the row.
CREATE TABLE IF NOT EXISTS questions (
    groupid      TEXT NOT NULL REFERENCES groups(groupid),
    id           INTEGER NOT NULL,
    text         TEXT NOT NULL,
    solved       INTEGER NOT NULL DEFAULT 0,
    userid       TEXT NOT NULL,
    created_time TEXT NOT NULL,    -- ISO 8601 UTC
    solved_time  TEXT,             -- ISO 8601 UTC; set iff solved
    PRIMARY KEY (groupid, id)
);

CREATE INDEX IF NOT EXISTS questions_solved_idx ON questions(groupid, solved);

PRAGMA user_version = 1;
";
