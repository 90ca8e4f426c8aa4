//! SQL schema for the Adage SQLite store.
//!
//! Executed once at connection startup. There are no migrations; the
//! `PRAGMA user_version` stamp leaves room for them.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids of deleted quotes from being reused.
CREATE TABLE IF NOT EXISTS quotes (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    author  TEXT    NOT NULL,
    text    TEXT    NOT NULL,
    length  INTEGER NOT NULL   -- character count of text at creation
);

CREATE INDEX IF NOT EXISTS quotes_author_idx ON quotes(author);

PRAGMA user_version = 1;
";
