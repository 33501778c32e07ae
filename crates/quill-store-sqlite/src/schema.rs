//! SQL schema for the Quill SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id           TEXT PRIMARY KEY,
    subject_id   TEXT NOT NULL UNIQUE,  -- provider-asserted, immutable
    email        TEXT NOT NULL,
    display_name TEXT NOT NULL,
    created_at   TEXT NOT NULL,         -- ISO 8601 UTC; server-assigned
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    id               TEXT PRIMARY KEY,
    owner_subject_id TEXT NOT NULL,     -- written once, at creation
    title            TEXT NOT NULL,
    summary          TEXT NOT NULL,
    content          TEXT NOT NULL,     -- rich text / HTML, verbatim
    cover_url        TEXT,
    author_email     TEXT NOT NULL,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS posts_owner_idx   ON posts(owner_subject_id);
CREATE INDEX IF NOT EXISTS posts_created_idx ON posts(created_at);

PRAGMA user_version = 1;
";
