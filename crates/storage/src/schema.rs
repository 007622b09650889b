use rusqlite::Connection;

use crate::error::StorageError;

pub const SCHEMA_VERSION: i32 = 1;

pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
    ",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at INTEGER NOT NULL
);
INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, unixepoch());

CREATE TABLE IF NOT EXISTS trips (
    trip_id TEXT NOT NULL,
    access_key TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (trip_id, access_key)
);

CREATE TABLE IF NOT EXISTS items (
    seq INTEGER PRIMARY KEY,
    item_id BLOB NOT NULL UNIQUE CHECK (length(item_id) = 16),
    trip_id TEXT NOT NULL,
    access_key TEXT NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    status TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER,
    FOREIGN KEY (trip_id, access_key)
        REFERENCES trips (trip_id, access_key) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_items_trip ON items (trip_id, access_key, seq);

CREATE TABLE IF NOT EXISTS templates (
    template_id BLOB PRIMARY KEY CHECK (length(template_id) = 16),
    name TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL
);
";

pub fn init_cache_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;

        CREATE TABLE IF NOT EXISTS trip_cache (
            trip_digest BLOB PRIMARY KEY CHECK (length(trip_digest) = 32),
            items BLOB NOT NULL,
            written_at INTEGER NOT NULL
        );
    ",
    )?;
    Ok(())
}
