use rusqlite::Connection;

use packlist_core::{
    Item, TripKey,
    clock::wall_now,
    item::{decode_items, encode_items},
};

use crate::error::StorageError;

/// Device-resident mirror of the last successfully observed item set, one
/// entry per trip key, overwritten wholesale. Retention is unbounded; expiry
/// is the store's responsibility, never the cache's.
pub struct TripCache {
    conn: Connection,
}

impl TripCache {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_cache_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_cache_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn read(&self, key: &TripKey) -> Result<Option<Vec<Item>>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT items FROM trip_cache WHERE trip_digest = ?1")?;
        let mut rows = stmt.query_map(
            rusqlite::params![key.cache_digest().as_slice()],
            |row| row.get::<_, Vec<u8>>(0),
        )?;
        match rows.next() {
            Some(Ok(bytes)) => Ok(Some(decode_items(&bytes)?)),
            Some(Err(e)) => Err(StorageError::Sqlite(e)),
            None => Ok(None),
        }
    }

    pub fn write(&mut self, key: &TripKey, items: &[Item]) -> Result<(), StorageError> {
        let bytes = encode_items(items)?;
        self.conn.execute(
            "INSERT INTO trip_cache (trip_digest, items, written_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(trip_digest) DO UPDATE SET items = excluded.items, written_at = excluded.written_at",
            rusqlite::params![key.cache_digest().as_slice(), bytes, wall_now()?],
        )?;
        Ok(())
    }
}
