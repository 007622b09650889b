use rusqlite::Connection;

use packlist_core::{
    Category, Clock, Item, ItemId, ItemPatch, Millis, NewItem, Status, Template, TemplateId,
    TemplateSpec, TripKey,
    clock::{MILLIS_PER_DAY, wall_now},
};

use crate::error::StorageError;
use crate::traits::{ItemStore, TemplateCatalog, TripRecord};

/// A trip untouched for strictly more than this is hard-deleted on read.
pub const TRIP_TTL_MS: Millis = 30 * MILLIS_PER_DAY;

/// Convert Vec<u8> to fixed-size array with proper error handling.
fn to_array<const N: usize>(v: Vec<u8>, label: &str) -> Result<[u8; N], StorageError> {
    v.try_into()
        .map_err(|_| StorageError::Serialization(format!("invalid {label} length")))
}

pub struct SqliteStore {
    conn: Connection,
    clock: Clock,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self {
            conn,
            clock: Clock::new(),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self {
            conn,
            clock: Clock::new(),
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn trip_updated_at(&self, key: &TripKey) -> Result<Option<Millis>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT updated_at FROM trips WHERE trip_id = ?1 AND access_key = ?2")?;
        let mut rows = stmt.query_map(
            rusqlite::params![key.trip_id, key.access_key],
            |row| row.get::<_, Millis>(0),
        )?;
        match rows.next() {
            Some(Ok(updated_at)) => Ok(Some(updated_at)),
            Some(Err(e)) => Err(StorageError::Sqlite(e)),
            None => Ok(None),
        }
    }

    fn read_items(&self, key: &TripKey) -> Result<Vec<Item>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, name, category, status, created_at, updated_at
             FROM items WHERE trip_id = ?1 AND access_key = ?2 ORDER BY seq",
        )?;
        let rows = stmt.query_map(rusqlite::params![key.trip_id, key.access_key], |row| {
            let item_id_bytes: Vec<u8> = row.get(0)?;
            let name: String = row.get(1)?;
            let category: String = row.get(2)?;
            let status: Option<String> = row.get(3)?;
            let created_at: Millis = row.get(4)?;
            let updated_at: Option<Millis> = row.get(5)?;
            Ok((item_id_bytes, name, category, status, created_at, updated_at))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (item_id_bytes, name, category, status, created_at, updated_at) = row?;
            items.push(Item {
                id: ItemId::from_bytes(to_array::<16>(item_id_bytes, "item_id")?),
                name,
                category: Category::parse_label(&category)?,
                // Absent or blank stored status classifies as Need.
                status: Status::parse_stored(status.as_deref())?,
                created_at,
                updated_at: updated_at.unwrap_or(created_at),
            });
        }
        Ok(items)
    }

    fn bump_trip(&self, key: &TripKey, stamp: Millis) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE trips SET updated_at = ?1 WHERE trip_id = ?2 AND access_key = ?3",
            rusqlite::params![stamp, key.trip_id, key.access_key],
        )?;
        Ok(())
    }
}

impl ItemStore for SqliteStore {
    fn get_trip(&mut self, key: &TripKey) -> Result<TripRecord, StorageError> {
        match self.trip_updated_at(key)? {
            None => {
                let now = self.clock.tick()?;
                self.conn.execute(
                    "INSERT INTO trips (trip_id, access_key, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![key.trip_id, key.access_key, now, now],
                )?;
                Ok(TripRecord {
                    items: Vec::new(),
                    updated_at: now,
                })
            }
            Some(updated_at) => {
                let now = wall_now()?;
                if now - updated_at > TRIP_TTL_MS {
                    tracing::debug!(trip = %key, age_ms = now - updated_at, "expiring stale trip");
                    self.conn.execute(
                        "DELETE FROM trips WHERE trip_id = ?1 AND access_key = ?2",
                        rusqlite::params![key.trip_id, key.access_key],
                    )?;
                    return Err(StorageError::NotFound(key.trip_id.clone()));
                }
                Ok(TripRecord {
                    items: self.read_items(key)?,
                    updated_at,
                })
            }
        }
    }

    fn append_items(
        &mut self,
        key: &TripKey,
        specs: &[NewItem],
    ) -> Result<Vec<Item>, StorageError> {
        let mut stamped = Vec::with_capacity(specs.len());
        for spec in specs {
            let stamp = self.clock.tick()?;
            stamped.push(Item {
                id: ItemId::new(),
                name: spec.name.clone(),
                category: spec.category,
                status: spec.status,
                created_at: stamp,
                updated_at: stamp,
            });
        }

        let tx = self.conn.transaction()?;
        let now = stamped.last().map(|it| it.updated_at).unwrap_or(wall_now()?);
        tx.execute(
            "INSERT INTO trips (trip_id, access_key, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(trip_id, access_key) DO UPDATE SET updated_at = excluded.updated_at",
            rusqlite::params![key.trip_id, key.access_key, now, now],
        )?;
        for item in &stamped {
            tx.execute(
                "INSERT INTO items (item_id, trip_id, access_key, name, category, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    item.id.as_bytes().as_slice(),
                    key.trip_id,
                    key.access_key,
                    item.name,
                    item.category.label(),
                    item.status.label(),
                    item.created_at,
                    item.updated_at,
                ],
            )?;
        }
        tx.commit()?;
        Ok(stamped)
    }

    fn update_item_fields(
        &mut self,
        key: &TripKey,
        item_id: ItemId,
        patch: &ItemPatch,
    ) -> Result<(), StorageError> {
        let stamp = self.clock.tick()?;
        let changed = match (&patch.status, &patch.name) {
            (Some(status), Some(name)) => self.conn.execute(
                "UPDATE items SET status = ?1, name = ?2, updated_at = ?3
                 WHERE item_id = ?4 AND trip_id = ?5 AND access_key = ?6",
                rusqlite::params![
                    status.label(),
                    name,
                    stamp,
                    item_id.as_bytes().as_slice(),
                    key.trip_id,
                    key.access_key,
                ],
            )?,
            (Some(status), None) => self.conn.execute(
                "UPDATE items SET status = ?1, updated_at = ?2
                 WHERE item_id = ?3 AND trip_id = ?4 AND access_key = ?5",
                rusqlite::params![
                    status.label(),
                    stamp,
                    item_id.as_bytes().as_slice(),
                    key.trip_id,
                    key.access_key,
                ],
            )?,
            (None, Some(name)) => self.conn.execute(
                "UPDATE items SET name = ?1, updated_at = ?2
                 WHERE item_id = ?3 AND trip_id = ?4 AND access_key = ?5",
                rusqlite::params![
                    name,
                    stamp,
                    item_id.as_bytes().as_slice(),
                    key.trip_id,
                    key.access_key,
                ],
            )?,
            (None, None) => 0,
        };
        if changed > 0 {
            self.bump_trip(key, stamp)?;
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &TripKey, item_id: ItemId) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "DELETE FROM items WHERE item_id = ?1 AND trip_id = ?2 AND access_key = ?3",
            rusqlite::params![item_id.as_bytes().as_slice(), key.trip_id, key.access_key],
        )?;
        if changed > 0 {
            let stamp = self.clock.tick()?;
            self.bump_trip(key, stamp)?;
        }
        Ok(())
    }

    fn remove_all_items(&mut self, key: &TripKey) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM items WHERE trip_id = ?1 AND access_key = ?2",
            rusqlite::params![key.trip_id, key.access_key],
        )?;
        let stamp = self.clock.tick()?;
        self.bump_trip(key, stamp)?;
        Ok(())
    }
}

impl TemplateCatalog for SqliteStore {
    fn list_templates(&self) -> Result<Vec<Template>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT template_id, name, category FROM templates ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            let id_bytes: Vec<u8> = row.get(0)?;
            let name: String = row.get(1)?;
            let category: String = row.get(2)?;
            Ok((id_bytes, name, category))
        })?;

        let mut templates = Vec::new();
        for row in rows {
            let (id_bytes, name, category) = row?;
            templates.push(Template {
                id: TemplateId::from_bytes(to_array::<16>(id_bytes, "template_id")?),
                name,
                category: Category::parse_label(&category)?,
            });
        }
        Ok(templates)
    }

    fn upsert_templates(&mut self, specs: &[TemplateSpec]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        for spec in specs {
            if spec.name.trim().is_empty() {
                continue;
            }
            tx.execute(
                "INSERT INTO templates (template_id, name, category) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET category = excluded.category",
                rusqlite::params![
                    TemplateId::new().as_bytes().as_slice(),
                    spec.name,
                    spec.category.label(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn update_template(
        &mut self,
        id: TemplateId,
        name: &str,
        category: Category,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE templates SET name = ?1, category = ?2 WHERE template_id = ?3",
            rusqlite::params![name, category.label(), id.as_bytes().as_slice()],
        )?;
        Ok(())
    }

    fn delete_templates(&mut self, ids: &[TemplateId]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        for id in ids {
            tx.execute(
                "DELETE FROM templates WHERE template_id = ?1",
                rusqlite::params![id.as_bytes().as_slice()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_all_templates(&mut self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM templates", [])?;
        Ok(())
    }
}
