use packlist_core::{
    Category, Item, ItemId, ItemPatch, Millis, NewItem, Template, TemplateId, TemplateSpec,
    TripKey,
};

use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct TripRecord {
    pub items: Vec<Item>,
    pub updated_at: Millis,
}

/// Durable owner of record for trip items. The `(trip_id, access_key)` pair
/// scopes every operation; writes are unconditional (no version token), so
/// concurrent writers race last-write-wins at item-field granularity.
pub trait ItemStore {
    /// Fetch a trip's items, auto-creating an empty trip on first access.
    /// A trip untouched for strictly more than 30 days is deleted by this
    /// read, which then returns `NotFound`.
    fn get_trip(&mut self, key: &TripKey) -> Result<TripRecord, StorageError>;

    /// Append new items, stamping each with a fresh id and timestamps.
    /// Upserts the trip if absent and bumps its `updated_at`.
    fn append_items(
        &mut self,
        key: &TripKey,
        specs: &[NewItem],
    ) -> Result<Vec<Item>, StorageError>;

    /// Targeted update of exactly the named item; bumps item and trip
    /// `updated_at`. An id not present in the trip is a silent no-op.
    fn update_item_fields(
        &mut self,
        key: &TripKey,
        item_id: ItemId,
        patch: &ItemPatch,
    ) -> Result<(), StorageError>;

    /// Idempotent removal by id.
    fn remove_item(&mut self, key: &TripKey, item_id: ItemId) -> Result<(), StorageError>;

    /// Clears the trip's item collection; the trip record itself survives.
    fn remove_all_items(&mut self, key: &TripKey) -> Result<(), StorageError>;
}

/// Global catalog of reusable `(name, category)` pairs, independent of any
/// trip. Never expires.
pub trait TemplateCatalog {
    /// Stable insertion order.
    fn list_templates(&self) -> Result<Vec<Template>, StorageError>;

    /// Dedup by exact name: an existing name has its category overwritten.
    /// Entries with blank names are skipped.
    fn upsert_templates(&mut self, specs: &[TemplateSpec]) -> Result<(), StorageError>;

    fn update_template(
        &mut self,
        id: TemplateId,
        name: &str,
        category: Category,
    ) -> Result<(), StorageError>;

    fn delete_templates(&mut self, ids: &[TemplateId]) -> Result<(), StorageError>;

    fn delete_all_templates(&mut self) -> Result<(), StorageError>;
}
