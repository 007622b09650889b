pub mod error;

pub use error::EngineError;

use packlist_core::{
    Category, Clock, Item, ItemId, ItemPatch, NewItem, Status, Template, TemplateId,
    TemplateSpec, TripKey,
    template::{export_json, parse_import},
    view::{self, CategoryView},
};
use packlist_storage::{ItemStore, TemplateCatalog, TripCache};

/// Where `load` sourced the snapshot from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Authoritative store answered; cache refreshed.
    Fresh,
    /// Store unreachable; serving the last cached snapshot.
    Degraded,
}

/// Origin of an add-items batch. Manual entries are echoed into the
/// template catalog; catalog picks are not (they came from it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    Manual,
    FromCatalog,
}

/// One client session over a shared trip, owning the in-memory snapshot for
/// its duration. Methods take `&mut self`, so intents within a session are
/// serialized by construction; across sessions the store applies writes
/// unconditionally and the later write wins.
///
/// Synchronization policy per operation (deliberate asymmetry):
///
/// | operation     | store call              | snapshot          | cache     |
/// |---------------|-------------------------|-------------------|-----------|
/// | `load`        | get_trip                | replace           | overwrite |
/// | `add_items`   | append_items + reload   | via reload        | via reload|
/// | `update_item` | update_item_fields      | optimistic merge  | overwrite |
/// | `delete_item` | remove_item             | filter, no reload | overwrite |
/// | `delete_all`  | remove_all_items        | clear             | overwrite |
///
/// Adds are rare and batch-shaped, so they pay for a consistency refresh;
/// status toggles are the hot path, so they merge optimistically.
pub struct TripSession<S: ItemStore, T: TemplateCatalog> {
    key: TripKey,
    store: S,
    catalog: T,
    cache: TripCache,
    clock: Clock,
    items: Vec<Item>,
}

impl<S: ItemStore, T: TemplateCatalog> TripSession<S, T> {
    pub fn new(key: TripKey, store: S, catalog: T, cache: TripCache) -> Self {
        Self {
            key,
            store,
            catalog,
            cache,
            clock: Clock::new(),
            items: Vec::new(),
        }
    }

    pub fn key(&self) -> &TripKey {
        &self.key
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn find_item(&self, item_id: ItemId) -> Option<&Item> {
        self.items.iter().find(|it| it.id == item_id)
    }

    /// Cache writes are best-effort: a failing device cache must never fail
    /// the operation that triggered the refresh.
    fn refresh_cache(&mut self) {
        if let Err(err) = self.cache.write(&self.key, &self.items) {
            tracing::warn!(trip = %self.key, error = %err, "local cache refresh failed");
        }
    }

    /// Fetch from the store, replacing the snapshot and cache entry. On a
    /// transport/server failure, fall back to the cached snapshot if one
    /// exists. A not-found (expired) trip surfaces; it does not resurrect
    /// from cache.
    pub fn load(&mut self) -> Result<LoadOutcome, EngineError> {
        match self.store.get_trip(&self.key) {
            Ok(record) => {
                self.items = record.items;
                self.refresh_cache();
                Ok(LoadOutcome::Fresh)
            }
            Err(err) if err.is_not_found() => Err(err.into()),
            Err(err) => match self.cache.read(&self.key) {
                Ok(Some(cached)) => {
                    tracing::warn!(
                        trip = %self.key,
                        error = %err,
                        items = cached.len(),
                        "store unreachable, serving cached snapshot"
                    );
                    self.items = cached;
                    Ok(LoadOutcome::Degraded)
                }
                Ok(None) => Err(err.into()),
                Err(cache_err) => {
                    tracing::warn!(trip = %self.key, error = %cache_err, "cache read failed");
                    Err(err.into())
                }
            },
        }
    }

    /// Append a batch of new items, then reload to resynchronize with any
    /// concurrent writers. Manual entries are also upserted into the
    /// template catalog, fire-and-forget.
    pub fn add_items(
        &mut self,
        specs: Vec<NewItem>,
        source: ItemSource,
    ) -> Result<LoadOutcome, EngineError> {
        if specs.is_empty() {
            return Err(EngineError::Validation("nothing to add".into()));
        }
        self.store.append_items(&self.key, &specs)?;

        if source == ItemSource::Manual {
            let templates: Vec<TemplateSpec> = specs
                .iter()
                .map(|s| TemplateSpec::new(&s.name, s.category))
                .collect();
            if let Err(err) = self.catalog.upsert_templates(&templates) {
                tracing::warn!(error = %err, "template catalog upsert failed, continuing");
            }
        }

        self.load()
    }

    /// Targeted update of one item's status and/or name. On success the same
    /// fields merge into the snapshot and cache with a fresh stamp; no
    /// reload on the hot path. An id not in the trip is a silent no-op.
    pub fn update_item(&mut self, item_id: ItemId, patch: ItemPatch) -> Result<(), EngineError> {
        if patch.is_empty() {
            return Err(EngineError::Validation("empty item update".into()));
        }
        if let Some(next) = patch.status
            && let Some(current) = self.find_item(item_id)
            && next != current.status
            && next != Status::Taken
            && !current.status.is_offered(next)
        {
            // Advisory only; the store applies the write regardless.
            tracing::debug!(
                item = %item_id,
                from = %current.status,
                to = %next,
                "status transition outside the offer table"
            );
        }

        self.store.update_item_fields(&self.key, item_id, &patch)?;

        let stamp = self.clock.tick()?;
        if let Some(item) = self.items.iter_mut().find(|it| it.id == item_id) {
            patch.apply(item, stamp);
        }
        self.refresh_cache();
        Ok(())
    }

    /// The checkbox action: mark an item Taken from any status. Taking an
    /// already-taken item is an idempotent no-op.
    pub fn take_item(&mut self, item_id: ItemId) -> Result<(), EngineError> {
        if let Some(item) = self.find_item(item_id)
            && item.status == Status::Taken
        {
            return Ok(());
        }
        self.update_item(item_id, ItemPatch::set_status(Status::Taken))
    }

    /// Remove one item from the store, then filter it out locally; no reload.
    pub fn delete_item(&mut self, item_id: ItemId) -> Result<(), EngineError> {
        self.store.remove_item(&self.key, item_id)?;
        self.items.retain(|it| it.id != item_id);
        self.refresh_cache();
        Ok(())
    }

    /// Clear the trip's item collection; the trip record survives.
    pub fn delete_all(&mut self) -> Result<(), EngineError> {
        self.store.remove_all_items(&self.key)?;
        self.items.clear();
        self.refresh_cache();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Derived views over the snapshot
    // ------------------------------------------------------------------

    pub fn grouped(&self) -> Vec<CategoryView<'_>> {
        view::group_by_category_and_status(&self.items)
    }

    pub fn subgroup(&self, status: Status) -> Vec<&Item> {
        view::subgroup(&self.items, status)
    }

    pub fn subgroup_text(&self, status: Status) -> String {
        view::subgroup_text(&self.items, status)
    }

    pub fn status_count(&self, status: Status) -> usize {
        view::count_by_status(&self.items, status)
    }

    /// The primary "to pack" counter: everything not yet Taken.
    pub fn outstanding(&self) -> usize {
        view::count_outstanding(&self.items)
    }

    // ------------------------------------------------------------------
    // Template management surface
    // ------------------------------------------------------------------

    pub fn templates(&self) -> Result<Vec<Template>, EngineError> {
        Ok(self.catalog.list_templates()?)
    }

    pub fn add_template(&mut self, name: &str, category: Category) -> Result<(), EngineError> {
        let spec = TemplateSpec::new(name, category);
        if spec.name.is_empty() {
            return Err(packlist_core::CoreError::EmptyName.into());
        }
        Ok(self.catalog.upsert_templates(&[spec])?)
    }

    pub fn update_template(
        &mut self,
        id: TemplateId,
        name: &str,
        category: Category,
    ) -> Result<(), EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(packlist_core::CoreError::EmptyName.into());
        }
        Ok(self.catalog.update_template(id, name, category)?)
    }

    pub fn delete_templates(&mut self, ids: &[TemplateId]) -> Result<(), EngineError> {
        Ok(self.catalog.delete_templates(ids)?)
    }

    pub fn delete_all_templates(&mut self) -> Result<(), EngineError> {
        Ok(self.catalog.delete_all_templates()?)
    }

    /// Parse a pasted JSON payload and upsert the entries. Returns how many
    /// entries the payload held. Malformed payloads are rejected before any
    /// catalog contact.
    pub fn import_templates(&mut self, json: &str) -> Result<usize, EngineError> {
        let specs = parse_import(json)?;
        let count = specs.len();
        self.catalog.upsert_templates(&specs)?;
        Ok(count)
    }

    pub fn export_templates(&self) -> Result<String, EngineError> {
        let templates = self.catalog.list_templates()?;
        Ok(export_json(&templates)?)
    }
}
