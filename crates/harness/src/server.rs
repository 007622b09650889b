use std::cell::{Cell, RefCell};
use std::rc::Rc;

use packlist_core::{
    Category, Item, ItemId, ItemPatch, NewItem, Template, TemplateId, TemplateSpec, TripKey,
};
use packlist_storage::{
    ItemStore, SqliteStore, StorageError, TemplateCatalog, TripRecord,
};

#[derive(Default)]
struct Faults {
    offline: Cell<bool>,
    catalog_offline: Cell<bool>,
}

/// One in-memory store shared by every connected client, standing in for
/// the remote trip service. Outages are simulated by flipping fault flags;
/// an offline call fails with `StorageError::Unavailable` before reaching
/// the store.
pub struct TestServer {
    store: Rc<RefCell<SqliteStore>>,
    faults: Rc<Faults>,
}

impl TestServer {
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            store: Rc::new(RefCell::new(SqliteStore::open_in_memory()?)),
            faults: Rc::new(Faults::default()),
        })
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            store: Rc::clone(&self.store),
            faults: Rc::clone(&self.faults),
        }
    }

    /// Take the whole server offline (items and catalog).
    pub fn set_offline(&self, offline: bool) {
        self.faults.offline.set(offline);
    }

    /// Fail only the template catalog, leaving the item store reachable.
    pub fn set_catalog_offline(&self, offline: bool) {
        self.faults.catalog_offline.set(offline);
    }

    /// Direct access to the backing store, for fixtures that need to reach
    /// behind the public interface (e.g. aging a trip into expiry).
    pub fn with_store<R>(&self, f: impl FnOnce(&mut SqliteStore) -> R) -> R {
        f(&mut self.store.borrow_mut())
    }
}

/// A client-side connection to the [`TestServer`]. Cloneable so each
/// session can hold its own handle to the shared store.
#[derive(Clone)]
pub struct ServerHandle {
    store: Rc<RefCell<SqliteStore>>,
    faults: Rc<Faults>,
}

impl ServerHandle {
    fn check_online(&self) -> Result<(), StorageError> {
        if self.faults.offline.get() {
            return Err(StorageError::Unavailable("simulated outage".into()));
        }
        Ok(())
    }

    fn check_catalog_online(&self) -> Result<(), StorageError> {
        self.check_online()?;
        if self.faults.catalog_offline.get() {
            return Err(StorageError::Unavailable("simulated catalog outage".into()));
        }
        Ok(())
    }
}

impl ItemStore for ServerHandle {
    fn get_trip(&mut self, key: &TripKey) -> Result<TripRecord, StorageError> {
        self.check_online()?;
        self.store.borrow_mut().get_trip(key)
    }

    fn append_items(
        &mut self,
        key: &TripKey,
        specs: &[NewItem],
    ) -> Result<Vec<Item>, StorageError> {
        self.check_online()?;
        self.store.borrow_mut().append_items(key, specs)
    }

    fn update_item_fields(
        &mut self,
        key: &TripKey,
        item_id: ItemId,
        patch: &ItemPatch,
    ) -> Result<(), StorageError> {
        self.check_online()?;
        self.store.borrow_mut().update_item_fields(key, item_id, patch)
    }

    fn remove_item(&mut self, key: &TripKey, item_id: ItemId) -> Result<(), StorageError> {
        self.check_online()?;
        self.store.borrow_mut().remove_item(key, item_id)
    }

    fn remove_all_items(&mut self, key: &TripKey) -> Result<(), StorageError> {
        self.check_online()?;
        self.store.borrow_mut().remove_all_items(key)
    }
}

impl TemplateCatalog for ServerHandle {
    fn list_templates(&self) -> Result<Vec<Template>, StorageError> {
        self.check_catalog_online()?;
        self.store.borrow().list_templates()
    }

    fn upsert_templates(&mut self, specs: &[TemplateSpec]) -> Result<(), StorageError> {
        self.check_catalog_online()?;
        self.store.borrow_mut().upsert_templates(specs)
    }

    fn update_template(
        &mut self,
        id: TemplateId,
        name: &str,
        category: Category,
    ) -> Result<(), StorageError> {
        self.check_catalog_online()?;
        self.store.borrow_mut().update_template(id, name, category)
    }

    fn delete_templates(&mut self, ids: &[TemplateId]) -> Result<(), StorageError> {
        self.check_catalog_online()?;
        self.store.borrow_mut().delete_templates(ids)
    }

    fn delete_all_templates(&mut self) -> Result<(), StorageError> {
        self.check_catalog_online()?;
        self.store.borrow_mut().delete_all_templates()
    }
}
