use packlist_core::{Category, ItemId, NewItem, Status, TripKey};
use packlist_engine::{EngineError, ItemSource, LoadOutcome, TripSession};
use packlist_storage::{StorageError, TripCache};

use crate::server::{ServerHandle, TestServer};

/// One simulated link-holder: a [`TripSession`] wired to the shared test
/// server with its own device cache.
pub struct TestClient {
    pub session: TripSession<ServerHandle, ServerHandle>,
}

impl TestClient {
    pub fn connect(server: &TestServer, key: &TripKey) -> Result<Self, StorageError> {
        let cache = TripCache::open_in_memory()?;
        Ok(Self {
            session: TripSession::new(key.clone(), server.handle(), server.handle(), cache),
        })
    }

    pub fn add_manual(
        &mut self,
        name: &str,
        category: Category,
        status: Status,
    ) -> Result<LoadOutcome, EngineError> {
        let spec = NewItem::new(name, category)?.with_status(status);
        self.session.add_items(vec![spec], ItemSource::Manual)
    }

    pub fn add_from_catalog(
        &mut self,
        name: &str,
        category: Category,
        status: Status,
    ) -> Result<LoadOutcome, EngineError> {
        let spec = NewItem::new(name, category)?.with_status(status);
        self.session.add_items(vec![spec], ItemSource::FromCatalog)
    }

    /// Id of the snapshot item with the given name; panics if absent.
    pub fn id_of(&self, name: &str) -> ItemId {
        self.session
            .items()
            .iter()
            .find(|it| it.name == name)
            .map(|it| it.id)
            .expect("item present in snapshot")
    }

    pub fn status_of(&self, name: &str) -> Status {
        self.session
            .items()
            .iter()
            .find(|it| it.name == name)
            .map(|it| it.status)
            .expect("item present in snapshot")
    }
}
