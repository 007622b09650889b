pub mod cache;
pub mod error;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use cache::TripCache;
pub use error::StorageError;
pub use sqlite::{SqliteStore, TRIP_TTL_MS};
pub use traits::*;
