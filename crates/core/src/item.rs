use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::clock::Millis;
use crate::error::CoreError;
use crate::ids::ItemId;
use crate::status::Status;

/// One packing-list entry. Belongs to exactly one trip, one category and one
/// status at any instant; `updated_at` is non-decreasing over its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub status: Status,
    pub created_at: Millis,
    pub updated_at: Millis,
}

/// A not-yet-persisted item. The store stamps the id and timestamps at
/// append time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: Category,
    pub status: Status,
}

impl NewItem {
    pub fn new(name: &str, category: Category) -> Result<Self, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            category,
            status: Status::Need,
        })
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// Targeted per-item update. Only status and name are mutable on the main
/// list path; category changes go through the management surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub status: Option<Status>,
    pub name: Option<String>,
}

impl ItemPatch {
    pub fn set_status(status: Status) -> Self {
        Self {
            status: Some(status),
            name: None,
        }
    }

    pub fn rename(name: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(Self {
            status: None,
            name: Some(name.to_string()),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.name.is_none()
    }

    /// Merge the patch into an in-memory item with a fresh stamp.
    pub fn apply(&self, item: &mut Item, stamp: Millis) {
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        item.updated_at = stamp;
    }
}

pub fn encode_items(items: &[Item]) -> Result<Vec<u8>, CoreError> {
    rmp_serde::to_vec(items).map_err(|e| CoreError::Serialization(e.to_string()))
}

pub fn decode_items(bytes: &[u8]) -> Result<Vec<Item>, CoreError> {
    rmp_serde::from_slice(bytes).map_err(|e| CoreError::Serialization(e.to_string()))
}
