use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Item lifecycle state. `Need` is an explicit variant; a stored record with
/// no status classifies as `Need` at the storage boundary, never as an
/// absent field in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Need,
    Buy,
    Think,
    Taken,
}

impl Status {
    /// Fixed display order of subgroups within a category.
    pub const ALL: [Status; 4] = [Status::Need, Status::Buy, Status::Think, Status::Taken];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Need => "Need to take",
            Status::Buy => "Buy",
            Status::Think => "Think over",
            Status::Taken => "Taken",
        }
    }

    pub fn parse_label(s: &str) -> Result<Self, CoreError> {
        Status::ALL
            .into_iter()
            .find(|st| st.label() == s)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }

    /// Classify a stored status value: absent or blank means `Need`.
    /// This is the single place the null-coalescing rule lives.
    pub fn parse_stored(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw {
            None => Ok(Status::Need),
            Some(s) if s.trim().is_empty() => Ok(Status::Need),
            Some(s) => Status::parse_label(s),
        }
    }

    /// Valid next-status offers for the dropdown menu. A status never offers
    /// itself; `Taken` is reached only through the dedicated take action.
    pub fn offers(&self) -> &'static [Status] {
        match self {
            Status::Need => &[Status::Buy, Status::Think],
            Status::Buy => &[Status::Need, Status::Think],
            Status::Think => &[Status::Need, Status::Buy],
            Status::Taken => &[Status::Need, Status::Buy, Status::Think],
        }
    }

    /// Advisory check used by the controller; a miss is logged, not enforced.
    pub fn is_offered(&self, next: Status) -> bool {
        self.offers().contains(&next)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::parse_label(s)
    }
}
