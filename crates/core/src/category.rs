use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Closed set of item categories. The declared order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Documents,
    Clothing,
    Footwear,
    Hygiene,
    Medical,
    Electronics,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Documents,
        Category::Clothing,
        Category::Footwear,
        Category::Hygiene,
        Category::Medical,
        Category::Electronics,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Documents => "Documents and money",
            Category::Clothing => "Clothing",
            Category::Footwear => "Footwear",
            Category::Hygiene => "Hygiene and cosmetics",
            Category::Medical => "First-aid kit",
            Category::Electronics => "Electronics",
            Category::Other => "Other",
        }
    }

    pub fn parse_label(s: &str) -> Result<Self, CoreError> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse_label(s)
    }
}
