use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::CoreError;
use crate::ids::TemplateId;

/// Reusable `(name, category)` pair in the global catalog. Not trip-scoped,
/// deduplicated by exact name, never expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub category: Category,
}

/// Input to a catalog upsert. Blank names are tolerated here and skipped by
/// the catalog, so batch flows don't fail on a single empty row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    pub name: String,
    pub category: Category,
}

impl TemplateSpec {
    pub fn new(name: &str, category: Category) -> Self {
        Self {
            name: name.trim().to_string(),
            category,
        }
    }
}

#[derive(Deserialize)]
struct ImportEntry {
    name: String,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Serialize)]
struct ExportEntry<'a> {
    name: &'a str,
    category: &'a str,
}

/// Parse a pasted JSON import payload: an array of `{name, category?}`.
/// A missing category defaults to Other; an unknown category label is a
/// validation error.
pub fn parse_import(json: &str) -> Result<Vec<TemplateSpec>, CoreError> {
    let entries: Vec<ImportEntry> =
        serde_json::from_str(json).map_err(|e| CoreError::MalformedImport(e.to_string()))?;
    entries
        .into_iter()
        .map(|entry| {
            let category = match entry.category.as_deref() {
                None => Category::Other,
                Some(label) => Category::parse_label(label)?,
            };
            Ok(TemplateSpec::new(&entry.name, category))
        })
        .collect()
}

pub fn export_json(templates: &[Template]) -> Result<String, CoreError> {
    let entries: Vec<ExportEntry<'_>> = templates
        .iter()
        .map(|t| ExportEntry {
            name: &t.name,
            category: t.category.label(),
        })
        .collect();
    serde_json::to_string_pretty(&entries).map_err(|e| CoreError::Serialization(e.to_string()))
}
