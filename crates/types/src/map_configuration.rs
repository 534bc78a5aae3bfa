//! Map configuration candidates offered by the data provider

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored indoor map configuration
///
/// Only `id` and `name` are interpreted here. Everything else (building
/// levels, markers, the associated device reference) belongs to the data
/// provider and is kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfiguration {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MapConfiguration {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Find a candidate by id
    pub fn find<'a>(candidates: &'a [MapConfiguration], id: &str) -> Option<&'a MapConfiguration> {
        candidates.iter().find(|candidate| candidate.id == id)
    }
}
