//! Legend threshold entries

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use uuid::Uuid;

/// Identity of a threshold
///
/// Hosts have stored both string and numeric ids; either form is kept as
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdId {
    Text(String),
    Number(Number),
}

impl ThresholdId {
    /// A fresh random id for a threshold created here
    pub fn generate() -> Self {
        ThresholdId::Text(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ThresholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdId::Text(text) => f.write_str(text),
            ThresholdId::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for ThresholdId {
    fn from(id: &str) -> Self {
        ThresholdId::Text(id.to_string())
    }
}

/// A legend entry
///
/// Only `id` is interpreted. Label, range, color and whatever else the
/// threshold editor writes are kept in `fields` exactly as stored and are
/// replaced wholesale when the threshold is edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub id: ThresholdId,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
