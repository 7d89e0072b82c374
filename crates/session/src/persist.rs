use crate::error::Result;
use clausemap_graph::{ConceptRegistry, RiskGraph};
use clausemap_model::ChangeRecord;
use serde::{Deserialize, Serialize};

/// Persistable shape of one session's maps.
///
/// Matches the field names the surrounding application embeds in its
/// session document (`concept_map`, `risk_map`, `change_history`). The
/// caller owns where and how this is stored; the engine only defines the
/// in-memory shape and its JSON form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMaps {
    pub concept_map: ConceptRegistry,
    pub risk_map: RiskGraph,
    #[serde(default)]
    pub change_history: Vec<ChangeRecord>,
}

impl SessionMaps {
    /// Embed into a larger session document.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse back out of a session document field.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
