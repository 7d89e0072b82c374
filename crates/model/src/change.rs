use crate::concept::{ConceptEntry, ConceptKey};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One detected provision change in an accepted revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ConceptChange {
    Added {
        entry: ConceptEntry,
    },
    Modified {
        entry: ConceptEntry,
        previous_value: String,
    },
    Removed {
        key: ConceptKey,
        last_value: String,
    },
}

impl ConceptChange {
    /// Registry key the change applies to.
    #[must_use]
    pub fn key(&self) -> ConceptKey {
        match self {
            Self::Added { entry } | Self::Modified { entry, .. } => entry.concept_key(),
            Self::Removed { key, .. } => key.clone(),
        }
    }

    /// One-line human-readable description, e.g. "Modified Cap: $1M -> $2M".
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Added { entry } => {
                if entry.value.is_empty() {
                    format!("Added {}", title_case(&entry.key))
                } else {
                    format!("Added {}: {}", title_case(&entry.key), entry.value)
                }
            }
            Self::Modified {
                entry,
                previous_value,
            } => format!(
                "Modified {}: {} -> {}",
                title_case(&entry.key),
                previous_value,
                entry.value
            ),
            Self::Removed { key, last_value } => {
                if last_value.is_empty() {
                    format!("Removed {}", title_case(&key.key))
                } else {
                    format!("Removed {}: {}", title_case(&key.key), last_value)
                }
            }
        }
    }
}

/// Joined summary of a change batch for audit display.
#[must_use]
pub fn summarize_changes(changes: &[ConceptChange]) -> String {
    if changes.is_empty() {
        return "No concept changes detected.".to_string();
    }
    changes
        .iter()
        .map(ConceptChange::summary)
        .collect::<Vec<_>>()
        .join("; ")
}

fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Append-only audit entry for one accepted revision that moved the maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// "chg_<n>", sequential within the session.
    pub change_id: String,

    /// Unix milliseconds at record creation.
    pub timestamp_ms: u64,

    pub para_id: String,
    pub section_ref: String,

    /// Human-readable description of what changed.
    pub change_type: String,

    /// Risks whose effective severity was recomputed, in discovery order.
    pub affected_risk_ids: Vec<String>,

    /// Paragraphs that may need re-analysis.
    pub affected_para_ids: Vec<String>,
}

impl ChangeRecord {
    pub fn new(
        sequence: usize,
        para_id: impl Into<String>,
        section_ref: impl Into<String>,
        change_type: impl Into<String>,
        affected_risk_ids: Vec<String>,
        affected_para_ids: Vec<String>,
    ) -> Self {
        Self {
            change_id: format!("chg_{sequence}"),
            timestamp_ms: unix_millis(),
            para_id: para_id.into(),
            section_ref: section_ref.into(),
            change_type: change_type.into(),
            affected_risk_ids,
            affected_para_ids,
        }
    }
}

/// Current wall-clock time as unix milliseconds.
#[must_use]
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
