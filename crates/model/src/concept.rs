use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Legal concept category a provision belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptCategory {
    /// Baskets, caps, survival periods, deductibles.
    LiabilityLimitation,
    /// Knowledge definitions and who they apply to.
    KnowledgeStandard,
    /// Events allowing or requiring termination.
    TerminationTrigger,
    /// Cure periods, notice requirements, auto vs elective remedies.
    DefaultRemedy,
    /// MAE, Permitted Exceptions, and similar defined terms.
    DefinedTerm,
}

impl ConceptCategory {
    /// Uppercase heading used when rendering the registry for a prompt.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::LiabilityLimitation => "LIABILITY LIMITATIONS",
            Self::KnowledgeStandard => "KNOWLEDGE STANDARDS",
            Self::TerminationTrigger => "TERMINATION TRIGGERS",
            Self::DefaultRemedy => "DEFAULT REMEDIES",
            Self::DefinedTerm => "KEY DEFINED TERMS",
        }
    }
}

impl fmt::Display for ConceptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiabilityLimitation => write!(f, "liability_limitation"),
            Self::KnowledgeStandard => write!(f, "knowledge_standard"),
            Self::TerminationTrigger => write!(f, "termination_trigger"),
            Self::DefaultRemedy => write!(f, "default_remedy"),
            Self::DefinedTerm => write!(f, "defined_term"),
        }
    }
}

/// `(category, key)` pair identifying one provision in the registry.
///
/// Also the target form of mitigated_by / amplified_by edges.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConceptKey {
    pub category: ConceptCategory,
    pub key: String,
}

impl ConceptKey {
    pub fn new(category: ConceptCategory, key: impl Into<String>) -> Self {
        Self {
            category,
            key: key.into(),
        }
    }
}

impl fmt::Display for ConceptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.key)
    }
}

/// A single extracted contractual provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptEntry {
    pub category: ConceptCategory,

    /// Identifier unique within the category (e.g. "basket", "cap").
    pub key: String,

    /// Semantic payload: the extracted amount, period, or scope text.
    pub value: String,

    /// Section label where the provision lives (e.g. "8.3").
    pub section_ref: String,

    /// Owning paragraph identifier.
    pub para_id: String,

    /// Free-form extras: exclusions, scope notes, applicability.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl ConceptEntry {
    pub fn new(
        category: ConceptCategory,
        key: impl Into<String>,
        value: impl Into<String>,
        section_ref: impl Into<String>,
        para_id: impl Into<String>,
    ) -> Self {
        Self {
            category,
            key: key.into(),
            value: value.into(),
            section_ref: section_ref.into(),
            para_id: para_id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Registry key for this entry.
    #[must_use]
    pub fn concept_key(&self) -> ConceptKey {
        ConceptKey::new(self.category, self.key.clone())
    }

    /// Builder-style attribute attachment.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concept_key_display() {
        let key = ConceptKey::new(ConceptCategory::LiabilityLimitation, "basket");
        assert_eq!(key.to_string(), "liability_limitation:basket");
    }

    #[test]
    fn serde_uses_snake_case_categories() {
        let json = serde_json::to_string(&ConceptCategory::DefaultRemedy).unwrap();
        assert_eq!(json, "\"default_remedy\"");
        let back: ConceptCategory = serde_json::from_str("\"knowledge_standard\"").unwrap();
        assert_eq!(back, ConceptCategory::KnowledgeStandard);
    }

    #[test]
    fn entry_round_trips_attributes() {
        let entry = ConceptEntry::new(
            ConceptCategory::LiabilityLimitation,
            "cap",
            "$2,000,000",
            "8.3",
            "p_41",
        )
        .with_attribute("exclusions", "fraud, willful misconduct");

        let json = serde_json::to_string(&entry).unwrap();
        let back: ConceptEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
