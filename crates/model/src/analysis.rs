//! Bulk-load DTO for one LLM analysis batch.
//!
//! The analysis layer hands the engine a schema-checked JSON document
//! containing the extracted provisions and the risk inventory with
//! relationship edges. Entries, risks, and edges may arrive in any order;
//! edge targets are only validated at reconciliation time.

use crate::concept::{ConceptCategory, ConceptEntry, ConceptKey};
use crate::risk::{Risk, RiskRelationship};
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One extracted provision as produced by the analysis layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionDto {
    pub category: ConceptCategory,
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub section_ref: String,
    #[serde(default)]
    pub para_id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ProvisionDto {
    /// Convert into the engine's owned entry form.
    #[must_use]
    pub fn into_entry(self) -> ConceptEntry {
        ConceptEntry {
            category: self.category,
            key: self.key,
            value: self.value,
            section_ref: self.section_ref,
            para_id: self.para_id,
            attributes: self.attributes,
        }
    }
}

/// A mitigating or amplifying reference on a risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDto {
    pub category: ConceptCategory,
    pub key: String,
    #[serde(default)]
    pub effect: String,
}

impl EdgeDto {
    #[must_use]
    pub fn concept_key(&self) -> ConceptKey {
        ConceptKey::new(self.category, self.key.clone())
    }
}

/// One risk in the analysis inventory, with its relationship edges inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDto {
    pub risk_id: String,
    #[serde(default)]
    pub section_ref: String,
    #[serde(default)]
    pub para_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Raw severity string; normalized on load ("info" -> low, unknown -> medium).
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub mitigated_by: Vec<EdgeDto>,
    #[serde(default)]
    pub amplified_by: Vec<EdgeDto>,
    #[serde(default)]
    pub triggers: Vec<String>,
}

impl RiskDto {
    /// Build the owned risk, severity normalized.
    #[must_use]
    pub fn to_risk(&self) -> Risk {
        let clause = if self.section_ref.is_empty() {
            self.para_id.clone()
        } else {
            self.section_ref.clone()
        };
        Risk::new(
            self.risk_id.clone(),
            clause,
            self.section_ref.clone(),
            self.para_id.clone(),
            self.title.clone(),
            self.description.clone(),
            Severity::normalize(&self.severity),
        )
    }

    /// All relationship edges attached to this risk, in declaration order.
    #[must_use]
    pub fn edges(&self) -> Vec<RiskRelationship> {
        let mut edges = Vec::with_capacity(
            self.mitigated_by.len() + self.amplified_by.len() + self.triggers.len(),
        );
        for m in &self.mitigated_by {
            edges.push(RiskRelationship::mitigates(
                self.risk_id.clone(),
                m.concept_key(),
                m.effect.clone(),
            ));
        }
        for a in &self.amplified_by {
            edges.push(RiskRelationship::amplifies(
                self.risk_id.clone(),
                a.concept_key(),
                a.effect.clone(),
            ));
        }
        for t in &self.triggers {
            edges.push(RiskRelationship::triggers(self.risk_id.clone(), t.clone()));
        }
        edges
    }
}

/// Top-level analysis batch: concept map plus risk inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    #[serde(default)]
    pub concept_map: Vec<ProvisionDto>,
    #[serde(default)]
    pub risk_inventory: Vec<RiskDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RelationshipKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_sparse_analysis_json() {
        let json = r#"{
            "concept_map": [
                {"category": "liability_limitation", "key": "basket", "value": "50,000", "section_ref": "8.3"}
            ],
            "risk_inventory": [
                {
                    "risk_id": "R1",
                    "para_id": "p_12",
                    "severity": "HIGH",
                    "mitigated_by": [{"category": "liability_limitation", "key": "basket", "effect": "absorbs small claims"}],
                    "triggers": ["R2"]
                }
            ]
        }"#;

        let batch: AnalysisOutput = serde_json::from_str(json).unwrap();
        assert_eq!(batch.concept_map.len(), 1);

        let risk = batch.risk_inventory[0].to_risk();
        assert_eq!(risk.base_severity, Severity::High);
        assert_eq!(risk.clause, "p_12");

        let edges = batch.risk_inventory[0].edges();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].kind, RelationshipKind::MitigatedBy);
        assert_eq!(edges[1].kind, RelationshipKind::Triggers);
        assert_eq!(edges[1].risk_target(), Some("R2"));
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let batch: AnalysisOutput = serde_json::from_str("{}").unwrap();
        assert!(batch.concept_map.is_empty());
        assert!(batch.risk_inventory.is_empty());
    }
}
