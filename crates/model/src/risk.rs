use crate::concept::{ConceptCategory, ConceptKey};
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An identified issue in a clause.
///
/// `base_severity` is set once at analysis time and never changes;
/// `effective_severity` starts equal to it and is recomputed whenever a
/// related provision changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    /// Unique within a session, stable across revisions.
    pub risk_id: String,

    /// Human-readable clause location.
    pub clause: String,

    pub section_ref: String,

    /// Owning paragraph identifier.
    pub para_id: String,

    pub title: String,
    pub description: String,

    pub base_severity: Severity,
    pub effective_severity: Severity,
}

impl Risk {
    pub fn new(
        risk_id: impl Into<String>,
        clause: impl Into<String>,
        section_ref: impl Into<String>,
        para_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        base_severity: Severity,
    ) -> Self {
        Self {
            risk_id: risk_id.into(),
            clause: clause.into(),
            section_ref: section_ref.into(),
            para_id: para_id.into(),
            title: title.into(),
            description: description.into(),
            base_severity,
            effective_severity: base_severity,
        }
    }
}

/// Kind of a directed relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Provision reduces this risk's severity.
    MitigatedBy,
    /// Provision increases exposure if the risk materializes.
    AmplifiedBy,
    /// This risk activates another risk's consequences.
    Triggers,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MitigatedBy => write!(f, "mitigated_by"),
            Self::AmplifiedBy => write!(f, "amplified_by"),
            Self::Triggers => write!(f, "triggers"),
        }
    }
}

/// What an edge points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeTarget {
    Concept { category: ConceptCategory, key: String },
    Risk { risk_id: String },
}

impl fmt::Display for EdgeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concept { category, key } => write!(f, "{category}:{key}"),
            Self::Risk { risk_id } => write!(f, "{risk_id}"),
        }
    }
}

/// A directed relationship from a risk to a provision or to another risk.
///
/// Constructed only through [`RiskRelationship::mitigates`],
/// [`RiskRelationship::amplifies`], or [`RiskRelationship::triggers`], so a
/// mitigated_by/amplified_by edge always carries a concept target and a
/// triggers edge always carries a risk target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRelationship {
    pub source_risk_id: String,
    pub kind: RelationshipKind,
    pub target: EdgeTarget,

    /// Free-text explanation of the effect.
    #[serde(default)]
    pub effect_note: String,
}

impl RiskRelationship {
    pub fn mitigates(
        source_risk_id: impl Into<String>,
        target: ConceptKey,
        effect_note: impl Into<String>,
    ) -> Self {
        Self {
            source_risk_id: source_risk_id.into(),
            kind: RelationshipKind::MitigatedBy,
            target: EdgeTarget::Concept {
                category: target.category,
                key: target.key,
            },
            effect_note: effect_note.into(),
        }
    }

    pub fn amplifies(
        source_risk_id: impl Into<String>,
        target: ConceptKey,
        effect_note: impl Into<String>,
    ) -> Self {
        Self {
            source_risk_id: source_risk_id.into(),
            kind: RelationshipKind::AmplifiedBy,
            target: EdgeTarget::Concept {
                category: target.category,
                key: target.key,
            },
            effect_note: effect_note.into(),
        }
    }

    pub fn triggers(source_risk_id: impl Into<String>, target_risk_id: impl Into<String>) -> Self {
        Self {
            source_risk_id: source_risk_id.into(),
            kind: RelationshipKind::Triggers,
            target: EdgeTarget::Risk {
                risk_id: target_risk_id.into(),
            },
            effect_note: String::new(),
        }
    }

    /// Concept target, if this is a mitigated_by/amplified_by edge.
    #[must_use]
    pub fn concept_target(&self) -> Option<ConceptKey> {
        match &self.target {
            EdgeTarget::Concept { category, key } => {
                Some(ConceptKey::new(*category, key.clone()))
            }
            EdgeTarget::Risk { .. } => None,
        }
    }

    /// Risk target, if this is a triggers edge.
    #[must_use]
    pub fn risk_target(&self) -> Option<&str> {
        match &self.target {
            EdgeTarget::Risk { risk_id } => Some(risk_id),
            EdgeTarget::Concept { .. } => None,
        }
    }
}
