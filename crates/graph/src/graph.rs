use crate::error::{GraphError, Result};
use clausemap_model::{ConceptKey, RelationshipKind, Risk, RiskRelationship};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Risks with typed dependency edges and incrementally-maintained reverse
/// indices.
///
/// The reverse indices are the lookups impact propagation depends on; they
/// are updated on every `add_edge` rather than recomputed by scan, since a
/// document may carry hundreds of risks. Registry mutations never touch
/// this graph - only explicit propagation calls do.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RiskGraphState", into = "RiskGraphState")]
pub struct RiskGraph {
    /// Risks keyed by id (ordered for deterministic rendering).
    risks: BTreeMap<String, Risk>,

    /// Outgoing edges per source risk, in insertion order.
    edges: BTreeMap<String, Vec<RiskRelationship>>,

    /// Concept key -> risks with a mitigated_by/amplified_by edge to it.
    concept_index: HashMap<ConceptKey, Vec<String>>,

    /// Source risk -> risks it triggers.
    trigger_index: HashMap<String, Vec<String>>,
}

impl RiskGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a risk. Risk ids must be unique per session; a duplicate
    /// indicates a malformed analysis batch.
    pub fn add_risk(&mut self, risk: Risk) -> Result<()> {
        if self.risks.contains_key(&risk.risk_id) {
            return Err(GraphError::DuplicateRisk(risk.risk_id));
        }
        self.risks.insert(risk.risk_id.clone(), risk);
        Ok(())
    }

    /// Attach an edge to an existing risk.
    ///
    /// The source must already be present; the target is deliberately NOT
    /// validated here, so bulk loads can insert risks and edges in any
    /// order. Target validity is enforced lazily at reconciliation time.
    pub fn add_edge(&mut self, edge: RiskRelationship) -> Result<()> {
        if !self.risks.contains_key(&edge.source_risk_id) {
            return Err(GraphError::UnknownSource {
                risk_id: edge.source_risk_id,
                target: edge.target.to_string(),
            });
        }
        self.index_edge(&edge);
        self.edges
            .entry(edge.source_risk_id.clone())
            .or_default()
            .push(edge);
        Ok(())
    }

    fn index_edge(&mut self, edge: &RiskRelationship) {
        match edge.kind {
            RelationshipKind::MitigatedBy | RelationshipKind::AmplifiedBy => {
                if let Some(key) = edge.concept_target() {
                    let referencing = self.concept_index.entry(key).or_default();
                    if !referencing.contains(&edge.source_risk_id) {
                        referencing.push(edge.source_risk_id.clone());
                    }
                }
            }
            RelationshipKind::Triggers => {
                if let Some(target) = edge.risk_target() {
                    let triggered = self
                        .trigger_index
                        .entry(edge.source_risk_id.clone())
                        .or_default();
                    if !triggered.iter().any(|t| t == target) {
                        triggered.push(target.to_string());
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn risk(&self, risk_id: &str) -> Option<&Risk> {
        self.risks.get(risk_id)
    }

    pub fn risk_mut(&mut self, risk_id: &str) -> Option<&mut Risk> {
        self.risks.get_mut(risk_id)
    }

    /// All risks in id order, effective severities as last reconciled.
    pub fn risks(&self) -> impl Iterator<Item = &Risk> {
        self.risks.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.risks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.risks.is_empty()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Edges of one kind attached to a risk.
    #[must_use]
    pub fn edges_for(&self, risk_id: &str, kind: RelationshipKind) -> Vec<&RiskRelationship> {
        self.edges
            .get(risk_id)
            .map(|edges| edges.iter().filter(|e| e.kind == kind).collect())
            .unwrap_or_default()
    }

    /// Risks with a mitigated_by/amplified_by edge pointing at this
    /// concept entry. Empty for keys the graph has never seen.
    #[must_use]
    pub fn risks_referencing(&self, key: &ConceptKey) -> &[String] {
        self.concept_index
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Risks downstream of `risk_id` via triggers edges.
    #[must_use]
    pub fn risks_triggered_by(&self, risk_id: &str) -> &[String] {
        self.trigger_index
            .get(risk_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Risks owned by a paragraph.
    #[must_use]
    pub fn risks_for_para(&self, para_id: &str) -> Vec<&Risk> {
        self.risks.values().filter(|r| r.para_id == para_id).collect()
    }

    /// Risks located in a clause.
    #[must_use]
    pub fn risks_for_clause(&self, clause: &str) -> Vec<&Risk> {
        self.risks.values().filter(|r| r.clause == clause).collect()
    }

    /// Drop every mitigated_by/amplified_by edge targeting a removed
    /// concept, and its reverse-index entry. Returns the number of edges
    /// pruned.
    pub fn prune_concept_edges(&mut self, key: &ConceptKey) -> usize {
        let mut pruned = 0;
        for edges in self.edges.values_mut() {
            let before = edges.len();
            edges.retain(|e| e.concept_target().as_ref() != Some(key));
            pruned += before - edges.len();
        }
        self.concept_index.remove(key);
        if pruned > 0 {
            log::debug!("pruned {pruned} dangling edge(s) targeting {key}");
        }
        pruned
    }

    /// Render risks as a markdown matrix for an LLM prompt.
    ///
    /// The severity cell shows `BASE→EFFECTIVE` when reconciliation has
    /// shifted the risk, otherwise the single effective level.
    #[must_use]
    pub fn to_matrix_block(&self, risk_ids: Option<&[String]>) -> String {
        let ids: Vec<&String> = match risk_ids {
            Some(ids) => ids.iter().collect(),
            None => self.risks.keys().collect(),
        };

        let mut lines = vec![
            "| Risk ID | Clause | Severity | Mitigated By | Amplified By | Triggers |".to_string(),
            "|---------|--------|----------|--------------|--------------|----------|".to_string(),
        ];

        for id in ids {
            let Some(risk) = self.risks.get(id.as_str()) else {
                continue;
            };

            let severity = if risk.base_severity == risk.effective_severity {
                risk.effective_severity.to_string().to_uppercase()
            } else {
                format!(
                    "{}→{}",
                    risk.base_severity.to_string().to_uppercase(),
                    risk.effective_severity.to_string().to_uppercase()
                )
            };

            let cell = |kind: RelationshipKind| -> String {
                let refs = self
                    .edges_for(&risk.risk_id, kind)
                    .iter()
                    .map(|e| e.target.to_string())
                    .collect::<Vec<_>>();
                if refs.is_empty() {
                    "—".to_string()
                } else {
                    refs.join(", ")
                }
            };

            lines.push(format!(
                "| {} | {} | {severity} | {} | {} | {} |",
                risk.risk_id,
                risk.clause,
                cell(RelationshipKind::MitigatedBy),
                cell(RelationshipKind::AmplifiedBy),
                cell(RelationshipKind::Triggers),
            ));
        }

        lines.join("\n")
    }
}

/// Persisted shape: risks and edges only. Reverse indices are derived
/// state and rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RiskGraphState {
    risks: BTreeMap<String, Risk>,
    edges: BTreeMap<String, Vec<RiskRelationship>>,
}

impl From<RiskGraphState> for RiskGraph {
    fn from(state: RiskGraphState) -> Self {
        let mut graph = Self {
            risks: state.risks,
            edges: BTreeMap::new(),
            concept_index: HashMap::new(),
            trigger_index: HashMap::new(),
        };
        for (source, edges) in state.edges {
            for edge in &edges {
                graph.index_edge(edge);
            }
            graph.edges.insert(source, edges);
        }
        graph
    }
}

impl From<RiskGraph> for RiskGraphState {
    fn from(graph: RiskGraph) -> Self {
        Self {
            risks: graph.risks,
            edges: graph.edges,
        }
    }
}
