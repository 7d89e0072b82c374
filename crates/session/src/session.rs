use crate::error::Result;
use crate::persist::SessionMaps;
use clausemap_detect::detect;
use clausemap_graph::{
    propagate, reconcile_all, ConceptRegistry, ImpactResult, RiskGraph, SeverityPolicy,
    SteppedPolicy,
};
use clausemap_model::analysis::AnalysisOutput;
use clausemap_model::{ChangeRecord, ConceptChange, Risk};

/// What one accepted revision did to the maps.
#[derive(Debug, Clone)]
pub struct RevisionOutcome {
    /// Provision changes the detector found (often empty).
    pub changes: Vec<ConceptChange>,

    /// Present only when at least one change was detected.
    pub impact: Option<ImpactResult>,
}

impl RevisionOutcome {
    /// Paragraphs the caller may want to offer for re-analysis.
    #[must_use]
    pub fn affected_para_ids(&self) -> Vec<&str> {
        self.impact
            .as_ref()
            .map(|i| i.affected_para_ids.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// One document review's concept registry, risk graph, and audit log.
///
/// Exclusively owned by its session; exactly one logical writer (the
/// accept-revision operation) mutates it, so it carries no locking.
pub struct ReviewSession {
    registry: ConceptRegistry,
    graph: RiskGraph,
    history: Vec<ChangeRecord>,
    policy: Box<dyn SeverityPolicy + Send + Sync>,
}

impl ReviewSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: ConceptRegistry::new(),
            graph: RiskGraph::new(),
            history: Vec::new(),
            policy: Box::new(SteppedPolicy),
        }
    }

    /// Swap in a different severity arithmetic.
    #[must_use]
    pub fn with_policy(mut self, policy: impl SeverityPolicy + Send + Sync + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Build a session from one parsed analysis batch.
    ///
    /// Provisions, risks, and edges are accepted in any order: all risks
    /// are inserted before any edge, and edge targets stay unvalidated
    /// until the closing reconciliation. Structural errors (duplicate
    /// risk id, edge from an unknown risk) abort the whole load.
    pub fn from_analysis(batch: AnalysisOutput) -> Result<Self> {
        let mut session = Self::new();

        for provision in batch.concept_map {
            session.registry.upsert(provision.into_entry());
        }

        for dto in &batch.risk_inventory {
            session.graph.add_risk(dto.to_risk())?;
        }
        for dto in &batch.risk_inventory {
            for edge in dto.edges() {
                session.graph.add_edge(edge)?;
            }
        }

        reconcile_all(
            &mut session.graph,
            &session.registry,
            session.policy.as_ref(),
        );

        log::info!(
            "loaded analysis: {} provision(s), {} risk(s), {} edge(s)",
            session.registry.len(),
            session.graph.len(),
            session.graph.edge_count()
        );
        Ok(session)
    }

    /// Run the full reconciliation pass for one accepted revision.
    ///
    /// Called synchronously after the document model has committed the
    /// text change. When the detector finds nothing (the common case for
    /// edits that don't touch risk-relevant language) the maps are left
    /// untouched and no audit entry is written.
    pub fn accept_revision(
        &mut self,
        before_text: &str,
        after_text: &str,
        section_ref: &str,
        para_id: &str,
    ) -> RevisionOutcome {
        let prior = self.registry.entries_for_para(para_id);
        let changes = detect(&prior, before_text, after_text, section_ref, para_id);
        if changes.is_empty() {
            return RevisionOutcome {
                changes,
                impact: None,
            };
        }

        // Apply the detected changes to the registry first, so the
        // reconciler sees the post-revision provision state.
        for change in &changes {
            match change {
                ConceptChange::Added { entry } | ConceptChange::Modified { entry, .. } => {
                    self.registry.upsert(entry.clone());
                }
                ConceptChange::Removed { key, .. } => {
                    self.registry.remove(key.category, &key.key);
                }
            }
        }

        let impact = propagate(
            &mut self.graph,
            &self.registry,
            self.policy.as_ref(),
            &changes,
            para_id,
            section_ref,
            self.history.len() + 1,
        );
        self.history.push(impact.record.clone());

        RevisionOutcome {
            changes,
            impact: Some(impact),
        }
    }

    /// All risks with their current effective severities, in id order.
    pub fn risks(&self) -> impl Iterator<Item = &Risk> {
        self.graph.risks()
    }

    #[must_use]
    pub fn registry(&self) -> &ConceptRegistry {
        &self.registry
    }

    #[must_use]
    pub fn graph(&self) -> &RiskGraph {
        &self.graph
    }

    /// Append-only audit log of accepted revisions that moved the maps.
    #[must_use]
    pub fn change_history(&self) -> &[ChangeRecord] {
        &self.history
    }

    /// Concept map rendered for an LLM prompt.
    #[must_use]
    pub fn concept_prompt_block(&self) -> String {
        self.registry.to_prompt_block()
    }

    /// Risk matrix rendered for an LLM prompt, optionally restricted to a
    /// subset of risks.
    #[must_use]
    pub fn risk_matrix_block(&self, risk_ids: Option<&[String]>) -> String {
        self.graph.to_matrix_block(risk_ids)
    }

    /// Snapshot of the persistable state. The caller owns the on-disk
    /// format; this is the in-memory shape only.
    #[must_use]
    pub fn snapshot(&self) -> SessionMaps {
        SessionMaps {
            concept_map: self.registry.clone(),
            risk_map: self.graph.clone(),
            change_history: self.history.clone(),
        }
    }

    /// Rebuild a session from a snapshot, reverse indices included.
    #[must_use]
    pub fn restore(maps: SessionMaps) -> Self {
        Self {
            registry: maps.concept_map,
            graph: maps.risk_map,
            history: maps.change_history,
            policy: Box::new(SteppedPolicy),
        }
    }
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}
