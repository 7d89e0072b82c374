use crate::graph::RiskGraph;
use crate::reconcile::{reconcile, SeverityPolicy};
use crate::registry::ConceptRegistry;
use clausemap_model::{summarize_changes, ChangeRecord, ConceptChange};
use std::collections::BTreeSet;

/// How many hops a concept change travels through the graph: hop 1 is the
/// risks directly mitigated/amplified by the changed provision, hop 2 the
/// risks they trigger. Contract dependency chains rarely cascade further,
/// so deeper trigger chains are deliberately left alone. Adjustable, not
/// load-bearing elsewhere.
pub const MAX_PROPAGATION_DEPTH: usize = 2;

/// Outcome of one propagation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactResult {
    /// Every risk whose effective severity was recomputed.
    pub affected_risk_ids: BTreeSet<String>,

    /// Paragraphs owning an affected risk; candidates for re-analysis.
    pub affected_para_ids: BTreeSet<String>,

    /// Audit entry describing this pass.
    pub record: ChangeRecord,
}

/// Walk the graph from a batch of detected concept changes, recompute the
/// severities of every transitively affected risk, and build the audit
/// record.
///
/// Changes whose key the reverse index has never seen contribute zero
/// affected risks; that is a normal outcome, not an error. Edges left
/// dangling by removed provisions are pruned here.
pub fn propagate(
    graph: &mut RiskGraph,
    registry: &ConceptRegistry,
    policy: &dyn SeverityPolicy,
    changes: &[ConceptChange],
    para_id: &str,
    section_ref: &str,
    change_seq: usize,
) -> ImpactResult {
    let mut ordered: Vec<String> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    // Hop 1: risks directly referencing a changed provision.
    let mut frontier: Vec<String> = Vec::new();
    for change in changes {
        for risk_id in graph.risks_referencing(&change.key()) {
            if seen.insert(risk_id.clone()) {
                ordered.push(risk_id.clone());
                frontier.push(risk_id.clone());
            }
        }
    }

    // Further hops: follow triggers edges out of the previous frontier.
    for _ in 1..MAX_PROPAGATION_DEPTH {
        let mut next = Vec::new();
        for risk_id in &frontier {
            for triggered in graph.risks_triggered_by(risk_id) {
                if seen.insert(triggered.clone()) {
                    ordered.push(triggered.clone());
                    next.push(triggered.clone());
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    // Removed provisions leave dangling edges behind; drop them now that
    // the reverse-index lookups are done.
    for change in changes {
        if let ConceptChange::Removed { key, .. } = change {
            graph.prune_concept_edges(key);
        }
    }

    let mut affected_para_ids = BTreeSet::new();
    for risk_id in &ordered {
        reconcile(graph, registry, policy, risk_id);
        if let Some(risk) = graph.risk(risk_id) {
            affected_para_ids.insert(risk.para_id.clone());
        }
    }

    log::info!(
        "propagated {} change(s) from {section_ref}: {} risk(s), {} paragraph(s) affected",
        changes.len(),
        ordered.len(),
        affected_para_ids.len()
    );

    let record = ChangeRecord::new(
        change_seq,
        para_id,
        section_ref,
        summarize_changes(changes),
        ordered.clone(),
        affected_para_ids.iter().cloned().collect(),
    );

    ImpactResult {
        affected_risk_ids: ordered.into_iter().collect(),
        affected_para_ids,
        record,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::SteppedPolicy;
    use clausemap_model::{
        ConceptCategory, ConceptEntry, ConceptKey, Risk, RiskRelationship, Severity,
    };
    use pretty_assertions::assert_eq;

    fn basket_key() -> ConceptKey {
        ConceptKey::new(ConceptCategory::LiabilityLimitation, "basket")
    }

    fn removed_basket() -> ConceptChange {
        ConceptChange::Removed {
            key: basket_key(),
            last_value: "50,000".to_string(),
        }
    }

    fn chain_fixture() -> (RiskGraph, ConceptRegistry) {
        // R1 -mitigated_by-> basket; R1 triggers R2 triggers R3 triggers R4.
        let mut registry = ConceptRegistry::new();
        registry.upsert(ConceptEntry::new(
            ConceptCategory::LiabilityLimitation,
            "basket",
            "50,000",
            "8.3",
            "p_9",
        ));

        let mut graph = RiskGraph::new();
        for (id, para) in [("R1", "p_1"), ("R2", "p_2"), ("R3", "p_3"), ("R4", "p_4")] {
            graph
                .add_risk(Risk::new(id, "5.3", "5.3", para, "", "", Severity::High))
                .unwrap();
        }
        graph
            .add_edge(RiskRelationship::mitigates("R1", basket_key(), ""))
            .unwrap();
        graph.add_edge(RiskRelationship::triggers("R1", "R2")).unwrap();
        graph.add_edge(RiskRelationship::triggers("R2", "R3")).unwrap();
        graph.add_edge(RiskRelationship::triggers("R3", "R4")).unwrap();
        (graph, registry)
    }

    #[test]
    fn propagation_stops_at_depth_two() {
        let (mut graph, mut registry) = chain_fixture();
        registry.remove(ConceptCategory::LiabilityLimitation, "basket");

        let result = propagate(
            &mut graph,
            &registry,
            &SteppedPolicy,
            &[removed_basket()],
            "p_9",
            "8.3",
            1,
        );

        let affected: Vec<&str> = result.affected_risk_ids.iter().map(String::as_str).collect();
        assert_eq!(affected, ["R1", "R2"]);
        assert!(!result.affected_risk_ids.contains("R3"));
        assert!(!result.affected_risk_ids.contains("R4"));
    }

    #[test]
    fn removal_cancels_mitigation_and_prunes_edges() {
        let (mut graph, mut registry) = chain_fixture();
        // Basket mitigation holds before the revision.
        reconcile(&mut graph, &registry, &SteppedPolicy, "R1");
        assert_eq!(graph.risk("R1").unwrap().effective_severity, Severity::Medium);

        registry.remove(ConceptCategory::LiabilityLimitation, "basket");
        let result = propagate(
            &mut graph,
            &registry,
            &SteppedPolicy,
            &[removed_basket()],
            "p_9",
            "8.3",
            1,
        );

        assert!(result.affected_risk_ids.contains("R1"));
        assert_eq!(graph.risk("R1").unwrap().effective_severity, Severity::High);
        assert!(graph.risks_referencing(&basket_key()).is_empty());
        assert!(graph
            .edges_for("R1", clausemap_model::RelationshipKind::MitigatedBy)
            .is_empty());
    }

    #[test]
    fn affected_paragraphs_follow_affected_risks() {
        let (mut graph, registry) = chain_fixture();
        let result = propagate(
            &mut graph,
            &registry,
            &SteppedPolicy,
            &[removed_basket()],
            "p_9",
            "8.3",
            1,
        );

        let paras: Vec<&str> = result.affected_para_ids.iter().map(String::as_str).collect();
        assert_eq!(paras, ["p_1", "p_2"]);
    }

    #[test]
    fn unknown_concept_key_affects_nothing() {
        let (mut graph, registry) = chain_fixture();
        let change = ConceptChange::Removed {
            key: ConceptKey::new(ConceptCategory::DefinedTerm, "mae"),
            last_value: String::new(),
        };

        let result = propagate(&mut graph, &registry, &SteppedPolicy, &[change], "p_0", "1.1", 1);
        assert!(result.affected_risk_ids.is_empty());
        assert!(result.affected_para_ids.is_empty());
    }

    #[test]
    fn record_carries_summary_and_sequence() {
        let (mut graph, registry) = chain_fixture();
        let result = propagate(
            &mut graph,
            &registry,
            &SteppedPolicy,
            &[removed_basket()],
            "p_9",
            "8.3",
            7,
        );

        assert_eq!(result.record.change_id, "chg_7");
        assert_eq!(result.record.change_type, "Removed Basket: 50,000");
        assert_eq!(result.record.para_id, "p_9");
        assert_eq!(result.record.affected_risk_ids, vec!["R1", "R2"]);
    }
}
