use crate::graph::RiskGraph;
use crate::registry::ConceptRegistry;
use clausemap_model::{RelationshipKind, Severity};

/// Pluggable severity arithmetic.
///
/// The stepwise symmetric model in [`SteppedPolicy`] is the engine
/// default, but the exact shift arithmetic is a product decision, so the
/// reconciler takes the policy as a seam rather than hard-coding it.
pub trait SeverityPolicy {
    /// Effective severity given the base level and the counts of
    /// currently-valid mitigating and amplifying edges.
    fn effective(&self, base: Severity, mitigators: usize, amplifiers: usize) -> Severity;
}

/// One ordinal step per valid edge; mitigation and amplification are
/// combined as a net offset from the base, clamped to [low, critical].
/// One mitigator and one amplifier cancel out to the base severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteppedPolicy;

impl SeverityPolicy for SteppedPolicy {
    fn effective(&self, base: Severity, mitigators: usize, amplifiers: usize) -> Severity {
        let net = amplifiers as i32 - mitigators as i32;
        base.step_by(net)
    }
}

/// Recompute one risk's effective severity and write it back.
///
/// Pure over graph + registry state apart from the write-back. Edges
/// whose concept target has been removed contribute nothing - provision
/// removal is a normal consequence of revision, not an error. Returns
/// `None` only for an unknown risk id.
pub fn reconcile(
    graph: &mut RiskGraph,
    registry: &ConceptRegistry,
    policy: &dyn SeverityPolicy,
    risk_id: &str,
) -> Option<Severity> {
    let base = graph.risk(risk_id)?.base_severity;

    let valid_count = |kind: RelationshipKind| {
        graph
            .edges_for(risk_id, kind)
            .iter()
            .filter(|edge| {
                edge.concept_target()
                    .map(|key| registry.contains(&key))
                    .unwrap_or(false)
            })
            .count()
    };

    let mitigators = valid_count(RelationshipKind::MitigatedBy);
    let amplifiers = valid_count(RelationshipKind::AmplifiedBy);

    let effective = policy.effective(base, mitigators, amplifiers);
    graph.risk_mut(risk_id)?.effective_severity = effective;
    Some(effective)
}

/// Recompute every risk's effective severity.
///
/// Used to finalize a bulk load, where edges may have arrived before
/// their targets.
pub fn reconcile_all(graph: &mut RiskGraph, registry: &ConceptRegistry, policy: &dyn SeverityPolicy) {
    let ids: Vec<String> = graph.risks().map(|r| r.risk_id.clone()).collect();
    for id in ids {
        reconcile(graph, registry, policy, &id);
    }
    log::debug!("reconciled {} risk(s)", graph.len());
}
