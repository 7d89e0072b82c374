//! # Clausemap Model
//!
//! Shared data model for the contract review reconciliation engine.
//!
//! ## Core types
//!
//! - **Severity** - four-level ordinal scale with lenient parsing of
//!   LLM-produced severity strings
//! - **ConceptEntry** - an extracted contractual provision (cap, basket,
//!   cure period, ...) keyed by category and name
//! - **Risk** - an identified issue in a clause, carrying an immutable
//!   base severity and a recomputable effective severity
//! - **RiskRelationship** - typed edges from risks to provisions
//!   (mitigated_by / amplified_by) or to other risks (triggers)
//! - **ConceptChange** / **ChangeRecord** - revision-detection output and
//!   the append-only audit trail
//! - **analysis** - the bulk-load DTO shape produced by the LLM analysis
//!   layer

mod severity;
mod concept;
mod risk;
mod change;
pub mod analysis;

pub use severity::Severity;
pub use concept::{ConceptCategory, ConceptEntry, ConceptKey};
pub use risk::{EdgeTarget, RelationshipKind, Risk, RiskRelationship};
pub use change::{summarize_changes, unix_millis, ChangeRecord, ConceptChange};
