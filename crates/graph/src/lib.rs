//! # Clausemap Graph
//!
//! In-memory provision registry and risk dependency graph, with the
//! reconciliation machinery that keeps effective severities consistent as
//! accepted revisions change the underlying provisions.
//!
//! ## Architecture
//!
//! ```text
//! AnalysisOutput (bulk-load DTO)
//!     │
//!     ├──> ConceptRegistry
//!     │      └─ provisions keyed by (category, key)
//!     │
//!     ├──> RiskGraph
//!     │      ├─ risks keyed by risk_id
//!     │      ├─ typed edges (mitigated_by / amplified_by / triggers)
//!     │      └─ reverse indices: concept -> risks, risk -> triggered risks
//!     │
//!     └──> on accepted revision
//!            ├─ Impact Propagator (depth-capped walk over indices)
//!            └─ Severity Reconciler (policy-driven ordinal math)
//! ```
//!
//! All state is session-scoped and single-writer; the crate provides no
//! internal locking. Callers in multi-threaded hosts must serialize whole
//! reconciliation passes per session.

mod error;
mod registry;
mod graph;
mod reconcile;
mod propagate;

pub use error::{GraphError, Result};
pub use graph::RiskGraph;
pub use propagate::{propagate, ImpactResult, MAX_PROPAGATION_DEPTH};
pub use reconcile::{reconcile, reconcile_all, SeverityPolicy, SteppedPolicy};
pub use registry::ConceptRegistry;
