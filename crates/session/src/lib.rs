//! # Clausemap Session
//!
//! Session-scoped facade over the reconciliation engine. One
//! [`ReviewSession`] owns the concept registry, the risk graph, and the
//! change audit log for a single document review; the surrounding
//! application constructs it from a parsed analysis batch and drives it
//! synchronously from the revision-acceptance path.
//!
//! ## Flow
//!
//! ```text
//! AnalysisOutput ──> ReviewSession::from_analysis
//!                        │ (upsert provisions, add risks + edges,
//!                        │  reconcile all severities)
//! accepted revision ──> accept_revision(before, after, section, para)
//!                        │ detect -> apply -> propagate -> record
//!                        └──> RevisionOutcome { changes, impact }
//! ```
//!
//! Single-writer by contract: callers in multi-threaded hosts must hold a
//! session-level lock around each whole reconciliation pass. The engine
//! performs no I/O and never suspends.

mod error;
mod persist;
mod session;

pub use error::{Result, SessionError};
pub use persist::SessionMaps;
pub use session::{ReviewSession, RevisionOutcome};
