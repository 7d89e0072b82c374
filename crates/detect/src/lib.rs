//! # Clausemap Detect
//!
//! Heuristic change detector for accepted revisions. Scans the revised
//! clause text with the same category-specific patterns used during
//! initial analysis extraction and diffs the results against the original
//! text and the provisions already on record for that paragraph.
//!
//! The pattern set is data, not control flow: see [`patterns::CONCEPT_PATTERNS`].
//!
//! Best-effort by design - a missed change silently skips reconciliation
//! for that provision, and an empty result is the normal outcome for
//! edits that do not touch risk-relevant language.

pub mod patterns;

mod detector;

pub use detector::detect;
pub use patterns::{ConceptPattern, ValueKind, CONCEPT_PATTERNS};
