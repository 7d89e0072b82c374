use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Structural errors from graph construction.
///
/// Both indicate a malformed analysis batch and should fail the whole
/// ingestion operation. Dangling edge targets and unmatched concept
/// lookups are expected steady states, not errors.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("duplicate risk id: {0}")]
    DuplicateRisk(String),

    #[error("edge source risk not found: {risk_id} (target {target})")]
    UnknownSource { risk_id: String, target: String },
}
