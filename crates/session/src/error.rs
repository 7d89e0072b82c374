use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Error, Debug)]
pub enum SessionError {
    /// Structural problem in the analysis batch (duplicate risk id or an
    /// edge whose source risk was never inserted). The whole ingestion
    /// should fail rather than store an inconsistent graph.
    #[error("malformed analysis batch: {0}")]
    Graph(#[from] clausemap_graph::GraphError),

    /// Persisted session state failed to parse.
    #[error("invalid session state: {0}")]
    State(#[from] serde_json::Error),
}
