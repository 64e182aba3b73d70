use thiserror::Error;

/// Pipeline-level errors returned by the chunk stream processor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Some chunks failed; every other chunk was still attempted
    #[error("partially processed ({failed} of {total} chunks failed): {}", .reports.join(" | "))]
    PartiallyProcessed {
        failed: usize,
        total: usize,
        reports: Vec<String>,
    },

    #[error("processing cancelled")]
    Cancelled,
}
