//! Error types for the analysis pipeline.
//!
//! Only [`AnalyzerError::InvalidLocation`], [`AnalyzerError::RepositoryNotFound`] and
//! [`AnalyzerError::AnalysisCallFailed`] stop a run. Listing and fetch failures are
//! absorbed by the crawler; their variants exist so the failure can be logged with a
//! consistent shape.

/// Error returned by collaborator seams (repository host, analysis client).
pub type HostError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while analysing a repository.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// The repository identifier does not have the `github.com/<owner>/<repo>` shape,
    /// or owner/repo contain characters outside `[A-Za-z0-9._-]`.
    #[error("Invalid GitHub repository URL: {0}")]
    InvalidLocation(String),

    /// The metadata lookup did not succeed. Non-existent repositories, private
    /// repositories without credentials and transport failures all land here.
    #[error("Repository not found or not accessible: {0}")]
    RepositoryNotFound(String),

    /// A directory listing could not be retrieved.
    #[error("Could not list contents of '{path}': {reason}")]
    ListingUnavailable { path: String, reason: String },

    /// The raw content of a file could not be retrieved.
    #[error("Could not fetch file '{path}': {reason}")]
    FetchUnavailable { path: String, reason: String },

    /// The analysis call failed. No retry is attempted.
    #[error("Analysis call failed: {0}")]
    AnalysisCallFailed(String),

    /// A document could not be rendered.
    #[error("Export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    /// Whether this error halts the pipeline.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AnalyzerError::ListingUnavailable { .. } | AnalyzerError::FetchUnavailable { .. }
        )
    }
}
