//! Error types for somnair

use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Insufficient sample size for {context}: need at least {required} observations, got {actual}")]
    InsufficientSample {
        context: String,
        required: usize,
        actual: usize,
    },

    #[error("Failed to parse date '{0}': expected YYYY-MM-DD")]
    DateParse(String),

    #[error("Statistics error: {0}")]
    Statistics(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Shorthand for the undersized-sample case
    pub(crate) fn too_few(context: &str, required: usize, actual: usize) -> Self {
        AnalysisError::InsufficientSample {
            context: context.to_string(),
            required,
            actual,
        }
    }
}
