use reqwest::StatusCode;
use thiserror::Error;

/// Every way a single analysis run can fail.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Error fetching data: {status}")]
    FetchStatus { status: StatusCode },

    #[error("Error fetching data: {0}")]
    Fetch(String),

    #[error("Error parsing market data: {0}")]
    Parse(String),

    #[error("Error writing report: {0}")]
    Write(String),
}

impl AnalysisError {
    /// HTTP status of a rejected request, if that is what went wrong.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AnalysisError::FetchStatus { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        AnalysisError::Fetch(e.to_string())
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(e: std::io::Error) -> Self {
        AnalysisError::Write(e.to_string())
    }
}

impl From<csv::Error> for AnalysisError {
    fn from(e: csv::Error) -> Self {
        AnalysisError::Write(e.to_string())
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
