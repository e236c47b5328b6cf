use thiserror::Error;

/// Errors produced by position queries, searches and configuration checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UraniaError {
    #[error("Unknown body: {id}")]
    UnknownBody { id: String },
    #[error("Unknown aspect: {id}")]
    UnknownAspect { id: String },
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
    #[error("Failed to calculate position for {body} at JD {jd}: {message}")]
    CalculationFailed {
        body: String,
        jd: f64,
        message: String,
    },
    #[error(
        "Ephemeris path not found: {path}. Please ensure Swiss Ephemeris data files are installed."
    )]
    EphemerisPathNotFound { path: String },
    #[error("Search cancelled")]
    Cancelled,
}

impl UraniaError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UraniaError>;
