use thiserror::Error;

/// Message shown for every failure that is not a structured rejection from
/// the generation service.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum FlowgenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Service rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Save error: {0}")]
    Save(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl FlowgenError {
    /// True when the service answered with a structured error message.
    pub fn is_rejection(&self) -> bool {
        matches!(self, FlowgenError::Rejected { .. })
    }

    /// The text a user gets to see for this failure. Rejections are passed
    /// through verbatim, everything else collapses to [`FALLBACK_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            FlowgenError::Rejected { message, .. } => message.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowgenError>;
