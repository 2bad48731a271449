//! Error handling for the resume scorer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document bytes could not be turned into text. Never carried as text.
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The tagging or embedding model could not be loaded.
    #[error("Model initialization failed: {0}")]
    ModelInitialization(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeScorerError>;

impl ResumeScorerError {
    /// Errors that make every further analysis pointless.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ResumeScorerError::ModelInitialization(_))
    }
}

impl From<tokio::task::JoinError> for ResumeScorerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ResumeScorerError::Processing(format!("Worker task failed: {}", err))
    }
}
