use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadingError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Reading not found: {0}")]
    NotFound(String),

    #[error("Positions already exist for reading {0}; use force_redraw to overwrite")]
    AlreadyAssigned(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ReadingResult<T> = Result<T, ReadingError>;
