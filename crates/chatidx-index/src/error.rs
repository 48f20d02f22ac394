//! Index builder error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("No output directory specified")]
    MissingOutputDir,

    #[error("Missing filename for index or summary")]
    MissingFilename,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type IndexResult<T> = Result<T, IndexError>;
