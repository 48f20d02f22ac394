//! Configuration error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("LLM_API_KEY is not set. Add it to the environment or a .env file.")]
    MissingApiKey,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
