//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid array settings, snapshot (de)serialization, IO from preference stores, and generic errors.
//!
//! Most lifecycle operations recover silently and report through logs and
//! [`crate::events::ArrayEvent`]s instead; these errors surface from validation and persistence.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("snapshot serialization failed: {0}")]
    Serialize(String),

    #[error("snapshot deserialization failed: {0}")]
    Deserialize(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
