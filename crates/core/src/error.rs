//! Error types for the hostel admin core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failure reported by the remote store (transport, auth, permission)
    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.message().to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
