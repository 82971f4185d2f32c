//! Error types for order construction and request signing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown token: {symbol} is not in the token registry")]
    UnknownToken { symbol: String },

    #[error("Invalid market symbol: {0}")]
    InvalidMarket(String),

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Invalid TTL: {ttl_secs}s (must be positive)")]
    InvalidTtl { ttl_secs: i64 },

    #[error("Malformed order: {message}")]
    MalformedOrder { message: String },

    #[error("Invalid private key: {message}")]
    InvalidKey { message: String },

    #[error("Signing failed: {message}")]
    SigningFailure { message: String },

    #[error("Clock error: {message}")]
    Clock { message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    pub(crate) fn invalid_amount(message: impl Into<String>) -> Self {
        Error::InvalidAmount {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedOrder {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
