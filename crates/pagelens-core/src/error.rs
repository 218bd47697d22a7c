//! Error types for PageLens.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A downstream call failed at the transport level or returned non-2xx.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The model reply violated the `[task1]`/`[task2]` marker contract.
    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
