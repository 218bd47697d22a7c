//! PageLens Core — shared types, error taxonomy, configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::PageLensConfig;
pub use error::{Error, Result};
pub use types::{PageCapture, TabId};
