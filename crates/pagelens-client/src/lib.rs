//! HTTP clients for the two downstream services the pipeline talks to:
//! the model gateway (indexing, model registry, inference proxy) and the
//! chat backend (file uploads, chat sessions).
//!
//! Both are behind traits so orchestration logic can run against in-memory
//! fakes in tests.

pub mod gateway;
pub mod types;
pub mod webui;

pub use gateway::{GatewayClient, ModelGateway};
pub use types::*;
pub use webui::{ChatBackend, WebUiClient};
