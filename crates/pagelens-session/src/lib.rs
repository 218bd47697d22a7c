//! Per-tab UI state: chat session registry and action badges.
//!
//! Both stores are scoped to the running process and cleaned up together
//! when a tab closes.

pub mod badge;
pub mod registry;

pub use badge::{Badge, BadgeBoard};
pub use registry::SessionRegistry;
