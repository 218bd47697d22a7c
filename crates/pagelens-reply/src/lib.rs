//! Reply parsing and the fixed dual-task prompt.
//!
//! The inference call asks the model for exactly two tagged sections:
//! `[task1]` (page summary) and `[task2]` (memory matches or a sentinel).
//! This crate owns both sides of that contract.

pub mod parser;
pub mod prompt;

pub use parser::{parse, ParsedReply, NO_MATCH_SENTINEL, TASK1_MARKER, TASK2_MARKER};
pub use prompt::build_prompt;
