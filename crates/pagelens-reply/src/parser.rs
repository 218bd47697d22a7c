//! Marker-based parsing of the model's dual-task reply.

use pagelens_core::{Error, Result};
use serde::Serialize;

/// Tag opening the summary section.
pub const TASK1_MARKER: &str = "[task1]";
/// Tag opening the memory-match section.
pub const TASK2_MARKER: &str = "[task2]";
/// Literal the model must emit when no memories relate to the page.
pub const NO_MATCH_SENTINEL: &str = "NO_INTERESTS_FOUND";

/// A model reply split into its two tagged sections.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedReply {
    /// Summary text between `[task1]` and `[task2]`, whitespace-trimmed.
    pub summary: String,
    /// Memory-match text after `[task2]`, whitespace-trimmed.
    #[serde(rename = "memoryMatches")]
    pub memory_matches: String,
    /// False when the reply contains the no-match sentinel anywhere.
    #[serde(rename = "hasMatches")]
    pub has_matches: bool,
}

impl ParsedReply {
    /// Text shown to the user: matches first when present, then the summary.
    pub fn display_text(&self) -> String {
        if self.has_matches {
            format!("{}\n{}", self.memory_matches, self.summary)
        } else {
            self.summary.clone()
        }
    }
}

/// Parse a raw model reply into its two sections.
///
/// Requires `[task1]` to appear strictly before `[task2]`. A reply missing
/// either marker, or carrying them out of order, is rejected instead of
/// being sliced into garbage.
pub fn parse(reply: &str) -> Result<ParsedReply> {
    let task1 = reply
        .find(TASK1_MARKER)
        .ok_or_else(|| Error::MalformedReply(format!("missing {} marker", TASK1_MARKER)))?;
    let task2 = reply
        .find(TASK2_MARKER)
        .ok_or_else(|| Error::MalformedReply(format!("missing {} marker", TASK2_MARKER)))?;

    if task2 < task1 + TASK1_MARKER.len() {
        return Err(Error::MalformedReply(format!(
            "{} must precede {}",
            TASK1_MARKER, TASK2_MARKER
        )));
    }

    let summary = reply[task1 + TASK1_MARKER.len()..task2].trim();
    let memory_matches = reply[task2 + TASK2_MARKER.len()..].trim();
    let has_matches = !reply.contains(NO_MATCH_SENTINEL);

    Ok(ParsedReply {
        summary: summary.to_string(),
        memory_matches: memory_matches.to_string(),
        has_matches,
    })
}
