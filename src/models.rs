//! Core data models used throughout Media Scout.
//!
//! These types represent the channels, requesters, raw archive items, and
//! extracted release records that flow through the discovery pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one connected message archive (channel).
///
/// Negative values carry the platform's private-channel marker prefix
/// (`-100`) in their decimal form; `Display` prints the raw number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub i64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity issuing a discovery query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequesterId(pub i64);

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One unprocessed candidate message fetched from a channel.
///
/// `(source, item_id)` is the stable locator used to build the canonical
/// deep link. Items are produced fresh per query and never cached.
#[derive(Debug, Clone)]
pub struct RawItem {
    pub source: SourceId,
    pub item_id: i64,
    pub body: String,
}

/// Structured release fields parsed from one message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRelease {
    pub title: String,
    /// First parenthesized 4-digit year, digits only.
    pub year: Option<String>,
    /// Always present: extraction refuses to emit without a vocabulary hit.
    pub quality: String,
    /// Contents of the first bracketed segment.
    pub language_tags: Option<String>,
}

/// A parsed release plus the canonical deep link to its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub release: ParsedRelease,
    pub link: String,
}

/// Why the access gate refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The requester is not a member of the blocking channel.
    NotMember,
    /// The service account lacks its required permission in the blocking
    /// channel (independent of the requester).
    BotLacksPermission,
}

/// Outcome of the access gate, recomputed from scratch for every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub allowed: bool,
    pub blocking_source: Option<SourceId>,
    pub reason: Option<DenialReason>,
}

impl GateDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            blocking_source: None,
            reason: None,
        }
    }

    pub fn deny(source: SourceId, reason: DenialReason) -> Self {
        Self {
            allowed: false,
            blocking_source: Some(source),
            reason: Some(reason),
        }
    }
}

/// Bounded, formatted result set for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// Formatted record lines, in source order then within-source order.
    pub lines: Vec<String>,
    /// Matches found beyond the display cap.
    pub overflow: usize,
}
