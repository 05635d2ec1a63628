//! Discovery pipeline orchestration.
//!
//! Runs one query through its full lifecycle: query validation → access
//! gating → sequential per-channel search and extraction → formatting.
//! Channels are searched strictly in configuration order, one at a time,
//! with a politeness pause between them — a deliberate simplicity tradeoff
//! toward the rate-limited transport. Per-channel faults are absorbed by
//! the fetch layer; only a gate denial or an unusable query surface to the
//! caller, and both render as plain text.

use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::extract::{extract, format_record};
use crate::fetch::fetch_source;
use crate::gate::check_access;
use crate::models::{DenialReason, GateDecision, ReleaseRecord, RequesterId, SearchReport};
use crate::transport::{canonical_link, ArchiveTransport};

/// Faults that surface to the caller as explicit failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The query was empty or all whitespace. Nothing was gated or
    /// searched.
    #[error("query must not be empty")]
    InvalidQuery,
}

/// Terminal outcome of one discovery request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The gate refused the request; no channel was searched.
    Rejected(GateDecision),
    /// The gate passed but no channel produced an extractable release.
    NoResults,
    /// A bounded, formatted result set.
    Results(SearchReport),
}

/// Run one discovery query for `requester`.
///
/// The accumulation list lives on this call's stack: nothing is shared
/// across requests and nothing survives past the returned outcome.
pub async fn search(
    transport: &dyn ArchiveTransport,
    config: &Config,
    requester: RequesterId,
    query: &str,
) -> Result<SearchOutcome, SearchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::InvalidQuery);
    }

    let sources = &config.sources.channels;

    let decision = check_access(transport, requester, sources).await;
    if !decision.allowed {
        info!(%requester, blocking = ?decision.blocking_source, "gate denied request");
        return Ok(SearchOutcome::Rejected(decision));
    }

    let pause = Duration::from_millis(config.pipeline.source_pause_ms);
    let mut records: Vec<ReleaseRecord> = Vec::new();

    for (index, &source) in sources.iter().enumerate() {
        debug!(%source, query, "searching channel");

        let items = fetch_source(transport, source, query, config.pipeline.per_source_limit).await;
        for raw in &items {
            if let Some(release) = extract(&raw.body) {
                records.push(ReleaseRecord {
                    release,
                    link: canonical_link(raw.source, raw.item_id),
                });
            }
        }

        // Politeness pause between channels, not after the last one.
        if index + 1 < sources.len() {
            tokio::time::sleep(pause).await;
        }
    }

    if records.is_empty() {
        return Ok(SearchOutcome::NoResults);
    }

    let total = records.len();
    let shown = total.min(config.pipeline.display_limit);
    let lines: Vec<String> = records[..shown].iter().map(format_record).collect();

    info!(total, shown, "search complete");
    Ok(SearchOutcome::Results(SearchReport {
        lines,
        overflow: total - shown,
    }))
}

impl SearchOutcome {
    /// User-facing text for this outcome. Every reachable path renders as
    /// a message, never as a raw fault.
    pub fn render(&self, query: &str) -> String {
        match self {
            SearchOutcome::Rejected(decision) => render_denial(decision),
            SearchOutcome::NoResults => {
                format!("❌ No results found for '{}' in any connected channels.", query)
            }
            SearchOutcome::Results(report) => {
                let mut text = format!("🎬 Search Results 🎬\n\n{}", report.lines.join("\n\n"));
                if report.overflow > 0 {
                    text.push_str(&format!(
                        "\n\n... and {} more results found!",
                        report.overflow
                    ));
                }
                text
            }
        }
    }
}

fn render_denial(decision: &GateDecision) -> String {
    match (decision.reason, decision.blocking_source) {
        (Some(DenialReason::NotMember), Some(source)) => format!(
            "❌ You need to join all connected channels to use this service.\n\nPlease join channel {} and try again.",
            source
        ),
        (Some(DenialReason::BotLacksPermission), Some(source)) => format!(
            "❌ The service account doesn't have the required permissions in channel {}.",
            source
        ),
        // A denial always names its channel and reason; this arm only
        // covers hand-built decisions.
        _ => "❌ Access denied.".to_string(),
    }
}
