//! Transport boundary to the message-archive platform.
//!
//! Everything that touches the network goes through [`ArchiveTransport`]:
//! the two gate predicates and the per-channel message search. The pipeline
//! only ever sees this trait, so tests swap in a recording mock and the
//! binary wires up the HTTP gateway client.
//!
//! Predicate implementations fail soft: a channel that is missing, private,
//! or misconfigured answers `false` rather than erroring where the platform
//! lets them tell the difference; anything that still surfaces as a
//! [`TransportError`] is downgraded to a failed check by the gate.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::{RawItem, RequesterId, SourceId};

/// Faults a transport call can produce.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The platform asked us to back off and retry after the given interval.
    /// An expected condition, recovered by the fetch layer.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// The channel is unreachable for this identity (not found, private,
    /// invalid id).
    #[error("channel inaccessible: {0}")]
    Inaccessible(String),

    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// The authenticated client the discovery pipeline runs against.
#[async_trait]
pub trait ArchiveTransport: Send + Sync {
    /// Whether `requester` is a member of `source`.
    async fn is_member(
        &self,
        requester: RequesterId,
        source: SourceId,
    ) -> Result<bool, TransportError>;

    /// Whether the service's own account holds the required permission in
    /// `source`. The requester plays no part in this check.
    async fn has_required_permission(&self, source: SourceId) -> Result<bool, TransportError>;

    /// Search `source` for `query`, returning at most `limit` raw items in
    /// archive order.
    async fn search_source(
        &self,
        source: SourceId,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RawItem>, TransportError>;
}

/// Canonical deep link to one archived message.
///
/// The decimal channel id is normalized by stripping the `-100`
/// private-channel marker before being joined with the item id. Links only
/// resolve if this transform is exact.
pub fn canonical_link(source: SourceId, item_id: i64) -> String {
    let raw = source.0.to_string();
    let normalized = raw.strip_prefix("-100").unwrap_or(&raw);
    format!("https://t.me/c/{}/{}", normalized, item_id)
}
