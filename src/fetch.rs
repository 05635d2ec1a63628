//! Per-channel query adapter.
//!
//! Wraps the transport's search primitive with the per-channel item cap,
//! the empty-body filter, and rate-limit backoff. Faults never escape this
//! module: a channel that cannot be searched contributes zero results and
//! the remaining channels still get their turn.

use tracing::{debug, warn};

use crate::models::{RawItem, SourceId};
use crate::transport::{ArchiveTransport, TransportError};

/// Fetch up to `limit` candidate items from one channel.
///
/// A rate-limit signal is an expected condition, not an error: the adapter
/// waits out the advertised interval and retries the same call exactly
/// once. A second rate limit, or any other transport fault, degrades to
/// zero results for this channel.
pub async fn fetch_source(
    transport: &dyn ArchiveTransport,
    source: SourceId,
    query: &str,
    limit: usize,
) -> Vec<RawItem> {
    let items = match transport.search_source(source, query, limit).await {
        Ok(items) => items,
        Err(TransportError::RateLimited { retry_after }) => {
            debug!(%source, ?retry_after, "rate limited, retrying once");
            tokio::time::sleep(retry_after).await;
            match transport.search_source(source, query, limit).await {
                Ok(items) => items,
                Err(err) => {
                    warn!(%source, error = %err, "retry failed, skipping channel");
                    return Vec::new();
                }
            }
        }
        Err(err) => {
            warn!(%source, error = %err, "search failed, skipping channel");
            return Vec::new();
        }
    };

    // Empty bodies are excluded without counting toward the cap.
    let mut kept: Vec<RawItem> = items
        .into_iter()
        .filter(|item| !item.body.trim().is_empty())
        .collect();
    kept.truncate(limit);
    kept
}
