//! Access gating for discovery queries.
//!
//! No channel is ever searched for content until the requester is a member
//! of every configured channel *and* the service account holds its required
//! permission in every one of them. Membership is checked for all channels
//! first, then permissions for all channels, both in configuration order —
//! so a missing membership is always the denial a requester sees before a
//! missing service permission.

use tracing::debug;

use crate::models::{DenialReason, GateDecision, RequesterId, SourceId};
use crate::transport::{ArchiveTransport, TransportError};

/// Evaluate the gate for one request.
///
/// Decisions are recomputed from scratch on every call; membership and
/// permissions can change between queries. Never fails: a transport error
/// while probing a predicate counts as a failed check.
pub async fn check_access(
    transport: &dyn ArchiveTransport,
    requester: RequesterId,
    sources: &[SourceId],
) -> GateDecision {
    for &source in sources {
        let member = predicate(
            transport.is_member(requester, source).await,
            source,
            "membership",
        );
        if !member {
            return GateDecision::deny(source, DenialReason::NotMember);
        }
    }

    for &source in sources {
        let permitted = predicate(
            transport.has_required_permission(source).await,
            source,
            "permission",
        );
        if !permitted {
            return GateDecision::deny(source, DenialReason::BotLacksPermission);
        }
    }

    GateDecision::allow()
}

fn predicate(result: Result<bool, TransportError>, source: SourceId, check: &str) -> bool {
    match result {
        Ok(granted) => granted,
        Err(err) => {
            // Uncertainty downgrades to denial.
            debug!(%source, error = %err, "{} probe failed, treating as denied", check);
            false
        }
    }
}
