//! Recording mock transport for tests.
//!
//! Behaves as a fully open archive by default: every membership and
//! permission probe answers `true` and every search returns the configured
//! items. Denials and faults are opted into per channel with the `deny_*`,
//! `error_*`, and `with_search_fault` builders. Every call is recorded so
//! tests can assert ordering and call counts.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use crate::models::{RawItem, RequesterId, SourceId};
use crate::transport::{ArchiveTransport, TransportError};

/// Shorthand for building a raw item in tests.
pub fn item(source: SourceId, item_id: i64, body: &str) -> RawItem {
    RawItem {
        source,
        item_id,
        body: body.to_string(),
    }
}

#[derive(Default)]
pub struct MockTransport {
    member_denials: HashSet<SourceId>,
    member_errors: HashSet<SourceId>,
    permission_denials: HashSet<SourceId>,
    permission_errors: HashSet<SourceId>,
    items: HashMap<SourceId, Vec<RawItem>>,
    search_faults: Mutex<HashMap<SourceId, VecDeque<TransportError>>>,
    member_calls: Mutex<Vec<(RequesterId, SourceId)>>,
    permission_calls: Mutex<Vec<SourceId>>,
    search_calls: Mutex<Vec<(SourceId, String, usize)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership probes for `source` answer `false` for every requester.
    pub fn deny_membership(mut self, source: SourceId) -> Self {
        self.member_denials.insert(source);
        self
    }

    /// Membership probes for `source` fail with a transport error.
    pub fn error_membership(mut self, source: SourceId) -> Self {
        self.member_errors.insert(source);
        self
    }

    /// Permission probes for `source` answer `false`.
    pub fn deny_permission(mut self, source: SourceId) -> Self {
        self.permission_denials.insert(source);
        self
    }

    /// Permission probes for `source` fail with a transport error.
    pub fn error_permission(mut self, source: SourceId) -> Self {
        self.permission_errors.insert(source);
        self
    }

    /// Items returned by successful searches of `source`.
    pub fn with_items(mut self, source: SourceId, items: Vec<RawItem>) -> Self {
        self.items.insert(source, items);
        self
    }

    /// Queue a fault for the next search of `source`. Queued faults are
    /// consumed in order before the configured items are served.
    pub fn with_search_fault(self, source: SourceId, fault: TransportError) -> Self {
        self.search_faults
            .lock()
            .unwrap()
            .entry(source)
            .or_default()
            .push_back(fault);
        self
    }

    pub fn member_calls(&self) -> Vec<(RequesterId, SourceId)> {
        self.member_calls.lock().unwrap().clone()
    }

    pub fn permission_calls(&self) -> Vec<SourceId> {
        self.permission_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<(SourceId, String, usize)> {
        self.search_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArchiveTransport for MockTransport {
    async fn is_member(
        &self,
        requester: RequesterId,
        source: SourceId,
    ) -> Result<bool, TransportError> {
        self.member_calls.lock().unwrap().push((requester, source));
        if self.member_errors.contains(&source) {
            return Err(TransportError::Inaccessible(format!(
                "membership probe failed for {}",
                source
            )));
        }
        Ok(!self.member_denials.contains(&source))
    }

    async fn has_required_permission(&self, source: SourceId) -> Result<bool, TransportError> {
        self.permission_calls.lock().unwrap().push(source);
        if self.permission_errors.contains(&source) {
            return Err(TransportError::Inaccessible(format!(
                "permission probe failed for {}",
                source
            )));
        }
        Ok(!self.permission_denials.contains(&source))
    }

    async fn search_source(
        &self,
        source: SourceId,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RawItem>, TransportError> {
        self.search_calls
            .lock()
            .unwrap()
            .push((source, query.to_string(), limit));

        if let Some(fault) = self
            .search_faults
            .lock()
            .unwrap()
            .get_mut(&source)
            .and_then(|queue| queue.pop_front())
        {
            return Err(fault);
        }

        // Configured items are returned as-is; unlike the live gateway the
        // mock enforces no quota of its own, so tests can exercise the
        // adapter-side cap.
        Ok(self.items.get(&source).cloned().unwrap_or_default())
    }
}
