use chrono::{DateTime, Utc};

use bookshop_core::RequestId;

/// Per-request context threaded explicitly through store calls.
///
/// There is no ambient/framework-managed request state: everything a store
/// call needs to correlate work (logs, future transaction scoping) travels in
/// this value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: RequestId,
    received_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            received_at: Utc::now(),
        }
    }

    /// Construct with an explicit id (tests, replayed work).
    pub fn with_request_id(request_id: RequestId, received_at: DateTime<Utc>) -> Self {
        Self {
            request_id,
            received_at,
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
