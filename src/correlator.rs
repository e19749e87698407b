//! Book-keeping of in-flight requests and their deadlines.

use crate::protocol::{RequestId, RequestType};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// A request waiting for its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: RequestId,
    pub request_type: RequestType,
    pub sent_at: Instant,
    pub timeout: Duration,
    sequence: u64,
}

impl PendingRequest {
    pub fn deadline(&self) -> Instant {
        self.sent_at + self.timeout
    }
}

/// Maps request ids to their pending state; every request owns its deadline
#[derive(Debug, Default)]
pub struct Correlator {
    pending: HashMap<RequestId, PendingRequest>,
    next_sequence: u64,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: RequestId,
        request_type: RequestType,
        timeout: Duration,
        now: Instant,
    ) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.pending.insert(
            id.clone(),
            PendingRequest {
                id,
                request_type,
                sent_at: now,
                timeout,
                sequence,
            },
        );
    }

    /// Remove and return the request with `id`
    pub fn resolve(&mut self, id: &RequestId) -> Option<PendingRequest> {
        self.pending.remove(id)
    }

    /// Kind of the pending request with `id`
    pub fn request_type(&self, id: &RequestId) -> Option<RequestType> {
        self.pending.get(id).map(|pending| pending.request_type)
    }

    /// Remove and return the oldest request of `request_type`.
    ///
    /// Used for replies that do not echo a request id.
    pub fn resolve_oldest(&mut self, request_type: RequestType) -> Option<PendingRequest> {
        let id = self
            .pending
            .values()
            .filter(|pending| pending.request_type == request_type)
            .min_by_key(|pending| pending.sequence)
            .map(|pending| pending.id.clone())?;

        self.pending.remove(&id)
    }

    /// Remove and return every request whose deadline is at or before `now`,
    /// oldest deadline first
    pub fn expire(&mut self, now: Instant) -> Vec<PendingRequest> {
        let overdue: Vec<RequestId> = self
            .pending
            .values()
            .filter(|pending| pending.deadline() <= now)
            .map(|pending| pending.id.clone())
            .collect();

        let mut expired: Vec<PendingRequest> = overdue
            .iter()
            .filter_map(|id| self.pending.remove(id))
            .collect();
        expired.sort_by_key(|pending| (pending.deadline(), pending.sequence));
        expired
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(PendingRequest::deadline).min()
    }

    pub fn is_pending(&self, id: &RequestId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
