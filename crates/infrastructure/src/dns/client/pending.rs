use super::xid::XidGenerator;
use bytes::Bytes;
use ferrous_query_domain::{DomainError, Question};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

#[derive(Default)]
struct Queues {
    /// Outstanding UDP queries and the question each one asked.
    reqs: HashMap<u16, Question>,
    /// Responses picked up by some other query's receive loop.
    resps: HashMap<u16, Bytes>,
}

/// Correlates UDP responses with the concurrent queries of one client.
///
/// The queue lock is only held for map operations and never across an
/// await. Every delivery into `resps` wakes the tasks parked in
/// [`PendingQueries::notified`].
#[derive(Default)]
pub struct PendingQueries {
    queues: Mutex<Queues>,
    delivered: Notify,
}

impl PendingQueries {
    pub fn new() -> Self {
        Self::default()
    }

    fn queues(&self) -> MutexGuard<'_, Queues> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Draws ids from `xids` until one is free and registers `question`
    /// under it. The entry is removed again when the returned handle drops.
    pub fn register(
        &self,
        xids: &XidGenerator,
        question: Question,
    ) -> Result<PendingQuery<'_>, DomainError> {
        for _ in 0..=u16::MAX as u32 {
            let xid = xids.next_xid();
            if let Entry::Vacant(slot) = self.queues().reqs.entry(xid) {
                slot.insert(question);
                return Ok(PendingQuery { queries: self, xid });
            }
        }

        Err(DomainError::communication(
            "DNS error: no free transaction id",
        ))
    }

    pub fn is_outstanding(&self, xid: u16) -> bool {
        self.queues().reqs.contains_key(&xid)
    }

    /// Keeps a response for the outstanding query `xid`. Only the first
    /// response per id is kept; anything for an unknown id is dropped.
    pub fn stash(&self, xid: u16, msg: &[u8]) -> bool {
        let stored = {
            let mut queues = self.queues();
            if queues.reqs.contains_key(&xid) && !queues.resps.contains_key(&xid) {
                queues.resps.insert(xid, Bytes::copy_from_slice(msg));
                true
            } else {
                false
            }
        };

        if stored {
            self.delivered.notify_waiters();
        }
        stored
    }

    pub fn take(&self, xid: u16) -> Option<Bytes> {
        self.queues().resps.remove(&xid)
    }

    pub fn complete(&self, xid: u16) {
        let mut queues = self.queues();
        queues.reqs.remove(&xid);
        queues.resps.remove(&xid);
    }

    /// Forgets every outstanding query and stashed response.
    pub fn clear(&self) {
        {
            let mut queues = self.queues();
            queues.reqs.clear();
            queues.resps.clear();
        }
        self.delivered.notify_waiters();
    }

    /// Completes on the next delivery. Enable it before checking
    /// [`PendingQueries::take`] so a delivery in between is not missed.
    pub fn notified(&self) -> Notified<'_> {
        self.delivered.notified()
    }

    #[cfg(test)]
    fn counts(&self) -> (usize, usize) {
        let queues = self.queues();
        (queues.reqs.len(), queues.resps.len())
    }
}

/// Registration of one outstanding query.
pub struct PendingQuery<'a> {
    queries: &'a PendingQueries,
    xid: u16,
}

impl PendingQuery<'_> {
    pub fn xid(&self) -> u16 {
        self.xid
    }
}

impl Drop for PendingQuery<'_> {
    fn drop(&mut self) {
        self.queries.complete(self.xid);
    }
}
