use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, LazyLock};

static SHARED: LazyLock<Arc<XidGenerator>> =
    LazyLock::new(|| Arc::new(XidGenerator::starting_at(fastrand::u16(..))));

/// Source of 16-bit transaction ids.
///
/// Ids are handed out in sequence and wrap from 65535 to 0. The counter is
/// independent of any per-client state.
#[derive(Debug)]
pub struct XidGenerator {
    next: AtomicU16,
}

impl XidGenerator {
    pub fn starting_at(first: u16) -> Self {
        Self {
            next: AtomicU16::new(first),
        }
    }

    /// The process-wide generator, seeded randomly on first use.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    pub fn next_xid(&self) -> u16 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
