//! Deduplicating GroupValueRead queue with a single in-flight slot.
//!
//! ```text
//!            pop head, send read
//!   ┌──────┐ ─────────────────────▶ ┌─────────┐
//!   │ Idle │                        │ Waiting │
//!   └──────┘ ◀───────────────────── └─────────┘
//!        ▲     matching report (resolve)   │
//!        └─────────────────────────────────┘
//!          timeout: re-push address to tail
//! ```
//!
//! KNX group reads carry no correlation id, so only one read is ever
//! outstanding and an address is present at most once across the queue
//! and the in-flight slot.  A response is matched purely by address.
//! Unanswered reads are retried forever at the tail of the queue.

use heapless::Deque;
use log::{debug, warn};

use crate::app::ports::BusPort;
use crate::config::{MAX_INPUT_COUNT, READ_TIMEOUT_MS};
use crate::knx::GroupAddress;

/// The one outstanding read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlightRead {
    pub address: GroupAddress,
    pub requested_at_ms: u64,
}

/// What one [`ReadQueue::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStep {
    /// Nothing queued, nothing in flight.
    Idle,
    /// A read was sent for this address.
    Sent(GroupAddress),
    /// The in-flight read is still within its timeout.
    Waiting(GroupAddress),
    /// The in-flight read timed out and was re-queued.
    Retried(GroupAddress),
}

/// Bounded FIFO of state addresses awaiting a read.
#[derive(Debug, Clone)]
pub struct ReadQueue {
    pending: Deque<GroupAddress, MAX_INPUT_COUNT>,
    in_flight: Option<InFlightRead>,
    timeout_ms: u64,
}

impl Default for ReadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadQueue {
    pub fn new() -> Self {
        Self::with_timeout(READ_TIMEOUT_MS)
    }

    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            pending: Deque::new(),
            in_flight: None,
            timeout_ms,
        }
    }

    // ── Ring operations ───────────────────────────────────────

    /// Append `address` to the tail.  No-op (returns `false`) for the unset
    /// address or one already queued or in flight.
    pub fn push(&mut self, address: GroupAddress) -> bool {
        if address.is_unset() || self.contains(address) {
            return false;
        }
        if self.pending.push_back(address).is_err() {
            // Sized for every distinct state address; only reachable if
            // that sizing is broken.
            warn!("[knx] read queue full, dropping {}", address);
            return false;
        }
        true
    }

    /// Remove and return the head.
    pub fn pop(&mut self) -> Option<GroupAddress> {
        self.pending.pop_front()
    }

    /// True if `address` is queued or in flight.
    pub fn contains(&self, address: GroupAddress) -> bool {
        self.in_flight.is_some_and(|r| r.address == address) || self.pending.iter().any(|a| *a == address)
    }

    /// True if nothing is queued (a read may still be in flight).
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of queued addresses, excluding the in-flight one.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Queued addresses in FIFO order.
    pub fn iter(&self) -> impl Iterator<Item = GroupAddress> + '_ {
        self.pending.iter().copied()
    }

    // ── In-flight slot ────────────────────────────────────────

    pub fn in_flight(&self) -> Option<InFlightRead> {
        self.in_flight
    }

    /// Nothing queued and nothing in flight.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none() && self.pending.is_empty()
    }

    /// Clear the in-flight slot if it is waiting on `address`.
    pub fn resolve(&mut self, address: GroupAddress) -> bool {
        match self.in_flight {
            Some(read) if read.address == address => {
                debug!("[knx] read {} answered", address);
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    /// Drop every queued address and the in-flight read.
    pub fn flush(&mut self) {
        self.pending.clear();
        self.in_flight = None;
    }

    // ── State machine ─────────────────────────────────────────

    /// Advance one loop tick: time out the in-flight read, or send the next
    /// one.
    pub fn step(&mut self, now_ms: u64, bus: &mut impl BusPort) -> ReadStep {
        if let Some(read) = self.in_flight {
            if now_ms.saturating_sub(read.requested_at_ms) <= self.timeout_ms {
                return ReadStep::Waiting(read.address);
            }
            warn!("[knx] no response to read {}, retrying", read.address);
            self.in_flight = None;
            self.push(read.address);
            return ReadStep::Retried(read.address);
        }

        let Some(address) = self.pop() else {
            return ReadStep::Idle;
        };
        debug!("[knx] reading state {}", address);
        bus.group_read(address);
        self.in_flight = Some(InFlightRead {
            address,
            requested_at_ms: now_ms,
        });
        ReadStep::Sent(address)
    }
}
