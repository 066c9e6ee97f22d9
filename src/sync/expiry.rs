//! Background refresh of stale actuator states.
//!
//! Runs only when the read queue is idle so it never competes with
//! configuration-driven reads or retries.  Every tracked state address
//! whose last confirmation is older than the expiry window is queued;
//! the queue's dedup collapses addresses shared between inputs.

use log::info;

use crate::config::STATE_EXPIRY_MS;
use crate::input::InputTable;

use super::read_queue::ReadQueue;

#[derive(Debug, Clone, Copy)]
pub struct ExpiryScanner {
    window_ms: u64,
}

impl Default for ExpiryScanner {
    fn default() -> Self {
        Self::new(STATE_EXPIRY_MS)
    }
}

impl ExpiryScanner {
    pub const fn new(window_ms: u64) -> Self {
        Self { window_ms }
    }

    pub const fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Queue stale addresses if `reads` is idle.  Returns the number queued.
    pub fn scan(&self, inputs: &InputTable, reads: &mut ReadQueue, now_ms: u64) -> usize {
        if !reads.is_idle() {
            return 0;
        }
        let queued = inputs
            .stale_addresses(now_ms, self.window_ms)
            .filter(|&address| reads.push(address))
            .count();
        if queued > 0 {
            info!("[knx] {} state address(es) expired, re-reading", queued);
        }
        queued
    }
}
