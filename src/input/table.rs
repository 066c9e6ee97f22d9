//! Logical input table.
//!
//! One [`LogicalInput`] per discovered input pin, addressed by a stable
//! 1-based index.  Capacity is fixed at [`MAX_INPUT_COUNT`]; the live length
//! is the discovered input count and never changes after construction.
//!
//! The remote actuator fields (`cached_state`, `last_update_ms`) are only
//! written through [`InputTable::record_state`], which the telegram filter
//! calls for matching state reports.

use heapless::Vec;

use crate::config::{DEFAULT_INPUT_TYPE, MAX_INPUT_COUNT};
use crate::knx::GroupAddress;

use super::InputType;

/// Per-input configuration and cached remote state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalInput {
    pub input_type: InputType,
    /// Read by the upstream classifier only.
    pub invert: bool,
    /// Read by the upstream classifier only.
    pub disabled: bool,
    /// Deliver to the field bus only when telemetry delivery failed or is
    /// force-disabled.
    pub failover_only: bool,
    /// Group address commands are sent to.  `None` disables field-bus
    /// delivery for this input.
    pub command_address: Option<GroupAddress>,
    /// Group address the actuator reports its state on.  `None` disables
    /// read-back tracking.
    pub state_address: Option<GroupAddress>,
    /// Last known actuator state.
    pub cached_state: bool,
    /// Monotonic time (ms) of the last confirmed state report.
    pub last_update_ms: u64,
}

impl Default for LogicalInput {
    fn default() -> Self {
        Self {
            input_type: DEFAULT_INPUT_TYPE,
            invert: false,
            disabled: false,
            failover_only: false,
            command_address: None,
            state_address: None,
            cached_state: false,
            last_update_ms: 0,
        }
    }
}

impl LogicalInput {
    /// True if this input's state address has not been confirmed within
    /// `window_ms`.  Inputs without a state address are never stale.
    pub fn is_stale(&self, now_ms: u64, window_ms: u64) -> bool {
        self.state_address.is_some() && now_ms.saturating_sub(self.last_update_ms) > window_ms
    }
}

/// Fixed-capacity table of logical inputs.
#[derive(Debug, Clone)]
pub struct InputTable {
    inputs: Vec<LogicalInput, MAX_INPUT_COUNT>,
}

impl InputTable {
    /// Create `count` default inputs (clamped to [`MAX_INPUT_COUNT`]).
    pub fn new(count: usize) -> Self {
        let mut inputs = Vec::new();
        inputs.extend(core::iter::repeat_n(LogicalInput::default(), count.min(MAX_INPUT_COUNT)));
        Self { inputs }
    }

    /// Number of logical inputs (highest valid index).
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// True if `index` is a valid 1-based index.
    pub fn contains_index(&self, index: usize) -> bool {
        (1..=self.inputs.len()).contains(&index)
    }

    pub fn get(&self, index: usize) -> Option<&LogicalInput> {
        index.checked_sub(1).and_then(|i| self.inputs.get(i))
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut LogicalInput> {
        index.checked_sub(1).and_then(|i| self.inputs.get_mut(i))
    }

    /// `(index, input)` pairs, 1-based.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &LogicalInput)> {
        self.inputs.iter().enumerate().map(|(i, input)| (i + 1, input))
    }

    /// Set the type of every input.
    pub fn set_all_types(&mut self, input_type: InputType) {
        for input in &mut self.inputs {
            input.input_type = input_type;
        }
    }

    /// True if any input listens on `address`.
    pub fn tracks(&self, address: GroupAddress) -> bool {
        self.inputs.iter().any(|i| i.state_address == Some(address))
    }

    /// Store `value` as the confirmed state of every input listening on
    /// `address`.  Returns how many inputs were updated.
    pub fn record_state(&mut self, address: GroupAddress, value: bool, now_ms: u64) -> usize {
        let mut updated = 0;
        for input in self.inputs.iter_mut().filter(|i| i.state_address == Some(address)) {
            input.cached_state = value;
            input.last_update_ms = now_ms;
            updated += 1;
        }
        updated
    }

    /// State addresses not confirmed within `window_ms`.  May repeat an
    /// address shared by several inputs.
    pub fn stale_addresses(&self, now_ms: u64, window_ms: u64) -> impl Iterator<Item = GroupAddress> + '_ {
        self.inputs
            .iter()
            .filter(move |i| i.is_stale(now_ms, window_ms))
            .filter_map(|i| i.state_address)
    }
}
