//! Mock hardware adapters for integration tests.
//!
//! Records every bus call and telemetry record so tests can assert on the
//! full history without a BCU or a broker.  The bus also replays queued
//! inbound telegrams through the handler on `poll`, the way the TP-UART
//! transport does.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use knxmonitor::app::events::InputStatus;
use knxmonitor::app::ports::{
    BusPort, Clock, InputPort, TelegramHandler, TelemetryError, TelemetryPort,
};
use knxmonitor::input::{InputType, RawInputEvent};
use knxmonitor::knx::{BusWrite, GroupAddress, IndividualAddress, Telegram};

// ── Bus call record ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusCall {
    Read(GroupAddress),
    Write(GroupAddress, BusWrite),
    SetAddress(IndividualAddress),
}

// ── MockBus ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockBus {
    pub calls: Vec<BusCall>,
    pub inbound: VecDeque<Telegram>,
    /// Interest answers for every telegram delivered, in order.
    pub acked: Vec<bool>,
}

#[allow(dead_code)]
impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> Vec<GroupAddress> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BusCall::Read(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    pub fn writes(&self) -> Vec<(GroupAddress, BusWrite)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BusCall::Write(a, w) => Some((*a, *w)),
                _ => None,
            })
            .collect()
    }

    /// Queue a telegram for the next `poll`.
    pub fn deliver(&mut self, telegram: Telegram) {
        self.inbound.push_back(telegram);
    }
}

impl BusPort for MockBus {
    fn poll(&mut self, handler: &mut dyn TelegramHandler) {
        while let Some(telegram) = self.inbound.pop_front() {
            let interesting = handler.is_interesting(&telegram);
            self.acked.push(interesting);
            handler.on_telegram(&telegram, interesting);
        }
    }

    fn group_read(&mut self, address: GroupAddress) {
        self.calls.push(BusCall::Read(address));
    }

    fn group_write(&mut self, address: GroupAddress, write: BusWrite) {
        self.calls.push(BusCall::Write(address, write));
    }

    fn set_individual_address(&mut self, address: IndividualAddress) {
        self.calls.push(BusCall::SetAddress(address));
    }
}

// ── MockTelemetry ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockTelemetry {
    pub published: Vec<InputStatus>,
    pub connected: bool,
}

#[allow(dead_code)]
impl MockTelemetry {
    pub fn connected() -> Self {
        Self {
            published: Vec::new(),
            connected: true,
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }
}

impl TelemetryPort for MockTelemetry {
    fn publish_status(&mut self, status: &InputStatus) -> Result<(), TelemetryError> {
        if !self.connected {
            return Err(TelemetryError::Disconnected);
        }
        self.published.push(*status);
        Ok(())
    }
}

// ── MockInputs ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCall {
    Query,
    SetType(usize, InputType),
    SetInvert(usize, bool),
    SetDisabled(usize, bool),
}

#[derive(Default)]
pub struct MockInputs {
    pub pending: VecDeque<RawInputEvent>,
    pub calls: Vec<InputCall>,
}

#[allow(dead_code)]
impl MockInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&mut self, event: RawInputEvent) {
        self.pending.push_back(event);
    }
}

impl InputPort for MockInputs {
    fn next_event(&mut self) -> Option<RawInputEvent> {
        self.pending.pop_front()
    }

    fn query_inputs(&mut self) {
        self.calls.push(InputCall::Query);
    }

    fn set_input_type(&mut self, index: usize, input_type: InputType) {
        self.calls.push(InputCall::SetType(index, input_type));
    }

    fn set_invert(&mut self, index: usize, invert: bool) {
        self.calls.push(InputCall::SetInvert(index, invert));
    }

    fn set_disabled(&mut self, index: usize, disabled: bool) {
        self.calls.push(InputCall::SetDisabled(index, disabled));
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Shared handle: clones observe the same time, so a test can advance the
/// clock a `ControlLoop` owns.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

#[allow(dead_code)]
impl ManualClock {
    pub fn at(ms: u64) -> Self {
        Self(Rc::new(Cell::new(ms)))
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}
