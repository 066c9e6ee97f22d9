//! Bridge service — the hexagonal core.
//!
//! [`BridgeService`] owns the logical input table, the read queue, the
//! expiry scanner and the event router.  It is driven by the control loop
//! and never touches hardware; every side effect goes through a port.
//!
//! ```text
//!   InputPort ──▶ ┌──────────────────────────┐ ──▶ TelemetryPort
//!                 │       BridgeService       │
//!     BusPort ◀──▶│ Inputs · Reads · Router   │
//!                 └──────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::{BridgeConfig, DEFAULT_DEVICE_ADDRESS, InputConfig, READ_TIMEOUT_MS, STATE_EXPIRY_MS};
use crate::error::ConfigError;
use crate::input::{InputTable, RawInputEvent};
use crate::knx::IndividualAddress;
use crate::sync::{ExpiryScanner, ReadQueue, ReadStep};

use super::commands::AppCommand;
use super::filter::TelegramFilter;
use super::ports::{BusPort, InputPort, TelemetryPort};
use super::router::{Delivery, EventRouter};

// ───────────────────────────────────────────────────────────────
// BridgeService
// ───────────────────────────────────────────────────────────────

pub struct BridgeService {
    inputs: InputTable,
    reads: ReadQueue,
    expiry: ExpiryScanner,
    router: EventRouter,
    device_address: IndividualAddress,
}

impl BridgeService {
    /// Construct the service for `input_count` discovered inputs.
    pub fn new(input_count: usize) -> Self {
        Self::with_timing(input_count, READ_TIMEOUT_MS, STATE_EXPIRY_MS)
    }

    /// Construct with explicit read timeout and state expiry window.
    pub fn with_timing(input_count: usize, read_timeout_ms: u64, expiry_ms: u64) -> Self {
        Self {
            inputs: InputTable::new(input_count),
            reads: ReadQueue::with_timeout(read_timeout_ms),
            expiry: ExpiryScanner::new(expiry_ms),
            router: EventRouter::new(),
            device_address: DEFAULT_DEVICE_ADDRESS,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Push the boot-time defaults out to the collaborators.
    pub fn start(&mut self, input_port: &mut impl InputPort, bus: &mut impl BusPort) {
        bus.set_individual_address(self.device_address);
        for (index, input) in self.inputs.iter() {
            input_port.set_input_type(index, input.input_type);
        }
        info!(
            "[knx] bridge started: {} inputs, device address {}",
            self.inputs.len(),
            self.device_address
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Let the transport process inbound traffic through the telegram filter.
    pub fn poll_bus(&mut self, bus: &mut impl BusPort, now_ms: u64) {
        let mut filter = self.telegram_filter(now_ms);
        bus.poll(&mut filter);
    }

    /// Borrow the telegram filter, e.g. to hand it to a transport directly.
    pub fn telegram_filter(&mut self, now_ms: u64) -> TelegramFilter<'_> {
        TelegramFilter::new(&mut self.inputs, &mut self.reads, now_ms)
    }

    /// Advance the read state machine; when it has nothing to do, let the
    /// expiry scanner queue stale addresses for the next tick.
    pub fn tick(&mut self, bus: &mut impl BusPort, now_ms: u64) -> ReadStep {
        let step = self.reads.step(now_ms, bus);
        if self.reads.is_idle() {
            self.expiry.scan(&self.inputs, &mut self.reads, now_ms);
        }
        step
    }

    // ── Input events ──────────────────────────────────────────

    /// Route one classified input event.
    pub fn handle_input_event(
        &mut self,
        event: &RawInputEvent,
        telemetry: &mut impl TelemetryPort,
        bus: &mut impl BusPort,
    ) -> Option<Delivery> {
        let Some(input) = self.inputs.get(event.index) else {
            warn!("[input] event for unknown index {} dropped", event.index);
            return None;
        };
        self.router.route(event, input, telemetry, bus)
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (config topic, command topic).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        input_port: &mut impl InputPort,
        bus: &mut impl BusPort,
    ) {
        match cmd {
            AppCommand::Configure(config) => {
                self.apply_config(&config, input_port, bus);
            }
            AppCommand::QueryInputs => {
                info!("[input] re-emitting input states");
                input_port.query_inputs();
            }
            AppCommand::ForceFailover(force) => {
                info!("[knx] forced failover {}", if force { "on" } else { "off" });
                self.router.set_force_field_bus(force);
            }
            AppCommand::SendTelegrams(writes) => {
                for w in writes {
                    bus.group_write(w.address, w.value.bus_write());
                }
            }
        }
    }

    /// Apply a configuration patch.  Returns how many `inputs[]` entries
    /// were accepted.
    pub fn apply_config(
        &mut self,
        config: &BridgeConfig,
        input_port: &mut impl InputPort,
        bus: &mut impl BusPort,
    ) -> usize {
        if let Some(address) = config.device_address {
            info!("[knx] device address {}", address);
            self.device_address = address;
            bus.set_individual_address(address);
        }

        if let Some(input_type) = config.default_input_type {
            info!("[config] default input type {}", input_type);
            self.inputs.set_all_types(input_type);
            for index in 1..=self.inputs.len() {
                input_port.set_input_type(index, input_type);
            }
        }

        let Some(entries) = &config.inputs else {
            return 0;
        };

        // Reads issued for the old configuration must not resolve against
        // the new one.
        self.reads.flush();
        entries
            .iter()
            .filter(|entry| self.apply_input(entry, input_port))
            .count()
    }

    fn apply_input(&mut self, cfg: &InputConfig, input_port: &mut impl InputPort) -> bool {
        let index = match usize::try_from(cfg.index) {
            Ok(i) if self.inputs.contains_index(i) => i,
            _ => {
                warn!("[config] inputs: {} (skipped)", ConfigError::InvalidIndex(cfg.index));
                return false;
            }
        };
        let Some(input) = self.inputs.get_mut(index) else {
            return false;
        };

        if let Some(input_type) = cfg.input_type {
            input.input_type = input_type;
            input_port.set_input_type(index, input_type);
        }
        if let Some(invert) = cfg.invert {
            input.invert = invert;
            input_port.set_invert(index, invert);
        }
        if let Some(disabled) = cfg.disabled {
            input.disabled = disabled;
            input_port.set_disabled(index, disabled);
        }
        if let Some(address) = cfg.command_address {
            input.command_address = address.configured();
        }
        if let Some(address) = cfg.state_address {
            input.state_address = address.configured();
            if let Some(address) = input.state_address {
                self.reads.push(address);
            }
        }
        if let Some(failover_only) = cfg.failover_only {
            input.failover_only = failover_only;
        }
        true
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn inputs(&self) -> &InputTable {
        &self.inputs
    }

    pub fn reads(&self) -> &ReadQueue {
        &self.reads
    }

    pub fn force_failover(&self) -> bool {
        self.router.force_field_bus()
    }

    pub fn device_address(&self) -> IndividualAddress {
        self.device_address
    }
}
