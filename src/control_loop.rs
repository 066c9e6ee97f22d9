//! The single-threaded control loop.
//!
//! Commands produced by other execution contexts (telemetry callbacks)
//! arrive through a bounded [`CommandInbox`]; everything else is polled.
//! One [`ControlLoop::run_once`] performs, in order:
//!
//! ```text
//!  1. drain the command inbox         (config, queryInputs, failover, direct writes)
//!  2. bus.poll(TelegramFilter)         (state reports resolve the in-flight read)
//!  3. ReadQueue step                   (timeout check sees this tick's reports)
//!  4. ExpiryScanner, if queue idle
//!  5. route classified input events
//! ```
//!
//! Nothing blocks.  The loop owns all mutable core state, so the inbox is
//! the only synchronisation point.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use log::debug;

use crate::app::commands::AppCommand;
use crate::app::ports::{BusPort, Clock, InputPort, TelemetryPort};
use crate::app::service::BridgeService;
use crate::sync::ReadStep;

/// Depth of the command inbox.
pub const COMMAND_DEPTH: usize = 8;

/// Inbound command channel: telemetry client → control loop.
pub type CommandInbox = Channel<CriticalSectionRawMutex, AppCommand, COMMAND_DEPTH>;

/// Control-loop end of a [`CommandInbox`].
pub type CommandReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, AppCommand, COMMAND_DEPTH>;

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub now_ms: u64,
    pub commands: usize,
    pub read: ReadStep,
    pub events: usize,
}

pub struct ControlLoop<'a, B, T, I, C> {
    service: BridgeService,
    bus: B,
    telemetry: T,
    inputs: I,
    clock: C,
    commands: CommandReceiver<'a>,
}

impl<'a, B, T, I, C> ControlLoop<'a, B, T, I, C>
where
    B: BusPort,
    T: TelemetryPort,
    I: InputPort,
    C: Clock,
{
    /// Wire the service to its collaborators and push boot defaults out.
    pub fn new(
        mut service: BridgeService,
        mut bus: B,
        telemetry: T,
        mut inputs: I,
        clock: C,
        commands: CommandReceiver<'a>,
    ) -> Self {
        service.start(&mut inputs, &mut bus);
        Self {
            service,
            bus,
            telemetry,
            inputs,
            clock,
            commands,
        }
    }

    /// One non-blocking iteration.
    pub fn run_once(&mut self) -> TickReport {
        let now_ms = self.clock.now_ms();

        let mut commands = 0;
        while let Ok(cmd) = self.commands.try_receive() {
            self.service.handle_command(cmd, &mut self.inputs, &mut self.bus);
            commands += 1;
        }

        self.service.poll_bus(&mut self.bus, now_ms);
        let read = self.service.tick(&mut self.bus, now_ms);

        let mut events = 0;
        while let Some(event) = self.inputs.next_event() {
            self.service
                .handle_input_event(&event, &mut self.telemetry, &mut self.bus);
            events += 1;
        }

        if commands > 0 || events > 0 {
            debug!(
                "[knx] tick @{}ms: {} command(s), {} event(s), {:?}",
                now_ms, commands, events, read
            );
        }

        TickReport {
            now_ms,
            commands,
            read,
            events,
        }
    }

    pub fn service(&self) -> &BridgeService {
        &self.service
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut T {
        &mut self.telemetry
    }

    pub fn inputs(&self) -> &I {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut I {
        &mut self.inputs
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
