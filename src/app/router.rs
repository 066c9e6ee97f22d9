//! Event routing and failover policy.
//!
//! Every classified event is first offered to telemetry.  It then also
//! goes to the field bus unless the input is `failover_only` and telemetry
//! took it:
//!
//! ```text
//! failover  = force_field_bus || telemetry failed
//! field bus = failover || !input.failover_only
//! ```

use log::{debug, warn};

use crate::app::events::InputStatus;
use crate::app::ports::{BusPort, TelemetryPort};
use crate::app::translate::translate;
use crate::input::{LogicalInput, RawInputEvent, event_name};
use crate::knx::{BusWrite, GroupAddress};

/// What happened to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Telemetry accepted the status record.
    pub telemetry: bool,
    /// The event was eligible for the field bus.
    pub field_bus: bool,
    /// The telegram actually sent, if any.
    pub written: Option<(GroupAddress, BusWrite)>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventRouter {
    force_field_bus: bool,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force_field_bus(&self) -> bool {
        self.force_field_bus
    }

    pub fn set_force_field_bus(&mut self, force: bool) {
        self.force_field_bus = force;
    }

    /// Deliver `event` for `input`.  Returns `None` if the event code has no
    /// meaning for the event's input type; such events are dropped.
    pub fn route(
        &self,
        event: &RawInputEvent,
        input: &LogicalInput,
        telemetry: &mut impl TelemetryPort,
        bus: &mut impl BusPort,
    ) -> Option<Delivery> {
        let Some(name) = event_name(event.input_type, event.code) else {
            warn!(
                "[input] {} event {:?} on index {} has no meaning, dropped",
                event.input_type, event.code, event.index
            );
            return None;
        };

        let status = InputStatus::new(event.index, event.input_type, name);
        let telemetry_ok = if self.force_field_bus {
            false
        } else {
            match telemetry.publish_status(&status) {
                Ok(()) => true,
                Err(e) => {
                    debug!("[input] index {}: {}, failing over", event.index, e);
                    false
                }
            }
        };

        let failover = self.force_field_bus || !telemetry_ok;
        let field_bus = failover || !input.failover_only;

        let written = if field_bus {
            input.command_address.and_then(|address| {
                let write = translate(event.input_type, event.code, input.cached_state)?;
                debug!("[knx] index {} -> {} {:?}", event.index, address, write);
                bus.group_write(address, write);
                Some((address, write))
            })
        } else {
            None
        };

        Some(Delivery {
            telemetry: telemetry_ok,
            field_bus,
            written,
        })
    }
}
