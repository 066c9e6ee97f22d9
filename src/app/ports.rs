//! Port traits — the hexagonal boundary between the core and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BridgeService (domain)
//! ```
//!
//! The KNX transport, the telemetry client and the input classifier are
//! external collaborators.  The core reaches them only through these
//! traits, so the same logic runs on every board variant and on the host
//! under test with recording mocks.
//!
//! None of the calls block.  Bus writes are fire-and-forget; whether a
//! telegram actually made it onto the wire is the transport's concern.

use core::fmt;

use crate::app::events::InputStatus;
use crate::input::{InputType, RawInputEvent};
use crate::knx::{BusWrite, GroupAddress, IndividualAddress, Telegram};

// ───────────────────────────────────────────────────────────────
// Field bus (driven adapter: domain ↔ KNX BCU)
// ───────────────────────────────────────────────────────────────

/// Inbound telegram handler the transport calls while polling.
pub trait TelegramHandler {
    /// Should the transport acknowledge this telegram?  Must be a pure
    /// lookup: the transport calls it mid-frame to decide on the ACK.
    fn is_interesting(&self, telegram: &Telegram) -> bool;

    /// A complete telegram arrived.  `interesting` is the answer
    /// [`is_interesting`](Self::is_interesting) gave for it.
    fn on_telegram(&mut self, telegram: &Telegram, interesting: bool);
}

/// Telegram-level access to the KNX bus.
pub trait BusPort {
    /// Process pending bus traffic, calling `handler` for each telegram.
    fn poll(&mut self, handler: &mut dyn TelegramHandler);

    /// Send a GroupValueRead.
    fn group_read(&mut self, address: GroupAddress);

    /// Send a GroupValueWrite.
    fn group_write(&mut self, address: GroupAddress, write: BusWrite);

    /// Change this device's physical address.
    fn set_individual_address(&mut self, address: IndividualAddress);
}

// ───────────────────────────────────────────────────────────────
// Telemetry (driven adapter: domain → MQTT or other pub/sub client)
// ───────────────────────────────────────────────────────────────

/// Why a status record was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryError {
    /// No connection to the broker.
    Disconnected,
    /// The client refused or failed to queue the message.
    PublishFailed,
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "telemetry disconnected"),
            Self::PublishFailed => write!(f, "telemetry publish failed"),
        }
    }
}

/// Publishes per-event status records.
pub trait TelemetryPort {
    fn publish_status(&mut self, status: &InputStatus) -> Result<(), TelemetryError>;
}

// ───────────────────────────────────────────────────────────────
// Inputs (driving adapter: classifier → domain)
// ───────────────────────────────────────────────────────────────

/// The input-event source: scans pins, classifies edges/holds/presses and
/// owns the effect of `type`, `invert` and `disabled`.
pub trait InputPort {
    /// Next classified event, if any.  Never blocks.
    fn next_event(&mut self) -> Option<RawInputEvent>;

    /// Re-emit the current state of every bi-stable input.
    fn query_inputs(&mut self);

    fn set_input_type(&mut self, index: usize, input_type: InputType);

    fn set_invert(&mut self, index: usize, invert: bool);

    fn set_disabled(&mut self, index: usize, disabled: bool);
}

// ───────────────────────────────────────────────────────────────
// Time
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}
