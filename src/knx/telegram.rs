//! Decoded KNX telegrams and outbound write actions.
//!
//! The bus transport hands the core a [`Telegram`] that has already been
//! de-framed and checksum-verified.  The core only inspects the
//! destination, the application-layer command ([`Apci`]) and whether the
//! payload is a short (≤ 6 bit) value packed into the APCI octet, which is
//! how 1-bit boolean state reports travel on the bus.

use heapless::Vec;

use super::address::{GroupAddress, IndividualAddress};

/// Maximum data length of a standard-frame telegram.
pub const MAX_PAYLOAD_LEN: usize = 14;

/// Where a telegram is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Group(GroupAddress),
    Individual(IndividualAddress),
}

/// Application-layer command of a group telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Apci {
    /// GroupValueRead.
    Read,
    /// GroupValueResponse.
    Answer,
    /// GroupValueWrite.
    Write,
    /// Anything else (memory, property, device management services).
    Other(u16),
}

/// Telegram payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// No data (read requests).
    Empty,
    /// Up to 6 bits carried in the APCI octet (DPT 1, DPT 2, DPT 3).
    Short(u8),
    /// Separate data octets.
    Long(Vec<u8, MAX_PAYLOAD_LEN>),
}

/// A decoded inbound telegram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telegram {
    pub source: IndividualAddress,
    pub destination: Destination,
    pub command: Apci,
    pub payload: Payload,
}

impl Telegram {
    /// Convenience constructor for a group write carrying a boolean.
    pub fn group_write_bool(source: IndividualAddress, target: GroupAddress, value: bool) -> Self {
        Self {
            source,
            destination: Destination::Group(target),
            command: Apci::Write,
            payload: Payload::Short(u8::from(value)),
        }
    }

    /// Convenience constructor for a group response carrying a boolean.
    pub fn group_answer_bool(source: IndividualAddress, target: GroupAddress, value: bool) -> Self {
        Self {
            command: Apci::Answer,
            ..Self::group_write_bool(source, target, value)
        }
    }

    /// Target group address, if group-addressed.
    pub fn target_group(&self) -> Option<GroupAddress> {
        match self.destination {
            Destination::Group(ga) => Some(ga),
            Destination::Individual(_) => None,
        }
    }

    /// True for GroupValueWrite / GroupValueResponse, i.e. a device
    /// publishing its state.
    pub fn is_state_report(&self) -> bool {
        matches!(self.command, Apci::Write | Apci::Answer)
    }

    /// Boolean value of a short payload (lowest bit).  `None` for empty or
    /// multi-octet payloads.
    pub fn as_bool(&self) -> Option<bool> {
        match self.payload {
            Payload::Short(bits) => Some(bits & 0x01 != 0),
            Payload::Empty | Payload::Long(_) => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Outbound writes
// ───────────────────────────────────────────────────────────────

/// Relative dimming direction (DPT 3.007 control bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimDirection {
    Increase,
    Decrease,
}

/// Relative dimming step (DPT 3.007).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimStep {
    pub direction: DimDirection,
    /// Step code 1–7 (0 = stop).
    pub step: u8,
}

impl DimStep {
    pub const fn new(direction: DimDirection, step: u8) -> Self {
        Self { direction, step }
    }

    /// 4-bit wire value: control bit 3 = increase, bits 0–2 = step code.
    pub const fn nibble(self) -> u8 {
        let control = match self.direction {
            DimDirection::Increase => 0x08,
            DimDirection::Decrease => 0x00,
        };
        control | (self.step & 0x07)
    }
}

/// A concrete group write the core asks the transport to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusWrite {
    Bool(bool),
    Dim(DimStep),
}
