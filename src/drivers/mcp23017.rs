//! MCP23017 I/O-expander discovery.
//!
//! Each expander contributes 16 inputs.  At boot every strappable address
//! is probed once; the number of responders sizes the logical input
//! table.  Indices are assigned densely in address order, so a board with
//! expanders at 0x20 and 0x22 has inputs 1..=32.
//!
//! Generic over `embedded_hal::i2c::I2c` so the probe runs against the
//! ESP-IDF driver on target and a mock bus on the host.

use embedded_hal::i2c::I2c;
use log::{debug, info};

use crate::config::{MAX_EXPANDERS, PINS_PER_EXPANDER};
use crate::pins::{MCP_I2C_ADDRESSES, MCP_REG_IODIRA};

/// Bitmask of responding expanders; bit `n` is address `0x20 + n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveredExpanders(u8);

impl DiscoveredExpanders {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, slot: usize) -> bool {
        slot < MAX_EXPANDERS && self.0 & (1 << slot) != 0
    }

    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Logical input capacity.
    pub const fn input_count(self) -> usize {
        self.count() * PINS_PER_EXPANDER
    }

    /// I2C addresses of the responders, in index order.
    pub fn addresses(self) -> impl Iterator<Item = u8> {
        MCP_I2C_ADDRESSES
            .into_iter()
            .enumerate()
            .filter(move |&(slot, _)| self.contains(slot))
            .map(|(_, address)| address)
    }
}

/// Probe every expander address.
pub fn scan<I: I2c>(i2c: &mut I) -> DiscoveredExpanders {
    let mut found = 0u8;
    for (slot, &address) in MCP_I2C_ADDRESSES.iter().enumerate() {
        match i2c.write(address, &[MCP_REG_IODIRA]) {
            Ok(()) => {
                info!("[input] MCP23017 @ 0x{:02X}", address);
                found |= 1 << slot;
            }
            Err(e) => debug!("[input] no expander @ 0x{:02X}: {:?}", address, e),
        }
    }
    let expanders = DiscoveredExpanders(found);
    info!(
        "[input] {} expander(s), {} inputs",
        expanders.count(),
        expanders.input_count()
    );
    expanders
}
