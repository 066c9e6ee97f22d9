//! Peripheral assignments for the KNX input monitor board.
//!
//! Single source of truth: drivers reference this module rather than
//! hard-coding bus addresses.

// ---------------------------------------------------------------------------
// I²C bus (MCP23017 input expanders)
// ---------------------------------------------------------------------------

/// Every address an MCP23017 can be strapped to (A2..A0 = 000..111).
pub const MCP_I2C_ADDRESSES: [u8; 8] = [0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27];

/// MCP23017 IODIRA register; a pointer write here is a harmless probe.
pub const MCP_REG_IODIRA: u8 = 0x00;
