//! Peripheral drivers.

pub mod mcp23017;

pub use mcp23017::{DiscoveredExpanders, scan};
