//! Application core — pure domain logic, zero I/O.
//!
//! The bridge rules live here: event translation, the failover routing
//! policy, the inbound telegram filter and command handling.  All
//! interaction with the bus, the telemetry client and the input hardware
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod filter;
pub mod ports;
pub mod router;
pub mod service;
pub mod translate;
