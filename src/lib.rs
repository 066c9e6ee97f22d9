//! KNX state monitor firmware library.
//!
//! Bridges discrete physical inputs to two delivery transports: a
//! publish/subscribe telemetry client and the KNX field bus.  Exposes the
//! pure-logic core for integration testing; board wiring (UART to the KNX
//! BCU, MQTT client, logger installation) lives in the board binary and
//! talks to this crate only through the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control_loop;
pub mod error;
pub mod input;
pub mod knx;
pub mod sync;

mod pins;

pub mod adapters;
pub mod drivers;
