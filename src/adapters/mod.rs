//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                       |
//! |------------|---------------|-----------------------------------|
//! | `log_sink` | TelemetryPort | Serial log output                 |
//! | `time`     | Clock         | ESP32 system timer / host Instant |
//!
//! The KNX transport and the MQTT client are board-specific and live with
//! the board binary; they implement [`BusPort`](crate::app::ports::BusPort)
//! and feed [`CommandInbox`](crate::control_loop::CommandInbox).

pub mod log_sink;
pub mod time;
