//! Outbound telemetry record.
//!
//! One [`InputStatus`] is published per input transition through the
//! [`TelemetryPort`](super::ports::TelemetryPort):
//!
//! ```json
//! {"port":1,"channel":2,"index":2,"type":"button","event":"single"}
//! ```

use serde::Serialize;

use crate::input::{EventName, InputType, port_channel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputStatus {
    pub port: usize,
    pub channel: usize,
    pub index: usize,
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub event: EventName,
}

impl InputStatus {
    pub fn new(index: usize, input_type: InputType, event: EventName) -> Self {
        let (port, channel) = port_channel(index);
        Self {
            port,
            channel,
            index,
            input_type,
            event,
        }
    }
}
