//! Log-based telemetry adapter.
//!
//! Implements [`TelemetryPort`] by writing each status record, serialised
//! exactly as it would be published, to the logger (UART / USB-CDC in
//! production).  Useful on a bench without a broker, and as the telemetry
//! leg when only the field bus should carry events: pair it with
//! `forceFailover`.

use log::{info, warn};

use crate::app::events::InputStatus;
use crate::app::ports::{TelemetryError, TelemetryPort};

/// Adapter that logs every [`InputStatus`] to the serial console.
#[derive(Debug, Default)]
pub struct LogTelemetry {
    published: u32,
}

impl LogTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records written so far.
    pub fn published(&self) -> u32 {
        self.published
    }
}

impl TelemetryPort for LogTelemetry {
    fn publish_status(&mut self, status: &InputStatus) -> Result<(), TelemetryError> {
        match serde_json::to_string(status) {
            Ok(json) => {
                info!("STATUS | {}", json);
                self.published = self.published.wrapping_add(1);
                Ok(())
            }
            Err(e) => {
                warn!("[input] status for index {} not serialisable: {}", status.index, e);
                Err(TelemetryError::PublishFailed)
            }
        }
    }
}
