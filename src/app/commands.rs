//! Inbound commands to the bridge service.
//!
//! These arrive from the telemetry client's config and command topics and
//! reach the control loop through its inbox.  A single command payload may
//! carry several keys; [`decode_command`] turns each present key into one
//! [`AppCommand`], in a fixed order.
//!
//! ```json
//! { "queryInputs": true, "forceFailover": false,
//!   "knxCommands": [ { "knxGroupAddress": "1/2/3", "knxValue": "on" } ] }
//! ```

use anyhow::Result;
use log::warn;
use serde_json::Value;

use crate::config::{self, BridgeConfig, DIM_STEP, as_bool, as_str, group_address, lenient};
use crate::error::ConfigError;
use crate::knx::{BusWrite, DimDirection, DimStep, GroupAddress};

/// Commands that external adapters can send into the core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Apply a (partial) configuration.
    Configure(BridgeConfig),

    /// Ask the input source to re-emit all bi-stable input states.
    QueryInputs,

    /// Bypass telemetry: every event also goes to the field bus.
    ForceFailover(bool),

    /// Write straight onto the bus, bypassing the event pipeline.
    SendTelegrams(Vec<DirectWrite>),
}

/// Value of a direct `knxCommands` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectValue {
    On,
    Off,
    Up,
    Down,
}

impl DirectValue {
    fn parse(value: &Value) -> crate::error::Result<Self> {
        match as_str(value)? {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(ConfigError::UnknownValue),
        }
    }

    /// The write this value stands for.  `up`/`down` dim with the same
    /// direction mapping as a rotary input.
    pub const fn bus_write(self) -> BusWrite {
        match self {
            Self::On => BusWrite::Bool(true),
            Self::Off => BusWrite::Bool(false),
            Self::Up => BusWrite::Dim(DimStep::new(DimDirection::Increase, DIM_STEP)),
            Self::Down => BusWrite::Dim(DimStep::new(DimDirection::Decrease, DIM_STEP)),
        }
    }
}

/// One `knxCommands` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectWrite {
    pub address: GroupAddress,
    pub value: DirectValue,
}

/// Decode a command payload.
pub fn decode_command(payload: &str) -> Result<Vec<AppCommand>> {
    let obj = config::parse_object(payload)?;
    let mut commands = Vec::new();

    if let Some(true) = lenient(&obj, "queryInputs", as_bool) {
        commands.push(AppCommand::QueryInputs);
    }
    if let Some(force) = lenient(&obj, "forceFailover", as_bool) {
        commands.push(AppCommand::ForceFailover(force));
    }
    let writes = lenient(&obj, "knxCommands", |v| {
        let entries = v.as_array().ok_or(ConfigError::WrongType("array"))?;
        Ok(entries.iter().filter_map(decode_direct_write).collect::<Vec<_>>())
    });
    if let Some(writes) = writes {
        commands.push(AppCommand::SendTelegrams(writes));
    }

    Ok(commands)
}

/// Decode a configuration payload into an [`AppCommand::Configure`].
pub fn decode_configure(payload: &str) -> Result<AppCommand> {
    config::decode_config(payload).map(AppCommand::Configure)
}

fn decode_direct_write(value: &Value) -> Option<DirectWrite> {
    let Some(obj) = value.as_object() else {
        warn!("[config] knxCommands: entry is not an object (skipped)");
        return None;
    };
    let address = lenient(obj, "knxGroupAddress", group_address)?;
    let value = lenient(obj, "knxValue", DirectValue::parse)?;
    if address.is_unset() {
        warn!("[config] knxCommands: group address 0/0/0 (skipped)");
        return None;
    }
    Some(DirectWrite { address, value })
}
