//! Configuration constants and runtime configuration decoding.
//!
//! Runtime configuration arrives as a JSON object (from the telemetry
//! client's config topic) and is applied as a patch: only the keys that are
//! present change anything.  Decoding is lenient at field level — a bad
//! field is logged and skipped, the rest of the payload still applies.
//!
//! ```json
//! {
//!   "knxDeviceAddress": "1.1.244",
//!   "defaultInputType": "switch",
//!   "inputs": [
//!     { "index": 1, "type": "button", "invert": false, "disabled": false,
//!       "knxCommandAddress": "1/1/2", "knxStateAddress": "1/1/1",
//!       "knxFailoverOnly": true }
//!   ]
//! }
//! ```

use anyhow::{Result, anyhow};
use log::warn;
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::input::InputType;
use crate::knx::{GroupAddress, IndividualAddress};

// --- Hardware ---
/// I/O expanders that can share one I2C bus.
pub const MAX_EXPANDERS: usize = 8;
/// Input pins per expander.
pub const PINS_PER_EXPANDER: usize = 16;
/// Upper bound on logical inputs; sizes the input table and read queue.
pub const MAX_INPUT_COUNT: usize = MAX_EXPANDERS * PINS_PER_EXPANDER;
/// Channels per physical RJ45 port, used for the telemetry port/channel pair.
pub const CHANNELS_PER_PORT: usize = 4;

// --- State synchronisation ---
/// A GroupValueRead without a matching response after this long is retried.
pub const READ_TIMEOUT_MS: u64 = 5_000;
/// A cached actuator state older than this is re-read in the background.
pub const STATE_EXPIRY_MS: u64 = 65 * 60 * 1_000;

// --- Field bus ---
/// Relative dimming step code used by rotary inputs and `up`/`down` commands.
pub const DIM_STEP: u8 = 5;
/// Device address used until configuration sets one.
pub const DEFAULT_DEVICE_ADDRESS: IndividualAddress = IndividualAddress::from_raw(0x11F4); // 1.1.244
/// Input type of every input until configuration says otherwise.
pub const DEFAULT_INPUT_TYPE: InputType = InputType::Switch;

/// Decoded configuration payload.  `None` means "key absent, leave as is".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgeConfig {
    pub device_address: Option<IndividualAddress>,
    pub default_input_type: Option<InputType>,
    /// `Some` whenever the payload carried an `inputs` key, even if every
    /// entry in it was rejected: the presence alone flushes the read queue.
    pub inputs: Option<Vec<InputConfig>>,
}

/// One `inputs[]` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    /// 1-based index as given; range-checked against the discovered input
    /// count when applied.
    pub index: u64,
    pub input_type: Option<InputType>,
    pub invert: Option<bool>,
    pub disabled: Option<bool>,
    /// `Some(UNSET)` clears the address.
    pub command_address: Option<GroupAddress>,
    /// `Some(UNSET)` clears the address.
    pub state_address: Option<GroupAddress>,
    pub failover_only: Option<bool>,
}

impl InputConfig {
    /// An entry that changes nothing but the addressed index.
    pub fn new(index: u64) -> Self {
        Self {
            index,
            input_type: None,
            invert: None,
            disabled: None,
            command_address: None,
            state_address: None,
            failover_only: None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Decoding
// ───────────────────────────────────────────────────────────────

/// Parse a JSON payload into an object map.  Payload-level failures are
/// the only errors surfaced to the caller.
pub(crate) fn parse_object(payload: &str) -> Result<Map<String, Value>> {
    let root: Value =
        serde_json::from_str(payload).map_err(|e| anyhow!("payload is not valid JSON: {e}"))?;
    match root {
        Value::Object(map) => Ok(map),
        _ => Err(anyhow!("payload must be a JSON object")),
    }
}

/// Decode `key` with `parse` if present.  A failing field is logged and
/// treated as absent.
pub(crate) fn lenient<T>(
    obj: &Map<String, Value>,
    key: &str,
    parse: impl FnOnce(&Value) -> crate::error::Result<T>,
) -> Option<T> {
    let value = obj.get(key)?;
    match parse(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("[config] {}: {} (skipped)", key, e);
            None
        }
    }
}

pub(crate) fn as_str(value: &Value) -> crate::error::Result<&str> {
    value.as_str().ok_or(ConfigError::WrongType("string"))
}

pub(crate) fn as_bool(value: &Value) -> crate::error::Result<bool> {
    value.as_bool().ok_or(ConfigError::WrongType("boolean"))
}

pub(crate) fn group_address(value: &Value) -> crate::error::Result<GroupAddress> {
    Ok(as_str(value)?.parse::<GroupAddress>()?)
}

fn input_type(value: &Value) -> crate::error::Result<InputType> {
    as_str(value)?.parse()
}

/// Decode a configuration payload.
pub fn decode_config(payload: &str) -> Result<BridgeConfig> {
    let obj = parse_object(payload)?;
    Ok(config_from_object(&obj))
}

pub(crate) fn config_from_object(obj: &Map<String, Value>) -> BridgeConfig {
    let device_address = lenient(obj, "knxDeviceAddress", |v| {
        Ok(as_str(v)?.parse::<IndividualAddress>()?)
    });
    let default_input_type = lenient(obj, "defaultInputType", input_type);
    // A malformed `inputs` value still counts as present: it flushes the
    // read queue like an empty array.
    let inputs = obj.contains_key("inputs").then(|| {
        lenient(obj, "inputs", |v| {
            let entries = v.as_array().ok_or(ConfigError::WrongType("array"))?;
            Ok(entries.iter().filter_map(decode_input).collect::<Vec<_>>())
        })
        .unwrap_or_default()
    });

    BridgeConfig {
        device_address,
        default_input_type,
        inputs,
    }
}

fn decode_input(value: &Value) -> Option<InputConfig> {
    let Some(obj) = value.as_object() else {
        warn!("[config] inputs: entry is not an object (skipped)");
        return None;
    };
    let index = lenient(obj, "index", |v| v.as_u64().ok_or(ConfigError::WrongType("integer")));
    let Some(index) = index else {
        if !obj.contains_key("index") {
            warn!("[config] inputs: {} (skipped)", ConfigError::MissingIndex);
        }
        return None;
    };

    Some(InputConfig {
        index,
        input_type: lenient(obj, "type", input_type),
        invert: lenient(obj, "invert", as_bool),
        disabled: lenient(obj, "disabled", as_bool),
        command_address: lenient(obj, "knxCommandAddress", group_address),
        state_address: lenient(obj, "knxStateAddress", group_address),
        failover_only: lenient(obj, "knxFailoverOnly", as_bool),
    })
}
