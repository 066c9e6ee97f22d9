//! Input and event taxonomy.
//!
//! The upstream classifier (debounce, hold and multi-press detection) hands
//! the core a raw [`EventCode`] for a logical input of a given
//! [`InputType`].  [`event_name`] turns that pair into the [`EventName`]
//! published on telemetry.
//!
//! | Type       | Low       | High     | Other codes                          |
//! |------------|-----------|----------|--------------------------------------|
//! | `button`   | —         | —        | presses 1–5 → single…penta, hold, release |
//! | `contact`  | closed    | open     | —                                    |
//! | `press`    | press     | press    | —                                    |
//! | `rotary`   | up        | down     | —                                    |
//! | `security` | alarm     | normal   | tamper, short, fault                 |
//! | `switch`   | on        | off      | —                                    |
//! | `toggle`   | toggle    | toggle   | —                                    |

pub mod table;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::CHANNELS_PER_PORT;
use crate::error::ConfigError;

pub use table::{InputTable, LogicalInput};

/// How a logical input is monitored and what events it emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Button,
    Contact,
    Press,
    Rotary,
    Security,
    Switch,
    Toggle,
}

impl InputType {
    pub const ALL: [Self; 7] = [
        Self::Button,
        Self::Contact,
        Self::Press,
        Self::Rotary,
        Self::Security,
        Self::Switch,
        Self::Toggle,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Contact => "contact",
            Self::Press => "press",
            Self::Rotary => "rotary",
            Self::Security => "security",
            Self::Switch => "switch",
            Self::Toggle => "toggle",
        }
    }
}

impl FromStr for InputType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(ConfigError::UnknownInputType)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw classified event from the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCode {
    /// Input went active (pulled low).
    Low,
    /// Input went inactive (released high).
    High,
    /// Button held past the hold threshold.
    Hold,
    /// Button released after a hold.
    Release,
    /// Button pressed `n` times in quick succession (1 = single press).
    Presses(u8),
    /// Security loop tamper resistance detected.
    Tamper,
    /// Security loop shorted.
    Short,
    /// Security loop fault (open circuit / out of range).
    Fault,
}

/// Published event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventName {
    Single,
    Double,
    Triple,
    Quad,
    Penta,
    Hold,
    Release,
    Open,
    Closed,
    Press,
    Up,
    Down,
    Alarm,
    Normal,
    Tamper,
    Short,
    Fault,
    On,
    Off,
    Toggle,
}

/// Name of `code` for an input of type `input_type`, or `None` if the
/// classifier should never produce that combination.
pub fn event_name(input_type: InputType, code: EventCode) -> Option<EventName> {
    use EventCode as C;
    use EventName as N;

    let name = match (input_type, code) {
        (InputType::Button, C::Presses(1)) => N::Single,
        (InputType::Button, C::Presses(2)) => N::Double,
        (InputType::Button, C::Presses(3)) => N::Triple,
        (InputType::Button, C::Presses(4)) => N::Quad,
        (InputType::Button, C::Presses(5)) => N::Penta,
        (InputType::Button, C::Hold) => N::Hold,
        (InputType::Button, C::Release) => N::Release,

        (InputType::Contact, C::Low) => N::Closed,
        (InputType::Contact, C::High) => N::Open,

        (InputType::Press, C::Low | C::High) => N::Press,

        (InputType::Rotary, C::Low) => N::Up,
        (InputType::Rotary, C::High) => N::Down,

        (InputType::Security, C::Low) => N::Alarm,
        (InputType::Security, C::High) => N::Normal,
        (InputType::Security, C::Tamper) => N::Tamper,
        (InputType::Security, C::Short) => N::Short,
        (InputType::Security, C::Fault) => N::Fault,

        (InputType::Switch, C::Low) => N::On,
        (InputType::Switch, C::High) => N::Off,

        (InputType::Toggle, C::Low | C::High) => N::Toggle,

        _ => return None,
    };
    Some(name)
}

/// A classified event for one logical input, as delivered by the
/// [`InputPort`](crate::app::ports::InputPort).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    /// 1-based logical input index.
    pub index: usize,
    pub input_type: InputType,
    pub code: EventCode,
}

/// Physical (port, channel) of a 1-based index: four channels per RJ45 port.
/// Index 0 is not a valid input and maps to channel 0 of port 1.
pub const fn port_channel(index: usize) -> (usize, usize) {
    let per_port = CHANNELS_PER_PORT;
    let port = index.saturating_sub(1) / per_port + 1;
    let channel = index - (port - 1) * per_port;
    (port, channel)
}
