//! Input event → KNX group write.
//!
//! | Type                          | Event code        | Write                        |
//! |-------------------------------|-------------------|------------------------------|
//! | `button`                      | single press      | `!cached_state`              |
//! | `button`                      | hold/release/multi| —                            |
//! | `rotary`                      | low               | dim increase, step 5         |
//! | `rotary`                      | high              | dim decrease, step 5         |
//! | `contact`/`security`/`switch` | low / high        | `code == Low`                |
//! | `contact`/`security`/`switch` | anything else     | —                            |
//! | `press`/`toggle`              | low / high        | `!cached_state`              |
//!
//! Toggles read the locally cached actuator state, so they are only as
//! good as the last state report.

use crate::config::DIM_STEP;
use crate::input::{EventCode, InputType};
use crate::knx::{BusWrite, DimDirection, DimStep};

/// The write to send for `code` on an input of `input_type`, or `None`
/// when the event has no field-bus action.
pub fn translate(input_type: InputType, code: EventCode, cached_state: bool) -> Option<BusWrite> {
    use EventCode as C;

    match (input_type, code) {
        (InputType::Button, C::Presses(1)) => Some(BusWrite::Bool(!cached_state)),
        (InputType::Button, _) => None,

        (InputType::Rotary, C::Low) => Some(BusWrite::Dim(DimStep::new(DimDirection::Increase, DIM_STEP))),
        (InputType::Rotary, C::High) => Some(BusWrite::Dim(DimStep::new(DimDirection::Decrease, DIM_STEP))),
        (InputType::Rotary, _) => None,

        (InputType::Contact | InputType::Security | InputType::Switch, C::Low) => Some(BusWrite::Bool(true)),
        (InputType::Contact | InputType::Security | InputType::Switch, C::High) => Some(BusWrite::Bool(false)),
        (InputType::Contact | InputType::Security | InputType::Switch, _) => None,

        (InputType::Press | InputType::Toggle, C::Low | C::High) => Some(BusWrite::Bool(!cached_state)),
        (InputType::Press | InputType::Toggle, _) => None,
    }
}
