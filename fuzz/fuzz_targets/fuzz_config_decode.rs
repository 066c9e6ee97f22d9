//! Fuzz target: configuration and command decoding.
//!
//! Feeds arbitrary text to both JSON entry points and applies whatever
//! decodes to a service.  Decoding must never panic, and no accepted
//! configuration may leave an invalid index or a 0/0/0 address behind.
//!
//! cargo fuzz run fuzz_config_decode

#![no_main]

use knxmonitor::app::commands::{decode_command, decode_configure};
use knxmonitor::app::ports::{BusPort, InputPort, TelegramHandler};
use knxmonitor::app::service::BridgeService;
use knxmonitor::input::{InputType, RawInputEvent};
use knxmonitor::knx::{BusWrite, GroupAddress, IndividualAddress};
use libfuzzer_sys::fuzz_target;

struct NullBus;

impl BusPort for NullBus {
    fn poll(&mut self, _handler: &mut dyn TelegramHandler) {}
    fn group_read(&mut self, _address: GroupAddress) {}
    fn group_write(&mut self, address: GroupAddress, _write: BusWrite) {
        assert!(!address.is_unset(), "write to 0/0/0");
    }
    fn set_individual_address(&mut self, _address: IndividualAddress) {}
}

struct NullInputs {
    count: usize,
}

impl InputPort for NullInputs {
    fn next_event(&mut self) -> Option<RawInputEvent> {
        None
    }
    fn query_inputs(&mut self) {}
    fn set_input_type(&mut self, index: usize, _input_type: InputType) {
        assert!((1..=self.count).contains(&index));
    }
    fn set_invert(&mut self, index: usize, _invert: bool) {
        assert!((1..=self.count).contains(&index));
    }
    fn set_disabled(&mut self, index: usize, _disabled: bool) {
        assert!((1..=self.count).contains(&index));
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let mut svc = BridgeService::new(32);
    let mut bus = NullBus;
    let mut inputs = NullInputs { count: 32 };

    if let Ok(cmd) = decode_configure(text) {
        svc.handle_command(cmd, &mut inputs, &mut bus);
    }
    if let Ok(cmds) = decode_command(text) {
        for cmd in cmds {
            svc.handle_command(cmd, &mut inputs, &mut bus);
        }
    }

    for (_, input) in svc.inputs().iter() {
        assert!(input.state_address.is_none_or(|a| !a.is_unset()));
        assert!(input.command_address.is_none_or(|a| !a.is_unset()));
    }
    assert!(svc.reads().iter().all(|a| !a.is_unset()));
});
