//! Fuzz target: `ReadQueue` operation sequences.
//!
//! Each input byte is one operation.  After every operation the queue
//! must hold each address at most once, never queue the in-flight address,
//! and never have more than one read outstanding.
//!
//! cargo fuzz run fuzz_read_queue

#![no_main]

use knxmonitor::app::ports::{BusPort, TelegramHandler};
use knxmonitor::knx::{BusWrite, GroupAddress, IndividualAddress};
use knxmonitor::sync::{ReadQueue, ReadStep};
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct CountingBus {
    reads: usize,
}

impl BusPort for CountingBus {
    fn poll(&mut self, _handler: &mut dyn TelegramHandler) {}
    fn group_read(&mut self, _address: GroupAddress) {
        self.reads += 1;
    }
    fn group_write(&mut self, _address: GroupAddress, _write: BusWrite) {}
    fn set_individual_address(&mut self, _address: IndividualAddress) {}
}

fuzz_target!(|data: &[u8]| {
    let mut q = ReadQueue::with_timeout(50);
    let mut bus = CountingBus::default();
    let mut now = 0u64;

    for &byte in data {
        let address = GroupAddress::from_raw(u16::from(byte & 0x1F));
        match byte >> 5 {
            0..=2 => {
                q.push(address);
            }
            3..=5 => {
                now += u64::from(byte & 0x1F) * 4;
                let had_in_flight = q.in_flight().is_some();
                let before = bus.reads;
                if let ReadStep::Sent(_) = q.step(now, &mut bus) {
                    assert!(!had_in_flight, "second read sent while one outstanding");
                    assert_eq!(bus.reads, before + 1);
                }
            }
            6 => {
                q.resolve(address);
            }
            _ => q.flush(),
        }

        let queued: Vec<_> = q.iter().collect();
        for (i, a) in queued.iter().enumerate() {
            assert!(!queued[i + 1..].contains(a), "duplicate queued address");
            assert!(q.in_flight().is_none_or(|r| r.address != *a));
            assert!(!a.is_unset());
        }
    }
});
