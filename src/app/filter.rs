//! Inbound telegram filter.
//!
//! Borrowed view over the input table and read queue that the bus
//! transport calls back into while polling.  The interest check decides
//! whether the transport ACKs a telegram; the update path records boolean
//! state reports and resolves the matching in-flight read.

use log::debug;

use crate::app::ports::TelegramHandler;
use crate::input::InputTable;
use crate::knx::Telegram;
use crate::sync::ReadQueue;

/// True if `telegram` targets a group address some input listens on.
pub fn is_interesting(inputs: &InputTable, telegram: &Telegram) -> bool {
    telegram.target_group().is_some_and(|ga| inputs.tracks(ga))
}

pub struct TelegramFilter<'a> {
    inputs: &'a mut InputTable,
    reads: &'a mut ReadQueue,
    now_ms: u64,
}

impl<'a> TelegramFilter<'a> {
    pub fn new(inputs: &'a mut InputTable, reads: &'a mut ReadQueue, now_ms: u64) -> Self {
        Self { inputs, reads, now_ms }
    }
}

impl TelegramHandler for TelegramFilter<'_> {
    fn is_interesting(&self, telegram: &Telegram) -> bool {
        is_interesting(&*self.inputs, telegram)
    }

    fn on_telegram(&mut self, telegram: &Telegram, interesting: bool) {
        if !interesting || !telegram.is_state_report() {
            return;
        }
        let (Some(target), Some(value)) = (telegram.target_group(), telegram.as_bool()) else {
            return;
        };

        let updated = self.inputs.record_state(target, value, self.now_ms);
        debug!("[knx] state {} = {} ({} input(s))", target, value, updated);
        self.reads.resolve(target);
    }
}
