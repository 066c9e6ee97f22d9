//! Remote state synchronisation: the read queue state machine and the
//! background expiry scanner.

pub mod expiry;
pub mod read_queue;

pub use expiry::ExpiryScanner;
pub use read_queue::{InFlightRead, ReadQueue, ReadStep};
