//! KNX field-bus vocabulary.
//!
//! Only the parts the core needs: three-level group addresses, device
//! (individual) addresses, and the decoded form of a telegram.  Byte-level
//! framing, checksums and acknowledgements belong to the bus transport
//! behind [`BusPort`](crate::app::ports::BusPort).

pub mod address;
pub mod telegram;

pub use address::{GroupAddress, IndividualAddress};
pub use telegram::{Apci, BusWrite, Destination, DimDirection, DimStep, Payload, Telegram};
