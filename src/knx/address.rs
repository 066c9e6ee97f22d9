//! KNX group and individual addresses.
//!
//! | Kind       | Text form          | Bits         | Raw `u16`                     |
//! |------------|--------------------|--------------|-------------------------------|
//! | Group      | `main/mid/sub`     | 5 / 3 / 8    | `main << 11 | mid << 8 | sub` |
//! | Individual | `area.line.member` | 4 / 4 / 8    | `area << 12 | line << 8 | mbr`|
//!
//! Group address `0/0/0` is the "unset" sentinel used by configuration to
//! disable command delivery or state tracking for an input.

use core::fmt;
use core::str::FromStr;

use crate::error::AddressError;

/// Split `s` on `sep` into exactly three integers, each at most its `max`.
fn parse_three(s: &str, sep: char, max: [u16; 3]) -> Result<[u16; 3], AddressError> {
    let mut parts = [0u16; 3];
    let mut iter = s.trim().split(sep);
    for (slot, limit) in parts.iter_mut().zip(max) {
        let text = iter.next().ok_or(AddressError::WrongPartCount)?;
        let value: u32 = text.trim().parse().map_err(|_| AddressError::NotANumber)?;
        if value > u32::from(limit) {
            return Err(AddressError::OutOfRange);
        }
        *slot = value as u16;
    }
    if iter.next().is_some() {
        return Err(AddressError::WrongPartCount);
    }
    Ok(parts)
}

// ───────────────────────────────────────────────────────────────
// GroupAddress
// ───────────────────────────────────────────────────────────────

/// Three-level group address (`main/mid/sub`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupAddress(u16);

impl GroupAddress {
    /// The `0/0/0` sentinel.
    pub const UNSET: Self = Self(0);

    /// Build from parts.  `None` if a part overflows its bit field.
    pub const fn new(main: u8, mid: u8, sub: u8) -> Option<Self> {
        if main > 31 || mid > 7 {
            return None;
        }
        Some(Self(((main as u16) << 11) | ((mid as u16) << 8) | sub as u16))
    }

    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }

    /// `Some(self)` unless this is the unset sentinel.
    pub const fn configured(self) -> Option<Self> {
        if self.is_unset() { None } else { Some(self) }
    }

    pub const fn main(self) -> u8 {
        (self.0 >> 11) as u8
    }

    pub const fn mid(self) -> u8 {
        ((self.0 >> 8) & 0x07) as u8
    }

    pub const fn sub(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl FromStr for GroupAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [main, mid, sub] = parse_three(s, '/', [31, 7, 255])?;
        Ok(Self((main << 11) | (mid << 8) | sub))
    }
}

impl fmt::Display for GroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.main(), self.mid(), self.sub())
    }
}

// ───────────────────────────────────────────────────────────────
// IndividualAddress
// ───────────────────────────────────────────────────────────────

/// Physical device address (`area.line.member`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndividualAddress(u16);

impl IndividualAddress {
    pub const fn new(area: u8, line: u8, member: u8) -> Option<Self> {
        if area > 15 || line > 15 {
            return None;
        }
        Some(Self(((area as u16) << 12) | ((line as u16) << 8) | member as u16))
    }

    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn area(self) -> u8 {
        (self.0 >> 12) as u8
    }

    pub const fn line(self) -> u8 {
        ((self.0 >> 8) & 0x0F) as u8
    }

    pub const fn member(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl FromStr for IndividualAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [area, line, member] = parse_three(s, '.', [15, 15, 255])?;
        Ok(Self((area << 12) | (line << 8) | member))
    }
}

impl fmt::Display for IndividualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.area(), self.line(), self.member())
    }
}
