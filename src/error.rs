//! Error types for the state monitor core.
//!
//! There are no fatal conditions in the core: every error here describes a
//! piece of configuration or a command that was rejected and skipped.  All
//! variants are `Copy` so they can be logged and dropped without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Address parsing errors
// ---------------------------------------------------------------------------

/// A KNX address string could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    /// Wrong number of `/` or `.` separated parts.
    WrongPartCount,
    /// A part is not a non-negative integer.
    NotANumber,
    /// A part does not fit its bit field (e.g. main group > 31).
    OutOfRange,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongPartCount => write!(f, "expected three address parts"),
            Self::NotANumber => write!(f, "address part is not a number"),
            Self::OutOfRange => write!(f, "address part out of range"),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration / command errors
// ---------------------------------------------------------------------------

/// A configuration or command field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// An `inputs[]` entry has no `index`.
    MissingIndex,
    /// The index is zero or beyond the discovered input count.
    InvalidIndex(u64),
    /// The field has the wrong JSON type (the `&'static str` names the expected one).
    WrongType(&'static str),
    /// A group or device address did not parse.
    BadAddress(AddressError),
    /// Not one of the seven input type names.
    UnknownInputType,
    /// A `knxValue` that is not `on`, `off`, `up` or `down`.
    UnknownValue,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIndex => write!(f, "missing index"),
            Self::InvalidIndex(i) => write!(f, "invalid index {}", i),
            Self::WrongType(expected) => write!(f, "expected {}", expected),
            Self::BadAddress(e) => write!(f, "bad address: {e}"),
            Self::UnknownInputType => write!(f, "invalid input type"),
            Self::UnknownValue => write!(f, "invalid value"),
        }
    }
}

impl From<AddressError> for ConfigError {
    fn from(e: AddressError) -> Self {
        Self::BadAddress(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias for field-level configuration handling.
pub type Result<T> = core::result::Result<T, ConfigError>;
