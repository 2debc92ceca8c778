//! Error types reported by `LinkedHashMap` and its cursors.

use core::fmt;

/// Why a cursor was rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CursorFault {
    /// The cursor was minted by a different map instance.
    ForeignMap,
    /// The entry the cursor denoted has been erased, or the map was cleared.
    Stale,
    /// Stepped forward from the end position.
    PastEnd,
    /// Stepped backward from the first entry.
    BeforeFirst,
    /// Read or erased at a sentinel position (the end cursor).
    Sentinel,
}

impl fmt::Display for CursorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CursorFault::ForeignMap => "cursor belongs to a different map",
            CursorFault::Stale => "cursor denotes an entry that no longer exists",
            CursorFault::PastEnd => "cannot advance past the end",
            CursorFault::BeforeFirst => "cannot retreat before the first entry",
            CursorFault::Sentinel => "cursor does not denote an entry",
        };
        f.write_str(msg)
    }
}

/// Misuse detected by a map operation. The operation that returns one of
/// these has not modified the map.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// `at`/`at_mut` on a key with no live entry.
    KeyNotFound,
    /// A cursor was moved out of bounds, read at a sentinel, or used with a
    /// map it does not belong to.
    InvalidCursor(CursorFault),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => f.write_str("key not found"),
            Error::InvalidCursor(fault) => write!(f, "invalid cursor: {fault}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<CursorFault> for Error {
    fn from(fault: CursorFault) -> Self {
        Error::InvalidCursor(fault)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
