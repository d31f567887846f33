//! Tagged result of decoding a persisted slot.

use std::fmt;

/// Why a slot decoded to its default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The slot is absent or empty.
    Missing,
    /// The slot is not valid JSON.
    Malformed(String),
    /// The slot is JSON but not of the expected shape.
    WrongShape(String),
    /// The store itself could not be read.
    Unreadable(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Missing => f.write_str("missing"),
            FallbackReason::Malformed(detail) => write!(f, "malformed: {detail}"),
            FallbackReason::WrongShape(detail) => write!(f, "wrong shape: {detail}"),
            FallbackReason::Unreadable(detail) => write!(f, "unreadable: {detail}"),
        }
    }
}

/// Outcome of a fail-soft load: either the persisted value or the default that replaced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<T> {
    /// The slot held a valid value.
    Ok(T),
    /// The slot could not be used; `value` is the default.
    Fallback {
        /// Default value standing in for the slot.
        value: T,
        /// Why the persisted value was rejected.
        reason: FallbackReason,
    },
}

impl<T> Decoded<T> {
    /// Build a fallback outcome.
    pub fn fallback(value: T, reason: FallbackReason) -> Self {
        Decoded::Fallback { value, reason }
    }

    /// The usable value, whichever branch produced it.
    pub fn into_value(self) -> T {
        match self {
            Decoded::Ok(value) | Decoded::Fallback { value, .. } => value,
        }
    }

    /// Borrow the usable value.
    pub fn value(&self) -> &T {
        match self {
            Decoded::Ok(value) | Decoded::Fallback { value, .. } => value,
        }
    }

    /// Whether the default replaced the persisted value.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Decoded::Fallback { .. })
    }

    /// The fallback reason, if any.
    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            Decoded::Ok(_) => None,
            Decoded::Fallback { reason, .. } => Some(reason),
        }
    }
}
