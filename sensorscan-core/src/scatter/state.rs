//! Scatter conversion state
//!
//! The state lives in a single atomic byte shared between the foreground and
//! the converter's interrupt handler.

use portable_atomic::{AtomicU8, Ordering};

/// Scatter conversion states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConversionState {
    /// Ready for a new conversion
    #[default]
    Idle = 0,
    /// Conversion in flight, buffer owned by the hardware
    Converting = 1,
    /// Conversion finished, buffer holds the results
    Complete = 2,
    /// Conversion failed or could not be started
    Error = 3,
}

impl ConversionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConversionState::Converting,
            2 => ConversionState::Complete,
            3 => ConversionState::Error,
            _ => ConversionState::Idle,
        }
    }

    /// Check if a new conversion may be started from this state
    pub fn accepts_start(self) -> bool {
        self != ConversionState::Converting
    }
}

/// Atomic state cell
///
/// Stores use release ordering and loads use acquire ordering, so a reader
/// that observes `Complete` also observes every buffer write published
/// before the completion store.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCell {
    /// Create a cell in `Idle`
    pub const fn new() -> Self {
        Self(AtomicU8::new(ConversionState::Idle as u8))
    }

    /// Current state
    pub fn load(&self) -> ConversionState {
        ConversionState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Overwrite the state
    pub fn store(&self, state: ConversionState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Move to `Converting` unless a conversion is already in flight
    ///
    /// Returns the state that was left, or `None` if the cell was already
    /// `Converting`.
    pub fn try_begin(&self) -> Option<ConversionState> {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            if !ConversionState::from_u8(current).accepts_start() {
                return None;
            }
            match self.0.compare_exchange_weak(
                current,
                ConversionState::Converting as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(previous) => return Some(ConversionState::from_u8(previous)),
                Err(actual) => current = actual,
            }
        }
    }
}
