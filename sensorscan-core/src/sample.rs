//! Sample slots and failure codes
//!
//! A slot is one 32-bit word per channel. It holds either a converter
//! reading (at most 16 bits wide) or one of four failure codes parked at the
//! top of the `u32` range, so the two can never collide whatever resolution
//! the converter runs at.

use sensorscan_hal::Resolution;

/// Channel id was out of range
pub const INVALID_CHANNEL: u32 = 0xFFFF_FFFF;
/// Channel configuration was rejected by the converter
pub const CONFIG_ERROR: u32 = 0xFFFF_FFFE;
/// Conversion could not be started
pub const START_ERROR: u32 = 0xFFFF_FFFD;
/// Conversion timed out (polled path) or the DMA transfer failed (scatter path)
pub const TIMEOUT_OR_DMA_ERROR: u32 = 0xFFFF_FFFC;

/// Lowest failure code
pub const SENTINEL_MIN: u32 = TIMEOUT_OR_DMA_ERROR;

const _: () = assert!(
    (Resolution::Bits16.max_value() as u32) < SENTINEL_MIN,
    "failure codes overlap the reading range"
);

/// Kind of failure recorded in a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleFault {
    InvalidChannel,
    Config,
    Start,
    TimeoutOrDma,
}

impl SampleFault {
    /// Code stored in the slot for this failure
    pub const fn code(self) -> u32 {
        match self {
            SampleFault::InvalidChannel => INVALID_CHANNEL,
            SampleFault::Config => CONFIG_ERROR,
            SampleFault::Start => START_ERROR,
            SampleFault::TimeoutOrDma => TIMEOUT_OR_DMA_ERROR,
        }
    }

    /// Short upper-case label used in diagnostics
    pub const fn label(self) -> &'static str {
        match self {
            SampleFault::InvalidChannel => "INVALID",
            SampleFault::Config => "CONFIG",
            SampleFault::Start => "START",
            SampleFault::TimeoutOrDma => "TIMEOUT",
        }
    }
}

/// Decoded contents of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleKind {
    /// A converter reading
    Reading(u16),
    /// A failure code
    Fault(SampleFault),
    /// Neither a reading nor a known failure code
    Unknown(u32),
}

/// One channel slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Sample(pub u32);

impl Sample {
    /// Slot holding a converter reading
    pub const fn reading(value: u16) -> Self {
        Self(value as u32)
    }

    /// Slot holding a failure code
    pub const fn fault(fault: SampleFault) -> Self {
        Self(fault.code())
    }

    /// Raw slot word
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Decode the slot
    pub fn kind(self) -> SampleKind {
        match self.0 {
            INVALID_CHANNEL => SampleKind::Fault(SampleFault::InvalidChannel),
            CONFIG_ERROR => SampleKind::Fault(SampleFault::Config),
            START_ERROR => SampleKind::Fault(SampleFault::Start),
            TIMEOUT_OR_DMA_ERROR => SampleKind::Fault(SampleFault::TimeoutOrDma),
            raw => match u16::try_from(raw) {
                Ok(value) => SampleKind::Reading(value),
                Err(_) => SampleKind::Unknown(raw),
            },
        }
    }

    /// The reading, if the slot holds one within `resolution`
    pub fn value(self, resolution: Resolution) -> Option<u16> {
        match self.kind() {
            SampleKind::Reading(v) if v <= resolution.max_value() => Some(v),
            _ => None,
        }
    }

    /// Check if the slot holds a failure code
    pub fn is_fault(self) -> bool {
        self.0 >= SENTINEL_MIN
    }
}
