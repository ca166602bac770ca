//! Channel selection and sampling configuration
//!
//! Plain data types describing how one logical sensor slot maps onto the
//! converter. They are consumed by [`SingleChannelAdc::configure_channel`]
//! and built once at startup.
//!
//! [`SingleChannelAdc::configure_channel`]: crate::adc::SingleChannelAdc::configure_channel

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest external input selector on the converter (IN0..IN15)
pub const MAX_EXTERNAL_CHANNEL: u8 = 15;

/// Highest regular sequence rank
pub const MAX_RANK: u8 = 16;

/// Physical ADC input selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdcChannel(pub u8);

impl AdcChannel {
    /// Create a selector for input `n`
    pub const fn new(n: u8) -> Self {
        Self(n)
    }

    /// Raw selector number
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Check if this selects an external input pin
    pub const fn is_external(self) -> bool {
        self.0 <= MAX_EXTERNAL_CHANNEL
    }
}

/// Sample-and-hold time in ADC clock cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SampleTime {
    Cycles3,
    #[default]
    Cycles15,
    Cycles28,
    Cycles56,
    Cycles84,
    Cycles112,
    Cycles144,
    Cycles480,
}

impl SampleTime {
    /// Number of ADC clock cycles the input is sampled for
    pub const fn cycles(self) -> u16 {
        match self {
            SampleTime::Cycles3 => 3,
            SampleTime::Cycles15 => 15,
            SampleTime::Cycles28 => 28,
            SampleTime::Cycles56 => 56,
            SampleTime::Cycles84 => 84,
            SampleTime::Cycles112 => 112,
            SampleTime::Cycles144 => 144,
            SampleTime::Cycles480 => 480,
        }
    }
}

/// Converter resolution
///
/// Readings never exceed 16 bits, which is what keeps the failure codes
/// stored alongside them out of the reading range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Resolution {
    Bits6,
    Bits8,
    Bits10,
    #[default]
    Bits12,
    Bits14,
    Bits16,
}

impl Resolution {
    /// Width of a reading in bits
    pub const fn bits(self) -> u8 {
        match self {
            Resolution::Bits6 => 6,
            Resolution::Bits8 => 8,
            Resolution::Bits10 => 10,
            Resolution::Bits12 => 12,
            Resolution::Bits14 => 14,
            Resolution::Bits16 => 16,
        }
    }

    /// Largest valid reading (e.g. 4095 for 12-bit)
    pub const fn max_value(self) -> u16 {
        ((1u32 << self.bits()) - 1) as u16
    }
}

/// Hardware configuration of one logical channel
///
/// Immutable once the descriptor table has been built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelDescriptor {
    /// Physical input selector
    pub selector: AdcChannel,
    /// Sample-and-hold time
    pub sample_time: SampleTime,
    /// Rank in the regular sequence (1-based)
    pub rank: u8,
    /// Offset subtracted by the converter
    pub offset: u16,
}

impl ChannelDescriptor {
    /// Descriptor for a single-conversion read of `selector` (rank 1, no offset)
    pub const fn new(selector: AdcChannel, sample_time: SampleTime) -> Self {
        Self {
            selector,
            sample_time,
            rank: 1,
            offset: 0,
        }
    }

    /// Same descriptor at a different sequence rank
    pub const fn with_rank(self, rank: u8) -> Self {
        Self { rank, ..self }
    }
}
