//! Acquisition configuration
//!
//! Describes the converter resolution, the polled-path timeout and the
//! per-slot channel descriptors. The descriptor table used at runtime is
//! built from this once and never changes afterwards.

use heapless::Vec;
use sensorscan_hal::channel::MAX_RANK;
use sensorscan_hal::{AdcChannel, ChannelDescriptor, Resolution, SampleTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::CHANNEL_COUNT;

/// Maximum channel descriptors in a configuration
pub const MAX_CHANNELS: usize = 16;

/// Default end-of-conversion poll timeout
pub const DEFAULT_POLL_TIMEOUT_MS: u32 = 10;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Descriptor count does not match the engine's channel count
    ChannelCountMismatch { expected: usize, found: usize },
    /// Poll timeout of zero would fail every conversion
    ZeroTimeout,
    /// Rank outside 1..=16
    InvalidRank { slot: u8 },
    /// Two slots select the same physical input
    DuplicateSelector { slot: u8 },
    /// Binary configuration could not be decoded
    Deserialize,
}

/// Acquisition configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcquisitionConfig {
    /// Converter resolution
    pub resolution: Resolution,
    /// Polled-path end-of-conversion timeout in ms
    pub poll_timeout_ms: u32,
    /// One descriptor per logical slot, in slot order
    pub channels: Vec<ChannelDescriptor, MAX_CHANNELS>,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        let mut channels = Vec::new();
        for n in 0..CHANNEL_COUNT as u8 {
            let _ = channels.push(ChannelDescriptor::new(
                AdcChannel::new(n),
                SampleTime::Cycles15,
            ));
        }

        Self {
            resolution: Resolution::Bits12,
            poll_timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
            channels,
        }
    }
}

impl AcquisitionConfig {
    /// Check the configuration for values the hardware cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        for (slot, desc) in self.channels.iter().enumerate() {
            if desc.rank == 0 || desc.rank > MAX_RANK {
                return Err(ConfigError::InvalidRank { slot: slot as u8 });
            }

            let duplicate = self.channels[..slot]
                .iter()
                .any(|other| other.selector == desc.selector);
            if duplicate {
                return Err(ConfigError::DuplicateSelector { slot: slot as u8 });
            }
        }

        Ok(())
    }

    /// Largest valid reading under the configured resolution
    pub fn resolution_max(&self) -> u16 {
        self.resolution.max_value()
    }

    /// Decode and validate a postcard-encoded configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}
