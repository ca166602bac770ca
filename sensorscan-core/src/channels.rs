//! Channel descriptor table
//!
//! Maps logical slot ids `0..N` onto physical converter inputs. Built once
//! at startup, read-only afterwards.

use sensorscan_hal::{AdcChannel, ChannelDescriptor, SampleTime};

use crate::config::{AcquisitionConfig, ConfigError};
use crate::CHANNEL_COUNT;

/// Immutable per-slot hardware configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTable<const N: usize = CHANNEL_COUNT> {
    descriptors: [ChannelDescriptor; N],
}

impl<const N: usize> ChannelTable<N> {
    /// Slot `i` reads input `i` at rank 1
    ///
    /// Matches a board where the sensors sit on IN0..IN(N-1).
    pub const fn sequential(sample_time: SampleTime) -> Self {
        let mut descriptors = [ChannelDescriptor::new(AdcChannel::new(0), sample_time); N];
        let mut i = 0;
        while i < N {
            descriptors[i] = ChannelDescriptor::new(AdcChannel::new(i as u8), sample_time);
            i += 1;
        }
        Self { descriptors }
    }

    /// Build the table from explicit descriptors
    pub const fn from_descriptors(descriptors: [ChannelDescriptor; N]) -> Self {
        Self { descriptors }
    }

    /// Build the table from a validated configuration
    pub fn from_config(config: &AcquisitionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        if config.channels.len() != N {
            return Err(ConfigError::ChannelCountMismatch {
                expected: N,
                found: config.channels.len(),
            });
        }

        Ok(Self {
            descriptors: core::array::from_fn(|i| config.channels[i]),
        })
    }

    /// Descriptor for slot `id`
    pub fn get(&self, id: usize) -> Option<&ChannelDescriptor> {
        self.descriptors.get(id)
    }

    /// Number of slots
    pub const fn len(&self) -> usize {
        N
    }

    /// Check if the table has no slots
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Iterate descriptors in slot order
    pub fn iter(&self) -> impl Iterator<Item = &ChannelDescriptor> {
        self.descriptors.iter()
    }
}

impl Default for ChannelTable<CHANNEL_COUNT> {
    fn default() -> Self {
        Self::sequential(SampleTime::Cycles15)
    }
}
