//! Acquisition failure taxonomy

use sensorscan_hal::AdcError;

use crate::sample::SampleFault;

/// Errors reported by the acquisition engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquireError {
    /// Channel id is not below the channel count
    InvalidChannel,
    /// Converter rejected the channel configuration
    Config(AdcError),
    /// Conversion could not be started
    Start(AdcError),
    /// End of conversion was not seen within the poll timeout
    Timeout(AdcError),
    /// Scatter conversion ended with a DMA/converter fault
    Dma,
    /// A scatter conversion is already in flight
    Busy,
    /// No completed scatter conversion to read from
    NotComplete,
    /// Destination buffer missing or too small
    InvalidArgument,
}

impl AcquireError {
    /// Failure code this error leaves in a sample slot, if any
    pub fn sentinel(self) -> Option<SampleFault> {
        match self {
            AcquireError::InvalidChannel => Some(SampleFault::InvalidChannel),
            AcquireError::Config(_) => Some(SampleFault::Config),
            AcquireError::Start(_) => Some(SampleFault::Start),
            AcquireError::Timeout(_) | AcquireError::Dma => Some(SampleFault::TimeoutOrDma),
            AcquireError::Busy | AcquireError::NotComplete | AcquireError::InvalidArgument => None,
        }
    }

    /// Hardware status carried by this error, if any
    pub fn status(self) -> Option<AdcError> {
        match self {
            AcquireError::Config(s) | AcquireError::Start(s) | AcquireError::Timeout(s) => Some(s),
            AcquireError::InvalidChannel => Some(AdcError::Error),
            _ => None,
        }
    }
}
