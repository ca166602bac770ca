//! ADC peripheral abstractions
//!
//! Two conversion styles are modelled:
//!
//! - [`SingleChannelAdc`]: select one channel, start, poll until done, read.
//! - [`ScatterAdc`]: convert every configured channel in one triggered
//!   sequence, with the results written by DMA into a caller-owned buffer.
//!
//! Completion and error notifications for scatter conversions are not part of
//! the trait: the board's interrupt handler forwards them to the engine that
//! issued the start.

use portable_atomic::AtomicU32;

use crate::channel::ChannelDescriptor;

/// Failure status reported by an ADC operation
///
/// These are the non-OK outcomes of a vendor HAL call. Success is `Ok(..)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Generic peripheral failure
    Error,
    /// Peripheral busy with another operation
    Busy,
    /// Operation did not finish in time
    Timeout,
}

impl AdcError {
    /// Numeric status code as printed in diagnostics (0 is reserved for OK)
    pub fn code(self) -> u8 {
        match self {
            AdcError::Error => 1,
            AdcError::Busy => 2,
            AdcError::Timeout => 3,
        }
    }
}

/// Single-channel, polled ADC conversion
///
/// Implementations wrap one converter instance. Each call maps onto one
/// vendor HAL primitive; no call blocks longer than its own timeout.
pub trait SingleChannelAdc {
    /// Route the converter to the channel described by `descriptor`
    ///
    /// Applies the selector, rank, sample time and offset.
    fn configure_channel(&mut self, descriptor: &ChannelDescriptor) -> Result<(), AdcError>;

    /// Start a one-shot conversion on the configured channel
    fn start(&mut self) -> Result<(), AdcError>;

    /// Wait for the end-of-conversion flag
    ///
    /// # Arguments
    /// * `timeout_ms` - Maximum time to wait, in milliseconds
    fn poll_for_conversion(&mut self, timeout_ms: u32) -> Result<(), AdcError>;

    /// Read the converted value from the data register
    fn value(&mut self) -> u16;

    /// Stop the converter
    fn stop(&mut self) -> Result<(), AdcError>;
}

/// Triggered multi-channel conversion with DMA transfer
///
/// `N` is the number of channels in the scan sequence. The sequence itself
/// (which channels, in which rank) is configured during peripheral
/// initialization, outside this trait.
pub trait ScatterAdc<const N: usize> {
    /// Start one scan of all `N` channels
    ///
    /// The transfer writes one word per channel into `target`, in rank
    /// order. The buffer outlives the conversion; the caller does not read
    /// it until the completion notification has been delivered.
    fn start_scatter(&mut self, target: &[AtomicU32; N]) -> Result<(), AdcError>;

    /// Abort the scan and the DMA transfer
    ///
    /// After this returns no further completion or error notification may
    /// be delivered for the aborted scan.
    fn stop_scatter(&mut self) -> Result<(), AdcError>;
}
