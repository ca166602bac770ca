//! Blocking (polled) acquisition engine
//!
//! Converts one channel at a time: configure, start, poll for end of
//! conversion, read, stop. Every failure is classified at the stage where it
//! happens, parked in the channel's slot as a failure code and counted, and
//! the engine moves on. Nothing here escalates.
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = BlockingEngine::from_config(adc, &AcquisitionConfig::default())?;
//!
//! // In the sampling loop:
//! engine.acquire_all(6);
//! if engine.error_count() > 0 {
//!     let errors = engine.errors();
//!     engine.reset_errors();
//! }
//! let readings = engine.samples();
//! ```

use sensorscan_hal::{ChannelDescriptor, Resolution, SingleChannelAdc};

use crate::channels::ChannelTable;
use crate::config::{AcquisitionConfig, ConfigError};
use crate::error::AcquireError;
use crate::sample::Sample;
use crate::tracker::{ErrorRecord, ErrorTracker, Stage, StageStatus};
use crate::CHANNEL_COUNT;

/// Polled single-channel acquisition engine
///
/// Every acquisition borrows the engine mutably for its whole duration, so
/// two contexts can never drive it at the same time.
pub struct BlockingEngine<A, const N: usize = CHANNEL_COUNT> {
    adc: A,
    table: ChannelTable<N>,
    resolution: Resolution,
    poll_timeout_ms: u32,
    slots: [Sample; N],
    tracker: ErrorTracker,
}

impl<A: SingleChannelAdc, const N: usize> BlockingEngine<A, N> {
    /// Create an engine over an already built descriptor table
    pub const fn new(
        adc: A,
        table: ChannelTable<N>,
        resolution: Resolution,
        poll_timeout_ms: u32,
    ) -> Self {
        Self {
            adc,
            table,
            resolution,
            poll_timeout_ms,
            slots: [Sample::reading(0); N],
            tracker: ErrorTracker::new(),
        }
    }

    /// Create an engine from a configuration
    pub fn from_config(adc: A, config: &AcquisitionConfig) -> Result<Self, ConfigError> {
        let table = ChannelTable::from_config(config)?;
        Ok(Self::new(adc, table, config.resolution, config.poll_timeout_ms))
    }

    /// Convert one channel and store the result in its slot
    ///
    /// Out-of-range ids are counted as a failure but leave every slot
    /// untouched. Any other failure leaves the matching failure code in
    /// the slot.
    pub fn acquire(&mut self, channel_id: u8) -> Result<u16, AcquireError> {
        let slot = channel_id as usize;
        let Some(descriptor) = self.table.get(slot).copied() else {
            #[cfg(feature = "defmt")]
            defmt::warn!("acquire: channel {} out of range (count {})", channel_id, N);
            self.tracker.record(AcquireError::InvalidChannel, Some(channel_id));
            return Err(AcquireError::InvalidChannel);
        };

        match self.convert(&descriptor) {
            Ok(value) => {
                self.slots[slot] = Sample::reading(value);
                Ok(value)
            }
            Err(error) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("acquire: channel {} failed: {}", channel_id, error);
                if let Some(fault) = error.sentinel() {
                    self.slots[slot] = Sample::fault(fault);
                }
                self.tracker.record(error, Some(channel_id));
                Err(error)
            }
        }
    }

    /// Convert channels `0..count` in order
    ///
    /// `count` is clamped to the channel count. A failing channel does not
    /// stop the sweep. Returns the number of channels that failed.
    pub fn acquire_all(&mut self, count: u8) -> usize {
        let count = (count as usize).min(N);
        (0..count)
            .filter(|&id| self.acquire(id as u8).is_err())
            .count()
    }

    fn convert(&mut self, descriptor: &ChannelDescriptor) -> Result<u16, AcquireError> {
        let outcome = self.adc.configure_channel(descriptor);
        self.tracker.set_stage(Stage::Config, outcome);
        outcome.map_err(AcquireError::Config)?;

        let outcome = self.adc.start();
        self.tracker.set_stage(Stage::Start, outcome);
        outcome.map_err(AcquireError::Start)?;

        let outcome = self.adc.poll_for_conversion(self.poll_timeout_ms);
        self.tracker.set_stage(Stage::Poll, outcome);
        if let Err(status) = outcome {
            self.stop_converter();
            return Err(AcquireError::Timeout(status));
        }

        let value = self.adc.value();
        self.stop_converter();
        Ok(value)
    }

    fn stop_converter(&mut self) {
        // The reading (or failure) is already decided at this point
        if let Err(_status) = self.adc.stop() {
            #[cfg(feature = "defmt")]
            defmt::debug!("acquire: converter stop failed: {}", _status);
        }
    }

    /// Slot contents for `channel_id`
    pub fn sample(&self, channel_id: u8) -> Result<Sample, AcquireError> {
        self.slots
            .get(channel_id as usize)
            .copied()
            .ok_or(AcquireError::InvalidChannel)
    }

    /// All slots in channel order
    pub fn samples(&self) -> &[Sample; N] {
        &self.slots
    }

    /// Failures since the last reset
    pub fn error_count(&self) -> u32 {
        self.tracker.count()
    }

    /// Failure counters and last-failure details
    pub fn errors(&self) -> ErrorRecord {
        self.tracker.snapshot()
    }

    /// Outcome of each stage of the most recent conversion
    pub fn stage_status(&self) -> StageStatus {
        self.tracker.stages()
    }

    /// Zero the failure counter and forget the last failure
    pub fn reset_errors(&mut self) {
        self.tracker.reset();
    }

    /// Descriptor table
    pub fn descriptors(&self) -> &ChannelTable<N> {
        &self.table
    }

    /// Converter resolution
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// End-of-conversion poll timeout in ms
    pub fn poll_timeout_ms(&self) -> u32 {
        self.poll_timeout_ms
    }

    /// Give the converter back
    pub fn release(self) -> A {
        self.adc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockAdc;
    use sensorscan_hal::AdcError;
    use crate::sample::{SampleFault, SampleKind, CONFIG_ERROR, START_ERROR, TIMEOUT_OR_DMA_ERROR};
    use sensorscan_hal::{AdcChannel, SampleTime};

    fn make_engine(adc: MockAdc) -> BlockingEngine<MockAdc> {
        BlockingEngine::from_config(adc, &AcquisitionConfig::default()).unwrap()
    }

    #[test]
    fn test_acquire_all_success() {
        let mut engine = make_engine(MockAdc::new());

        let failed = engine.acquire_all(6);
        assert_eq!(failed, 0);
        assert_eq!(engine.error_count(), 0);

        for (id, slot) in engine.samples().iter().enumerate() {
            let value = slot.value(Resolution::Bits12).unwrap();
            assert!(value <= 4095);
            assert_eq!(value, 100 * id as u16 + 7);
        }
        assert_eq!(engine.release().stops, 6);
    }

    #[test]
    fn test_const_construction() {
        const ENGINE: BlockingEngine<MockAdc> = BlockingEngine::new(
            MockAdc::new(),
            ChannelTable::sequential(SampleTime::Cycles15),
            Resolution::Bits12,
            10,
        );

        let mut engine = ENGINE;
        assert_eq!(*engine.samples(), [Sample::reading(0); 6]);
        assert_eq!(engine.acquire(4), Ok(407));
        assert_eq!(engine.poll_timeout_ms(), 10);
    }

    #[test]
    fn test_acquire_uses_configured_timeout() {
        let config = AcquisitionConfig {
            poll_timeout_ms: 100,
            ..Default::default()
        };
        let mut engine = BlockingEngine::<_, 6>::from_config(MockAdc::new(), &config).unwrap();
        engine.acquire(0).unwrap();
        assert_eq!(engine.release().last_timeout_ms, Some(100));
    }

    #[test]
    fn test_invalid_channel_touches_no_slot() {
        let mut engine = make_engine(MockAdc::new());
        engine.acquire_all(6);
        let before = *engine.samples();

        for id in [6u8, 7, 200, 255] {
            assert_eq!(engine.acquire(id), Err(AcquireError::InvalidChannel));
            assert_eq!(engine.sample(id), Err(AcquireError::InvalidChannel));
        }

        assert_eq!(*engine.samples(), before);
        let rec = engine.errors();
        assert_eq!(rec.total_errors, 4);
        assert_eq!(rec.last_failed_channel, Some(255));
        assert_eq!(rec.last_status, Some(AdcError::Error));
        // No converter access for rejected ids
        assert_eq!(engine.release().configured.len(), 6);
    }

    #[test]
    fn test_config_failure_sentinel() {
        let mut adc = MockAdc::new();
        adc.config_result = Err(AdcError::Error);
        let mut engine = make_engine(adc);

        assert_eq!(engine.acquire(2), Err(AcquireError::Config(AdcError::Error)));
        assert_eq!(engine.sample(2).unwrap().raw(), CONFIG_ERROR);
        assert_eq!(engine.error_count(), 1);
        assert_eq!(engine.stage_status().config, Some(AdcError::Error));
        // Converter never started, so nothing to stop
        assert_eq!(engine.release().stops, 0);
    }

    #[test]
    fn test_start_failure_sentinel() {
        let mut adc = MockAdc::new();
        adc.start_result = Err(AdcError::Busy);
        let mut engine = make_engine(adc);

        assert_eq!(engine.acquire(0), Err(AcquireError::Start(AdcError::Busy)));
        assert_eq!(engine.sample(0).unwrap().raw(), START_ERROR);
        assert_eq!(engine.error_count(), 1);

        let rec = engine.errors();
        assert_eq!(rec.last_status, Some(AdcError::Busy));
        assert_eq!(rec.last_failed_channel, Some(0));
    }

    #[test]
    fn test_timeout_stops_converter() {
        let mut adc = MockAdc::new();
        adc.poll_result = Err(AdcError::Timeout);
        let mut engine = make_engine(adc);

        assert_eq!(
            engine.acquire(5),
            Err(AcquireError::Timeout(AdcError::Timeout))
        );
        assert_eq!(engine.sample(5).unwrap().raw(), TIMEOUT_OR_DMA_ERROR);
        assert_eq!(
            engine.sample(5).unwrap().kind(),
            SampleKind::Fault(SampleFault::TimeoutOrDma)
        );
        assert_eq!(engine.error_count(), 1);
        assert_eq!(engine.stage_status().poll, Some(AdcError::Timeout));
        assert_eq!(engine.release().stops, 1);
    }

    #[test]
    fn test_failure_does_not_abort_sweep() {
        let mut adc = MockAdc::new();
        adc.poll_result = Err(AdcError::Timeout);
        adc.fail_selector = Some(AdcChannel::new(3));
        let mut engine = make_engine(adc);

        assert_eq!(engine.acquire_all(6), 1);
        assert_eq!(engine.error_count(), 1);
        assert_eq!(engine.errors().last_failed_channel, Some(3));

        for (id, slot) in engine.samples().iter().enumerate() {
            if id == 3 {
                assert!(slot.is_fault());
            } else {
                assert_eq!(slot.value(Resolution::Bits12), Some(100 * id as u16 + 7));
            }
        }
    }

    #[test]
    fn test_acquire_all_clamps_count() {
        let mut engine = make_engine(MockAdc::new());
        assert_eq!(engine.acquire_all(200), 0);
        assert_eq!(engine.error_count(), 0);
        assert_eq!(engine.release().configured.len(), 6);
    }

    #[test]
    fn test_recovered_channel_overwrites_sentinel() {
        let mut adc = MockAdc::new();
        adc.start_result = Err(AdcError::Error);
        let mut engine = make_engine(adc);
        engine.acquire(1).unwrap_err();
        assert!(engine.sample(1).unwrap().is_fault());

        let mut adc = engine.release();
        adc.start_result = Ok(());
        let mut engine = make_engine(adc);
        assert_eq!(engine.acquire(1), Ok(107));
        assert_eq!(engine.sample(1).unwrap(), Sample::reading(107));
    }

    #[test]
    fn test_reset_errors() {
        let mut adc = MockAdc::new();
        adc.config_result = Err(AdcError::Error);
        let mut engine = make_engine(adc);
        engine.acquire_all(6);
        assert_eq!(engine.error_count(), 6);

        engine.reset_errors();
        assert_eq!(engine.error_count(), 0);
        assert_eq!(engine.errors().last_failed_channel, None);
        assert_eq!(engine.stage_status(), StageStatus::default());
    }
}
