//! Periodic scan driver
//!
//! Drives a [`ScatterEngine`] from a fixed-rate loop: starts a scan,
//! harvests the results once the completion interrupt has fired, and
//! aborts a scan that never settles.

use sensorscan_hal::{AdcError, ScatterAdc};

use super::engine::ScatterEngine;
use super::state::ConversionState;
use crate::error::AcquireError;
use crate::sample::Sample;
use crate::CHANNEL_COUNT;

/// Default time a scan may stay in flight
pub const DEFAULT_SCAN_TIMEOUT_MS: u32 = 50;

/// Outcome of one [`ScanCycle::update`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleEvent<const N: usize = CHANNEL_COUNT> {
    /// A new scan was triggered
    Started,
    /// Scan still in flight
    Waiting,
    /// Scan finished; one sample per channel
    Ready([Sample; N]),
    /// The converter reported a transfer error
    Failed,
    /// Scan did not settle in time and was aborted; carries the abort status
    TimedOut(Result<(), AdcError>),
    /// The engine refused to start
    StartFailed(AcquireError),
}

/// Scan driver state
#[derive(Debug, Clone)]
pub struct ScanCycle {
    timeout_ms: u32,
    elapsed_ms: u32,
    in_flight: bool,
    completed: u32,
    failed: u32,
    timed_out: u32,
}

impl Default for ScanCycle {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_TIMEOUT_MS)
    }
}

impl ScanCycle {
    /// Create a driver that aborts scans in flight longer than `timeout_ms`
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            elapsed_ms: 0,
            in_flight: false,
            completed: 0,
            failed: 0,
            timed_out: 0,
        }
    }

    /// Advance the driver
    ///
    /// Call periodically from the sampling loop.
    ///
    /// # Arguments
    /// * `engine` - Engine to drive
    /// * `delta_ms` - Time since the last call
    pub fn update<H, const N: usize>(
        &mut self,
        engine: &ScatterEngine<H, N>,
        delta_ms: u32,
    ) -> CycleEvent<N>
    where
        H: ScatterAdc<N>,
    {
        if !self.in_flight {
            return self.begin(engine);
        }

        match engine.state() {
            ConversionState::Complete => match engine.values() {
                Ok(values) => {
                    engine.reset();
                    self.finish();
                    self.completed = self.completed.wrapping_add(1);
                    CycleEvent::Ready(values)
                }
                // State moved between the check and the copy
                Err(_) => CycleEvent::Waiting,
            },
            ConversionState::Error => {
                engine.reset();
                self.finish();
                self.failed = self.failed.wrapping_add(1);
                CycleEvent::Failed
            }
            ConversionState::Converting => {
                self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
                if self.elapsed_ms <= self.timeout_ms {
                    return CycleEvent::Waiting;
                }

                #[cfg(feature = "defmt")]
                defmt::warn!("scan: no completion after {} ms, aborting", self.elapsed_ms);
                let abort = engine.stop();
                self.finish();
                self.timed_out = self.timed_out.wrapping_add(1);
                CycleEvent::TimedOut(abort)
            }
            // Someone else reset or stopped the engine
            ConversionState::Idle => self.begin(engine),
        }
    }

    fn begin<H, const N: usize>(&mut self, engine: &ScatterEngine<H, N>) -> CycleEvent<N>
    where
        H: ScatterAdc<N>,
    {
        self.elapsed_ms = 0;
        match engine.start() {
            Ok(()) => {
                self.in_flight = true;
                CycleEvent::Started
            }
            // Another caller's scan is in flight; not ours to count
            Err(AcquireError::Busy) => CycleEvent::StartFailed(AcquireError::Busy),
            Err(error) => {
                if engine.state() == ConversionState::Error {
                    engine.reset();
                }
                self.failed = self.failed.wrapping_add(1);
                CycleEvent::StartFailed(error)
            }
        }
    }

    fn finish(&mut self) {
        self.in_flight = false;
        self.elapsed_ms = 0;
    }

    /// Check if a scan is in flight
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Scans harvested successfully
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Scans that failed to start or reported an error
    pub fn failed(&self) -> u32 {
        self.failed
    }

    /// Scans aborted by the timeout
    pub fn timed_out(&self) -> u32 {
        self.timed_out
    }

    /// Scan timeout in ms
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}
