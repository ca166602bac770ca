//! Error tracking for the polled acquisition path
//!
//! Each engine owns its tracker and is the only writer, so a failure is
//! recorded in one step without any locking.

use sensorscan_hal::AdcError;

use crate::error::AcquireError;

/// Snapshot of the failure counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ErrorRecord {
    /// Failures since the last reset
    pub total_errors: u32,
    /// Hardware status of the most recent failure
    pub last_status: Option<AdcError>,
    /// Classification of the most recent failure
    pub last_error: Option<AcquireError>,
    /// Channel of the most recent failure
    ///
    /// `None` when nothing failed since the last reset, or when the failure
    /// was not tied to a channel.
    pub last_failed_channel: Option<u8>,
}

/// Outcome of the last executed stage of a polled conversion
///
/// `None` means the stage succeeded (or was not reached yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StageStatus {
    pub config: Option<AdcError>,
    pub start: Option<AdcError>,
    pub poll: Option<AdcError>,
}

/// Stage of a polled conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    Config,
    Start,
    Poll,
}

/// Failure tracker
#[derive(Debug, Clone, Default)]
pub struct ErrorTracker {
    record: ErrorRecord,
    stages: StageStatus,
}

impl ErrorTracker {
    /// Create an empty tracker
    pub const fn new() -> Self {
        Self {
            record: ErrorRecord {
                total_errors: 0,
                last_status: None,
                last_error: None,
                last_failed_channel: None,
            },
            stages: StageStatus {
                config: None,
                start: None,
                poll: None,
            },
        }
    }

    /// Record one failure
    pub fn record(&mut self, error: AcquireError, channel: Option<u8>) {
        self.record.total_errors = self.record.total_errors.saturating_add(1);
        self.record.last_status = error.status();
        self.record.last_error = Some(error);
        self.record.last_failed_channel = channel;
    }

    /// Store the outcome of one conversion stage
    pub fn set_stage(&mut self, stage: Stage, outcome: Result<(), AdcError>) {
        let slot = match stage {
            Stage::Config => &mut self.stages.config,
            Stage::Start => &mut self.stages.start,
            Stage::Poll => &mut self.stages.poll,
        };
        *slot = outcome.err();
    }

    /// Total failures since the last reset
    pub fn count(&self) -> u32 {
        self.record.total_errors
    }

    /// Copy of the failure record
    pub fn snapshot(&self) -> ErrorRecord {
        self.record
    }

    /// Per-stage outcome of the most recent conversion
    pub fn stages(&self) -> StageStatus {
        self.stages
    }

    /// Zero the counter and forget the last failure
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
