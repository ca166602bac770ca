//! Text diagnostics
//!
//! Renders acquisition state into fixed-capacity strings for a debug UART or
//! RTT channel, e.g.
//!
//! ```text
//! CH0=2048 (0x0800) | Errors=0 | Status: Cfg=0 Start=0 Poll=0
//! CH2=TIMEOUT | Errors=1 | Status: Cfg=0 Start=0 Poll=3
//! ```
//!
//! Lines that would overflow their capacity are truncated.

use core::fmt::Write;

use heapless::String;
use sensorscan_hal::AdcError;

use crate::sample::{Sample, SampleKind};
use crate::scatter::ScatterStats;
use crate::tracker::{ErrorRecord, StageStatus};

/// Capacity of a single-channel line
pub const LINE_CAPACITY: usize = 128;

/// Capacity of a whole-sweep line
pub const SUMMARY_CAPACITY: usize = 320;

/// Numeric status code of a stage (0 = OK)
pub fn stage_code(status: Option<AdcError>) -> u8 {
    status.map_or(0, AdcError::code)
}

fn write_sample<W: Write>(out: &mut W, channel: u8, sample: Sample) -> core::fmt::Result {
    match sample.kind() {
        SampleKind::Reading(value) => write!(out, "CH{}={} (0x{:04X})", channel, value, value),
        SampleKind::Fault(fault) => write!(out, "CH{}={}", channel, fault.label()),
        SampleKind::Unknown(raw) => write!(out, "CH{}=? (0x{:08X})", channel, raw),
    }
}

/// One channel with the polled engine's failure state
pub fn channel_line(
    channel: u8,
    sample: Sample,
    errors: &ErrorRecord,
    stages: &StageStatus,
) -> String<LINE_CAPACITY> {
    let mut line = String::new();
    let _ = write_sample(&mut line, channel, sample);
    let _ = write!(
        line,
        " | Errors={} | Status: Cfg={} Start={} Poll={}",
        errors.total_errors,
        stage_code(stages.config),
        stage_code(stages.start),
        stage_code(stages.poll),
    );
    line
}

/// Every slot of a sweep, space separated
pub fn summary_line(samples: &[Sample]) -> String<SUMMARY_CAPACITY> {
    let mut line = String::new();
    for (id, sample) in samples.iter().enumerate() {
        if id > 0 {
            let _ = line.push(' ');
        }
        let _ = write_sample(&mut line, id as u8, *sample);
    }
    line
}

/// Scatter engine counters
pub fn stats_line(stats: ScatterStats) -> String<LINE_CAPACITY> {
    let mut line = String::new();
    let _ = write!(line, "Scatter: Starts={} Errors={}", stats.starts, stats.errors);
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcquireError;
    use crate::sample::SampleFault;

    #[test]
    fn test_healthy_channel_line() {
        let line = channel_line(
            0,
            Sample::reading(2048),
            &ErrorRecord::default(),
            &StageStatus::default(),
        );
        assert_eq!(
            line.as_str(),
            "CH0=2048 (0x0800) | Errors=0 | Status: Cfg=0 Start=0 Poll=0"
        );
    }

    #[test]
    fn test_fault_channel_line() {
        let errors = ErrorRecord {
            total_errors: 1,
            last_status: Some(AdcError::Timeout),
            last_error: Some(AcquireError::Timeout(AdcError::Timeout)),
            last_failed_channel: Some(2),
        };
        let stages = StageStatus {
            poll: Some(AdcError::Timeout),
            ..Default::default()
        };
        let line = channel_line(2, Sample::fault(SampleFault::TimeoutOrDma), &errors, &stages);
        assert_eq!(
            line.as_str(),
            "CH2=TIMEOUT | Errors=1 | Status: Cfg=0 Start=0 Poll=3"
        );
    }

    #[test]
    fn test_summary_line() {
        let samples = [
            Sample::reading(7),
            Sample::fault(SampleFault::Config),
            Sample(0x0012_3456),
        ];
        assert_eq!(
            summary_line(&samples).as_str(),
            "CH0=7 (0x0007) CH1=CONFIG CH2=? (0x00123456)"
        );
        assert_eq!(summary_line(&[]).as_str(), "");
    }

    #[test]
    fn test_summary_fits_full_table() {
        let samples = [Sample::fault(SampleFault::InvalidChannel); 16];
        let line = summary_line(&samples);
        assert!(line.ends_with("CH15=INVALID"));
    }

    #[test]
    fn test_stats_line() {
        let line = stats_line(ScatterStats { starts: 12, errors: 1 });
        assert_eq!(line.as_str(), "Scatter: Starts=12 Errors=1");
    }
}
