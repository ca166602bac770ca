//! Scriptable converters for unit tests

use heapless::Vec;
use portable_atomic::{AtomicU32, Ordering};
use sensorscan_hal::{AdcChannel, AdcError, ChannelDescriptor, ScatterAdc, SingleChannelAdc};

/// Polled converter that returns `readings[selector]`
///
/// Each stage result applies to every channel, or only to `fail_selector`
/// when that is set.
pub struct MockAdc {
    pub readings: [u16; 16],
    pub config_result: Result<(), AdcError>,
    pub start_result: Result<(), AdcError>,
    pub poll_result: Result<(), AdcError>,
    pub fail_selector: Option<AdcChannel>,
    pub configured: Vec<AdcChannel, 32>,
    pub last_timeout_ms: Option<u32>,
    pub stops: u32,
    selected: Option<AdcChannel>,
}

impl MockAdc {
    pub const fn new() -> Self {
        let mut readings = [0u16; 16];
        let mut i = 0;
        while i < readings.len() {
            readings[i] = 100 * i as u16 + 7;
            i += 1;
        }

        Self {
            readings,
            config_result: Ok(()),
            start_result: Ok(()),
            poll_result: Ok(()),
            fail_selector: None,
            configured: Vec::new(),
            last_timeout_ms: None,
            stops: 0,
            selected: None,
        }
    }

    fn applies(&self) -> bool {
        match self.fail_selector {
            Some(sel) => self.selected == Some(sel),
            None => true,
        }
    }

    fn outcome(&self, result: Result<(), AdcError>) -> Result<(), AdcError> {
        if self.applies() {
            result
        } else {
            Ok(())
        }
    }
}

impl SingleChannelAdc for MockAdc {
    fn configure_channel(&mut self, descriptor: &ChannelDescriptor) -> Result<(), AdcError> {
        self.selected = Some(descriptor.selector);
        let _ = self.configured.push(descriptor.selector);
        self.outcome(self.config_result)
    }

    fn start(&mut self) -> Result<(), AdcError> {
        self.outcome(self.start_result)
    }

    fn poll_for_conversion(&mut self, timeout_ms: u32) -> Result<(), AdcError> {
        self.last_timeout_ms = Some(timeout_ms);
        self.outcome(self.poll_result)
    }

    fn value(&mut self) -> u16 {
        let idx = self.selected.map(|s| s.number() as usize).unwrap_or(0);
        self.readings[idx]
    }

    fn stop(&mut self) -> Result<(), AdcError> {
        self.stops += 1;
        Ok(())
    }
}

/// Scan converter that "transfers" `values` into the target on start
///
/// `on_start` runs inside `start_scatter` after the transfer, standing in
/// for an interrupt that fires before the start call returns.
pub struct MockScatter<const N: usize> {
    pub values: [u32; N],
    pub start_result: Result<(), AdcError>,
    pub stop_result: Result<(), AdcError>,
    pub transfer_on_start: bool,
    pub on_start: Option<fn()>,
    pub starts: u32,
    pub stops: u32,
}

impl<const N: usize> MockScatter<N> {
    pub fn new(values: [u32; N]) -> Self {
        Self {
            values,
            start_result: Ok(()),
            stop_result: Ok(()),
            transfer_on_start: true,
            on_start: None,
            starts: 0,
            stops: 0,
        }
    }
}

impl<const N: usize> ScatterAdc<N> for MockScatter<N> {
    fn start_scatter(&mut self, target: &[AtomicU32; N]) -> Result<(), AdcError> {
        self.starts += 1;
        self.start_result?;
        if self.transfer_on_start {
            for (slot, value) in target.iter().zip(self.values.iter()) {
                slot.store(*value, Ordering::Relaxed);
            }
        }
        if let Some(hook) = self.on_start {
            hook();
        }
        Ok(())
    }

    fn stop_scatter(&mut self) -> Result<(), AdcError> {
        self.stops += 1;
        self.stop_result
    }
}
