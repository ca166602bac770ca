//! Scatter acquisition engine
//!
//! One triggered scan converts every channel; DMA moves the results into the
//! engine's buffer and the converter interrupt reports completion or failure.
//!
//! # State machine
//!
//! ```text
//!            start() ok               on_conversion_complete()
//!   Idle ───────────────► Converting ─────────────────────────► Complete
//!    ▲                        │                                    │
//!    │                        │ on_conversion_error()              │
//!    │                        ▼                                    │
//!    │                      Error ◄── start() hardware failure     │
//!    │                        │                                    │
//!    └──── reset() / stop() ──┴────────────────────────────────────┘
//! ```
//!
//! `start()` is accepted from `Idle`, `Complete` and `Error`, never from
//! `Converting`.
//!
//! # Interrupt wiring
//!
//! The engine is `const`-constructible so it can live in a `static`. The
//! board's ADC/DMA interrupt handler forwards the two notifications:
//!
//! ```ignore
//! static SCATTER: ScatterEngine<BoardScatterAdc> = ScatterEngine::new(BoardScatterAdc::new());
//!
//! fn dma_transfer_complete_irq() {
//!     SCATTER.on_conversion_complete();
//! }
//!
//! fn adc_error_irq() {
//!     SCATTER.on_conversion_error();
//! }
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, AtomicU32, Ordering};
use sensorscan_hal::{AdcError, ScatterAdc};

use super::state::{ConversionState, StateCell};
use crate::error::AcquireError;
use crate::sample::Sample;
use crate::CHANNEL_COUNT;

/// Scatter start/error counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScatterStats {
    /// Conversions the hardware accepted
    pub starts: u32,
    /// Failed starts plus error notifications
    pub errors: u32,
}

/// Interrupt-driven multi-channel acquisition engine
pub struct ScatterEngine<H, const N: usize = CHANNEL_COUNT> {
    state: StateCell,
    /// DMA target; written by hardware only while `Converting`
    buffer: [AtomicU32; N],
    hw: Mutex<CriticalSectionRawMutex, RefCell<H>>,
    /// Error notification arrived while the hardware handle was borrowed
    abort_pending: AtomicBool,
    starts: AtomicU32,
    errors: AtomicU32,
    settled: Signal<CriticalSectionRawMutex, ConversionState>,
}

impl<H, const N: usize> ScatterEngine<H, N> {
    /// Create an idle engine around the scan converter
    pub const fn new(hw: H) -> Self {
        Self {
            state: StateCell::new(),
            buffer: [const { AtomicU32::new(0) }; N],
            hw: Mutex::new(RefCell::new(hw)),
            abort_pending: AtomicBool::new(false),
            starts: AtomicU32::new(0),
            errors: AtomicU32::new(0),
            settled: Signal::new(),
        }
    }
}

impl<H: ScatterAdc<N>, const N: usize> ScatterEngine<H, N> {
    /// Start a scan of all channels
    ///
    /// Returns `Busy` without side effects while a conversion is in flight.
    /// The state becomes `Converting` before the hardware is touched, since
    /// the completion interrupt may fire before the start call returns.
    pub fn start(&self) -> Result<(), AcquireError> {
        if self.state.try_begin().is_none() {
            #[cfg(feature = "defmt")]
            defmt::debug!("scatter: start rejected, conversion in flight");
            return Err(AcquireError::Busy);
        }
        self.settled.reset();
        self.abort_pending.store(false, Ordering::Relaxed);

        let outcome = self.with_hardware(|hw| hw.start_scatter(&self.buffer));

        match outcome {
            Ok(()) => {
                self.starts.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(status) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("scatter: hardware start failed: {}", status);
                self.state.store(ConversionState::Error);
                self.errors.fetch_add(1, Ordering::Relaxed);
                Err(AcquireError::Start(status))
            }
        }
    }

    /// Completion notification, called from interrupt context
    ///
    /// The buffer is valid from this point until the next start.
    pub fn on_conversion_complete(&self) {
        self.state.store(ConversionState::Complete);
        self.settled.signal(ConversionState::Complete);
    }

    /// Error notification, called from interrupt context
    ///
    /// Aborts the transfer so no further notifications arrive for this scan.
    /// If the notification is delivered while foreground code holds the
    /// hardware handle, the abort runs as soon as that code releases it.
    pub fn on_conversion_error(&self) {
        self.state.store(ConversionState::Error);
        self.errors.fetch_add(1, Ordering::Relaxed);
        self.hw.lock(|hw| match hw.try_borrow_mut() {
            Ok(mut hw) => {
                let _ = hw.stop_scatter();
            }
            Err(_) => self.abort_pending.store(true, Ordering::Relaxed),
        });
        self.settled.signal(ConversionState::Error);
    }

    /// Abort any conversion and return to `Idle`
    ///
    /// The state is forced to `Idle` whatever the abort reports, so the
    /// machine can never stay stuck in `Converting` or `Error`.
    pub fn stop(&self) -> Result<(), AdcError> {
        let status = self.with_hardware(|hw| hw.stop_scatter());
        self.state.store(ConversionState::Idle);
        self.settled.reset();

        if let Err(_e) = status {
            #[cfg(feature = "defmt")]
            defmt::warn!("scatter: abort failed: {}, state forced to Idle", _e);
        }

        status
    }

    /// Reclaim the hardware handle for board-level work
    ///
    /// Error notifications delivered while `f` runs abort the transfer once
    /// `f` returns.
    pub fn with_hardware<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        self.hw.lock(|cell| {
            let mut hw = cell.borrow_mut();
            let result = f(&mut hw);
            if self.abort_pending.swap(false, Ordering::Relaxed) {
                let _ = hw.stop_scatter();
            }
            result
        })
    }
}

impl<H, const N: usize> ScatterEngine<H, N> {
    /// Current conversion state
    pub fn state(&self) -> ConversionState {
        self.state.load()
    }

    /// Check if results are ready to read
    pub fn is_complete(&self) -> bool {
        self.state() == ConversionState::Complete
    }

    /// Result for one channel of the last completed scan
    pub fn read(&self, channel_id: u8) -> Result<Sample, AcquireError> {
        let slot = self
            .buffer
            .get(channel_id as usize)
            .ok_or(AcquireError::InvalidChannel)?;

        match self.state() {
            ConversionState::Complete => Ok(Sample(slot.load(Ordering::Relaxed))),
            ConversionState::Error => Err(AcquireError::Dma),
            ConversionState::Idle | ConversionState::Converting => Err(AcquireError::NotComplete),
        }
    }

    /// Copy every channel of the last completed scan into `dest`
    ///
    /// `dest` must hold at least `N` samples.
    pub fn read_all(&self, dest: &mut [Sample]) -> Result<(), AcquireError> {
        if dest.len() < N {
            return Err(AcquireError::InvalidArgument);
        }
        if !self.is_complete() {
            return Err(AcquireError::Busy);
        }

        for (out, slot) in dest.iter_mut().zip(self.buffer.iter()) {
            *out = Sample(slot.load(Ordering::Relaxed));
        }
        Ok(())
    }

    /// Every channel of the last completed scan
    pub fn values(&self) -> Result<[Sample; N], AcquireError> {
        let mut values = [Sample::default(); N];
        self.read_all(&mut values)?;
        Ok(values)
    }

    /// Return to `Idle` from any state
    ///
    /// Used after consuming `Complete` or `Error` results.
    pub fn reset(&self) {
        self.state.store(ConversionState::Idle);
        self.settled.reset();
    }

    /// Wait for the next completion or error notification
    ///
    /// Has no timeout of its own.
    pub async fn settled(&self) -> ConversionState {
        self.settled.wait().await
    }

    /// Snapshot of the start/error counters
    pub fn stats(&self) -> ScatterStats {
        ScatterStats {
            starts: self.starts.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    /// Zero the start/error counters
    pub fn reset_stats(&self) {
        self.starts.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
    }
}
