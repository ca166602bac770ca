//! Interrupt-driven scatter acquisition
//!
//! - [`ScatterEngine`]: single scan of every channel into a DMA buffer
//! - [`ScanCycle`]: periodic driver with a settle timeout
//! - [`ConversionState`]: state shared with the interrupt handler

pub mod cycle;
pub mod engine;
pub mod state;

pub use cycle::{CycleEvent, ScanCycle, DEFAULT_SCAN_TIMEOUT_MS};
pub use engine::{ScatterEngine, ScatterStats};
pub use state::{ConversionState, StateCell};
