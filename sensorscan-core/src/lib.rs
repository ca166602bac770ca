//! Board-agnostic analog acquisition logic
//!
//! This crate contains the acquisition engines and everything they share,
//! independent of any specific converter:
//!
//! - Sample slots and failure codes
//! - Channel descriptor table and configuration
//! - Polled single-channel engine with error tracking
//! - Interrupt-driven scatter engine and its periodic driver
//! - Text diagnostics

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod blocking;
pub mod channels;
pub mod config;
pub mod error;
pub mod report;
pub mod sample;
pub mod scatter;
pub mod tracker;

#[cfg(test)]
mod mock;

/// Number of analog channels on the board
pub const CHANNEL_COUNT: usize = 6;

pub use blocking::BlockingEngine;
pub use channels::ChannelTable;
pub use config::{AcquisitionConfig, ConfigError};
pub use error::AcquireError;
pub use sample::{Sample, SampleFault, SampleKind};
pub use scatter::{ConversionState, CycleEvent, ScanCycle, ScatterEngine, ScatterStats};
pub use tracker::{ErrorRecord, ErrorTracker, StageStatus};
