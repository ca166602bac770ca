//! sensorscan Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the acquisition engines consume.
//! Chip-specific code (register setup, pin multiplexing, DMA stream wiring)
//! implements them; the engines in `sensorscan-core` never touch registers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (sampling task, main loop) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sensorscan-core (engines)              │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sensorscan-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            chip ADC + DMA driver
//! ```
//!
//! # Traits
//!
//! - [`adc::SingleChannelAdc`] - One-shot, polled, single-channel conversion
//! - [`adc::ScatterAdc`] - Triggered multi-channel (scan + DMA) conversion

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod channel;

// Re-export key types at crate root for convenience
pub use adc::{AdcError, ScatterAdc, SingleChannelAdc};
pub use channel::{AdcChannel, ChannelDescriptor, Resolution, SampleTime};
