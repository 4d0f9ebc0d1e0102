//! fadefir Core - fixed-point FIR filtering with click-free coefficient swaps
//!
//! This crate filters 16- or 32-bit integer audio with 16- or 32-bit
//! coefficients inside one memory block the host allocates up front. When
//! coefficients change at run time the old and new filters run side by side
//! and their outputs are crossfaded, so replacing a filter never clicks.
//!
//! # Core Abstractions
//!
//! ## Setup
//!
//! - [`StaticParams`] - data width, sample rate, maximum taps, frame size
//! - [`MemoryPlan`] / [`plan`] - size and layout of the working block
//! - [`FirEngine::init`] - binds an engine to the block
//!
//! ## Run time
//!
//! - [`FilterConfig`] - Q-factor, tap count and borrowed [`Coefficients`]
//! - [`CrossfadeParams`] - crossfade on/off and transition length
//! - [`FirEngine::process`] - filters one frame
//!
//! ## Building blocks
//!
//! - [`kernel`] - the four (coefficient x data width) convolution kernels
//! - [`panner`] - the Q30 linear crossfade
//! - [`fixed`] - saturating fixed-point helpers
//! - [`FirCounters`] - optional lock-free event counters
//!
//! # no_std Support
//!
//! The crate never allocates and uses no floating point. Disable the default
//! `std` feature for embedded targets:
//!
//! ```toml
//! [dependencies]
//! fadefir-core = { version = "0.1", default-features = false }
//! ```
//!
//! Without a heap the block is typically a `static` array of `u64` borrowed
//! through `bytemuck::cast_slice_mut`.
//!
//! # Example
//!
//! ```rust
//! use fadefir_core::{CrossfadeParams, DataWidth, FilterConfig, FirEngine, StaticParams, plan};
//!
//! let params = StaticParams::new(DataWidth::Bits32, 48000, 16, 240);
//! let mut words = vec![0_u64; plan(&params).div_ceil(8)];
//!
//! let lowpass = [1_i32 << 28; 4]; // 4-tap average, Q30
//! let highpass = [1_i32 << 29, -(1 << 29)];
//!
//! let mut fir = FirEngine::<i32>::init(params, bytemuck::cast_slice_mut(&mut words)).unwrap();
//! fir.set_crossfade_params(CrossfadeParams::enabled(5)).unwrap();
//! fir.set_configuration(FilterConfig::new(30, &lowpass[..])).unwrap();
//!
//! let input = [1000_i32; 240];
//! let mut output = [0_i32; 240];
//! fir.process(&input, &mut output).unwrap();
//!
//! // Shorter filter: fades over 5 ms instead of switching.
//! fir.set_configuration(FilterConfig::new(30, &highpass[..])).unwrap();
//! assert!(fir.transition_status().in_transition);
//! ```
//!
//! # Design Principles
//!
//! - **One block**: every sample buffer lives in the caller's memory
//! - **Bit-exact**: 64-bit accumulation, round-half-up, saturating output
//! - **Non-destructive errors**: a failed call leaves the engine untouched

#![cfg_attr(not(feature = "std"), no_std)]

pub mod counters;
pub mod engine;
pub mod error;
pub mod fixed;
pub mod kernel;
pub mod panner;
pub mod params;
pub mod plan;
pub mod sample;
pub mod slots;

// Re-export main types at crate root
pub use counters::{Counter, CounterSnapshot, FirCounters};
pub use engine::{FirEngine, TransitionStatus};
pub use error::FirError;
pub use kernel::{BLOCK_SAMPLES, FilterState, KernelVariant};
pub use panner::PannerState;
pub use params::{
    Coefficients, CrossfadeParams, DEFAULT_NUM_TAPS, DEFAULT_Q_FACTOR, FilterConfig,
    KernelStrategy, StaticParams,
};
pub use plan::{MemoryPlan, Region, plan};
pub use sample::{CoefWidth, Coefficient, DataWidth, Sample};
pub use slots::{Replacement, Slots};

/// Library version reported to hosts.
pub const LIB_VERSION: &str = env!("CARGO_PKG_VERSION");
