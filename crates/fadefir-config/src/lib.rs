//! Filter presets and coefficient sets for the fadefir engine.
//!
//! `fadefir-core` works on borrowed coefficients and a caller-owned memory
//! block, with no allocation and no file access. This crate is the host side:
//! it reads and writes TOML presets, validates them, and owns the coefficient
//! storage the engine borrows.
//!
//! # Features
//!
//! - **Presets**: Load and save engine parameters plus named filters as TOML
//! - **Validation**: Collect every problem in a preset before init
//! - **Filter banks**: Validated, width-converted coefficients handed out by name
//! - **Factory Presets**: Built-in presets for each sample width and kernel
//!
//! # Example
//!
//! ```rust,no_run
//! use fadefir_config::{CoefficientSet, FilterBank, FilterPreset};
//!
//! let preset = FilterPreset::new("My Filters")
//!     .with_description("Average and pass-through")
//!     .with_max_num_taps(8)
//!     .with_crossfade(10)
//!     .with_filter(CoefficientSet::q16("average", 15, &[4096; 8]))
//!     .with_filter(CoefficientSet::q16("unity", 14, &[16384]));
//! preset.save("presets/my_filters.toml").unwrap();
//!
//! let bank = FilterBank::from_preset(&FilterPreset::load("presets/my_filters.toml").unwrap()).unwrap();
//! let config = bank.config("average").unwrap();
//! ```

mod bank;
mod coefficients;
mod error;
mod preset;

/// Preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use bank::FilterBank;
pub use coefficients::{CoefficientSet, CoefficientStorage};
pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use preset::{CrossfadeSection, EngineSection, FilterPreset, KernelKind};
pub use validation::{
    MAX_Q_FACTOR, ValidationError, ValidationResult, validate_coefficient_set, validate_preset,
};
