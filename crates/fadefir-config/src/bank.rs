//! Validated coefficient storage built from a preset.
//!
//! The engine borrows coefficients for as long as a configuration is active,
//! queued or fading out. [`FilterBank`] is the owner that outlives it: build
//! one from a preset, then hand out [`FilterConfig`]s by name.
//!
//! # Example
//!
//! ```rust
//! use fadefir_config::{FilterBank, get_factory_preset};
//! use fadefir_core::{FirEngine, MemoryPlan};
//!
//! let preset = get_factory_preset("tone_switch").unwrap();
//! let bank = FilterBank::from_preset(&preset).unwrap();
//! let params = bank.static_params();
//!
//! let mut words = vec![0_u64; MemoryPlan::new(&params).required_words()];
//! let block: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
//! let mut fir = FirEngine::<i16>::init(params, block).unwrap();
//! fir.set_crossfade_params(bank.crossfade_params()).unwrap();
//! fir.set_configuration(bank.config("lowpass").unwrap()).unwrap();
//! ```

use fadefir_core::{CrossfadeParams, FilterConfig, StaticParams};

use crate::coefficients::CoefficientStorage;
use crate::error::ConfigError;
use crate::preset::FilterPreset;
use crate::validation::validate_preset;

struct BankEntry {
    name: String,
    q_factor: i16,
    num_taps: usize,
    storage: CoefficientStorage,
}

/// Owned, validated filters for one engine instance.
pub struct FilterBank {
    preset_name: String,
    params: StaticParams,
    crossfade: CrossfadeParams,
    entries: Vec<BankEntry>,
}

impl FilterBank {
    /// Validates `preset` and converts every coefficient set to its
    /// run-time width.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the preset has any problem
    /// [`validate_preset`] reports.
    pub fn from_preset(preset: &FilterPreset) -> Result<Self, ConfigError> {
        validate_preset(preset)?;
        let params = preset.static_params()?;

        let entries = preset
            .filters
            .iter()
            .map(|set| {
                Ok(BankEntry {
                    name: set.name.clone(),
                    q_factor: set.q_factor,
                    num_taps: set.taps(),
                    storage: set.storage()?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        tracing::debug!(preset = %preset.name, filters = entries.len(), "bank_built");

        Ok(Self {
            preset_name: preset.name.clone(),
            params,
            crossfade: preset.crossfade_params(),
            entries,
        })
    }

    /// Engine configuration for the named filter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FilterNotFound` if no filter has that name.
    pub fn config(&self, name: &str) -> Result<FilterConfig<'_>, ConfigError> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.storage.config(e.q_factor, e.num_taps))
            .ok_or_else(|| ConfigError::filter_not_found(&self.preset_name, name))
    }

    /// Static parameters from the preset's `[engine]` table.
    pub fn static_params(&self) -> StaticParams {
        self.params
    }

    /// Crossfade parameters from the preset's `[crossfade]` table.
    pub fn crossfade_params(&self) -> CrossfadeParams {
        self.crossfade
    }

    /// Filter names, in preset order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bank holds no filters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl core::fmt::Debug for FilterBank {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FilterBank")
            .field("preset", &self.preset_name)
            .field("filters", &self.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
