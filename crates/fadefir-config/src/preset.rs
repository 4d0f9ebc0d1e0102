//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use fadefir_core::{CrossfadeParams, DataWidth, KernelStrategy, StaticParams};

use crate::coefficients::CoefficientSet;
use crate::error::ConfigError;
use crate::validation::ValidationError;

/// Inner loop layout as written in a preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    /// Circular history.
    #[default]
    PerSample,
    /// Linear history with a staging block.
    Blocked,
}

impl From<KernelKind> for KernelStrategy {
    fn from(kind: KernelKind) -> Self {
        match kind {
            KernelKind::PerSample => KernelStrategy::PerSample,
            KernelKind::Blocked => KernelStrategy::Blocked,
        }
    }
}

/// `[engine]` table: the static parameters of the instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineSection {
    /// Sample width in bits (16 or 32).
    #[serde(default = "default_data_width")]
    pub data_width: u32,

    /// Sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Longest filter the engine must hold.
    #[serde(default = "default_max_num_taps")]
    pub max_num_taps: usize,

    /// Largest frame passed to `process`.
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,

    /// Inner loop layout.
    #[serde(default)]
    pub kernel: KernelKind,

    /// Reserve crossfade memory.
    #[serde(default = "default_true")]
    pub crossfade_capable: bool,
}

fn default_data_width() -> u32 {
    16
}

fn default_sample_rate() -> u32 {
    48000
}

fn default_max_num_taps() -> usize {
    64
}

fn default_frame_size() -> usize {
    240
}

fn default_true() -> bool {
    true
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            data_width: default_data_width(),
            sample_rate: default_sample_rate(),
            max_num_taps: default_max_num_taps(),
            frame_size: default_frame_size(),
            kernel: KernelKind::default(),
            crossfade_capable: true,
        }
    }
}

/// `[crossfade]` table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrossfadeSection {
    /// Crossfade coefficient replacements.
    #[serde(default)]
    pub enabled: bool,

    /// Transition length in milliseconds.
    #[serde(default)]
    pub transition_ms: u32,
}

impl From<CrossfadeSection> for CrossfadeParams {
    fn from(section: CrossfadeSection) -> Self {
        CrossfadeParams {
            enabled: section.enabled,
            transition_ms: section.transition_ms,
        }
    }
}

/// Preset file describing one engine instance and the filters it can run.
///
/// # TOML Format
///
/// ```toml
/// name = "Tone Switch"
/// description = "Lowpass and highpass with a 20 ms crossfade"
///
/// [engine]
/// data_width = 16
/// sample_rate = 48000
/// max_num_taps = 16
/// frame_size = 240
/// kernel = "per_sample"
///
/// [crossfade]
/// enabled = true
/// transition_ms = 20
///
/// [[filters]]
/// name = "lowpass"
/// q_factor = 15
/// coefficients = [-179, 1039, 8355, 14338, 8355, 1039, -179]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterPreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Static engine parameters.
    #[serde(default)]
    pub engine: EngineSection,

    /// Crossfade settings applied after init.
    #[serde(default)]
    pub crossfade: CrossfadeSection,

    /// Named coefficient sets.
    #[serde(default)]
    pub filters: Vec<CoefficientSet>,
}

impl FilterPreset {
    /// Create a new preset with default engine settings and no filters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            engine: EngineSection::default(),
            crossfade: CrossfadeSection::default(),
            filters: Vec::new(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the engine's tap capacity.
    pub fn with_max_num_taps(mut self, max_num_taps: usize) -> Self {
        self.engine.max_num_taps = max_num_taps;
        self
    }

    /// Enable crossfading with the given transition length.
    pub fn with_crossfade(mut self, transition_ms: u32) -> Self {
        self.crossfade = CrossfadeSection {
            enabled: true,
            transition_ms,
        };
        self
    }

    /// Add a coefficient set.
    pub fn with_filter(mut self, filter: CoefficientSet) -> Self {
        self.filters.push(filter);
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset = Self::from_toml(&content)?;
        tracing::debug!(
            path = %path.display(),
            name = %preset.name,
            filters = preset.filters.len(),
            "preset_loaded"
        );
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Static parameters for [`FirEngine::init`](fadefir_core::FirEngine::init).
    pub fn static_params(&self) -> Result<StaticParams, ConfigError> {
        let engine = &self.engine;
        let data_width = DataWidth::from_bits(engine.data_width)
            .ok_or(ValidationError::InvalidDataWidth(engine.data_width))?;
        let params = StaticParams::new(
            data_width,
            engine.sample_rate,
            engine.max_num_taps,
            engine.frame_size,
        )
        .with_kernel(engine.kernel.into())
        .with_crossfade(engine.crossfade_capable);
        params.validate()?;
        Ok(params)
    }

    /// Crossfade parameters for
    /// [`FirEngine::set_crossfade_params`](fadefir_core::FirEngine::set_crossfade_params).
    pub fn crossfade_params(&self) -> CrossfadeParams {
        self.crossfade.into()
    }

    /// Get a coefficient set by name.
    pub fn filter(&self, name: &str) -> Option<&CoefficientSet> {
        self.filters.iter().find(|f| f.name == name)
    }

    /// Names of all coefficient sets, in file order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name.as_str()).collect()
    }
}

impl Default for FilterPreset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fadefir_core::FirError;

    #[test]
    fn new_uses_engine_defaults() {
        let preset = FilterPreset::new("Test");
        assert_eq!(preset.name, "Test");
        assert!(preset.description.is_none());
        assert_eq!(preset.engine.data_width, 16);
        assert_eq!(preset.engine.sample_rate, 48000);
        assert_eq!(preset.engine.frame_size, 240);
        assert_eq!(preset.engine.kernel, KernelKind::PerSample);
        assert!(preset.engine.crossfade_capable);
        assert!(!preset.crossfade.enabled);
        assert!(preset.filters.is_empty());
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let preset = FilterPreset::from_toml(
            r#"
name = "Minimal"

[[filters]]
name = "unity"
coefficients = [8192]
"#,
        )
        .unwrap();

        assert_eq!(preset.engine, EngineSection::default());
        assert_eq!(preset.crossfade, CrossfadeSection::default());
        let filter = preset.filter("unity").unwrap();
        assert_eq!(filter.q_factor, fadefir_core::DEFAULT_Q_FACTOR);
        assert_eq!(filter.coef_width, 16);
        assert_eq!(filter.taps(), 1);
    }

    #[test]
    fn kernel_parses_snake_case() {
        let preset = FilterPreset::from_toml(
            r#"
name = "Blocked"

[engine]
data_width = 32
kernel = "blocked"
"#,
        )
        .unwrap();

        let params = preset.static_params().unwrap();
        assert_eq!(params.kernel, KernelStrategy::Blocked);
        assert_eq!(params.data_width, DataWidth::Bits32);
    }

    #[test]
    fn toml_round_trip() {
        let preset = FilterPreset::new("Round Trip")
            .with_description("two filters")
            .with_crossfade(15)
            .with_filter(CoefficientSet::q16("a", 15, &[1, -2, 3]))
            .with_filter(CoefficientSet::q32("b", 30, &[1 << 29]).with_taps(1));

        let toml_str = preset.to_toml().unwrap();
        let loaded = FilterPreset::from_toml(&toml_str).unwrap();
        assert_eq!(preset, loaded);
    }

    #[test]
    fn static_params_rejects_bad_width() {
        let mut preset = FilterPreset::new("Bad");
        preset.engine.data_width = 8;
        assert!(matches!(
            preset.static_params(),
            Err(ConfigError::Validation(ValidationError::InvalidDataWidth(8)))
        ));
    }

    #[test]
    fn static_params_rejects_zero_sizes() {
        let mut preset = FilterPreset::new("Bad");
        preset.engine.frame_size = 0;
        assert!(matches!(
            preset.static_params(),
            Err(ConfigError::Engine(FirError::InvalidStaticParams(_)))
        ));
    }

    #[test]
    fn crossfade_params_follow_section() {
        let preset = FilterPreset::new("Fade").with_crossfade(20);
        assert_eq!(preset.crossfade_params(), CrossfadeParams::enabled(20));
    }

    #[test]
    fn filter_lookup() {
        let preset = FilterPreset::new("Lookup")
            .with_filter(CoefficientSet::q16("lp", 15, &[1]))
            .with_filter(CoefficientSet::q16("hp", 15, &[2]));
        assert_eq!(preset.filter_names(), vec!["lp", "hp"]);
        assert_eq!(preset.filter("hp").map(|f| f.coefficients[0]), Some(2));
        assert!(preset.filter("bp").is_none());
    }
}
