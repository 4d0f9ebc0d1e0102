//! Factory presets bundled with the fadefir library.
//!
//! Built-in presets that are always available without external files. They
//! cover each sample width and kernel layout and double as starting points
//! for user presets.

use crate::FilterPreset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &["identity", "smoothing", "half_band", "tone_switch"];

/// TOML content for factory presets.
///
/// These are embedded at compile time and always available.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("identity", IDENTITY_PRESET),
    ("smoothing", SMOOTHING_PRESET),
    ("half_band", HALF_BAND_PRESET),
    ("tone_switch", TONE_SWITCH_PRESET),
];

/// Identity preset - single unity tap, no crossfade.
const IDENTITY_PRESET: &str = r#"
name = "Identity"
description = "Single unity tap - output equals input"

[engine]
data_width = 16
sample_rate = 48000
max_num_taps = 1
frame_size = 240
crossfade_capable = false

[[filters]]
name = "unity"
q_factor = 14
coefficients = [16384]
"#;

/// Smoothing preset - 8-tap moving average.
const SMOOTHING_PRESET: &str = r#"
name = "Smoothing"
description = "8-tap moving average with a 10 ms crossfade"

[engine]
data_width = 16
sample_rate = 48000
max_num_taps = 8
frame_size = 240

[crossfade]
enabled = true
transition_ms = 10

[[filters]]
name = "average"
q_factor = 15
coefficients = [4096, 4096, 4096, 4096, 4096, 4096, 4096, 4096]

[[filters]]
name = "average4"
q_factor = 15
coefficients = [8192, 8192, 8192, 8192]
"#;

/// Half-band preset - 15-tap Q30 lowpass on 32-bit samples.
const HALF_BAND_PRESET: &str = r#"
name = "Half Band"
description = "15-tap half-band lowpass, 32-bit samples, blocked kernel"

[engine]
data_width = 32
sample_rate = 96000
max_num_taps = 16
frame_size = 480
kernel = "blocked"

[crossfade]
enabled = true
transition_ms = 5

[[filters]]
name = "half_band"
q_factor = 30
coef_width = 32
coefficients = [
    -3920719, 0, 17372341, 0, -73456586, 0, 327434903, 538881946,
    327434903, 0, -73456586, 0, 17372341, 0, -3920719,
]
"#;

/// Tone switch preset - complementary lowpass and highpass.
const TONE_SWITCH_PRESET: &str = r#"
name = "Tone Switch"
description = "Complementary 7-tap lowpass and highpass with a 20 ms crossfade"

[engine]
data_width = 16
sample_rate = 48000
max_num_taps = 7
frame_size = 240

[crossfade]
enabled = true
transition_ms = 20

[[filters]]
name = "lowpass"
q_factor = 15
coefficients = [-179, 1039, 8355, 14338, 8355, 1039, -179]

[[filters]]
name = "highpass"
q_factor = 15
coefficients = [179, -1039, -8355, 18430, -8355, -1039, 179]
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use fadefir_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("  - {}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<FilterPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| FilterPreset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by name.
///
/// Matches the internal identifier or the preset's display name,
/// case-insensitively.
///
/// ```rust
/// use fadefir_config::get_factory_preset;
///
/// let preset = get_factory_preset("Tone Switch").unwrap();
/// assert_eq!(preset.filters.len(), 2);
/// ```
pub fn get_factory_preset(name: &str) -> Option<FilterPreset> {
    let name_lower = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| id.to_lowercase() == name_lower)
    {
        return FilterPreset::from_toml(toml).ok();
    }

    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| FilterPreset::from_toml(toml).ok())
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Get the internal identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory preset (case-insensitive).
///
/// ```rust
/// use fadefir_config::is_factory_preset;
///
/// assert!(is_factory_preset("half_band"));
/// assert!(is_factory_preset("Half Band"));
/// assert!(!is_factory_preset("my_filter"));
/// ```
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
