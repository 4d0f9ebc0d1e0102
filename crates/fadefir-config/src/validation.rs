//! Preset validation.
//!
//! [`validate_preset`] checks everything the engine would otherwise reject
//! later, and a few things it cannot see (duplicate names, coefficient
//! range in the file's integer representation). All problems are collected
//! rather than stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use fadefir_config::{CoefficientSet, FilterPreset, validate_preset};
//!
//! let preset = FilterPreset::new("Average")
//!     .with_filter(CoefficientSet::q16("avg", 15, &[8192; 4]));
//! validate_preset(&preset).expect("preset should be valid");
//! ```

use std::collections::HashSet;
use thiserror::Error;

use crate::coefficients::CoefficientSet;
use crate::preset::FilterPreset;

/// Largest Q-factor a preset may declare.
pub const MAX_Q_FACTOR: i16 = 31;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Data width other than 16 or 32 bits.
    #[error("invalid data width: {0} bits (expected 16 or 32)")]
    InvalidDataWidth(u32),

    /// An engine size that must be non-zero is zero.
    #[error("engine parameter '{0}' must be non-zero")]
    ZeroParameter(&'static str),

    /// Coefficient width other than 16 or 32 bits.
    #[error("filter '{filter}': invalid coefficient width {bits} (expected 16 or 32)")]
    InvalidCoefWidth {
        /// Filter name.
        filter: String,
        /// Declared width.
        bits: u32,
    },

    /// A coefficient does not fit its declared width.
    #[error("filter '{filter}': coefficient {index} = {value} does not fit in {bits} bits")]
    CoefficientOutOfRange {
        /// Filter name.
        filter: String,
        /// Position of the coefficient.
        index: usize,
        /// Offending value.
        value: i64,
        /// Declared width.
        bits: u32,
    },

    /// Filter with no coefficients.
    #[error("filter '{0}' has no coefficients")]
    EmptyCoefficients(String),

    /// Tap count of zero or larger than the coefficient list.
    #[error("filter '{filter}': {taps} taps with {available} coefficients")]
    InvalidTapCount {
        /// Filter name.
        filter: String,
        /// Requested taps.
        taps: usize,
        /// Coefficients available.
        available: usize,
    },

    /// Tap count larger than the engine's capacity.
    #[error("filter '{filter}': {taps} taps exceeds max_num_taps {max}")]
    TooManyTaps {
        /// Filter name.
        filter: String,
        /// Requested taps.
        taps: usize,
        /// Engine capacity.
        max: usize,
    },

    /// Q-factor outside `0..=MAX_Q_FACTOR`.
    #[error("filter '{filter}': q_factor {q} out of range [0, {MAX_Q_FACTOR}]")]
    QFactorOutOfRange {
        /// Filter name.
        filter: String,
        /// Declared Q-factor.
        q: i16,
    },

    /// Two filters share a name.
    #[error("duplicate filter name: {0}")]
    DuplicateFilter(String),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Folds a list of problems into one result.
fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validates one coefficient set against the engine's tap capacity.
pub fn validate_coefficient_set(set: &CoefficientSet, max_num_taps: usize) -> ValidationResult<()> {
    let mut errors = Vec::new();
    check_set(set, max_num_taps, &mut errors);
    collect(errors)
}

fn check_set(set: &CoefficientSet, max_num_taps: usize, errors: &mut Vec<ValidationError>) {
    if set.coefficients.is_empty() {
        errors.push(ValidationError::EmptyCoefficients(set.name.clone()));
        return;
    }

    if !(0..=MAX_Q_FACTOR).contains(&set.q_factor) {
        errors.push(ValidationError::QFactorOutOfRange {
            filter: set.name.clone(),
            q: set.q_factor,
        });
    }

    let taps = set.taps();
    if taps == 0 || taps > set.coefficients.len() {
        errors.push(ValidationError::InvalidTapCount {
            filter: set.name.clone(),
            taps,
            available: set.coefficients.len(),
        });
    } else if taps > max_num_taps {
        errors.push(ValidationError::TooManyTaps {
            filter: set.name.clone(),
            taps,
            max: max_num_taps,
        });
    }

    if let Err(e) = set.storage() {
        errors.push(e);
    }
}

/// Validates a complete preset.
pub fn validate_preset(preset: &FilterPreset) -> ValidationResult<()> {
    let mut errors = Vec::new();
    let engine = &preset.engine;

    if fadefir_core::DataWidth::from_bits(engine.data_width).is_none() {
        errors.push(ValidationError::InvalidDataWidth(engine.data_width));
    }
    for (name, value) in [
        ("sample_rate", engine.sample_rate as usize),
        ("max_num_taps", engine.max_num_taps),
        ("frame_size", engine.frame_size),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroParameter(name));
        }
    }

    let mut seen = HashSet::new();
    for set in &preset.filters {
        if !seen.insert(set.name.as_str()) {
            errors.push(ValidationError::DuplicateFilter(set.name.clone()));
        }
        check_set(set, engine.max_num_taps, &mut errors);
    }

    collect(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset() -> FilterPreset {
        FilterPreset::new("Test")
            .with_max_num_taps(8)
            .with_filter(CoefficientSet::q16("a", 15, &[1, 2, 3]))
            .with_filter(CoefficientSet::q32("b", 30, &[1 << 20; 8]))
    }

    #[test]
    fn valid_preset_passes() {
        assert_eq!(validate_preset(&preset()), Ok(()));
    }

    #[test]
    fn single_error_is_not_wrapped() {
        let mut p = preset();
        p.engine.data_width = 24;
        assert_eq!(validate_preset(&p), Err(ValidationError::InvalidDataWidth(24)));
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut p = preset();
        p.engine.frame_size = 0;
        p.filters.push(CoefficientSet::q16("a", 40, &[1; 9]));

        let Err(ValidationError::Multiple(errors)) = validate_preset(&p) else {
            panic!("expected multiple errors");
        };
        assert!(errors.contains(&ValidationError::ZeroParameter("frame_size")));
        assert!(errors.contains(&ValidationError::DuplicateFilter("a".to_string())));
        assert!(errors.contains(&ValidationError::QFactorOutOfRange {
            filter: "a".to_string(),
            q: 40
        }));
        assert!(errors.contains(&ValidationError::TooManyTaps {
            filter: "a".to_string(),
            taps: 9,
            max: 8
        }));
    }

    #[test]
    fn tap_count_must_fit_coefficients() {
        let set = CoefficientSet::q16("short", 15, &[1, 2]).with_taps(3);
        assert_eq!(
            validate_coefficient_set(&set, 16),
            Err(ValidationError::InvalidTapCount {
                filter: "short".to_string(),
                taps: 3,
                available: 2
            })
        );
    }

    #[test]
    fn empty_set_is_rejected() {
        let set = CoefficientSet::q16("none", 15, &[]);
        assert_eq!(
            validate_coefficient_set(&set, 16),
            Err(ValidationError::EmptyCoefficients("none".to_string()))
        );
    }

    #[test]
    fn multiple_display_joins_messages() {
        let err = ValidationError::Multiple(vec![
            ValidationError::InvalidDataWidth(8),
            ValidationError::ZeroParameter("frame_size"),
        ]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: invalid data width: 8 bits (expected 16 or 32); \
             engine parameter 'frame_size' must be non-zero"
        );
    }
}
