//! Named coefficient sets and their owned storage.

use fadefir_core::{CoefWidth, Coefficients, FilterConfig};
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ValidationResult};

/// One filter as written in a preset file.
///
/// Coefficients are stored as plain integers so the same TOML array can
/// hold either width; [`storage`](Self::storage) range-checks them into the
/// width named by `coef_width`.
///
/// ```toml
/// [[filters]]
/// name = "lowpass"
/// q_factor = 15
/// coef_width = 16
/// coefficients = [-179, 1039, 8355, 14338, 8355, 1039, -179]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoefficientSet {
    /// Name used to select the filter.
    pub name: String,

    /// Coefficient Q-factor.
    #[serde(default = "default_q_factor")]
    pub q_factor: i16,

    /// Coefficient width in bits (16 or 32).
    #[serde(default = "default_coef_width")]
    pub coef_width: u32,

    /// Taps to use; defaults to every coefficient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_taps: Option<usize>,

    /// Coefficient values, first tap first.
    pub coefficients: Vec<i64>,
}

fn default_q_factor() -> i16 {
    fadefir_core::DEFAULT_Q_FACTOR
}

fn default_coef_width() -> u32 {
    16
}

impl CoefficientSet {
    /// Builds a 16-bit set.
    pub fn q16(name: impl Into<String>, q_factor: i16, coefficients: &[i16]) -> Self {
        Self {
            name: name.into(),
            q_factor,
            coef_width: 16,
            num_taps: None,
            coefficients: coefficients.iter().map(|&c| i64::from(c)).collect(),
        }
    }

    /// Builds a 32-bit set.
    pub fn q32(name: impl Into<String>, q_factor: i16, coefficients: &[i32]) -> Self {
        Self {
            name: name.into(),
            q_factor,
            coef_width: 32,
            num_taps: None,
            coefficients: coefficients.iter().map(|&c| i64::from(c)).collect(),
        }
    }

    /// Uses only the first `num_taps` coefficients.
    pub fn with_taps(mut self, num_taps: usize) -> Self {
        self.num_taps = Some(num_taps);
        self
    }

    /// Tap count the filter runs with.
    pub fn taps(&self) -> usize {
        self.num_taps.unwrap_or(self.coefficients.len())
    }

    /// Coefficient width, if `coef_width` is 16 or 32.
    pub fn width(&self) -> Option<CoefWidth> {
        CoefWidth::from_bits(self.coef_width)
    }

    /// Converts the coefficients to their declared width.
    pub fn storage(&self) -> ValidationResult<CoefficientStorage> {
        let width = self.width().ok_or_else(|| ValidationError::InvalidCoefWidth {
            filter: self.name.clone(),
            bits: self.coef_width,
        })?;
        let out_of_range = |index: usize, value: i64| ValidationError::CoefficientOutOfRange {
            filter: self.name.clone(),
            index,
            value,
            bits: self.coef_width,
        };

        match width {
            CoefWidth::Bits16 => self
                .coefficients
                .iter()
                .enumerate()
                .map(|(i, &c)| i16::try_from(c).map_err(|_| out_of_range(i, c)))
                .collect::<Result<Vec<_>, _>>()
                .map(CoefficientStorage::Q16),
            CoefWidth::Bits32 => self
                .coefficients
                .iter()
                .enumerate()
                .map(|(i, &c)| i32::try_from(c).map_err(|_| out_of_range(i, c)))
                .collect::<Result<Vec<_>, _>>()
                .map(CoefficientStorage::Q32),
        }
    }
}

/// Coefficients converted to their run-time width and owned by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoefficientStorage {
    /// 16-bit coefficients.
    Q16(Vec<i16>),
    /// 32-bit coefficients.
    Q32(Vec<i32>),
}

impl CoefficientStorage {
    /// Borrows the coefficients for the engine.
    pub fn coefficients(&self) -> Coefficients<'_> {
        match self {
            Self::Q16(c) => Coefficients::Q16(c),
            Self::Q32(c) => Coefficients::Q32(c),
        }
    }

    /// Number of stored coefficients.
    pub fn len(&self) -> usize {
        self.coefficients().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Engine configuration borrowing this storage.
    pub fn config(&self, q_factor: i16, num_taps: usize) -> FilterConfig<'_> {
        FilterConfig::with_taps(q_factor, num_taps, self.coefficients())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_converts_to_declared_width() {
        let set = CoefficientSet::q16("avg", 15, &[4096; 8]);
        let storage = set.storage().unwrap();
        assert_eq!(storage, CoefficientStorage::Q16(vec![4096; 8]));
        assert_eq!(storage.coefficients().width(), CoefWidth::Bits16);

        let set = CoefficientSet::q32("wide", 30, &[1 << 29, -(1 << 29)]);
        assert!(matches!(set.storage().unwrap(), CoefficientStorage::Q32(_)));
    }

    #[test]
    fn storage_rejects_out_of_range() {
        let mut set = CoefficientSet::q16("hot", 15, &[1, 2, 3]);
        set.coefficients[1] = 40_000;
        assert_eq!(
            set.storage(),
            Err(ValidationError::CoefficientOutOfRange {
                filter: "hot".to_string(),
                index: 1,
                value: 40_000,
                bits: 16
            })
        );
    }

    #[test]
    fn storage_rejects_unknown_width() {
        let mut set = CoefficientSet::q16("odd", 15, &[1]);
        set.coef_width = 24;
        assert!(matches!(
            set.storage(),
            Err(ValidationError::InvalidCoefWidth { bits: 24, .. })
        ));
    }

    #[test]
    fn config_borrows_storage() {
        let set = CoefficientSet::q16("lp", 14, &[1, 2, 3, 4]).with_taps(3);
        let storage = set.storage().unwrap();
        let config = storage.config(set.q_factor, set.taps());
        assert_eq!(config.num_taps, 3);
        assert_eq!(config.q_factor, 14);
        assert_eq!(config.coeffs.as_ref().map(Coefficients::len), Some(4));
    }
}
