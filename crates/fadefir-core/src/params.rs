//! Engine parameters and filter configurations.
//!
//! - [`StaticParams`] - fixed at setup, drives memory planning
//! - [`CrossfadeParams`] - crossfade on/off and transition length
//! - [`FilterConfig`] - one coefficient set (Q-factor, taps, coefficients)
//!
//! Coefficients are never copied: a [`FilterConfig`] borrows the caller's
//! slice, so the slice must outlive every slot the config occupies.

use crate::error::FirError;
use crate::sample::{CoefWidth, DataWidth};

/// Default coefficient Q-factor (Q13) for slots that were never configured.
pub const DEFAULT_Q_FACTOR: i16 = 13;

/// Default tap count for slots that were never configured.
pub const DEFAULT_NUM_TAPS: usize = 1;

/// Which convolution inner loop the engine runs.
///
/// Both strategies produce bit-identical output; they differ in memory layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KernelStrategy {
    /// Circular history, one output sample per pass over the taps.
    #[default]
    PerSample,
    /// Linear history with a staging block, outputs computed block-wise into
    /// a per-filter staging buffer. Reserves extra memory, see
    /// [`BLOCK_SAMPLES`](crate::kernel::BLOCK_SAMPLES).
    Blocked,
}

/// Parameters fixed for the life of an engine instance.
///
/// Changing any of these (channel count, media format, maximum filter
/// length) means planning and initializing a new engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StaticParams {
    /// Sample width.
    pub data_width: DataWidth,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Longest filter the block can hold.
    pub max_num_taps: usize,
    /// Largest frame `process` accepts, in samples.
    pub frame_size: usize,
    /// Inner loop layout.
    pub kernel: KernelStrategy,
    /// Reserve the outgoing-output scratch needed for crossfading.
    pub crossfade_capable: bool,
}

impl StaticParams {
    /// Creates parameters with the per-sample kernel and crossfading available.
    pub const fn new(
        data_width: DataWidth,
        sample_rate: u32,
        max_num_taps: usize,
        frame_size: usize,
    ) -> Self {
        Self {
            data_width,
            sample_rate,
            max_num_taps,
            frame_size,
            kernel: KernelStrategy::PerSample,
            crossfade_capable: true,
        }
    }

    /// Selects the inner loop.
    pub const fn with_kernel(mut self, kernel: KernelStrategy) -> Self {
        self.kernel = kernel;
        self
    }

    /// Reserves (or omits) crossfade memory.
    pub const fn with_crossfade(mut self, capable: bool) -> Self {
        self.crossfade_capable = capable;
        self
    }

    /// Checks that every size is non-zero.
    pub fn validate(&self) -> Result<(), FirError> {
        if self.sample_rate == 0 {
            return Err(FirError::InvalidStaticParams("sample_rate must be non-zero"));
        }
        if self.max_num_taps == 0 {
            return Err(FirError::InvalidStaticParams("max_num_taps must be non-zero"));
        }
        if self.frame_size == 0 {
            return Err(FirError::InvalidStaticParams("frame_size must be non-zero"));
        }
        Ok(())
    }
}

/// Crossfade settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CrossfadeParams {
    /// Crossfade coefficient replacements instead of switching instantly.
    pub enabled: bool,
    /// Transition length in milliseconds.
    pub transition_ms: u32,
}

impl CrossfadeParams {
    /// Crossfading on, with the given transition length.
    pub const fn enabled(transition_ms: u32) -> Self {
        Self {
            enabled: true,
            transition_ms,
        }
    }

    /// Crossfading off.
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            transition_ms: 0,
        }
    }
}

/// Borrowed coefficient storage. The variant is the coefficient width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coefficients<'a> {
    /// 16-bit coefficients.
    Q16(&'a [i16]),
    /// 32-bit coefficients.
    Q32(&'a [i32]),
}

impl Coefficients<'_> {
    /// Coefficient width.
    pub const fn width(&self) -> CoefWidth {
        match self {
            Self::Q16(_) => CoefWidth::Bits16,
            Self::Q32(_) => CoefWidth::Bits32,
        }
    }

    /// Number of coefficients in the slice.
    pub const fn len(&self) -> usize {
        match self {
            Self::Q16(c) => c.len(),
            Self::Q32(c) => c.len(),
        }
    }

    /// Returns `true` if the slice is empty.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> From<&'a [i16]> for Coefficients<'a> {
    fn from(c: &'a [i16]) -> Self {
        Self::Q16(c)
    }
}

impl<'a> From<&'a [i32]> for Coefficients<'a> {
    fn from(c: &'a [i32]) -> Self {
        Self::Q32(c)
    }
}

/// One filter configuration.
///
/// # Example
///
/// ```rust
/// use fadefir_core::FilterConfig;
///
/// // 3-tap moving average in Q15
/// let taps = [10923_i16, 10923, 10923];
/// let config = FilterConfig::new(15, &taps[..]);
/// assert_eq!(config.num_taps, 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterConfig<'a> {
    /// Coefficient Q-factor: output = round(sum >> q_factor).
    pub q_factor: i16,
    /// Taps actually used; at most `coeffs.len()`.
    pub num_taps: usize,
    /// Coefficients, or `None` for passthrough.
    pub coeffs: Option<Coefficients<'a>>,
}

impl<'a> FilterConfig<'a> {
    /// Uses every coefficient in the slice.
    pub fn new(q_factor: i16, coeffs: impl Into<Coefficients<'a>>) -> Self {
        let coeffs = coeffs.into();
        Self {
            q_factor,
            num_taps: coeffs.len(),
            coeffs: Some(coeffs),
        }
    }

    /// Uses the first `num_taps` coefficients.
    pub fn with_taps(q_factor: i16, num_taps: usize, coeffs: impl Into<Coefficients<'a>>) -> Self {
        Self {
            q_factor,
            num_taps,
            coeffs: Some(coeffs.into()),
        }
    }

    /// Coefficient width; unconfigured slots report 16 bits.
    pub fn coef_width(&self) -> CoefWidth {
        self.coeffs.map_or(CoefWidth::Bits16, |c| c.width())
    }

    /// Returns `true` if coefficients are set.
    pub fn has_coefficients(&self) -> bool {
        self.coeffs.is_some()
    }

    /// Checks this configuration against the engine's tap capacity.
    pub fn validate(&self, max_num_taps: usize) -> Result<(), FirError> {
        if self.num_taps == 0 {
            return Err(FirError::InvalidTapCount);
        }
        if self.num_taps > max_num_taps {
            return Err(FirError::TapCountExceedsCapacity {
                requested: self.num_taps,
                capacity: max_num_taps,
            });
        }
        if let Some(c) = self.coeffs
            && c.len() < self.num_taps
        {
            return Err(FirError::CoefficientsTooShort {
                needed: self.num_taps,
                provided: c.len(),
            });
        }
        Ok(())
    }
}

impl Default for FilterConfig<'_> {
    fn default() -> Self {
        Self {
            q_factor: DEFAULT_Q_FACTOR,
            num_taps: DEFAULT_NUM_TAPS,
            coeffs: None,
        }
    }
}
