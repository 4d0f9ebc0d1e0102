//! Direct-form FIR kernels.
//!
//! Every kernel obeys the same numeric contract, per output sample:
//!
//! ```text
//! acc = sum_{k=0..taps-1} coeff[k] * x[n-k]      (64-bit accumulator)
//! y   = saturate(round_shift(acc, q_factor))     (to the sample width)
//! ```
//!
//! Two history layouts implement it:
//!
//! - [`convolve`] - circular buffer of `taps` samples plus a write index.
//!   `history[idx]` receives `x[n]`, `x[n-k]` sits at `(idx - k) mod taps`.
//! - [`convolve_blocked`] - linear buffer `[taps-1 past samples][staging]`.
//!   Input is copied in block-wise, outputs go to a staging buffer, then the
//!   tail is moved back to the front.
//!
//! The (coefficient width x data width) pair selects a [`KernelVariant`];
//! dispatch is a `match` on the borrowed [`Coefficients`] over a generic
//! [`Sample`], so each of the four variants is its own monomorphized loop.

pub use crate::fixed::round_shift;
use crate::params::{Coefficients, FilterConfig, KernelStrategy};
use crate::sample::{CoefWidth, Coefficient, DataWidth, Sample};

/// Samples per block for [`KernelStrategy::Blocked`] (5 ms at 48 kHz).
pub const BLOCK_SAMPLES: usize = 240;

/// The four (coefficient width x data width) kernels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KernelVariant {
    /// 16-bit coefficients, 16-bit data.
    #[default]
    C16xD16,
    /// 32-bit coefficients, 16-bit data.
    C32xD16,
    /// 16-bit coefficients, 32-bit data.
    C16xD32,
    /// 32-bit coefficients, 32-bit data.
    C32xD32,
}

impl KernelVariant {
    /// Picks the variant for a data/coefficient width pair.
    pub const fn select(data: DataWidth, coef: CoefWidth) -> Self {
        match (coef, data) {
            (CoefWidth::Bits16, DataWidth::Bits16) => Self::C16xD16,
            (CoefWidth::Bits32, DataWidth::Bits16) => Self::C32xD16,
            (CoefWidth::Bits16, DataWidth::Bits32) => Self::C16xD32,
            (CoefWidth::Bits32, DataWidth::Bits32) => Self::C32xD32,
        }
    }

    /// Data width the variant filters.
    pub const fn data_width(self) -> DataWidth {
        match self {
            Self::C16xD16 | Self::C32xD16 => DataWidth::Bits16,
            Self::C16xD32 | Self::C32xD32 => DataWidth::Bits32,
        }
    }

    /// Coefficient width the variant multiplies by.
    pub const fn coef_width(self) -> CoefWidth {
        match self {
            Self::C16xD16 | Self::C16xD32 => CoefWidth::Bits16,
            Self::C32xD16 | Self::C32xD32 => CoefWidth::Bits32,
        }
    }
}

/// Dot product of `coeffs` with a newest-first sample sequence.
#[inline]
fn dot<S: Sample, C: Coefficient>(coeffs: &[C], newest_first: impl Iterator<Item = S>) -> i64 {
    coeffs
        .iter()
        .zip(newest_first)
        .fold(0_i64, |acc, (&c, x)| acc.saturating_add(c.widen() * x.to_acc()))
}

/// Per-sample kernel over a circular history.
///
/// `history` must hold at least `coeffs.len()` samples; only the first
/// `coeffs.len()` are touched. `write_idx` is the slot the next input lands
/// in and is advanced modulo the tap count.
///
/// ```rust
/// use fadefir_core::kernel::convolve;
///
/// // y[n] = x[n] + 0.5 x[n-1], coefficients in Q14
/// let coeffs = [1_i16 << 14, 1 << 13];
/// let mut history = [0_i16; 2];
/// let mut idx = 0;
/// let mut out = [0_i16; 3];
/// convolve(&mut history, &mut idx, &coeffs, 14, &[100, 0, 0], &mut out);
/// assert_eq!(out, [100, 50, 0]);
/// ```
pub fn convolve<S: Sample, C: Coefficient>(
    history: &mut [S],
    write_idx: &mut usize,
    coeffs: &[C],
    q_factor: i16,
    input: &[S],
    output: &mut [S],
) {
    let taps = coeffs.len();
    debug_assert!(taps > 0 && history.len() >= taps);
    let history = &mut history[..taps];
    let mut idx = *write_idx % taps;

    for (y, &x) in output.iter_mut().zip(input) {
        history[idx] = x;
        let (recent, older) = history.split_at(idx + 1);
        let acc = dot(coeffs, recent.iter().rev().chain(older.iter().rev()).copied());
        *y = S::saturate(round_shift(acc, q_factor));

        idx += 1;
        if idx == taps {
            idx = 0;
        }
    }

    *write_idx = idx;
}

/// Block-staged kernel over a linear history.
///
/// `history` holds the `taps - 1` most recent inputs (oldest first) followed
/// by at least [`BLOCK_SAMPLES`] of staging space; `staging` holds at least
/// [`BLOCK_SAMPLES`] outputs. Numerically identical to [`convolve`].
pub fn convolve_blocked<S: Sample, C: Coefficient>(
    history: &mut [S],
    staging: &mut [S],
    coeffs: &[C],
    q_factor: i16,
    input: &[S],
    output: &mut [S],
) {
    let taps = coeffs.len();
    let past = taps - 1;
    debug_assert!(history.len() >= past + BLOCK_SAMPLES && staging.len() >= BLOCK_SAMPLES);

    for (block_in, block_out) in input
        .chunks(BLOCK_SAMPLES)
        .zip(output.chunks_mut(BLOCK_SAMPLES))
    {
        let n = block_in.len();
        // [<--- past (taps-1) --->][<--- block --->]
        history[past..past + n].copy_from_slice(block_in);

        for (i, y) in staging[..n].iter_mut().enumerate() {
            let window = &history[i..=past + i];
            let acc = dot(coeffs, window.iter().rev().copied());
            *y = S::saturate(round_shift(acc, q_factor));
        }

        block_out.copy_from_slice(&staging[..n]);
        history.copy_within(n..n + past, 0);
    }
}

/// Slices the configured taps out of a validated coefficient reference.
#[inline]
fn taps_of<C>(coeffs: &[C], num_taps: usize) -> &[C] {
    &coeffs[..num_taps]
}

/// Header of one filter's working state; the history itself lives in the
/// caller's block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterState {
    /// Next write position in a circular history (always 0 for Blocked).
    pub write_idx: usize,
    /// Tap count the history is currently laid out for.
    pub taps: usize,
    /// Kernel selected for the bound configuration.
    pub variant: KernelVariant,
}

impl FilterState {
    /// Fresh state for a slot with the default single-tap configuration.
    pub const fn new(variant: KernelVariant) -> Self {
        Self {
            write_idx: 0,
            taps: 1,
            variant,
        }
    }
}

/// One filter's state header bound to its history and staging regions.
#[derive(Debug)]
pub(crate) struct FilterLane<'a, S: Sample> {
    pub(crate) state: FilterState,
    history: &'a mut [S],
    staging: &'a mut [S],
}

impl<'a, S: Sample> FilterLane<'a, S> {
    pub(crate) fn new(history: &'a mut [S], staging: &'a mut [S], variant: KernelVariant) -> Self {
        Self {
            state: FilterState::new(variant),
            history,
            staging,
        }
    }

    /// Filters one frame with `config`, or copies it through when the config
    /// carries no coefficients.
    pub(crate) fn run(
        &mut self,
        strategy: KernelStrategy,
        config: &FilterConfig<'_>,
        input: &[S],
        output: &mut [S],
    ) {
        let Some(coeffs) = config.coeffs else {
            output.copy_from_slice(input);
            return;
        };
        let q = config.q_factor;
        let taps = config.num_taps;
        match (strategy, coeffs) {
            (KernelStrategy::PerSample, Coefficients::Q16(c)) => convolve(
                self.history,
                &mut self.state.write_idx,
                taps_of(c, taps),
                q,
                input,
                output,
            ),
            (KernelStrategy::PerSample, Coefficients::Q32(c)) => convolve(
                self.history,
                &mut self.state.write_idx,
                taps_of(c, taps),
                q,
                input,
                output,
            ),
            (KernelStrategy::Blocked, Coefficients::Q16(c)) => {
                convolve_blocked(self.history, self.staging, taps_of(c, taps), q, input, output);
            }
            (KernelStrategy::Blocked, Coefficients::Q32(c)) => {
                convolve_blocked(self.history, self.staging, taps_of(c, taps), q, input, output);
            }
        }
    }

    /// Binds the lane to a new configuration.
    ///
    /// When the tap count changes the `min(old, new) - 1` most recent inputs
    /// are kept, which is exactly what the blocked layout can carry over.
    pub(crate) fn bind(&mut self, strategy: KernelStrategy, config: &FilterConfig<'_>) {
        self.state.variant = KernelVariant::select(S::WIDTH, config.coef_width());
        let (old, new) = (self.state.taps, config.num_taps);
        if old == new {
            return;
        }
        match strategy {
            KernelStrategy::PerSample => {
                // oldest sample first, newest at old-1; slot 0 is overwritten
                // by the next input
                self.history[..old].rotate_left(self.state.write_idx % old);
                resize_window(&mut self.history[1..], old - 1, new - 1);
                self.history[0] = S::default();
                self.state.write_idx = 0;
            }
            KernelStrategy::Blocked => resize_window(self.history, old - 1, new - 1),
        }
        self.state.taps = new;
    }

    /// Copies another lane's history and state header into this one.
    pub(crate) fn copy_from(&mut self, other: &FilterLane<'_, S>) {
        self.history.copy_from_slice(&other.history[..]);
        self.state = other.state;
    }

    /// Zeroes the history, staging and write index.
    pub(crate) fn clear(&mut self) {
        self.history.fill(S::default());
        self.staging.fill(S::default());
        self.state.write_idx = 0;
    }

    #[cfg(test)]
    pub(crate) fn history(&self) -> &[S] {
        &self.history[..]
    }
}

/// Re-lays out a chronological window (newest last) of `old` samples as one
/// of `new` samples, keeping the newest `min(old, new)`.
fn resize_window<S: Sample>(window: &mut [S], old: usize, new: usize) {
    if new < old {
        window.copy_within(old - new..old, 0);
        window[new..old].fill(S::default());
    } else if new > old {
        window.copy_within(0..old, new - old);
        window[..new - old].fill(S::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference FIR: direct sum over the full input history.
    fn reference<S: Sample, C: Coefficient>(coeffs: &[C], q: i16, input: &[S]) -> Vec<S> {
        (0..input.len())
            .map(|n| {
                let acc = coeffs
                    .iter()
                    .enumerate()
                    .filter(|&(k, _)| k <= n)
                    .fold(0_i64, |acc, (k, &c)| acc + c.widen() * input[n - k].to_acc());
                S::saturate(round_shift(acc, q))
            })
            .collect()
    }

    fn ramp_i16(len: usize) -> Vec<i16> {
        (0..len).map(|i| ((i as i32 * 977) % 20_000 - 10_000) as i16).collect()
    }

    #[test]
    fn variant_selection_covers_all_pairs() {
        assert_eq!(KernelVariant::select(DataWidth::Bits16, CoefWidth::Bits16), KernelVariant::C16xD16);
        assert_eq!(KernelVariant::select(DataWidth::Bits16, CoefWidth::Bits32), KernelVariant::C32xD16);
        assert_eq!(KernelVariant::select(DataWidth::Bits32, CoefWidth::Bits16), KernelVariant::C16xD32);
        assert_eq!(KernelVariant::select(DataWidth::Bits32, CoefWidth::Bits32), KernelVariant::C32xD32);
        for v in [
            KernelVariant::C16xD16,
            KernelVariant::C32xD16,
            KernelVariant::C16xD32,
            KernelVariant::C32xD32,
        ] {
            assert_eq!(KernelVariant::select(v.data_width(), v.coef_width()), v);
        }
    }

    #[test]
    fn circular_matches_reference_across_calls() {
        let coeffs = [8192_i16, -4096, 2048, 1024, -512];
        let input = ramp_i16(97);
        let expected = reference(&coeffs, 14, &input);

        let mut history = [0_i16; 8];
        let mut idx = 0;
        let mut out = vec![0_i16; input.len()];
        for (i, o) in input.chunks(13).zip(out.chunks_mut(13)) {
            convolve(&mut history, &mut idx, &coeffs, 14, i, o);
        }
        assert_eq!(out, expected);
    }

    #[test]
    fn blocked_matches_circular() {
        let coeffs = [1_i32 << 20, -(1 << 19), 3 << 17, 1 << 16];
        let input: Vec<i32> = (0..600).map(|i| (i * 7919 % 65_536 - 32_768) << 8).collect();

        let mut history = [0_i32; 4];
        let mut idx = 0;
        let mut circular = vec![0_i32; input.len()];
        convolve(&mut history, &mut idx, &coeffs, 21, &input, &mut circular);

        let mut linear = vec![0_i32; 4 + BLOCK_SAMPLES];
        let mut staging = vec![0_i32; BLOCK_SAMPLES];
        let mut blocked = vec![0_i32; input.len()];
        for (i, o) in input.chunks(250).zip(blocked.chunks_mut(250)) {
            convolve_blocked(&mut linear, &mut staging, &coeffs, 21, i, o);
        }
        assert_eq!(blocked, circular);
    }

    #[test]
    fn single_tap_is_scaled_copy() {
        let coeffs = [3_i16 << 12];
        let input = [1000_i16, -1000, 7, -7, 32_767];
        let mut history = [0_i16; 1];
        let mut idx = 0;
        let mut out = [0_i16; 5];
        convolve(&mut history, &mut idx, &coeffs, 14, &input, &mut out);
        for (&x, &y) in input.iter().zip(&out) {
            let expected = ((i64::from(x) * (3 << 12) + (1 << 13)) >> 14) as i16;
            assert_eq!(y, expected);
        }
        assert_eq!(idx, 0);
    }

    #[test]
    fn output_saturates() {
        let coeffs = [i16::MAX, i16::MAX];
        let mut history = [0_i16; 2];
        let mut idx = 0;
        let mut out = [0_i16; 4];
        let input = [i16::MAX, i16::MAX, i16::MIN, i16::MIN];
        convolve(&mut history, &mut idx, &coeffs, 0, &input, &mut out);
        assert_eq!(out, [i16::MAX, i16::MAX, -i16::MAX, i16::MIN]);
    }

    #[test]
    fn resize_keeps_newest_samples() {
        let mut w = [1_i16, 2, 3, 4, 5, 0, 0, 0];
        resize_window(&mut w, 5, 3);
        assert_eq!(&w[..5], &[3, 4, 5, 0, 0]);

        let mut w = [1_i16, 2, 3, 0, 0, 0];
        resize_window(&mut w, 3, 5);
        assert_eq!(&w[..5], &[0, 0, 1, 2, 3]);
    }

    #[test]
    fn lane_bind_linearizes_circular_history() {
        let mut history = [0_i16; 8];
        let mut staging: [i16; 0] = [];
        let mut lane = FilterLane::new(&mut history, &mut staging, KernelVariant::C16xD16);
        let c4 = [1_i16; 4];
        let four = FilterConfig::new(0, &c4[..]);
        lane.bind(KernelStrategy::PerSample, &four);

        let mut out = [0_i16; 6];
        lane.run(KernelStrategy::PerSample, &four, &[1, 2, 3, 4, 5, 6], &mut out);
        // history holds 5, 6, 3, 4 with write index 2
        assert_eq!(lane.state.write_idx, 2);

        let c2 = [1_i16; 2];
        lane.bind(KernelStrategy::PerSample, &FilterConfig::new(0, &c2[..]));
        assert_eq!(&lane.history()[..2], &[0, 6]);
        assert_eq!(lane.state.write_idx, 0);
        assert_eq!(lane.state.taps, 2);
    }
}
