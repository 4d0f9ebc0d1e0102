//! Linear crossfade between the outgoing and the active filter.
//!
//! During a transition both filters run over the same input frame. The
//! panner blends them sample by sample:
//!
//! ```text
//! out[i] = outgoing[i] + gain * (active[i] - outgoing[i])
//! gain   : 0 ──────────────────────────────▶ 1 (Q30)
//!          |<----- max_transition_samples ----->|
//! ```
//!
//! The gain starts at zero, grows by `gain_step` after every blended sample
//! and is clamped at unity. `gain_step` is `1 / max_transition_samples`
//! rounded up, so the last blended sample leaves the gain at exactly unity.

use crate::fixed::{GAIN_Q, UNITY_Q30, divide_qx, mul_q30};
use crate::sample::Sample;

/// Transition length in samples for a duration in milliseconds.
///
/// ```rust
/// use fadefir_core::panner::transition_samples;
///
/// assert_eq!(transition_samples(48000, 20), 960);
/// assert_eq!(transition_samples(44100, 5), 220);
/// ```
pub fn transition_samples(sample_rate: u32, transition_ms: u32) -> u32 {
    let samples = u64::from(sample_rate) * u64::from(transition_ms) / 1000;
    u32::try_from(samples).unwrap_or(u32::MAX)
}

/// Gain ramp state of one crossfade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PannerState {
    max_transition_samples: u32,
    remaining_transition_samples: u32,
    current_gain: i32,
    gain_step: i32,
}

impl Default for PannerState {
    fn default() -> Self {
        Self {
            max_transition_samples: 0,
            remaining_transition_samples: 0,
            current_gain: UNITY_Q30,
            gain_step: UNITY_Q30,
        }
    }
}

impl PannerState {
    /// Idle panner at unity gain with the given transition length.
    pub fn new(max_transition_samples: u32) -> Self {
        Self {
            max_transition_samples,
            ..Self::default()
        }
    }

    /// Changes the transition length used by the next [`arm`](Self::arm).
    pub fn set_max_transition_samples(&mut self, samples: u32) {
        self.max_transition_samples = samples;
    }

    /// Starts a ramp from zero to unity.
    ///
    /// With a zero transition length the ramp is already complete.
    pub fn arm(&mut self) {
        if self.max_transition_samples == 0 {
            self.finish();
            return;
        }
        self.remaining_transition_samples = self.max_transition_samples;
        self.current_gain = 0;
        self.gain_step = divide_qx(1, self.max_transition_samples, GAIN_Q);
    }

    /// Ends the ramp: no samples remain and the gain is pinned to unity.
    pub fn finish(&mut self) {
        self.remaining_transition_samples = 0;
        self.current_gain = UNITY_Q30;
    }

    /// Blends `outgoing` into `active` in place for the leading
    /// `min(remaining, active.len())` samples; the rest of `active` is left
    /// as-is. Returns the number of blended samples.
    pub fn blend<S: Sample>(&mut self, active: &mut [S], outgoing: &[S]) -> usize {
        let n = active
            .len()
            .min(outgoing.len())
            .min(self.remaining_transition_samples as usize);

        for (a, &o) in active[..n].iter_mut().zip(&outgoing[..n]) {
            let o = o.to_acc();
            let diff = a.to_acc() - o;
            *a = S::saturate(o + mul_q30(self.current_gain, diff));
            self.current_gain = self
                .current_gain
                .saturating_add(self.gain_step)
                .min(UNITY_Q30);
        }

        self.remaining_transition_samples -= n as u32;
        n
    }

    /// Returns `true` once no transition samples remain.
    pub fn is_complete(&self) -> bool {
        self.remaining_transition_samples == 0
    }

    /// Transition length in samples.
    pub fn max_transition_samples(&self) -> u32 {
        self.max_transition_samples
    }

    /// Samples left in the current ramp.
    pub fn remaining_transition_samples(&self) -> u32 {
        self.remaining_transition_samples
    }

    /// Current gain of the active filter, Q30.
    pub fn current_gain(&self) -> i32 {
        self.current_gain
    }

    /// Per-sample gain increment, Q30.
    pub fn gain_step(&self) -> i32 {
        self.gain_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_resets_gain_and_counts() {
        let mut p = PannerState::new(480);
        assert!(p.is_complete());
        assert_eq!(p.current_gain(), UNITY_Q30);

        p.arm();
        assert_eq!(p.remaining_transition_samples(), 480);
        assert_eq!(p.current_gain(), 0);
        assert!(p.gain_step() > 0);
    }

    #[test]
    fn zero_length_transition_is_complete_immediately() {
        let mut p = PannerState::new(0);
        p.arm();
        assert!(p.is_complete());
        assert_eq!(p.current_gain(), UNITY_Q30);
    }

    #[test]
    fn first_sample_is_fully_outgoing_last_fully_active() {
        let mut p = PannerState::new(4);
        p.arm();
        let mut active = [1000_i16; 4];
        let outgoing = [-1000_i16; 4];
        assert_eq!(p.blend(&mut active, &outgoing), 4);
        assert_eq!(active[0], -1000);
        assert_eq!(active[1], -500);
        assert_eq!(active[2], 0);
        assert_eq!(active[3], 500);
        assert!(p.is_complete());
        assert_eq!(p.current_gain(), UNITY_Q30);
    }

    #[test]
    fn blend_spans_frames_and_leaves_tail_untouched() {
        let mut p = PannerState::new(6);
        p.arm();
        let outgoing = [0_i32; 4];

        let mut frame = [4000_i32; 4];
        assert_eq!(p.blend(&mut frame, &outgoing), 4);
        assert_eq!(p.remaining_transition_samples(), 2);

        let mut frame = [4000_i32; 4];
        assert_eq!(p.blend(&mut frame, &outgoing), 2);
        assert!(p.is_complete());
        assert_eq!(&frame[2..], &[4000, 4000]);
    }

    #[test]
    fn gain_is_monotonic_and_bounded() {
        let mut p = PannerState::new(1000);
        p.arm();
        let outgoing = [i32::MIN; 64];
        let mut last = p.current_gain();
        while !p.is_complete() {
            let mut frame = [i32::MAX; 64];
            p.blend(&mut frame, &outgoing);
            assert!(p.current_gain() >= last);
            assert!(p.current_gain() <= UNITY_Q30);
            last = p.current_gain();
        }
        assert_eq!(p.current_gain(), UNITY_Q30);
    }
}
