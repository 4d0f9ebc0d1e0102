//! The FIR engine: one filter instance over one caller-supplied block.
//!
//! # Lifecycle
//!
//! ```text
//! plan(&params) ──> host allocates block ──> FirEngine::init(params, block)
//!                                                   │
//!        set_configuration / set_crossfade_params / set_feature_enabled
//!                                                   │
//!                                        process(input, output) ...
//! ```
//!
//! Control calls and `process` take `&mut self`, so the borrow checker
//! serializes them. Hosts that reconfigure from another thread wrap the
//! engine in their own lock or hand configurations over a queue.
//!
//! # Replacing coefficients
//!
//! With crossfading enabled and coefficients already active, a new
//! configuration with no more taps than the active one starts a crossfade:
//! the active filter (configuration, history and write index) becomes the
//! outgoing filter, both run for `max_transition_samples`, and the
//! [`PannerState`] ramps from the old output to the new. While that runs a
//! further configuration is queued (last one wins) and promoted when the
//! ramp reaches unity. Everything else replaces the active configuration
//! immediately, keeping the most recent input history.

use crate::counters::{Counter, FirCounters};
use crate::error::FirError;
use crate::kernel::{FilterLane, KernelVariant};
use crate::panner::{PannerState, transition_samples};
use crate::params::{CrossfadeParams, FilterConfig, StaticParams};
use crate::plan::{BLOCK_ALIGN, MemoryPlan, Region};
use crate::sample::{CoefWidth, Sample};
use crate::slots::{Replacement, Slots};

/// Snapshot of the crossfade state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransitionStatus {
    /// An outgoing filter is still being faded out.
    pub in_transition: bool,
    /// A configuration is waiting for the transition to finish.
    pub queued: bool,
    /// Samples left before the transition completes.
    pub remaining_samples: u32,
}

/// Fixed-point FIR filter with crossfaded coefficient replacement.
///
/// `'a` bounds the working block, every coefficient slice handed to
/// [`set_configuration`](Self::set_configuration) and the optional
/// [`FirCounters`].
///
/// # Example
///
/// ```rust
/// use fadefir_core::{CrossfadeParams, DataWidth, FilterConfig, FirEngine, MemoryPlan, StaticParams};
///
/// let params = StaticParams::new(DataWidth::Bits16, 48000, 4, 8);
/// let plan = MemoryPlan::new(&params);
/// let mut words = vec![0_u64; plan.required_words()];
/// let block: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
///
/// let taps = [1_i16 << 14, 1 << 13];
/// let mut fir = FirEngine::<i16>::init(params, block).unwrap();
/// fir.set_crossfade_params(CrossfadeParams::enabled(10)).unwrap();
/// fir.set_configuration(FilterConfig::new(14, &taps[..])).unwrap();
///
/// let mut out = [0_i16; 4];
/// fir.process(&[100, 0, 0, 0], &mut out).unwrap();
/// assert_eq!(out, [100, 50, 0, 0]);
/// ```
#[derive(Debug)]
pub struct FirEngine<'a, S: Sample> {
    params: StaticParams,
    plan: MemoryPlan,
    feature_enabled: bool,
    crossfade: CrossfadeParams,
    panner: PannerState,
    slots: Slots<'a>,
    active: FilterLane<'a, S>,
    outgoing: FilterLane<'a, S>,
    scratch: &'a mut [S],
    counters: Option<&'a FirCounters>,
}

/// Splits `region` off the front of `block` and views it as samples.
fn carve<S: Sample>(block: &mut [u8], region: Region) -> Result<(&mut [S], &mut [u8]), FirError> {
    let (head, rest) = block.split_at_mut(region.bytes);
    let samples: &mut [S] =
        bytemuck::try_cast_slice_mut(head).map_err(|_| FirError::MisalignedBlock)?;
    Ok((&mut samples[..region.samples], rest))
}

impl<'a, S: Sample> FirEngine<'a, S> {
    /// Validates `params`, zeroes `block` and lays the engine's memory out
    /// in it.
    ///
    /// `block` must be at least [`MemoryPlan::required_bytes`] long and
    /// 8-byte aligned; allocating it as `[u64]` and casting with
    /// `bytemuck::cast_slice_mut` satisfies both.
    ///
    /// The engine starts with the feature enabled, crossfading disabled and
    /// a single-tap configuration without coefficients, so `process` copies
    /// input to output until coefficients arrive.
    pub fn init(params: StaticParams, block: &'a mut [u8]) -> Result<Self, FirError> {
        params.validate()?;
        if params.data_width != S::WIDTH {
            return Err(FirError::DataWidthMismatch {
                expected: params.data_width,
                actual: S::WIDTH,
            });
        }

        let plan = MemoryPlan::new(&params);
        let required = plan.required_bytes();
        if block.len() < required {
            return Err(FirError::AllocationTooSmall {
                required,
                provided: block.len(),
            });
        }
        if block.as_ptr().align_offset(BLOCK_ALIGN) != 0 {
            return Err(FirError::MisalignedBlock);
        }

        let block = &mut block[..required];
        block.fill(0);

        let (active_history, rest) = carve::<S>(block, plan.active_history)?;
        let (active_staging, rest) = carve::<S>(rest, plan.active_staging)?;
        let (outgoing_history, rest) = carve::<S>(rest, plan.outgoing_history)?;
        let (outgoing_staging, rest) = carve::<S>(rest, plan.outgoing_staging)?;
        let (scratch, _) = carve::<S>(rest, plan.outgoing_output)?;

        let variant = KernelVariant::select(S::WIDTH, CoefWidth::Bits16);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "fir_init: {:?} {} Hz, {} taps, frame {}, {} bytes",
            params.data_width,
            params.sample_rate,
            params.max_num_taps,
            params.frame_size,
            required
        );

        Ok(Self {
            params,
            plan,
            feature_enabled: true,
            crossfade: CrossfadeParams::default(),
            panner: PannerState::default(),
            slots: Slots::default(),
            active: FilterLane::new(active_history, active_staging, variant),
            outgoing: FilterLane::new(outgoing_history, outgoing_staging, variant),
            scratch,
            counters: None,
        })
    }

    /// Routes engine events into `counters`.
    pub fn attach_counters(&mut self, counters: &'a FirCounters) {
        self.counters = Some(counters);
    }

    #[inline]
    fn count(&self, counter: Counter) {
        if let Some(c) = self.counters {
            c.record(counter);
        }
    }

    fn crossfade_on(&self) -> bool {
        self.crossfade.enabled && self.feature_enabled
    }

    /// Applies a new filter configuration.
    ///
    /// Depending on the crossfade state the configuration replaces the
    /// active one immediately, starts a crossfade, or is queued behind the
    /// running crossfade. On error nothing changes.
    ///
    /// # Errors
    ///
    /// - [`FirError::InvalidTapCount`] for zero taps
    /// - [`FirError::TapCountExceedsCapacity`] beyond `max_num_taps`
    /// - [`FirError::CoefficientsTooShort`] if the slice has fewer than `num_taps` entries
    /// - [`FirError::QueuedTapCountExceedsActive`] when a crossfade is running
    ///   and the configuration is longer than the active filter
    pub fn set_configuration(&mut self, config: FilterConfig<'a>) -> Result<(), FirError> {
        let replacement = config
            .validate(self.params.max_num_taps)
            .and_then(|()| self.slots.classify(&config))
            .inspect_err(|_err| {
                self.count(Counter::RejectedConfigs);
                #[cfg(feature = "tracing")]
                tracing::warn!("fir_config: rejected {} taps: {_err}", config.num_taps);
            })?;

        match replacement {
            Replacement::Synchronous => self.replace_now(config),
            Replacement::Crossfade => self.begin_crossfade(config),
            Replacement::Queued => {
                self.slots.enqueue(config);
                #[cfg(feature = "tracing")]
                tracing::debug!("fir_config: queued {} taps", config.num_taps);
            }
        }
        Ok(())
    }

    fn replace_now(&mut self, config: FilterConfig<'a>) {
        if self.slots.in_transition() {
            self.panner.finish();
        }
        self.slots.replace(config);
        self.active.bind(self.params.kernel, &config);
        self.slots.rearm(self.crossfade_on());
        self.count(Counter::SynchronousReplacements);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "fir_config: replaced, {} taps q{} ({:?})",
            config.num_taps,
            config.q_factor,
            self.active.state.variant
        );
    }

    fn begin_crossfade(&mut self, config: FilterConfig<'a>) {
        self.outgoing.copy_from(&self.active);
        self.slots.begin_crossfade(config);
        self.active.bind(self.params.kernel, &config);
        self.panner.arm();
        self.slots.rearm(self.crossfade_on());
        self.count(Counter::TransitionsStarted);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "fir_crossfade: start, {} -> {} taps over {} samples",
            self.outgoing.state.taps,
            config.num_taps,
            self.panner.max_transition_samples()
        );
    }

    /// Ends the running transition and promotes the queued configuration.
    fn retire(&mut self) {
        self.panner.finish();
        let queued = self.slots.retire();
        self.slots.rearm(self.crossfade_on());
        self.count(Counter::TransitionsCompleted);

        #[cfg(feature = "tracing")]
        tracing::debug!("fir_crossfade: complete, queued={}", queued.is_some());

        if let Some(next) = queued {
            self.count(Counter::QueuedPromotions);
            if let Err(_err) = self.set_configuration(next) {
                #[cfg(feature = "tracing")]
                tracing::warn!("fir_crossfade: dropped queued configuration: {_err}");
            }
        }
    }

    /// Updates crossfade mode and transition length.
    ///
    /// Disabling crossfading abandons a running transition (the active
    /// filter takes over at unity gain) and drops any queued configuration.
    /// The new length applies to the next transition.
    ///
    /// # Errors
    ///
    /// [`FirError::CrossfadeUnavailable`] when enabling on an engine planned
    /// without `crossfade_capable`.
    pub fn set_crossfade_params(&mut self, params: CrossfadeParams) -> Result<(), FirError> {
        if params.enabled && !self.params.crossfade_capable {
            return Err(FirError::CrossfadeUnavailable);
        }

        if params.transition_ms != self.crossfade.transition_ms {
            self.panner.set_max_transition_samples(transition_samples(
                self.params.sample_rate,
                params.transition_ms,
            ));
        }
        self.crossfade = params;

        if !params.enabled && self.slots.in_transition() {
            self.slots.cancel();
            self.panner.finish();
        }
        self.slots.rearm(self.crossfade_on());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "fir_crossfade: enabled={} {} ms ({} samples)",
            params.enabled,
            params.transition_ms,
            self.panner.max_transition_samples()
        );
        Ok(())
    }

    /// Enables or bypasses filtering.
    ///
    /// While disabled `process` copies input to output and any running
    /// transition is frozen; it resumes when the feature is re-enabled.
    pub fn set_feature_enabled(&mut self, enabled: bool) {
        self.feature_enabled = enabled;
        self.slots.rearm(self.crossfade_on());

        #[cfg(feature = "tracing")]
        tracing::debug!("fir_feature: enabled={enabled}");
    }

    /// Clears both filter histories. Configurations and any running
    /// transition are kept.
    pub fn reset(&mut self) {
        self.active.clear();
        self.outgoing.clear();
        self.scratch.fill(S::default());

        #[cfg(feature = "tracing")]
        tracing::debug!("fir_reset");
    }

    /// Filters one frame.
    ///
    /// # Errors
    ///
    /// - [`FirError::FrameTooLarge`] if `input` is longer than `frame_size`
    /// - [`FirError::FrameLengthMismatch`] if `output` differs in length from `input`
    pub fn process(&mut self, input: &[S], output: &mut [S]) -> Result<(), FirError> {
        let samples = input.len();
        if samples > self.params.frame_size {
            return Err(FirError::FrameTooLarge {
                samples,
                frame_size: self.params.frame_size,
            });
        }
        if output.len() != samples {
            return Err(FirError::FrameLengthMismatch {
                input: samples,
                output: output.len(),
            });
        }

        self.count(Counter::Frames);
        if !self.feature_enabled {
            output.copy_from_slice(input);
            self.count(Counter::PassthroughFrames);
            return Ok(());
        }

        let kernel = self.params.kernel;
        self.active.run(kernel, &self.slots.active, input, output);
        if !self.slots.active.has_coefficients() {
            self.count(Counter::PassthroughFrames);
        }

        if let Some(previous) = self.slots.outgoing {
            let scratch = &mut self.scratch[..samples];
            self.outgoing.run(kernel, &previous, input, scratch);
            self.panner.blend(output, scratch);
            if self.panner.is_complete() {
                self.retire();
            }
        }
        Ok(())
    }

    /// Configuration driving the output.
    pub fn active_config(&self) -> &FilterConfig<'a> {
        self.slots.active()
    }

    /// Configuration waiting behind the running transition.
    pub fn queued_config(&self) -> Option<&FilterConfig<'a>> {
        self.slots.queued()
    }

    /// Configuration being faded out.
    pub fn outgoing_config(&self) -> Option<&FilterConfig<'a>> {
        self.slots.outgoing()
    }

    /// Current crossfade settings.
    pub fn crossfade_params(&self) -> CrossfadeParams {
        self.crossfade
    }

    /// Gain ramp state.
    pub fn panner(&self) -> &PannerState {
        &self.panner
    }

    /// Whether a transition is running or queued, and how far it has left.
    pub fn transition_status(&self) -> TransitionStatus {
        let in_transition = self.slots.in_transition();
        TransitionStatus {
            in_transition,
            queued: self.slots.queued().is_some(),
            remaining_samples: if in_transition {
                self.panner.remaining_transition_samples()
            } else {
                0
            },
        }
    }

    /// Whether the next replacement would crossfade.
    pub fn is_crossfade_armed(&self) -> bool {
        self.slots.is_armed()
    }

    /// Kernel selected for the active configuration.
    pub fn kernel_variant(&self) -> KernelVariant {
        self.active.state.variant
    }

    /// Whether filtering is enabled.
    pub fn is_feature_enabled(&self) -> bool {
        self.feature_enabled
    }

    /// Parameters the engine was initialized with.
    pub fn static_params(&self) -> &StaticParams {
        &self.params
    }

    /// Layout of the working block.
    pub fn plan(&self) -> &MemoryPlan {
        &self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::DataWidth;

    fn block_for(params: &StaticParams) -> Vec<u64> {
        vec![0_u64; MemoryPlan::new(params).required_words()]
    }

    #[test]
    fn init_rejects_width_mismatch() {
        let params = StaticParams::new(DataWidth::Bits32, 48000, 8, 16);
        let mut words = block_for(&params);
        let err = FirEngine::<i16>::init(params, bytemuck::cast_slice_mut(&mut words)).unwrap_err();
        assert_eq!(
            err,
            FirError::DataWidthMismatch {
                expected: DataWidth::Bits32,
                actual: DataWidth::Bits16
            }
        );
    }

    #[test]
    fn init_rejects_short_block() {
        let params = StaticParams::new(DataWidth::Bits16, 48000, 8, 16);
        let required = MemoryPlan::new(&params).required_bytes();
        let mut words = vec![0_u64; required / 8 - 1];
        let err = FirEngine::<i16>::init(params, bytemuck::cast_slice_mut(&mut words)).unwrap_err();
        assert_eq!(
            err,
            FirError::AllocationTooSmall {
                required,
                provided: required - 8
            }
        );
    }

    #[test]
    fn init_rejects_misaligned_block() {
        let params = StaticParams::new(DataWidth::Bits16, 48000, 8, 16);
        let mut words = vec![0_u64; MemoryPlan::new(&params).required_words() + 1];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
        let err = FirEngine::<i16>::init(params, &mut bytes[1..]).unwrap_err();
        assert_eq!(err, FirError::MisalignedBlock);
    }

    #[test]
    fn init_rejects_zero_sizes() {
        let params = StaticParams::new(DataWidth::Bits16, 48000, 0, 16);
        let mut words = vec![0_u64; 4];
        assert!(matches!(
            FirEngine::<i16>::init(params, bytemuck::cast_slice_mut(&mut words)),
            Err(FirError::InvalidStaticParams(_))
        ));
    }

    #[test]
    fn init_zeroes_block_and_sets_defaults() {
        let params = StaticParams::new(DataWidth::Bits32, 16000, 8, 16);
        let mut words = vec![u64::MAX; MemoryPlan::new(&params).required_words()];
        let fir = FirEngine::<i32>::init(params, bytemuck::cast_slice_mut(&mut words)).unwrap();

        assert!(fir.is_feature_enabled());
        assert!(!fir.crossfade_params().enabled);
        assert_eq!(*fir.active_config(), FilterConfig::default());
        assert_eq!(fir.kernel_variant(), KernelVariant::C16xD32);
        assert_eq!(fir.transition_status(), TransitionStatus::default());

        assert!(words.iter().all(|&w| w == 0));
    }

    #[test]
    fn crossfade_needs_capable_plan() {
        let params = StaticParams::new(DataWidth::Bits16, 48000, 8, 16).with_crossfade(false);
        let mut words = block_for(&params);
        let mut fir = FirEngine::<i16>::init(params, bytemuck::cast_slice_mut(&mut words)).unwrap();
        assert_eq!(
            fir.set_crossfade_params(CrossfadeParams::enabled(5)),
            Err(FirError::CrossfadeUnavailable)
        );
        assert_eq!(fir.set_crossfade_params(CrossfadeParams::disabled()), Ok(()));
    }

    #[test]
    fn duration_sets_transition_length() {
        let params = StaticParams::new(DataWidth::Bits16, 48000, 8, 16);
        let mut words = block_for(&params);
        let mut fir = FirEngine::<i16>::init(params, bytemuck::cast_slice_mut(&mut words)).unwrap();
        fir.set_crossfade_params(CrossfadeParams::enabled(20)).unwrap();
        assert_eq!(fir.panner().max_transition_samples(), 960);
    }

    #[test]
    fn frame_checks() {
        let params = StaticParams::new(DataWidth::Bits16, 48000, 8, 4);
        let mut words = block_for(&params);
        let mut fir = FirEngine::<i16>::init(params, bytemuck::cast_slice_mut(&mut words)).unwrap();

        let mut out = [0_i16; 5];
        assert_eq!(
            fir.process(&[0; 5], &mut out),
            Err(FirError::FrameTooLarge {
                samples: 5,
                frame_size: 4
            })
        );
        assert_eq!(
            fir.process(&[0; 3], &mut out[..2]),
            Err(FirError::FrameLengthMismatch {
                input: 3,
                output: 2
            })
        );
        assert_eq!(fir.process(&[], &mut []), Ok(()));
    }

    #[test]
    fn armed_only_with_coefficients_and_crossfade() {
        let params = StaticParams::new(DataWidth::Bits16, 48000, 8, 16);
        let mut words = block_for(&params);
        let taps = [1_i16; 4];
        let mut fir = FirEngine::<i16>::init(params, bytemuck::cast_slice_mut(&mut words)).unwrap();

        fir.set_crossfade_params(CrossfadeParams::enabled(1)).unwrap();
        assert!(!fir.is_crossfade_armed());
        fir.set_configuration(FilterConfig::new(0, &taps[..])).unwrap();
        assert!(fir.is_crossfade_armed());
        fir.set_feature_enabled(false);
        assert!(!fir.is_crossfade_armed());
        fir.set_feature_enabled(true);
        assert!(fir.is_crossfade_armed());
        fir.set_crossfade_params(CrossfadeParams::disabled()).unwrap();
        assert!(!fir.is_crossfade_armed());
    }
}
