//! Error type shared by every fallible engine operation.
//!
//! Every variant is non-destructive: when an operation returns an error the
//! engine is left exactly as it was before the call.

use crate::sample::DataWidth;

/// Errors returned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FirError {
    /// The memory block is smaller than [`MemoryPlan::required_bytes`](crate::MemoryPlan::required_bytes).
    ///
    /// Fatal at init: re-plan and retry with a larger block.
    #[error("memory block too small: {required} bytes required, {provided} provided")]
    AllocationTooSmall {
        /// Bytes the plan requires.
        required: usize,
        /// Bytes the caller handed over.
        provided: usize,
    },

    /// The memory block does not start on an 8-byte boundary.
    #[error("memory block is not 8-byte aligned")]
    MisalignedBlock,

    /// The engine's sample type does not match `StaticParams::data_width`.
    #[error("data width mismatch: static parameters say {expected:?}, engine samples are {actual:?}")]
    DataWidthMismatch {
        /// Width declared in the static parameters.
        expected: DataWidth,
        /// Width of the sample type the engine was instantiated with.
        actual: DataWidth,
    },

    /// A static parameter is zero or otherwise unusable.
    #[error("invalid static parameters: {0}")]
    InvalidStaticParams(&'static str),

    /// A configuration asked for zero taps.
    #[error("tap count must be at least 1")]
    InvalidTapCount,

    /// A configuration asked for more taps than the block was sized for.
    #[error("tap count {requested} exceeds capacity {capacity}")]
    TapCountExceedsCapacity {
        /// Requested tap count.
        requested: usize,
        /// `StaticParams::max_num_taps`.
        capacity: usize,
    },

    /// A configuration arriving mid-transition is longer than the active filter.
    #[error("queued tap count {requested} exceeds active tap count {active}")]
    QueuedTapCountExceedsActive {
        /// Requested tap count.
        requested: usize,
        /// Tap count of the filter currently fading in.
        active: usize,
    },

    /// The coefficient slice holds fewer values than `num_taps`.
    #[error("coefficient slice too short: {needed} taps, {provided} coefficients")]
    CoefficientsTooShort {
        /// Declared tap count.
        needed: usize,
        /// Length of the coefficient slice.
        provided: usize,
    },

    /// Crossfading was requested on an engine planned without crossfade memory.
    #[error("crossfade requested but the block was planned without crossfade memory")]
    CrossfadeUnavailable,

    /// `process` was called with more samples than `StaticParams::frame_size`.
    #[error("frame of {samples} samples exceeds frame size {frame_size}")]
    FrameTooLarge {
        /// Samples in the rejected frame.
        samples: usize,
        /// `StaticParams::frame_size`.
        frame_size: usize,
    },

    /// Input and output frames differ in length.
    #[error("input frame has {input} samples, output frame has {output}")]
    FrameLengthMismatch {
        /// Input length.
        input: usize,
        /// Output length.
        output: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_too_small_display() {
        let err = FirError::AllocationTooSmall {
            required: 4096,
            provided: 128,
        };
        assert_eq!(
            err.to_string(),
            "memory block too small: 4096 bytes required, 128 provided"
        );
    }

    #[test]
    fn tap_count_display() {
        let err = FirError::TapCountExceedsCapacity {
            requested: 65,
            capacity: 64,
        };
        assert_eq!(err.to_string(), "tap count 65 exceeds capacity 64");
    }

    #[test]
    fn data_width_display_names_both_widths() {
        let err = FirError::DataWidthMismatch {
            expected: DataWidth::Bits32,
            actual: DataWidth::Bits16,
        };
        let msg = err.to_string();
        assert!(msg.contains("Bits32"), "got: {msg}");
        assert!(msg.contains("Bits16"), "got: {msg}");
    }
}
