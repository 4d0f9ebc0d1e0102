//! Memory planning for the single working block.
//!
//! The host calls [`MemoryPlan::new`] (or [`plan`]) once, allocates a block of
//! [`required_bytes`](MemoryPlan::required_bytes), and hands it to
//! [`FirEngine::init`](crate::FirEngine::init). Nothing is allocated after
//! that.
//!
//! # Layout
//!
//! Every region starts on an 8-byte boundary. Regions that a configuration
//! does not need have zero length.
//!
//! ```text
//! +--------------------------+  offset 0
//! | active history           |  max_num_taps (+ BLOCK_SAMPLES when Blocked)
//! +--------------------------+
//! | active output staging    |  BLOCK_SAMPLES, Blocked only
//! +--------------------------+
//! | outgoing history         |  same size as active history
//! +--------------------------+
//! | outgoing output staging  |  BLOCK_SAMPLES, Blocked only
//! +--------------------------+
//! | outgoing output scratch  |  frame_size, crossfade_capable only
//! +--------------------------+  required_bytes
//! ```
//!
//! The control records (static parameter copy, feature flag, crossfade
//! parameters, panner, the three config slots and the two state headers)
//! live by value in the fixed-size [`FirEngine`](crate::FirEngine) handle;
//! [`MemoryPlan::handle_bytes`] reports that footprint.

use crate::engine::FirEngine;
use crate::kernel::BLOCK_SAMPLES;
use crate::params::{KernelStrategy, StaticParams};
use crate::sample::{DataWidth, Sample};

/// Alignment of the block and of every region inside it.
pub const BLOCK_ALIGN: usize = 8;

#[inline]
const fn align8(bytes: usize) -> usize {
    (bytes + BLOCK_ALIGN - 1) & !(BLOCK_ALIGN - 1)
}

/// One region of the block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Region {
    /// Byte offset from the start of the block.
    pub offset: usize,
    /// Byte length, rounded up to [`BLOCK_ALIGN`].
    pub bytes: usize,
    /// Samples the region holds.
    pub samples: usize,
}

impl Region {
    fn new(offset: usize, samples: usize, width: DataWidth) -> Self {
        Self {
            offset,
            bytes: align8(samples * width.bytes()),
            samples,
        }
    }

    /// Offset one past the end of the region.
    pub const fn end(&self) -> usize {
        self.offset + self.bytes
    }
}

/// Byte layout of the working block for one set of static parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryPlan {
    /// Width of every sample region.
    pub data_width: DataWidth,
    /// History of the filter driving the output.
    pub active_history: Region,
    /// Output staging of the active filter (Blocked kernel).
    pub active_staging: Region,
    /// History of the filter being faded out.
    pub outgoing_history: Region,
    /// Output staging of the outgoing filter (Blocked kernel).
    pub outgoing_staging: Region,
    /// One frame of outgoing-filter output, blended into the caller's buffer.
    pub outgoing_output: Region,
}

impl MemoryPlan {
    /// Lays out the block. Never fails; zero-sized parameters simply yield
    /// smaller regions and are rejected later by `init`.
    pub fn new(params: &StaticParams) -> Self {
        let width = params.data_width;
        let (history_samples, staging_samples) = match params.kernel {
            KernelStrategy::PerSample => (params.max_num_taps, 0),
            KernelStrategy::Blocked => (params.max_num_taps + BLOCK_SAMPLES, BLOCK_SAMPLES),
        };
        let scratch_samples = if params.crossfade_capable {
            params.frame_size
        } else {
            0
        };

        let active_history = Region::new(0, history_samples, width);
        let active_staging = Region::new(active_history.end(), staging_samples, width);
        let outgoing_history = Region::new(active_staging.end(), history_samples, width);
        let outgoing_staging = Region::new(outgoing_history.end(), staging_samples, width);
        let outgoing_output = Region::new(outgoing_staging.end(), scratch_samples, width);

        Self {
            data_width: width,
            active_history,
            active_staging,
            outgoing_history,
            outgoing_staging,
            outgoing_output,
        }
    }

    /// Exact size of the block in bytes.
    pub const fn required_bytes(&self) -> usize {
        self.outgoing_output.end()
    }

    /// Size of the block in 8-byte words, for hosts that allocate `[u64]`
    /// storage to get the alignment for free.
    pub const fn required_words(&self) -> usize {
        self.required_bytes() / BLOCK_ALIGN
    }

    /// Size of the engine handle that holds the control records.
    pub const fn handle_bytes<S: Sample>() -> usize {
        core::mem::size_of::<FirEngine<'static, S>>()
    }
}

/// Bytes needed for an engine with these static parameters.
///
/// ```rust
/// use fadefir_core::{DataWidth, StaticParams, plan};
///
/// let params = StaticParams::new(DataWidth::Bits16, 48000, 64, 480);
/// // two 64-tap histories plus one 480-sample scratch frame, 2 bytes each
/// assert_eq!(plan(&params), (64 + 64 + 480) * 2);
/// ```
pub fn plan(params: &StaticParams) -> usize {
    MemoryPlan::new(params).required_bytes()
}
