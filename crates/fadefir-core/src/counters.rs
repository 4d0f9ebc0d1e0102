//! Host-owned event counters.
//!
//! [`FirCounters`] stores one relaxed atomic per [`Counter`]. The host keeps
//! it anywhere that outlives the engine (a `static` works), attaches it with
//! [`FirEngine::attach_counters`](crate::FirEngine::attach_counters), and may
//! read a [`CounterSnapshot`] from another thread while audio is running.

use core::sync::atomic::{AtomicU32, Ordering};

/// Events the engine counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Counter {
    /// Calls to `process` that passed validation.
    Frames,
    /// Frames copied through unfiltered.
    PassthroughFrames,
    /// Crossfades started.
    TransitionsStarted,
    /// Crossfades that reached unity gain.
    TransitionsCompleted,
    /// Queued configurations promoted after a transition.
    QueuedPromotions,
    /// Configurations refused by `set_configuration`.
    RejectedConfigs,
    /// Configurations applied without a crossfade.
    SynchronousReplacements,
}

/// Lock-free event counters shared between the audio thread and a monitor.
#[derive(Debug, Default)]
pub struct FirCounters {
    frames: AtomicU32,
    passthrough_frames: AtomicU32,
    transitions_started: AtomicU32,
    transitions_completed: AtomicU32,
    queued_promotions: AtomicU32,
    rejected_configs: AtomicU32,
    synchronous_replacements: AtomicU32,
}

impl FirCounters {
    /// All counters at zero. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            frames: AtomicU32::new(0),
            passthrough_frames: AtomicU32::new(0),
            transitions_started: AtomicU32::new(0),
            transitions_completed: AtomicU32::new(0),
            queued_promotions: AtomicU32::new(0),
            rejected_configs: AtomicU32::new(0),
            synchronous_replacements: AtomicU32::new(0),
        }
    }

    fn slot(&self, counter: Counter) -> &AtomicU32 {
        match counter {
            Counter::Frames => &self.frames,
            Counter::PassthroughFrames => &self.passthrough_frames,
            Counter::TransitionsStarted => &self.transitions_started,
            Counter::TransitionsCompleted => &self.transitions_completed,
            Counter::QueuedPromotions => &self.queued_promotions,
            Counter::RejectedConfigs => &self.rejected_configs,
            Counter::SynchronousReplacements => &self.synchronous_replacements,
        }
    }

    /// Adds one to `counter`, wrapping on overflow.
    #[inline]
    pub fn record(&self, counter: Counter) {
        self.slot(counter).fetch_add(1, Ordering::Relaxed);
    }

    /// Current value of one counter.
    pub fn get(&self, counter: Counter) -> u32 {
        self.slot(counter).load(Ordering::Relaxed)
    }

    /// Reads every counter. Individual loads are not synchronized with each
    /// other, so a snapshot taken mid-frame may be off by one event.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            frames: self.get(Counter::Frames),
            passthrough_frames: self.get(Counter::PassthroughFrames),
            transitions_started: self.get(Counter::TransitionsStarted),
            transitions_completed: self.get(Counter::TransitionsCompleted),
            queued_promotions: self.get(Counter::QueuedPromotions),
            rejected_configs: self.get(Counter::RejectedConfigs),
            synchronous_replacements: self.get(Counter::SynchronousReplacements),
        }
    }

    /// Resets every counter to zero.
    pub fn clear(&self) {
        for counter in [
            Counter::Frames,
            Counter::PassthroughFrames,
            Counter::TransitionsStarted,
            Counter::TransitionsCompleted,
            Counter::QueuedPromotions,
            Counter::RejectedConfigs,
            Counter::SynchronousReplacements,
        ] {
            self.slot(counter).store(0, Ordering::Relaxed);
        }
    }
}

/// Plain copy of [`FirCounters`].
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub frames: u32,
    pub passthrough_frames: u32,
    pub transitions_started: u32,
    pub transitions_completed: u32,
    pub queued_promotions: u32,
    pub rejected_configs: u32,
    pub synchronous_replacements: u32,
}
