//! The three configuration slots and their replacement policy.
//!
//! ```text
//!                  set_configuration(c)
//!                          |
//!            armed? ---no--+--> Synchronous (active = c)
//!              |
//!             yes
//!              |
//!   outgoing live? --yes--> c.taps <= active.taps ? Queued : reject
//!              |
//!              no
//!              |
//!   c.taps <= active.taps ? Crossfade (outgoing = active, active = c)
//!                         : Synchronous
//! ```
//!
//! `Slots` only tracks which configuration sits where. Moving the filter
//! histories to match is the engine's job.

use crate::error::FirError;
use crate::params::FilterConfig;

/// How a new configuration enters the slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Replacement {
    /// Replace the active configuration immediately.
    Synchronous,
    /// Move the active configuration to outgoing and fade to the new one.
    Crossfade,
    /// Hold the configuration until the running transition completes.
    Queued,
}

/// Active, outgoing and queued configuration slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slots<'a> {
    pub(crate) active: FilterConfig<'a>,
    pub(crate) outgoing: Option<FilterConfig<'a>>,
    pub(crate) queued: Option<FilterConfig<'a>>,
    armed: bool,
}

impl<'a> Slots<'a> {
    /// Decides how `config` would be applied. Does not change any slot.
    pub fn classify(&self, config: &FilterConfig<'_>) -> Result<Replacement, FirError> {
        if !self.armed {
            return Ok(Replacement::Synchronous);
        }
        let fits = config.num_taps <= self.active.num_taps;
        match (self.outgoing.is_some(), fits) {
            (true, true) => Ok(Replacement::Queued),
            (true, false) => Err(FirError::QueuedTapCountExceedsActive {
                requested: config.num_taps,
                active: self.active.num_taps,
            }),
            (false, true) => Ok(Replacement::Crossfade),
            (false, false) => Ok(Replacement::Synchronous),
        }
    }

    /// Installs `config` as active and abandons any transition.
    pub(crate) fn replace(&mut self, config: FilterConfig<'a>) {
        self.active = config;
        self.outgoing = None;
        self.queued = None;
    }

    /// Moves the active configuration to the outgoing slot.
    pub(crate) fn begin_crossfade(&mut self, config: FilterConfig<'a>) {
        self.outgoing = Some(self.active);
        self.active = config;
    }

    /// Stores `config` for promotion, replacing anything already queued.
    pub(crate) fn enqueue(&mut self, config: FilterConfig<'a>) {
        self.queued = Some(config);
    }

    /// Drops the outgoing slot and hands back the queued configuration.
    pub(crate) fn retire(&mut self) -> Option<FilterConfig<'a>> {
        self.outgoing = None;
        self.queued.take()
    }

    /// Drops both the outgoing and the queued slot.
    pub(crate) fn cancel(&mut self) {
        self.outgoing = None;
        self.queued = None;
    }

    /// Arms crossfading if `crossfade_on` and the active slot has coefficients.
    pub(crate) fn rearm(&mut self, crossfade_on: bool) {
        self.armed = crossfade_on && self.active.has_coefficients();
    }

    /// Configuration driving the output.
    pub fn active(&self) -> &FilterConfig<'a> {
        &self.active
    }

    /// Configuration being faded out, if a transition is running.
    pub fn outgoing(&self) -> Option<&FilterConfig<'a>> {
        self.outgoing.as_ref()
    }

    /// Configuration waiting for the running transition to finish.
    pub fn queued(&self) -> Option<&FilterConfig<'a>> {
        self.queued.as_ref()
    }

    /// Whether the next replacement may crossfade.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether a transition is running.
    pub fn in_transition(&self) -> bool {
        self.outgoing.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static C: [i16; 8] = [1; 8];

    fn cfg(taps: usize) -> FilterConfig<'static> {
        FilterConfig::with_taps(14, taps, &C[..])
    }

    #[test]
    fn unarmed_slots_replace_synchronously() {
        let slots = Slots::default();
        assert!(!slots.is_armed());
        assert_eq!(slots.classify(&cfg(8)), Ok(Replacement::Synchronous));
    }

    #[test]
    fn armed_without_coefficients_stays_unarmed() {
        let mut slots = Slots::default();
        slots.rearm(true);
        assert!(!slots.is_armed());
    }

    #[test]
    fn armed_idle_crossfades_shorter_and_replaces_longer() {
        let mut slots = Slots::default();
        slots.replace(cfg(4));
        slots.rearm(true);
        assert_eq!(slots.classify(&cfg(4)), Ok(Replacement::Crossfade));
        assert_eq!(slots.classify(&cfg(2)), Ok(Replacement::Crossfade));
        assert_eq!(slots.classify(&cfg(5)), Ok(Replacement::Synchronous));
    }

    #[test]
    fn transition_queues_or_rejects() {
        let mut slots = Slots::default();
        slots.replace(cfg(4));
        slots.rearm(true);
        slots.begin_crossfade(cfg(3));
        assert!(slots.in_transition());
        assert_eq!(slots.outgoing().map(|c| c.num_taps), Some(4));

        assert_eq!(slots.classify(&cfg(3)), Ok(Replacement::Queued));
        assert_eq!(
            slots.classify(&cfg(4)),
            Err(FirError::QueuedTapCountExceedsActive {
                requested: 4,
                active: 3
            })
        );
    }

    #[test]
    fn enqueue_overwrites_and_retire_hands_it_back() {
        let mut slots = Slots::default();
        slots.replace(cfg(4));
        slots.rearm(true);
        slots.begin_crossfade(cfg(4));
        slots.enqueue(cfg(2));
        slots.enqueue(cfg(1));
        assert_eq!(slots.queued().map(|c| c.num_taps), Some(1));

        assert_eq!(slots.retire().map(|c| c.num_taps), Some(1));
        assert!(!slots.in_transition());
        assert!(slots.queued().is_none());
    }

    #[test]
    fn cancel_clears_transition() {
        let mut slots = Slots::default();
        slots.replace(cfg(4));
        slots.begin_crossfade(cfg(2));
        slots.enqueue(cfg(2));
        slots.cancel();
        assert!(slots.outgoing().is_none());
        assert!(slots.queued().is_none());
        assert_eq!(slots.active().num_taps, 2);
    }
}
