//! Polled scheduling primitives owned by a game session.
//!
//! Nothing here runs on its own. A timer is a deadline stored inside the
//! engine that scheduled it, and it only "fires" when that engine polls it
//! from its `update`. Dropping or replacing the engine drops its timers, so a
//! callback can never land on a session that no longer exists.

use std::time::{Duration, Instant};

/// A one-shot deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<Instant>,
}

impl Timeout {
    pub fn idle() -> Self {
        Self { deadline: None }
    }

    /// Arms the timeout `delay` after `now`, superseding any pending deadline.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(at) if now >= at => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// A repeating timer with a fixed period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    /// Creates a stopped interval.
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// (Re)starts the interval; the first fire is one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// The pending fire time, if it has already come due at `now`.
    pub fn due(&self, now: Instant) -> Option<Instant> {
        self.next.filter(|&at| now >= at)
    }

    /// Returns true once per elapsed period. A caller that fell behind by
    /// several periods should loop until this returns false.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next {
            Some(at) if now >= at => {
                self.next = Some(at + self.period);
                true
            }
            _ => false,
        }
    }
}
