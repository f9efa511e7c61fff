//! Idle → Running → Ended lifecycle for a fixed-length session.
//!
//! The caller drives the clock check by calling [`Timebox::poll`] at its own
//! cadence with the [`TickToken`] handed out by [`Timebox::start`]. Tokens
//! carry a generation that only ever grows, so a token issued before a reset
//! or an earlier end can never act on a later session.

use crate::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

/// Handle for the periodic tick of one session run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Poll {
    /// The token does not belong to the running session.
    Stale,
    Running { elapsed_secs: f64 },
    /// Time ran out on this poll; the timebox is now `Ended`.
    Expired,
}

#[derive(Debug, Clone)]
pub struct Timebox<C: Clock> {
    clock: C,
    duration_secs: f64,
    phase: Phase,
    started_at: Option<f64>,
    generation: u64,
    live: Option<TickToken>,
}

impl<C: Clock> Timebox<C> {
    pub fn new(clock: C, duration_secs: f64) -> Self {
        debug_assert!(duration_secs > 0.0, "session duration must be positive");
        Self {
            clock,
            duration_secs,
            phase: Phase::Idle,
            started_at: None,
            generation: 0,
            live: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn live_token(&self) -> Option<TickToken> {
        self.live
    }

    /// Returns `None` unless idle.
    pub fn start(&mut self) -> Option<TickToken> {
        if self.phase != Phase::Idle {
            return None;
        }
        self.generation += 1;
        let token = TickToken {
            generation: self.generation,
        };
        self.started_at = Some(self.clock.now_secs());
        self.live = Some(token);
        self.phase = Phase::Running;
        Some(token)
    }

    /// Seconds since `start`, or 0 before the first start.
    pub fn elapsed_secs(&self) -> f64 {
        match self.started_at {
            Some(start) => {
                let elapsed = self.clock.now_secs() - start;
                debug_assert!(elapsed >= 0.0, "clock moved backwards");
                elapsed
            }
            None => 0.0,
        }
    }

    pub fn remaining_secs(&self) -> f64 {
        match self.phase {
            Phase::Idle => self.duration_secs,
            Phase::Running => (self.duration_secs - self.elapsed_secs()).max(0.0),
            Phase::Ended => 0.0,
        }
    }

    /// True when a running session has reached its duration.
    pub fn has_expired(&self) -> bool {
        self.is_running() && self.elapsed_secs() >= self.duration_secs
    }

    pub fn poll(&mut self, token: TickToken) -> Poll {
        if self.live != Some(token) || !self.is_running() {
            return Poll::Stale;
        }
        let elapsed_secs = self.elapsed_secs();
        if elapsed_secs >= self.duration_secs {
            self.end();
            Poll::Expired
        } else {
            Poll::Running { elapsed_secs }
        }
    }

    pub fn end(&mut self) {
        if self.is_running() {
            self.phase = Phase::Ended;
            self.live = None;
        }
    }

    /// Back to idle from any phase. The generation is kept so that tokens of
    /// the abandoned run stay stale.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.started_at = None;
        self.live = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use assert_matches::assert_matches;

    #[test]
    fn starts_only_from_idle() {
        let clock = ManualClock::new();
        let mut tb = Timebox::new(clock, 10.0);

        assert_eq!(tb.phase(), Phase::Idle);
        assert!(tb.start().is_some());
        assert_eq!(tb.phase(), Phase::Running);
        assert!(tb.start().is_none());
    }

    #[test]
    fn elapsed_is_measured_from_start() {
        let clock = ManualClock::new();
        clock.set(100.0);
        let mut tb = Timebox::new(clock.clone(), 10.0);

        assert_eq!(tb.elapsed_secs(), 0.0);
        tb.start();
        clock.advance(2.5);
        assert_eq!(tb.elapsed_secs(), 2.5);
        assert_eq!(tb.remaining_secs(), 7.5);
    }

    #[test]
    fn poll_expires_at_duration() {
        let clock = ManualClock::new();
        let mut tb = Timebox::new(clock.clone(), 1.0);
        let token = tb.start().unwrap();

        clock.advance(0.9);
        assert_matches!(tb.poll(token), Poll::Running { .. });

        clock.advance(0.1);
        assert_eq!(tb.poll(token), Poll::Expired);
        assert_eq!(tb.phase(), Phase::Ended);
        assert_eq!(tb.remaining_secs(), 0.0);

        // Ended releases the token
        assert_eq!(tb.poll(token), Poll::Stale);
    }

    #[test]
    fn reset_invalidates_outstanding_token() {
        let clock = ManualClock::new();
        let mut tb = Timebox::new(clock.clone(), 5.0);

        let old = tb.start().unwrap();
        tb.reset();
        let new = tb.start().unwrap();

        assert_ne!(old, new);
        clock.advance(6.0);
        assert_eq!(tb.poll(old), Poll::Stale);
        assert_eq!(tb.phase(), Phase::Running);
        assert_eq!(tb.poll(new), Poll::Expired);
    }

    #[test]
    fn idle_reports_full_duration() {
        let tb = Timebox::new(ManualClock::new(), 90.0);
        assert_eq!(tb.remaining_secs(), 90.0);
        assert!(!tb.has_expired());
    }
}
