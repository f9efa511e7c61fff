//! Fixed-interval reinforcement.
//!
//! The first response at or after `interval` seconds since the last
//! reinforcement (or since the schedule started) is reinforced. The next
//! interval is timed from that response, not from a fixed grid, which is what
//! produces the scalloped cumulative record typical of FI schedules.
//!
//! ```text
//! start(0)        next = I
//! response t < next    -> unreinforced, nothing moves
//! response t >= next   -> reinforced, next = t + I
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReinforcementState {
    /// Elapsed session seconds at which the next reinforcer becomes available.
    pub next_available_secs: f64,
    /// Set by `on_time_advance` once the boundary is observed; cleared on
    /// reinforcement. Display only; `on_response` never consults it.
    pub available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Reinforced,
    Unreinforced,
}

impl Verdict {
    pub fn is_reinforced(self) -> bool {
        self == Verdict::Reinforced
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedInterval {
    interval_secs: f64,
    state: ReinforcementState,
}

impl FixedInterval {
    pub fn new(interval_secs: f64) -> Self {
        debug_assert!(
            interval_secs.is_finite() && interval_secs > 0.0,
            "interval must be positive"
        );
        Self {
            interval_secs,
            state: ReinforcementState {
                next_available_secs: interval_secs,
                available: false,
            },
        }
    }

    pub fn interval_secs(&self) -> f64 {
        self.interval_secs
    }

    pub fn state(&self) -> ReinforcementState {
        self.state
    }

    pub fn is_available(&self) -> bool {
        self.state.available
    }

    /// Begin the first interval at `elapsed_secs` (0 for a fresh session).
    pub fn start(&mut self, elapsed_secs: f64) {
        self.state = ReinforcementState {
            next_available_secs: elapsed_secs + self.interval_secs,
            available: false,
        };
    }

    pub fn on_time_advance(&mut self, elapsed_secs: f64) {
        if elapsed_secs >= self.state.next_available_secs {
            self.state.available = true;
        }
    }

    /// Decide the response at `elapsed_secs` against the boundary using the
    /// response's own timestamp, so the verdict does not depend on how
    /// recently `on_time_advance` ran.
    pub fn on_response(&mut self, elapsed_secs: f64) -> Verdict {
        if elapsed_secs >= self.state.next_available_secs {
            self.state = ReinforcementState {
                next_available_secs: elapsed_secs + self.interval_secs,
                available: false,
            };
            tracing::debug!(
                at = elapsed_secs,
                next = self.state.next_available_secs,
                "response reinforced"
            );
            Verdict::Reinforced
        } else {
            Verdict::Unreinforced
        }
    }
}
