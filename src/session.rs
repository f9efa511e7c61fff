use serde::Serialize;

use crate::clock::Clock;
use crate::cumulative::{CumulativeRecorder, CumulativeSample};
use crate::schedule::{FixedInterval, Verdict};
use crate::timebox::{Phase, Poll, TickToken, Timebox};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub interval_secs: f64,
    pub duration_secs: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interval_secs: 8.0,
            duration_secs: 90.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseEvent {
    pub time_secs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseOutcome {
    pub event: ResponseEvent,
    pub verdict: Verdict,
    pub total_responses: u32,
    pub points: u32,
}

/// Everything the results screen needs once a session has ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub duration_secs: f64,
    pub total_responses: u32,
    pub points: u32,
    pub series: Vec<CumulativeSample>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Stale,
    Running { remaining_secs: f64 },
    Ended(SessionSummary),
}

/// A fixed-interval session: owns the timebox, the schedule and the record.
#[derive(Debug)]
pub struct SessionController<C: Clock> {
    config: SessionConfig,
    timebox: Timebox<C>,
    scheduler: FixedInterval,
    recorder: CumulativeRecorder,
    total_responses: u32,
    points: u32,
    summary: Option<SessionSummary>,
}

impl<C: Clock> SessionController<C> {
    pub fn new(clock: C, config: SessionConfig) -> Self {
        Self {
            timebox: Timebox::new(clock, config.duration_secs),
            scheduler: FixedInterval::new(config.interval_secs),
            recorder: CumulativeRecorder::new(),
            config,
            total_responses: 0,
            points: 0,
            summary: None,
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.timebox.phase()
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn total_responses(&self) -> u32 {
        self.total_responses
    }

    pub fn remaining_secs(&self) -> f64 {
        self.timebox.remaining_secs()
    }

    pub fn scheduler(&self) -> &FixedInterval {
        &self.scheduler
    }

    pub fn recorder(&self) -> &CumulativeRecorder {
        &self.recorder
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn live_token(&self) -> Option<TickToken> {
        self.timebox.live_token()
    }

    pub fn start(&mut self) -> Option<TickToken> {
        if self.phase() != Phase::Idle {
            return None;
        }
        self.clear();
        let token = self.timebox.start()?;
        self.scheduler.start(0.0);
        tracing::info!(
            interval = self.config.interval_secs,
            duration = self.config.duration_secs,
            "fixed-interval session started"
        );
        Some(token)
    }

    /// Ignored unless running. A response that arrives after the session
    /// time has run out ends the session instead of being counted.
    pub fn on_response(&mut self) -> Option<ResponseOutcome> {
        if !self.timebox.is_running() {
            return None;
        }
        if self.timebox.has_expired() {
            self.timebox.end();
            self.finish();
            return None;
        }

        let time_secs = self.timebox.elapsed_secs();
        let verdict = self.scheduler.on_response(time_secs);
        self.recorder.record_response(time_secs);
        self.total_responses += 1;
        if verdict.is_reinforced() {
            self.points += 1;
        }

        Some(ResponseOutcome {
            event: ResponseEvent { time_secs },
            verdict,
            total_responses: self.total_responses,
            points: self.points,
        })
    }

    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        match self.timebox.poll(token) {
            Poll::Stale => TickOutcome::Stale,
            Poll::Running { elapsed_secs } => {
                self.scheduler.on_time_advance(elapsed_secs);
                TickOutcome::Running {
                    remaining_secs: (self.config.duration_secs - elapsed_secs).max(0.0),
                }
            }
            Poll::Expired => TickOutcome::Ended(self.finish()),
        }
    }

    pub fn reset(&mut self) {
        self.timebox.reset();
        self.clear();
    }

    fn clear(&mut self) {
        self.scheduler = FixedInterval::new(self.config.interval_secs);
        self.recorder = CumulativeRecorder::new();
        self.total_responses = 0;
        self.points = 0;
        self.summary = None;
    }

    fn finish(&mut self) -> SessionSummary {
        let series = self.recorder.finalize(self.config.duration_secs).to_vec();
        let summary = SessionSummary {
            duration_secs: self.config.duration_secs,
            total_responses: self.total_responses,
            points: self.points,
            series,
        };
        tracing::info!(
            responses = summary.total_responses,
            points = summary.points,
            "fixed-interval session ended"
        );
        self.summary = Some(summary.clone());
        summary
    }
}
