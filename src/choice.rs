use crate::clock::Clock;
use crate::timebox::{Phase, Poll, TickToken, Timebox};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum ChoiceOption {
    #[strum(to_string = "No loss")]
    NoLoss,
    #[strum(to_string = "5s")]
    Lose5s,
    #[strum(to_string = "10s")]
    Lose10s,
    #[strum(to_string = "20s")]
    Lose20s,
}

impl ChoiceOption {
    pub const ALL: [ChoiceOption; 4] = [
        ChoiceOption::NoLoss,
        ChoiceOption::Lose5s,
        ChoiceOption::Lose10s,
        ChoiceOption::Lose20s,
    ];

    fn index(self) -> usize {
        match self {
            ChoiceOption::NoLoss => 0,
            ChoiceOption::Lose5s => 1,
            ChoiceOption::Lose10s => 2,
            ChoiceOption::Lose20s => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChoiceTally {
    counts: [u32; 4],
}

impl ChoiceTally {
    pub fn get(&self, option: ChoiceOption) -> u32 {
        self.counts[option.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn highest(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Label/value pairs in display order.
    pub fn entries(&self) -> impl Iterator<Item = (ChoiceOption, u32)> + '_ {
        ChoiceOption::ALL.iter().map(|&o| (o, self.get(o)))
    }

    fn bump(&mut self, option: ChoiceOption) {
        self.counts[option.index()] += 1;
    }
}

/// Timed session tallying presses across four options.
#[derive(Debug)]
pub struct ChoiceSession<C: Clock> {
    timebox: Timebox<C>,
    tally: ChoiceTally,
}

impl<C: Clock> ChoiceSession<C> {
    pub fn new(clock: C, duration_secs: f64) -> Self {
        Self {
            timebox: Timebox::new(clock, duration_secs),
            tally: ChoiceTally::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.timebox.phase()
    }

    pub fn tally(&self) -> &ChoiceTally {
        &self.tally
    }

    pub fn remaining_secs(&self) -> f64 {
        self.timebox.remaining_secs()
    }

    pub fn duration_secs(&self) -> f64 {
        self.timebox.duration_secs()
    }

    pub fn start(&mut self) -> Option<TickToken> {
        if self.phase() != Phase::Idle {
            return None;
        }
        self.tally = ChoiceTally::default();
        let token = self.timebox.start();
        tracing::info!(duration = self.timebox.duration_secs(), "choice session started");
        token
    }

    /// Returns the option's new count, or `None` when not running.
    pub fn press(&mut self, option: ChoiceOption) -> Option<u32> {
        if !self.timebox.is_running() {
            return None;
        }
        if self.timebox.has_expired() {
            self.timebox.end();
            self.log_end();
            return None;
        }
        self.tally.bump(option);
        Some(self.tally.get(option))
    }

    pub fn tick(&mut self, token: TickToken) -> Poll {
        let poll = self.timebox.poll(token);
        if poll == Poll::Expired {
            self.log_end();
        }
        poll
    }

    pub fn reset(&mut self) {
        self.timebox.reset();
        self.tally = ChoiceTally::default();
    }

    fn log_end(&self) {
        tracing::info!(
            no_loss = self.tally.get(ChoiceOption::NoLoss),
            lose_5s = self.tally.get(ChoiceOption::Lose5s),
            lose_10s = self.tally.get(ChoiceOption::Lose10s),
            lose_20s = self.tally.get(ChoiceOption::Lose20s),
            "choice session ended"
        );
    }
}
