use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::choice::{ChoiceOption, ChoiceSession};
use crate::clock::Clock;
use crate::config::RuntimeSettings;
use crate::discrimination::{DiscriminationBoard, Shape};
use crate::export::write_cumulative_csv;
use crate::schedule::Verdict;
use crate::session::{SessionController, TickOutcome};
use crate::timebox::{Phase, Poll, TickToken};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Exercise {
    #[strum(to_string = "Fixed interval")]
    FixedInterval,
    Choice,
    Discrimination,
}

impl Exercise {
    pub fn next(self) -> Self {
        match self {
            Exercise::FixedInterval => Exercise::Choice,
            Exercise::Choice => Exercise::Discrimination,
            Exercise::Discrimination => Exercise::FixedInterval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Front-end state: which exercise is showing and the live tick token.
#[derive(Debug)]
pub struct App<C: Clock> {
    pub settings: RuntimeSettings,
    pub exercise: Exercise,
    pub fixed_interval: SessionController<C>,
    pub choice: ChoiceSession<C>,
    pub discrimination: DiscriminationBoard,
    pub last_verdict: Option<Verdict>,
    pub status: Option<String>,
    tick_token: Option<TickToken>,
}

impl<C: Clock + Clone> App<C> {
    pub fn new(settings: RuntimeSettings, clock: C) -> Self {
        Self {
            exercise: settings.exercise,
            fixed_interval: SessionController::new(clock.clone(), settings.session),
            choice: ChoiceSession::new(clock, settings.session.duration_secs),
            discrimination: DiscriminationBoard::new(),
            last_verdict: None,
            status: None,
            tick_token: None,
            settings,
        }
    }
}

impl<C: Clock> App<C> {
    pub fn phase(&self) -> Phase {
        match self.exercise {
            Exercise::FixedInterval => self.fixed_interval.phase(),
            Exercise::Choice => self.choice.phase(),
            // Untimed: always accepting input
            Exercise::Discrimination => Phase::Running,
        }
    }

    pub fn is_session_running(&self) -> bool {
        self.tick_token.is_some()
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Control::Quit;
        }

        match key.code {
            KeyCode::Tab if !self.is_session_running() => {
                self.reset();
                self.exercise = self.exercise.next();
            }
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('s') | KeyCode::Enter => self.start(),
            KeyCode::Char(' ') if self.exercise == Exercise::FixedInterval => self.respond(),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                match self.exercise {
                    Exercise::Choice => {
                        self.choice.press(ChoiceOption::ALL[idx]);
                        if self.choice.phase() == Phase::Ended {
                            self.tick_token = None;
                        }
                    }
                    Exercise::Discrimination => {
                        self.discrimination.press(Shape::ALL[idx]);
                    }
                    Exercise::FixedInterval => {}
                }
            }
            _ => {}
        }
        Control::Continue
    }

    pub fn on_tick(&mut self) {
        let Some(token) = self.tick_token else {
            return;
        };
        match self.exercise {
            Exercise::FixedInterval => match self.fixed_interval.tick(token) {
                TickOutcome::Stale => self.tick_token = None,
                TickOutcome::Running { .. } => {}
                TickOutcome::Ended(_) => self.finish_fixed_interval(),
            },
            Exercise::Choice => match self.choice.tick(token) {
                Poll::Stale | Poll::Expired => self.tick_token = None,
                Poll::Running { .. } => {}
            },
            Exercise::Discrimination => self.tick_token = None,
        }
    }

    fn start(&mut self) {
        match self.phase() {
            // The live session keeps its token
            Phase::Running => return,
            // Starting again from the results screen begins a new session
            Phase::Ended => self.reset(),
            Phase::Idle => {}
        }
        let token = match self.exercise {
            Exercise::FixedInterval => self.fixed_interval.start(),
            Exercise::Choice => self.choice.start(),
            Exercise::Discrimination => None,
        };
        if let Some(token) = token {
            self.tick_token = Some(token);
            self.status = None;
            self.last_verdict = None;
        }
    }

    fn respond(&mut self) {
        match self.fixed_interval.on_response() {
            Some(outcome) => self.last_verdict = Some(outcome.verdict),
            None => {
                if self.fixed_interval.phase() == Phase::Ended {
                    self.finish_fixed_interval();
                }
            }
        }
    }

    fn reset(&mut self) {
        self.tick_token = None;
        self.last_verdict = None;
        match self.exercise {
            Exercise::FixedInterval => self.fixed_interval.reset(),
            Exercise::Choice => self.choice.reset(),
            Exercise::Discrimination => self.discrimination.reset(),
        }
    }

    /// Runs once per session: the token is only present until the first
    /// caller observes the end.
    fn finish_fixed_interval(&mut self) {
        if self.tick_token.take().is_none() {
            return;
        }
        let (Some(path), Some(summary)) =
            (self.settings.export_path.as_ref(), self.fixed_interval.summary())
        else {
            return;
        };
        self.status = Some(match write_cumulative_csv(path, &summary.series) {
            Ok(()) => format!("record saved to {}", path.display()),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "export failed");
                format!("export failed: {e}")
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::session::SessionConfig;
    use tempfile::tempdir;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn app(exercise: Exercise) -> (ManualClock, App<ManualClock>) {
        let clock = ManualClock::new();
        let settings = RuntimeSettings {
            exercise,
            session: SessionConfig {
                interval_secs: 5.0,
                duration_secs: 20.0,
            },
            ..RuntimeSettings::default()
        };
        (clock.clone(), App::new(settings, clock))
    }

    #[test]
    fn quit_keys() {
        let (_clock, mut app) = app(Exercise::FixedInterval);
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Control::Quit
        );
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Control::Quit
        );
        assert_eq!(app.on_key(key('x')), Control::Continue);
    }

    #[test]
    fn fixed_interval_flow() {
        let (clock, mut app) = app(Exercise::FixedInterval);

        // Space before start is a disabled button
        app.on_key(key(' '));
        assert_eq!(app.fixed_interval.total_responses(), 0);

        app.on_key(key('s'));
        assert!(app.is_session_running());

        for t in [1.0, 6.0, 6.0, 12.0] {
            clock.set(t);
            app.on_key(key(' '));
        }
        assert_eq!(app.fixed_interval.points(), 2);
        assert_eq!(app.last_verdict, Some(Verdict::Reinforced));

        clock.set(20.0);
        app.on_tick();
        assert_eq!(app.phase(), Phase::Ended);
        assert!(!app.is_session_running());
        assert_eq!(app.fixed_interval.summary().unwrap().total_responses, 4);
    }

    #[test]
    fn start_after_end_begins_new_session() {
        let (clock, mut app) = app(Exercise::FixedInterval);
        app.on_key(key('s'));
        clock.set(2.0);
        app.on_key(key(' '));
        clock.set(20.0);
        app.on_tick();

        app.on_key(key('s'));

        assert_eq!(app.phase(), Phase::Running);
        assert_eq!(app.fixed_interval.total_responses(), 0);
        assert!(app.fixed_interval.summary().is_none());
    }

    #[test]
    fn start_while_running_keeps_session_ticking() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("record.csv");
        let (clock, mut app) = app(Exercise::FixedInterval);
        app.settings.export_path = Some(path.clone());

        app.on_key(key('s'));
        clock.set(3.0);
        app.on_key(key(' '));
        app.on_key(key('s'));
        app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert!(app.is_session_running());
        assert_eq!(app.fixed_interval.total_responses(), 1);

        clock.set(25.0);
        app.on_tick();

        assert_eq!(app.phase(), Phase::Ended);
        assert!(path.exists());
        assert!(app.status.as_deref().unwrap().starts_with("record saved"));
    }

    #[test]
    fn start_while_choice_running_keeps_tally() {
        let (clock, mut app) = app(Exercise::Choice);
        app.on_key(key('s'));
        app.on_key(key('2'));
        app.on_key(key('s'));

        assert!(app.is_session_running());
        assert_eq!(app.choice.tally().get(ChoiceOption::Lose5s), 1);

        clock.set(20.0);
        app.on_tick();
        assert_eq!(app.phase(), Phase::Ended);
    }

    #[test]
    fn tab_cycles_only_between_sessions() {
        let (_clock, mut app) = app(Exercise::FixedInterval);
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);

        app.on_key(key('s'));
        app.on_key(tab);
        assert_eq!(app.exercise, Exercise::FixedInterval);

        app.on_key(key('r'));
        app.on_key(tab);
        assert_eq!(app.exercise, Exercise::Choice);
        app.on_key(tab);
        assert_eq!(app.exercise, Exercise::Discrimination);
        app.on_key(tab);
        assert_eq!(app.exercise, Exercise::FixedInterval);
    }

    #[test]
    fn choice_keys_tally_while_running() {
        let (clock, mut app) = app(Exercise::Choice);

        app.on_key(key('1'));
        assert_eq!(app.choice.tally().total(), 0);

        app.on_key(key('s'));
        app.on_key(key('1'));
        app.on_key(key('4'));
        app.on_key(key('4'));
        assert_eq!(app.choice.tally().get(ChoiceOption::NoLoss), 1);
        assert_eq!(app.choice.tally().get(ChoiceOption::Lose20s), 2);

        clock.set(20.0);
        app.on_tick();
        assert_eq!(app.phase(), Phase::Ended);
        assert!(!app.is_session_running());
    }

    #[test]
    fn discrimination_keys_score_shapes() {
        let (_clock, mut app) = app(Exercise::Discrimination);

        app.on_key(key('1'));
        app.on_key(key('1'));
        app.on_key(key('3'));
        assert_eq!(app.discrimination.points(), 1);

        app.on_key(key('r'));
        assert_eq!(app.discrimination.points(), 0);
    }

    #[test]
    fn reset_drops_tick_token() {
        let (clock, mut app) = app(Exercise::FixedInterval);
        app.on_key(key('s'));
        app.on_key(key('r'));

        assert!(!app.is_session_running());
        clock.set(30.0);
        app.on_tick();
        assert_eq!(app.phase(), Phase::Idle);
    }

    #[test]
    fn ended_session_exports_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("record.csv");
        let (clock, mut app) = app(Exercise::FixedInterval);
        app.settings.export_path = Some(path.clone());

        app.on_key(key('s'));
        clock.set(3.0);
        app.on_key(key(' '));
        clock.set(25.0);
        app.on_tick();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 4); // header, seed, response, terminal
        assert!(app.status.as_deref().unwrap().starts_with("record saved"));
    }

    #[test]
    fn late_response_finishes_session_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("record.csv");
        let (clock, mut app) = app(Exercise::FixedInterval);
        app.settings.export_path = Some(path.clone());

        app.on_key(key('s'));
        clock.set(20.5);
        app.on_key(key(' '));

        assert_eq!(app.phase(), Phase::Ended);
        assert!(!app.is_session_running());
        assert!(path.exists());

        // A following tick has nothing left to do
        app.on_tick();
        assert_eq!(app.fixed_interval.summary().unwrap().total_responses, 0);
    }

    #[test]
    fn exercise_labels() {
        assert_eq!(Exercise::FixedInterval.to_string(), "Fixed interval");
        assert_eq!(Exercise::Choice.to_string(), "Choice");
        assert_eq!(Exercise::Discrimination.to_string(), "Discrimination");
    }
}
