use ratatui::{buffer::Buffer, layout::Rect};

use crate::{
    app::{App, Exercise},
    clock::Clock,
    ui::{render_choice, render_discrimination, render_fixed_interval},
};

/// A UI Screen boundary: each exercise draws its own idle, running and
/// results views.
pub trait Screen<C: Clock> {
    fn render(&self, app: &App<C>, area: Rect, buf: &mut Buffer);
}

pub struct FixedIntervalScreen;

impl<C: Clock> Screen<C> for FixedIntervalScreen {
    fn render(&self, app: &App<C>, area: Rect, buf: &mut Buffer) {
        render_fixed_interval(app, area, buf);
    }
}

pub struct ChoiceScreen;

impl<C: Clock> Screen<C> for ChoiceScreen {
    fn render(&self, app: &App<C>, area: Rect, buf: &mut Buffer) {
        render_choice(app, area, buf);
    }
}

/// Untimed, so there is no results view
pub struct DiscriminationScreen;

impl<C: Clock> Screen<C> for DiscriminationScreen {
    fn render(&self, app: &App<C>, area: Rect, buf: &mut Buffer) {
        render_discrimination(app, area, buf);
    }
}

/// Helper to construct the screen for the selected exercise
pub fn current_screen<C: Clock>(exercise: Exercise) -> Box<dyn Screen<C>> {
    match exercise {
        Exercise::FixedInterval => Box::new(FixedIntervalScreen),
        Exercise::Choice => Box::new(ChoiceScreen),
        Exercise::Discrimination => Box::new(DiscriminationScreen),
    }
}
