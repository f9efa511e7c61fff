pub mod charting;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, BarChart, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::{
    app::{App, Exercise},
    clock::Clock,
    discrimination::Shape,
    schedule::Verdict,
    timebox::Phase,
    ui::charting::{
        axis_labels, compute_chart_params, format_label, step_points, time_axis_labels,
    },
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(self.exercise).render(self, area, buf);
    }
}

fn bold_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold_style() -> Style {
    bold_style().add_modifier(Modifier::DIM)
}

fn italic_style() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn legend(exercise: Exercise) -> &'static str {
    match exercise {
        Exercise::FixedInterval => {
            "(s)tart / (space) respond / (r)eset / (tab) exercise / (esc)ape"
        }
        Exercise::Choice => "(s)tart / (1-4) choose / (r)eset / (tab) exercise / (esc)ape",
        Exercise::Discrimination => "(1-4) press shape / (r)eset / (tab) exercise / (esc)ape",
    }
}

/// Centered stack of single lines for the idle and running screens, with the
/// legend pinned to the bottom row.
fn render_centered<C: Clock>(app: &App<C>, lines: Vec<Line<'_>>, area: Rect, buf: &mut Buffer) {
    let body_height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(body_height),
            Constraint::Min(0),
            Constraint::Length(1), // status
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    render_footer(app, chunks[3], chunks[4], buf);
}

fn render_footer<C: Clock>(app: &App<C>, status_area: Rect, legend_area: Rect, buf: &mut Buffer) {
    if let Some(status) = &app.status {
        Paragraph::new(Span::styled(
            status.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(status_area, buf);
    }

    Paragraph::new(Span::styled(legend(app.exercise), italic_style())).render(legend_area, buf);
}

fn title_line<'a>(text: String) -> Line<'a> {
    Line::from(Span::styled(text, bold_style().fg(Color::Magenta)))
}

fn timer_line<'a>(remaining_secs: f64) -> Line<'a> {
    Line::from(Span::styled(format!("{remaining_secs:.1}s"), dim_bold_style()))
}

pub(crate) fn render_fixed_interval<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let session = &app.fixed_interval;
    if session.phase() == Phase::Ended {
        render_cumulative_record(app, area, buf);
        return;
    }

    let config = session.config();
    let points_style = match app.last_verdict {
        Some(Verdict::Reinforced) => bold_style().fg(Color::Green),
        _ => bold_style(),
    };
    let prompt = match session.phase() {
        Phase::Idle => Span::styled("press (s) to start", italic_style()),
        _ => Span::styled("[ space ]", bold_style().fg(Color::Yellow)),
    };

    let lines = vec![
        title_line(format!(
            "FI {}s  ·  {}s session",
            format_label(config.interval_secs),
            format_label(config.duration_secs)
        )),
        Line::default(),
        timer_line(session.remaining_secs()),
        Line::from(Span::styled(
            format!("points: {}", session.points()),
            points_style,
        )),
        Line::default(),
        Line::from(prompt),
    ];

    render_centered(app, lines, area, buf);
}

fn render_cumulative_record<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // totals
            Constraint::Length(1), // status
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    if let Some(summary) = app.fixed_interval.summary() {
        let (x_max, y_max) = compute_chart_params(
            &summary.series,
            summary.duration_secs,
            app.settings.chart_max_responses,
        );
        let points = step_points(&summary.series);
        let datasets = vec![Dataset::default()
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::White))
            .graph_type(GraphType::Line)
            .data(&points)];

        let label = |l: String| Span::styled(l, bold_style());
        Chart::new(datasets)
            .block(Block::default().title(Span::styled("cumulative record", bold_style())))
            .x_axis(
                Axis::default()
                    .title("time (s)")
                    .bounds([0.0, x_max])
                    .labels(
                        time_axis_labels(x_max, chunks[0].width)
                            .into_iter()
                            .map(label)
                            .collect::<Vec<_>>(),
                    ),
            )
            .y_axis(
                Axis::default()
                    .title("responses")
                    .bounds([0.0, y_max])
                    .labels(axis_labels(y_max).into_iter().map(label).collect::<Vec<_>>()),
            )
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            format!(
                "{} responses   {} points",
                summary.total_responses, summary.points
            ),
            bold_style(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
    }

    render_footer(app, chunks[2], chunks[4], buf);
}

pub(crate) fn render_choice<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let session = &app.choice;
    if session.phase() == Phase::Ended {
        render_choice_bars(app, area, buf);
        return;
    }

    let options = session
        .tally()
        .entries()
        .enumerate()
        .flat_map(|(i, (option, count))| {
            [
                Span::styled(format!("[{}] ", i + 1), dim_bold_style()),
                Span::styled(format!("{option} "), bold_style()),
                Span::styled(format!("({count})   "), dim_bold_style()),
            ]
        })
        .collect::<Vec<_>>();
    let prompt = match session.phase() {
        Phase::Idle => Line::from(Span::styled("press (s) to start", italic_style())),
        _ => Line::from(options),
    };

    let lines = vec![
        title_line(format!(
            "choice  ·  {}s session",
            format_label(session.duration_secs())
        )),
        Line::default(),
        timer_line(session.remaining_secs()),
        Line::default(),
        prompt,
    ];

    render_centered(app, lines, area, buf);
}

fn render_choice_bars<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // bars
            Constraint::Length(1), // status
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let tally = app.choice.tally();
    let labels: Vec<String> = tally.entries().map(|(o, _)| o.to_string()).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(tally.entries())
        .map(|(label, (_, count))| (label.as_str(), count as u64))
        .collect();

    const BAR_GAP: u16 = 3;
    let bar_width = (chunks[0].width.saturating_sub(BAR_GAP * 3) / 4).clamp(1, 20);

    BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled("presses per option", bold_style())),
        )
        .data(data.as_slice())
        .bar_width(bar_width)
        .bar_gap(BAR_GAP)
        .max(tally.highest().max(1) as u64)
        .bar_style(Style::default().fg(Color::White))
        .value_style(bold_style().fg(Color::Black).bg(Color::White))
        .label_style(bold_style())
        .render(chunks[0], buf);

    render_footer(app, chunks[1], chunks[3], buf);
}

pub(crate) fn render_discrimination<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let shapes = Shape::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, shape)| {
            [
                Span::styled(format!("[{}] ", i + 1), dim_bold_style()),
                Span::styled(format!("{}   ", shape.glyph()), bold_style()),
            ]
        })
        .collect::<Vec<_>>();

    let lines = vec![
        title_line("discrimination".to_string()),
        Line::default(),
        Line::from(Span::styled(
            format!("points: {}", app.discrimination.points()),
            bold_style(),
        )),
        Line::default(),
        Line::from(shapes),
    ];

    render_centered(app, lines, area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::RuntimeSettings;
    use crate::session::SessionConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(app: &mut App<ManualClock>, c: char) {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }

    fn create_test_app(exercise: Exercise) -> (ManualClock, App<ManualClock>) {
        let clock = ManualClock::new();
        let settings = RuntimeSettings {
            exercise,
            session: SessionConfig {
                interval_secs: 5.0,
                duration_secs: 30.0,
            },
            ..RuntimeSettings::default()
        };
        (clock.clone(), App::new(settings, clock))
    }

    fn rendered(app: &App<ManualClock>, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn fixed_interval_idle_shows_full_time() {
        let (_clock, app) = create_test_app(Exercise::FixedInterval);
        let out = rendered(&app, Rect::new(0, 0, 80, 24));

        assert!(out.contains("30.0s"));
        assert!(out.contains("points: 0"));
        assert!(out.contains("press (s) to start"));
    }

    #[test]
    fn fixed_interval_running_counts_down() {
        let (clock, mut app) = create_test_app(Exercise::FixedInterval);
        press(&mut app, 's');
        clock.set(6.0);
        press(&mut app, ' ');
        clock.set(7.5);

        let out = rendered(&app, Rect::new(0, 0, 80, 24));

        assert!(out.contains("22.5s"));
        assert!(out.contains("points: 1"));
        assert!(out.contains("[ space ]"));
    }

    #[test]
    fn fixed_interval_results_show_totals() {
        let (clock, mut app) = create_test_app(Exercise::FixedInterval);
        press(&mut app, 's');
        for t in [1.0, 6.0, 6.5, 12.0] {
            clock.set(t);
            press(&mut app, ' ');
        }
        clock.set(30.0);
        app.on_tick();

        let out = rendered(&app, Rect::new(0, 0, 80, 24));

        assert!(out.contains("4 responses   2 points"));
        assert!(out.contains("responses"));
    }

    #[test]
    fn choice_results_render_bars() {
        let (clock, mut app) = create_test_app(Exercise::Choice);
        press(&mut app, 's');
        press(&mut app, '2');
        press(&mut app, '2');
        press(&mut app, '3');
        clock.set(30.0);
        app.on_tick();

        let out = rendered(&app, Rect::new(0, 0, 80, 24));

        assert!(out.contains("presses per option"));
        assert!(out.contains("No loss"));
    }

    #[test]
    fn choice_running_lists_options() {
        let (_clock, mut app) = create_test_app(Exercise::Choice);
        press(&mut app, 's');

        let out = rendered(&app, Rect::new(0, 0, 100, 24));

        assert!(out.contains("[1] No loss (0)"));
        assert!(out.contains("[4] 20s (0)"));
    }

    #[test]
    fn discrimination_shows_points_and_shapes() {
        let (_clock, mut app) = create_test_app(Exercise::Discrimination);
        press(&mut app, '1');

        let out = rendered(&app, Rect::new(0, 0, 80, 24));

        assert!(out.contains("points: 1"));
        assert!(out.contains("●"));
    }

    #[test]
    fn status_line_is_rendered() {
        let (_clock, mut app) = create_test_app(Exercise::FixedInterval);
        app.status = Some("record saved to /tmp/x.csv".to_string());

        let out = rendered(&app, Rect::new(0, 0, 80, 24));

        assert!(out.contains("record saved"));
    }

    #[test]
    fn small_and_large_areas_render_without_panic() {
        for exercise in [
            Exercise::FixedInterval,
            Exercise::Choice,
            Exercise::Discrimination,
        ] {
            let (_clock, app) = create_test_app(exercise);
            for area in [
                Rect::new(0, 0, 10, 5),
                Rect::new(0, 0, 1, 1),
                Rect::new(0, 0, 300, 100),
            ] {
                let mut buffer = Buffer::empty(area);
                (&app).render(area, &mut buffer);
                assert_eq!(*buffer.area(), area);
            }
        }
    }

    #[test]
    fn legend_sits_on_bottom_row_inside_margin() {
        let (_clock, app) = create_test_app(Exercise::FixedInterval);
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);

        let bottom: String = (0..area.width)
            .map(|x| buffer[(x, area.height - 1)].symbol())
            .collect();
        let margin = HORIZONTAL_MARGIN as usize;
        assert!(bottom[..margin].trim().is_empty());
        assert!(bottom[margin..].starts_with("(s)tart"));
    }
}
