use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use peck::{
    app::{App, Control, Exercise},
    app_dirs::AppDirs,
    clock::MonotonicClock,
    config::{Config, ConfigStore, FileConfigStore, RuntimeSettings},
    error::PeckError,
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
};

/// operant conditioning exercises in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice with reinforcement schedules in the terminal: a fixed-interval session that draws your cumulative record, a concurrent choice between delays, and a shape discrimination board."
)]
pub struct Cli {
    /// exercise to open with
    #[clap(short = 'e', long, value_enum)]
    exercise: Option<Exercise>,

    /// seconds between reinforcement becoming available
    #[clap(short = 'i', long)]
    interval_secs: Option<f64>,

    /// length of a timed session in seconds
    #[clap(short = 's', long)]
    session_secs: Option<u64>,

    /// milliseconds between clock polls
    #[clap(long)]
    tick_rate_ms: Option<u64>,

    /// fixed top of the cumulative record's y axis
    #[clap(long = "chart-max")]
    chart_max_responses: Option<u32>,

    /// write the cumulative record to this csv file when a session ends
    #[clap(long)]
    export: Option<PathBuf>,

    /// store the given options as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line values win over the stored config
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(exercise) = self.exercise {
            cfg.exercise = exercise;
        }
        if let Some(secs) = self.interval_secs {
            cfg.interval_secs = secs;
        }
        if let Some(secs) = self.session_secs {
            cfg.session_secs = secs;
        }
        if let Some(ms) = self.tick_rate_ms {
            cfg.tick_rate_ms = ms;
        }
        if let Some(max) = self.chart_max_responses {
            cfg.chart_max_responses = max;
        }
        cfg
    }

    fn settings(&self, cfg: &Config) -> Result<RuntimeSettings, PeckError> {
        let mut settings = RuntimeSettings::try_from(cfg)?;
        settings.export_path = self.export.clone();
        Ok(settings)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Reported before raw mode; the session still runs without a log
    if let Err(e) = init_logging(AppDirs::log_path().as_deref()) {
        eprintln!("peck: logging disabled: {e}");
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    let settings = match cli.settings(&config) {
        Ok(settings) => settings,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };
    if cli.save_config {
        store.save(&config)?;
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!(exercise = %settings.exercise, "starting");
    let mut app = App::new(settings, MonotonicClock::new());
    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn init_logging(path: Option<&Path>) -> Result<(), PeckError> {
    match path {
        Some(path) => logging::init(path),
        None => Err(PeckError::Logging("no log directory".to_string())),
    }
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<MonotonicClock>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(app.settings.tick_rate),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    break;
                }
            }
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }
    }

    Ok(())
}
