// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod choice;
pub mod clock;
pub mod config;
pub mod cumulative;
pub mod discrimination;
pub mod error;
pub mod export;
pub mod logging;
pub mod runtime;
pub mod schedule;
pub mod session;
pub mod timebox;
pub mod ui;
