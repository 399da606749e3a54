//! resumedeck - a terminal client for a resume server.
//!
//! Browse stored resumes, read them, fill the edit form from them, open
//! their export and delete them, from a TUI or one-shot subcommands.

mod api;
mod app;
mod cli;
mod config;
mod error;
mod events;
mod logging;
mod resume;
mod tasks;
mod ui;

use std::io::{self, Stdout};
use std::process::ExitCode;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use crate::app::App;
use crate::cli::Cli;
use crate::config::{Config, Profile, Settings};
use crate::error::{AppError, Result};
use crate::events::EventHandler;
use crate::logging::LogLevel;
use crate::tasks::create_task_channel;

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(LogLevel::from_verbose_flag(cli.verbose)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = run(cli).await;
    logging::shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Exiting with error");
            eprintln!("Error: {}", err.user_message());
            if let Some(action) = err.suggested_action() {
                eprintln!("{}", action);
            }
            if let Some(dir) = logging::log_directory() {
                eprintln!("Logs: {}", dir.display());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(mut cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command.take() {
        Some(command) => cli::run_command(&cli, command, config).await,
        None => {
            let profile = cli.resolve_profile(&config)?;
            info!(profile = %profile.name, url = %profile.url, "Using profile");
            run_tui(profile, config.settings).await
        }
    }
}

async fn run_tui(profile: Profile, settings: Settings) -> Result<()> {
    let mut terminal = setup_terminal()?;
    install_panic_hook();

    let result = event_loop(&mut terminal, profile, settings).await;

    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(terminal: &mut Tui, profile: Profile, settings: Settings) -> Result<()> {
    let (mut rx, spawner) = create_task_channel();
    let events = EventHandler::with_tick_rate(settings.tick_rate_ms);
    let mut app = App::new(profile, settings);

    while !app.should_quit() {
        while let Ok(message) = rx.try_recv() {
            app.handle_api_message(message);
        }
        for request in app.take_requests() {
            spawner.dispatch(app.client(), request);
        }

        terminal.draw(|frame| app.view(frame))?;

        // Polling blocks for up to one tick; keep the runtime's other workers free.
        let event = tokio::task::block_in_place(|| events.next())?;
        app.update(event);
    }

    Ok(())
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().map_err(|e| AppError::terminal(e.to_string()))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| AppError::terminal(e.to_string()))?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| AppError::terminal(e.to_string()))
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(|e| AppError::terminal(e.to_string()))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| AppError::terminal(e.to_string()))?;
    terminal
        .show_cursor()
        .map_err(|e| AppError::terminal(e.to_string()))
}

/// Leave the alternate screen before the default hook prints the panic.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        error!(%info, "Panic");
        default_hook(info);
    }));
}
