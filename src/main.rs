mod action;
mod aggregator;
mod app;
mod auth;
mod config;
mod dedup;
mod error;
mod event;
mod filters;
mod git;
mod github;
mod keys;
mod query;
mod render_cache;
mod section;
mod sort;
mod source;
mod tui;
mod types;
mod ui;
mod viewport;

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::{Config, Overrides};
use crate::error::NudgeError;
use crate::event::Event;
use crate::github::GitHub;
use crate::sort::SortMode;
use crate::tui::EventHandler;

/// A terminal dashboard for GitHub notifications
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file (default: ~/.config/nudge/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show a single section with this query, e.g. "is:unread repo:owner/name"
    #[arg(long)]
    filter: Option<String>,

    /// Notifications requested per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Stop fetching after this many notifications (0 = no limit)
    #[arg(long)]
    max_total: Option<usize>,

    /// Hide notifications older than this many days (0 = no limit)
    #[arg(long)]
    max_age_days: Option<u32>,

    /// Initial sort order
    #[arg(long, value_enum)]
    sort: Option<SortMode>,

    /// Write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), NudgeError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Arc::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let config = Config::load(cli.config.as_deref()).with_overrides(Overrides {
        filter: cli.filter,
        page_size: cli.page_size,
        max_total: cli.max_total,
        max_age_days: cli.max_age_days,
        sort: cli.sort,
    });

    let token = auth::load_token()?;
    let github = GitHub::new(token)?;

    let result = run(config, github).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(config: Config, github: GitHub) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut app = App::new(
        &config,
        Arc::new(github),
        git::current_repo(),
        action_tx.clone(),
    );

    let size = terminal.size()?;
    app.update(Action::Resize(size.width, size.height));

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        app.sync_view();
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
