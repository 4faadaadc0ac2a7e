use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use ttargets::api::client::ApiClient;
use ttargets::app::App;
use ttargets::config::Config;
use ttargets::router::Router;
use ttargets::{event, ui};

/// Terminal UI for ENCODE targets
#[derive(Parser, Debug)]
#[command(name = "ttargets", version, about, long_about = None)]
struct Args {
    /// Base URL of the REST service
    #[arg(short, long)]
    url: Option<String>,

    /// Route to open first, e.g. "targets" or "/targets/42"
    #[arg(short, long)]
    route: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // The terminal belongs to the UI, so a log file we cannot open means no logs
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Could not open log file {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("ttargets started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ttargets").join("ttargets.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ttargets").join("ttargets.log");
    }
    PathBuf::from("ttargets.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    // Resolve everything that can fail before touching the terminal
    let config = Config::load();
    let base_url = config.effective_base_url(args.url.as_deref());
    let route = config.effective_route(args.route.as_deref());
    tracing::info!("Using service: {}, route: {}", base_url, route);

    let client = ApiClient::with_timeout(&base_url, config.request_timeout())?;
    let mut app = App::new(client, Router::with_default_routes(), config);
    app.navigate_command(&route);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = run_app(&mut terminal, &mut app);
    cleanup_terminal(&mut terminal)?;

    if let Err(err) = run_result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::handle_events(app)? {
            return Ok(());
        }

        // Fetches settle on runtime workers; pick up their results here
        app.sync_view();
    }
}
