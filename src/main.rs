use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use shiptrack::board::Board;
use shiptrack::config::AppConfig;
use shiptrack::{FileStorage, RecordStore};
use std::io;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Logs go to a file so they don't draw over the board.
    let appender = tracing_appender::rolling::daily(config.log_dir(), "shiptrack.log");
    let (writer, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let storage = FileStorage::new(&config.data_dir, config.slot.clone())
        .with_context(|| format!("failed to open data dir {}", config.data_dir.display()))?;
    tracing::info!(path = %storage.path().display(), "using task slot");
    let store = RecordStore::new(storage);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut board = Board::new();
    let result = shiptrack::ui::run_app(&mut terminal, &mut board, &store).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("{:?}", err);
    }
    Ok(())
}
