/// WSB Sentiment Dashboard
///
/// Polls the sentiment API in the background and renders the ticker table,
/// ticker tape, options flow and the earnings panel for the selected ticker.
///
/// Keys: `q`/`Esc` quit, `1`-`5` sort, `t` timeframe, `↑`/`↓` move,
/// `Enter` toggle earnings, `s` scrape.
use std::{
    error::Error,
    fs::File,
    io,
    path::Path,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::{mpsc, watch, Notify};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wsb_dashboard::{
    render_dashboard, spawn_earnings_fetch, spawn_poller, spawn_scrape, ApiClient,
    DashboardConfig, DashboardState, SortKey,
};

/// Redraw cadence; also bounds key latency
const FRAME_RATE: Duration = Duration::from_millis(200);
/// Ticker tape advances one item per step
const TAPE_STEP: Duration = Duration::from_secs(2);

/// The terminal belongs to the UI, so logs go to a file
fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = DashboardConfig::from_env()?;
    init_logging(&config.log_file)?;
    info!(
        "Starting dashboard against {} ({}, limit {})",
        config.api.base_url, config.timeframe, config.limit
    );

    let client = Arc::new(ApiClient::new(config.api.clone())?);
    let (update_tx, mut update_rx) = mpsc::channel(64);
    let (timeframe_tx, timeframe_rx) = watch::channel(config.timeframe);
    let repoll = Arc::new(Notify::new());

    let poller = spawn_poller(
        Arc::clone(&client),
        config.limit,
        config.refresh_interval,
        timeframe_rx,
        Arc::clone(&repoll),
        update_tx.clone(),
    );

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = DashboardState::new(config.timeframe);
    let mut tape_offset = 0usize;
    let mut last_step = Instant::now();

    loop {
        while let Ok(update) = update_rx.try_recv() {
            state.apply(update);
        }

        if last_step.elapsed() >= TAPE_STEP {
            tape_offset = tape_offset.wrapping_add(1);
            last_step = Instant::now();
        }

        let screen = state.view();
        terminal.draw(|f| render_dashboard(f, &screen, tape_offset))?;

        if !event::poll(FRAME_RATE)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                state.sort_by(SortKey::ALL[index]);
            }
            KeyCode::Char('t') => {
                let timeframe = state.cycle_timeframe();
                info!("Switching to {}", timeframe);
                if timeframe_tx.send(timeframe).is_err() {
                    warn!("Poller is gone, timeframe change not fetched");
                }
            }
            KeyCode::Up | KeyCode::Char('k') => state.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => state.move_cursor(1),
            KeyCode::Enter => {
                if let Some(symbol) = state.select_at_cursor() {
                    spawn_earnings_fetch(Arc::clone(&client), symbol, update_tx.clone());
                }
            }
            KeyCode::Char('s') => {
                if state.begin_scrape() {
                    spawn_scrape(Arc::clone(&client), Arc::clone(&repoll), update_tx.clone());
                }
            }
            _ => {}
        }
    }

    poller.abort();
    info!("Dashboard stopped");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
