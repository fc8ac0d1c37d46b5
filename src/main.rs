use agrichat::{config, key_handlers, logging, ui, App, AppState};
use anyhow::Context;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use reqwest::Client;
use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{mpsc, Mutex};

/// Enum for different types of events.
enum Event {
    Input(CEvent),
    Tick,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    config::initialize_config().context("failed to initialize configuration")?;
    let _logger = logging::init_logging().context("failed to start logger")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = Arc::new(Mutex::new(App::new(config::get_config().backend_url)));
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

/// Main loop of the application.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: Arc<Mutex<App>>,
) -> anyhow::Result<()> {
    let client = Client::new();
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    // Read terminal events and emit a tick every 250ms for the spinner
    tokio::task::spawn_blocking(move || {
        let mut last_tick = Instant::now();
        loop {
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(ev) = event::read() {
                    if tx.blocking_send(Event::Input(ev)).is_err() {
                        return;
                    }
                }
            }

            if last_tick.elapsed() >= Duration::from_millis(250) {
                if tx.blocking_send(Event::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });

    loop {
        {
            let mut guard = app.lock().await;
            terminal.draw(|f| ui::draw(f, &mut guard))?;
            if guard.state == AppState::Quit {
                break;
            }
        }

        match rx.recv().await {
            Some(Event::Input(CEvent::Key(key))) => {
                let mut guard = app.lock().await;
                match guard.state {
                    AppState::Chat => {
                        key_handlers::handle_chat_input(&mut guard, key, &app, &client)
                    }
                    AppState::QuitConfirm => {
                        key_handlers::handle_quit_confirm_input(key, &mut guard)
                    }
                    AppState::Quit => break,
                }
            }
            Some(Event::Input(_)) => {}
            Some(Event::Tick) => {}
            None => break,
        }
    }

    Ok(())
}
