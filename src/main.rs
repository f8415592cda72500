mod api;
mod app;
mod config;
mod logging;
mod session;
mod ui;

use crate::api::{ApiManager, BooksApi};
use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::AppState;
use crate::session::{FileStorage, SessionStore};
use anyhow::{Context, Result};
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Load config
    let cfg = config::load_config()?;

    // Held until exit so buffered log lines reach the file
    let _log_guard = logging::init(&cfg.logging)?;

    let storage = FileStorage::open(cfg.storage.resolved_path());
    tracing::debug!(path = %storage.path().display(), "opened session storage");
    let session = SessionStore::restore(Box::new(storage));

    let api = BooksApi::new(&cfg.api.base_url).context("Failed to build HTTP client")?;
    tracing::info!(base_url = %cfg.api.base_url, "using catalog backend");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, cfg, session, api).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "exiting with error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("bookshelf exiting");
    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
    session: SessionStore,
    api: BooksApi,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let tick_ms = cfg.ui.tick_ms.max(10);
    let mut state = AppState::new(cfg, session);
    let api_manager = ApiManager::new(api, event_tx.clone());

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    if term_tx.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, "terminal event stream failed");
                    break;
                }
                None => break,
            }
        }
    });

    // Spawn tick task; drives notification expiry
    let tick_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_millis(tick_ms));
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    let startup = state.startup();
    dispatch(&mut state, &api_manager, startup);

    // Initial render
    terminal.draw(|f| ui::render(f, &state))?;

    // Main event loop
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };

        let actions = handler::handle_event(&mut state, event);
        dispatch(&mut state, &api_manager, actions);

        if state.should_quit {
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    Ok(())
}

fn dispatch(state: &mut AppState, api: &ApiManager, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::FetchBooks { seq, query } => {
                let token = state.session.token().map(str::to_owned);
                api.fetch_books(seq, query, token);
            }
            Action::CreateBook { input, token } => api.create_book(input, token),
            Action::UpdateBook { id, input, token } => api.update_book(id, input, token),
            Action::DeleteBook { id, token } => api.delete_book(id, token),
            Action::Login { credentials } => api.login(credentials),
            Action::Register { registration } => api.register(registration),
            Action::Quit => state.should_quit = true,
        }
    }
}
