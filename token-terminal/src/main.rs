use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use registry_core::models::{NewToken, TokenRecord};
use std::{io, time::Duration};

use tokio::sync::mpsc;

use token_terminal::app::{Action, App};
use token_terminal::network::RegistryClient;
use token_terminal::ui::ui;

enum AppEvent {
    TokensFetched(Vec<TokenRecord>),
    FetchFailed(String),
    TokenCreated(TokenRecord),
    CreateFailed(String),
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = token_terminal::config::load_config();
    let client = RegistryClient::new(&config.api_url);

    // Channel for async events
    let (tx, mut rx) = mpsc::channel(100);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    app.add_log(format!("Registry: {}", client.tokens_url()));

    // Fetch initial token list
    spawn_fetch(&client, &tx);

    let res = run_app(&mut terminal, &mut app, tx, &mut rx, client).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn spawn_fetch(client: &RegistryClient, tx: &mpsc::Sender<AppEvent>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match client.fetch_tokens().await {
            Ok(tokens) => AppEvent::TokensFetched(tokens),
            Err(e) => AppEvent::FetchFailed(e.to_string()),
        };
        let _ = tx.send(event).await;
    });
}

fn spawn_create(client: &RegistryClient, tx: &mpsc::Sender<AppEvent>, token: NewToken) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match client.create_token(&token).await {
            Ok(record) => AppEvent::TokenCreated(record),
            Err(e) => AppEvent::CreateFailed(e.to_string()),
        };
        let _ = tx.send(event).await;
    });
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tx: mpsc::Sender<AppEvent>,
    rx: &mut mpsc::Receiver<AppEvent>,
    client: RegistryClient,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        // Check for async events
        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::TokensFetched(tokens) => app.tokens_loaded(tokens),
                AppEvent::FetchFailed(msg) => app.tokens_failed(msg),
                AppEvent::TokenCreated(record) => {
                    app.token_created(record);
                    // Pick up anything written by other clients meanwhile.
                    spawn_fetch(&client, &tx);
                }
                AppEvent::CreateFailed(msg) => app.create_failed(msg),
            }
        }

        if crossterm::event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.handle_key(key) {
                    Some(Action::Quit) => return Ok(()),
                    Some(Action::Refresh) => {
                        app.add_log("Refreshing tokens...".to_string());
                        spawn_fetch(&client, &tx);
                    }
                    Some(Action::Submit(token)) => spawn_create(&client, &tx, token),
                    None => {}
                }
            }
        }
    }
}
