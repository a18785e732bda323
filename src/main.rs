// Campus board entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config (copying defaults on first run)
// 3. Open the per-user state database
// 4. Seed the fixture store
// 5. Restore session, ledger, and notifications
// 6. Build the chat relay from config
// 7. Serve the HTTP relay until shutdown

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use campus_board::app::Board;
use campus_board::chat::client::ChatClient;
use campus_board::chat::ChatRelay;
use campus_board::config;
use campus_board::db::Database;
use campus_board::http;
use campus_board::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing();
    info!("campus board starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "config loaded: port={}, model={}, persona={}",
        config.server.port, config.chat.model, config.chat.persona_user_id
    );

    // 3. Open the per-user state database
    if let Some(parent) = std::path::Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data directory {}", parent.display()))?;
        }
    }
    let db = Database::open(&config.db_path).context("failed to open database")?;
    info!("database opened at {}", config.db_path);

    // 4. Seed the fixture store
    let store = Store::seed();
    info!(
        "fixture store seeded: {} users, {} events, {} listings",
        store.users.len(),
        store.sports_events.len(),
        store.market_items.len()
    );

    // 5. Restore session, ledger, and notifications
    let board = Board::init(config.clone(), db, store).context("failed to initialize board")?;
    if let Some(user) = board.session.current() {
        info!(
            "signed in as {} ({} tokens, {} unread notifications)",
            user.name,
            user.tokens,
            board.notifications.unread_count()
        );
    }

    // 6. Build the chat relay from config
    let client = ChatClient::from_config(&config);
    match &client {
        ChatClient::Active(_) => info!("chat client initialized (API key configured)"),
        ChatClient::Disabled => info!("chat client disabled (no API key)"),
    }
    let relay = Arc::new(ChatRelay::new(
        Arc::new(client),
        config.chat.persona_user_id.clone(),
        config.chat.history_window,
    ));

    // 7. Serve the HTTP relay until shutdown
    http::serve(relay, &config.server).await?;

    info!("campus board shut down cleanly");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("campus_board=info,warn")),
        )
        .init();
}
