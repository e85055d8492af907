use std::sync::Arc;

use clap::Parser;
use heartchat::{
    AppState,
    chat::{Chat, spawn_sweeper},
    clock::SystemClock,
    config::Args,
    db, router,
    store::{MemoryStore, SqliteStore},
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("heartchat={},tower_http=info", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let clock = Arc::new(SystemClock);
    let chat = match &args.database_url {
        Some(url) => {
            let db_pool = db::connect(url).await?;
            info!("Using sqlite store at {}", url);
            let store = Arc::new(SqliteStore::new(db_pool));
            Chat::new(store.clone(), store, clock)
        }
        None => {
            info!("DATABASE_URL not set, keeping the room in memory");
            let store = Arc::new(MemoryStore::new());
            Chat::new(store.clone(), store, clock)
        }
    };
    let chat = Arc::new(chat);

    let sweeper = spawn_sweeper(chat.clone(), args.sweep());

    let app = router(AppState { chat });
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("listening on {}", args.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("bye");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
