//! Server entrypoint for hearth
//!
//! Wires configuration, storage, the engine adapter, and the HTTP router
//! together using dependency injection, then serves until interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use hearth_application::ports::chat_repository::ChatRepository;
use hearth_application::ports::engine::InferenceEngine;
use hearth_application::ports::user_repository::UserRepository;
use hearth_application::{ManageChatsUseCase, ManageUserUseCase, SendMessageUseCase};
use hearth_infrastructure::{ConfigLoader, FileChatStore, FileUserStore, OllamaEngine};
use hearth_presentation::{AppState, router};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Local-first LLM chat server.
#[derive(Parser, Debug)]
#[command(name = "hearth", version, about)]
struct Cli {
    /// Path to a config file (merged over discovered config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(short, long)]
    address: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config =
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?;
    config.validate()?;

    // Initialize logging based on verbosity level; optionally into
    // daily-rolling files.
    let filter = match cli.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let _log_guard = match &config.logging.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "hearth.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    };

    info!("starting hearth");

    // === Dependency Injection ===
    let data_dir = config.data_dir();
    let chats: Arc<dyn ChatRepository> =
        Arc::new(FileChatStore::open(data_dir.join("chats.json"))?);
    let users: Arc<dyn UserRepository> =
        Arc::new(FileUserStore::open(data_dir.join("users.json"))?);

    let ollama = OllamaEngine::new(config.engine.binary.clone());
    ollama.check_available();
    let engine: Arc<dyn InferenceEngine> = Arc::new(ollama);

    let default_username = config.user.default_username.clone();
    let send_message = Arc::new(SendMessageUseCase::new(
        engine,
        Arc::clone(&chats),
        Arc::clone(&users),
        default_username.clone(),
        config.streaming_params(),
    ));
    let manage_chats = Arc::new(ManageChatsUseCase::new(Arc::clone(&chats)));
    let manage_user = Arc::new(ManageUserUseCase::new(Arc::clone(&users), default_username));

    // First run: seed the greeting chat so the client has something to
    // render.
    if chats.count().await? == 0 {
        manage_chats.create_greeting_chat().await?;
    }

    let state = AppState {
        send_message,
        chats: manage_chats,
        users: manage_user,
    };
    let app = router(state);

    let address = cli.address.unwrap_or_else(|| config.server.address.clone());
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(model = %config.engine.model, "listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server exited gracefully");
    Ok(())
}

/// Resolves on ctrl-c, triggering graceful shutdown.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
