use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sof_extract::api::{create_router, AppState};
use sof_extract::config::Config;
use sof_extract::llm::{CompletionModel, LlmApiClient};
use sof_extract::session::InMemorySessionStore;

#[derive(Parser)]
#[command(name = "sof-extract")]
#[command(about = "Extract port-operation events from Statement of Facts documents")]
struct Args {
    /// Address to bind, overriding SOF_HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding SOF_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sof_extract=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tokio::fs::create_dir_all(&config.uploads.dir).await?;

    tracing::info!("Initializing LLM client: {}...", config.llm.model);
    let client = LlmApiClient::new(&config.llm)?;
    tracing::info!(
        backend = ?client.backend(),
        base_url = %client.base_url(),
        "LLM client ready"
    );
    let model: Arc<dyn CompletionModel> = Arc::new(client);

    let sessions = Arc::new(InMemorySessionStore::new(config.session.capacity));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, model, sessions);
    let app = create_router(state);

    tracing::info!("SoF extractor starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
