//! Event Booking Chat Server
//!
//! Proxies `POST /chat` queries to an OpenAI-compatible completion API.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OPENAI_API_KEY` | - | Upstream API key (required) |
//! | `EB_CHAT_PORT` | `8081` | HTTP port |
//! | `EB_CHAT_BASE_URL` | `https://api.openai.com/v1` | Upstream base URL |
//! | `EB_CHAT_MODEL` | `gpt-4` | Model name |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use eb_chat::{chat_router, ChatClientConfig, ChatState, OpenAiChatClient};
use eb_common::{init_logging, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.log);
    config.validate_chat()?;

    info!(model = %config.chat.model, base_url = %config.chat.base_url, "Starting Event Booking Chat Server");

    let client = OpenAiChatClient::new(ChatClientConfig::new(
        config.chat.api_key.clone(),
        config.chat.base_url.clone(),
        config.chat.model.clone(),
    ))?;

    let app = chat_router(ChatState {
        completion: Arc::new(client),
    })
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let addr = config.chat_bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Chat server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Event Booking Chat Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
