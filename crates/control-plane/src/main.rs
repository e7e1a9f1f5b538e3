// Taskdeck notification server
// Decision: Without DATABASE_URL the server runs in dev mode on in-memory storage
// Decision: Without SMTP credentials emails are logged instead of sent

use anyhow::{Context, Result};
use std::sync::Arc;
use taskdeck_control_plane::auth::AuthConfig;
use taskdeck_control_plane::config::{ServerConfig, SmtpConfig};
use taskdeck_control_plane::email::EmailService;
use taskdeck_control_plane::storage::StorageBackend;
use taskdeck_control_plane::{build_app, AppContext};
use taskdeck_core::telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real deployments set the environment directly
    let _ = dotenvy::dotenv();

    // Configure via environment variables:
    // - RUST_LOG: Log filter (default: "taskdeck_control_plane=debug,tower_http=debug")
    // - LOG_FORMAT: "json" for structured output
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.service_name == "taskdeck" {
        telemetry_config.service_name = "taskdeck-control-plane".to_string();
    }
    init_telemetry(telemetry_config);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "taskdeck-control-plane starting...");

    let server_config = ServerConfig::from_env();

    let storage = match server_config.database_url.as_deref() {
        Some(url) => {
            let backend = StorageBackend::postgres(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database, migrations applied");
            backend
        }
        None => {
            tracing::warn!("DATABASE_URL not set, running in dev mode with in-memory storage");
            StorageBackend::in_memory()
        }
    };

    let auth_config = AuthConfig::from_env().context("Invalid authentication configuration")?;
    tracing::info!(mode = ?auth_config.mode, "Authentication configured");

    let email = EmailService::from_config(&SmtpConfig::from_env())
        .context("Failed to configure email transport")?;

    let ctx = AppContext::new(
        Arc::new(storage),
        email,
        auth_config,
        server_config.default_list_limit,
    );
    let app = build_app(&ctx, &server_config);

    let listener = tokio::net::TcpListener::bind(&server_config.http_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_config.http_addr))?;
    tracing::info!(address = %server_config.http_addr, "HTTP server listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
