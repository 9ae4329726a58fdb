//! NoteVault API Server Entry Point
//!
//! Loads configuration, connects the PostgreSQL pool and serves the
//! `NoteV1` gRPC service until a shutdown signal arrives.

use std::sync::Arc;

use notevault_api::{
    init_tracing, serve, shutdown_signal, ApiResult, DbClient, DbConfig, ServerConfig,
    TelemetryConfig,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    // A missing .env file is normal outside development.
    let dotenv = dotenvy::dotenv();

    let telemetry_config = TelemetryConfig::from_env();
    init_tracing(&telemetry_config)?;

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    let server_config = ServerConfig::from_env()?;
    let db_config = DbConfig::from_env()?;
    let db = DbClient::from_config(&db_config)?;

    db.ping().await?;
    tracing::info!(
        database = %db_config.redacted_url(),
        pool_max_size = db_config.max_size,
        "Connected to database"
    );

    let result = serve(Arc::new(db.clone()), &server_config, shutdown_signal()).await;

    db.close();
    tracing::info!("Database pool closed");

    result
}
