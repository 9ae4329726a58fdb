//! gRPC server assembly.

use std::future::Future;
use std::sync::Arc;

use notevault_storage::NoteStore;
use tonic::transport::Server;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::grpc::{create_service, proto};

/// Serve `NoteV1` (plus reflection, if enabled) until `shutdown` resolves.
///
/// In-flight requests are drained before this returns.
pub async fn serve<F>(store: Arc<dyn NoteStore>, config: &ServerConfig, shutdown: F) -> ApiResult<()>
where
    F: Future<Output = ()> + Send,
{
    let reflection = if config.reflection {
        let service = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(proto::FILE_DESCRIPTOR_SET)
            .build_v1()
            .map_err(|e| {
                ApiError::internal_error(format!("Failed to build reflection service: {}", e))
            })?;
        Some(service)
    } else {
        None
    };

    tracing::info!(
        addr = %config.grpc_addr,
        timeout_secs = config.request_timeout.as_secs(),
        reflection = config.reflection,
        "Starting NoteVault gRPC server"
    );

    Server::builder()
        .timeout(config.request_timeout)
        .layer(TraceLayer::new_for_grpc())
        .add_service(create_service(store))
        .add_optional_service(reflection)
        .serve_with_shutdown(config.grpc_addr, shutdown)
        .await?;

    tracing::info!("gRPC server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
