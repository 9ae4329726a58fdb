//! NoteVault API - gRPC API Layer
//!
//! This crate exposes note CRUD over gRPC (Tonic), backed by PostgreSQL
//! through a deadpool connection pool. Each RPC maps onto a single
//! parameterized statement.

pub mod config;
pub mod db;
pub mod error;
pub mod grpc;
pub mod server;
pub mod telemetry;

// Re-export commonly used types
pub use config::ServerConfig;
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use grpc::{create_service, proto, NoteServiceImpl};
pub use server::{serve, shutdown_signal};
pub use telemetry::{init_tracing, TelemetryConfig};
