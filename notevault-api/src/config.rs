//! Server Configuration Module
//!
//! Listen address, per-request timeout and reflection toggle for the gRPC
//! server. Values come from environment variables (optionally seeded from a
//! `.env` file by the binary) with defaults suitable for local development.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};

/// Default gRPC listen address.
pub const DEFAULT_GRPC_ADDR: &str = "0.0.0.0:5001";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Read an environment variable, treating an empty value as unset.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// ============================================================================
// SERVER CONFIGURATION
// ============================================================================

/// gRPC server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the gRPC server binds to.
    pub grpc_addr: SocketAddr,
    /// Deadline applied to every request. Expired requests are cancelled and
    /// their pooled connection is returned.
    pub request_timeout: Duration,
    /// Whether to register the gRPC server reflection service.
    pub reflection: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            grpc_addr: SocketAddr::from(([0, 0, 0, 0], 5001)),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            reflection: true,
        }
    }
}

impl ServerConfig {
    /// Create ServerConfig from environment variables.
    ///
    /// Environment variables:
    /// - `NOTEVAULT_GRPC_ADDR`: listen address (default: 0.0.0.0:5001)
    /// - `NOTEVAULT_REQUEST_TIMEOUT_SECS`: per-request timeout (default: 30)
    /// - `NOTEVAULT_REFLECTION`: "true" or "false" (default: true)
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(env_var)
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let addr = lookup("NOTEVAULT_GRPC_ADDR").unwrap_or_else(|| DEFAULT_GRPC_ADDR.to_string());
        let grpc_addr = addr.parse::<SocketAddr>().map_err(|e| {
            ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e))
        })?;

        let request_timeout = match lookup("NOTEVAULT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| {
                    ApiError::invalid_input(format!("Invalid request timeout: {}", raw))
                })?;
                if secs == 0 {
                    return Err(ApiError::invalid_input("Request timeout must be positive"));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let reflection = match lookup("NOTEVAULT_REFLECTION") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ApiError::invalid_input(format!("Invalid NOTEVAULT_REFLECTION value: {}", raw))
            })?,
            None => true,
        };

        Ok(Self {
            grpc_addr,
            request_timeout,
            reflection,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
