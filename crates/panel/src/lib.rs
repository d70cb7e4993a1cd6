//! Remote gateway to a Pterodactyl-hosted server.
//!
//! [`RemoteGateway`] is the seam the deploy core talks through; [`Client`]
//! implements it over the panel's client API with `reqwest`.

pub mod client;
pub mod gateway;
pub mod signal;
pub mod types;

pub use client::{Client, DEFAULT_TIMEOUT};
pub use gateway::{GatewayFuture, RemoteGateway};
pub use signal::PowerSignal;

/// Errors from the panel gateway.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid API key")]
    InvalidKey,
}
