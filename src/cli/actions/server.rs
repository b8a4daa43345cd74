use crate::{
    backend::ApiClient,
    session::SessionStore,
    web::{self, PortalState},
};
use anyhow::{Context, Result};
use std::{sync::Arc, time::Duration};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_url: String,
    pub api_timeout_seconds: u64,
    pub frontend_base_url: String,
    pub session_ttl_seconds: u64,
}

/// Build the shared state and serve until shutdown.
/// # Errors
/// Returns an error if the API URL is unusable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let client = ApiClient::new(
        &args.api_url,
        Duration::from_secs(args.api_timeout_seconds),
    )
    .context("invalid PORTAL_API_URL")?;

    debug!(api = client.base_url(), "authentication API configured");

    let sessions = SessionStore::new(Duration::from_secs(args.session_ttl_seconds));
    let state = Arc::new(PortalState::new(client, sessions, args.frontend_base_url));

    web::new(args.port, state).await
}
