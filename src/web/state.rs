//! Shared state handed to every handler.

use crate::{backend::ApiClient, session::SessionStore};

#[derive(Debug)]
pub struct PortalState {
    client: ApiClient,
    sessions: SessionStore,
    frontend_base_url: String,
}

impl PortalState {
    #[must_use]
    pub fn new(client: ApiClient, sessions: SessionStore, frontend_base_url: String) -> Self {
        Self {
            client,
            sessions,
            frontend_base_url,
        }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    /// Only mark cookies secure when the frontend is served over HTTPS.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn state(frontend: &str) -> PortalState {
        PortalState::new(
            ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap(),
            SessionStore::new(Duration::from_secs(60)),
            frontend.to_string(),
        )
    }

    #[test]
    fn cookie_secure_follows_frontend_scheme() {
        assert!(state("https://portal.dev").cookie_secure());
        assert!(!state("http://localhost:3000").cookie_secure());
    }
}
