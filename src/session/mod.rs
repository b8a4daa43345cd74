//! Signed-in sessions.
//!
//! A session is either [`Session::Authenticated`] with a live token pair and
//! profile, or [`Session::Absent`]. [`resolve`] decides which one a stored
//! record still is; [`SessionStore`] keeps records between requests and
//! persists whatever `resolve` returns.

mod store;

pub use self::store::{SessionStore, DEFAULT_SESSION_TTL_SECONDS};

use crate::backend::{ApiClient, TokenPair, UserProfile};
use secrecy::SecretString;
use tracing::{debug, info, instrument};

#[derive(Clone, Debug)]
pub struct SessionRecord {
    pub tokens: TokenPair,
    pub user: UserProfile,
    pub created_at_unix: u64,
}

impl SessionRecord {
    #[must_use]
    pub fn new(tokens: TokenPair, user: UserProfile, created_at_unix: u64) -> Self {
        Self {
            tokens,
            user,
            created_at_unix,
        }
    }

    #[must_use]
    fn with_access(self, access: SecretString) -> Self {
        Self {
            tokens: self.tokens.with_access(access),
            ..self
        }
    }
}

#[derive(Clone, Debug)]
pub enum Session {
    Authenticated(SessionRecord),
    Absent,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Re-check a stored record against the API.
///
/// Exactly one verification call; one refresh call only when verification
/// fails. A failed refresh drops the session.
#[instrument(skip_all, fields(user_id = %record.user.id))]
pub async fn resolve(client: &ApiClient, record: SessionRecord) -> Session {
    if client.verify_token(record.tokens.access()).await {
        return Session::Authenticated(record);
    }

    match client.refresh_token(record.tokens.refresh()).await {
        Ok(access) => {
            debug!("access token refreshed");
            Session::Authenticated(record.with_access(access))
        }
        Err(e) => {
            info!("dropping session, refresh failed: {e}");
            Session::Absent
        }
    }
}
