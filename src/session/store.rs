use super::{resolve, Session, SessionRecord};
use crate::backend::{ApiClient, TokenPair, UserProfile};
use anyhow::{Context, Result};
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::debug;

/// Thirty days.
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

/// In-memory session records keyed by the hash of the cookie token.
///
/// The lock is never held across a call to the API.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    records: RwLock<HashMap<Vec<u8>, SessionRecord>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            records: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store a freshly signed-in session and return the raw cookie token.
    ///
    /// # Errors
    /// Returns an error if the OS random source fails.
    pub async fn create(&self, tokens: TokenPair, user: UserProfile) -> Result<String> {
        let token = generate_session_token()?;
        let record = SessionRecord::new(tokens, user, now_unix());
        debug!(user_id = %record.user.id, "session created");

        let mut records = self.records.write().await;
        // Sweep sessions whose cookie never came back.
        let before = records.len();
        records.retain(|_, existing| !self.is_expired(existing));
        if records.len() < before {
            debug!(dropped = before - records.len(), "expired sessions dropped");
        }
        records.insert(hash_session_token(&token), record);
        Ok(token)
    }

    /// Resolve the session behind `token` and persist the outcome.
    ///
    /// Unknown or expired tokens are absent without contacting the API.
    /// The returned record reflects the store after the write-back.
    pub async fn read(&self, client: &ApiClient, token: &str) -> Session {
        let key = hash_session_token(token);

        let record = {
            let records = self.records.read().await;
            match records.get(&key) {
                Some(record) => record.clone(),
                None => return Session::Absent,
            }
        };

        if self.is_expired(&record) {
            debug!(user_id = %record.user.id, "session expired");
            self.records.write().await.remove(&key);
            return Session::Absent;
        }

        let session = resolve(client, record).await;

        let mut records = self.records.write().await;
        match session {
            // Only the tokens are written back; a profile replaced while the
            // API call was in flight stays. A concurrent logout wins.
            Session::Authenticated(resolved) => match records.get_mut(&key) {
                Some(slot) => {
                    slot.tokens = resolved.tokens;
                    Session::Authenticated(slot.clone())
                }
                None => {
                    debug!("session removed while resolving");
                    Session::Absent
                }
            },
            Session::Absent => {
                records.remove(&key);
                Session::Absent
            }
        }
    }

    /// Replace the cached profile after the API accepted an update.
    pub async fn replace_profile(&self, token: &str, user: UserProfile) -> bool {
        let mut records = self.records.write().await;
        match records.get_mut(&hash_session_token(token)) {
            Some(record) => {
                record.user = user;
                true
            }
            None => false,
        }
    }

    /// Drop the session behind `token`; returns whether one existed.
    pub async fn remove(&self, token: &str) -> bool {
        self.records
            .write()
            .await
            .remove(&hash_session_token(token))
            .is_some()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn is_expired(&self, record: &SessionRecord) -> bool {
        now_unix().saturating_sub(record.created_at_unix) >= self.ttl.as_secs()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

/// Create a new session token for the cookie.
/// Only the raw value goes to the browser; the store keys on its hash.
fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}
