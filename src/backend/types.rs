use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Access/refresh pair issued by the remote API.
///
/// The refresh token is fixed for the lifetime of the pair; only the access
/// token is ever replaced.
#[derive(Clone, Debug)]
pub struct TokenPair {
    access: SecretString,
    refresh: SecretString,
}

impl TokenPair {
    #[must_use]
    pub fn new(access: SecretString, refresh: SecretString) -> Self {
        Self { access, refresh }
    }

    #[must_use]
    pub fn access(&self) -> &SecretString {
        &self.access
    }

    #[must_use]
    pub fn refresh(&self) -> &SecretString {
        &self.refresh
    }

    /// Swap in a freshly minted access token, keeping the refresh token.
    #[must_use]
    pub fn with_access(self, access: SecretString) -> Self {
        Self {
            access,
            refresh: self.refresh,
        }
    }
}

/// User profile as served by the remote API.
///
/// Field names on the wire follow the API (`uid`, `avatar`, `introduction`).
#[derive(ToSchema, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "uid")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "avatar", default)]
    pub avatar_url: Option<String>,
    #[serde(rename = "introduction", default, deserialize_with = "null_as_empty")]
    pub bio: String,
    pub created_at: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
