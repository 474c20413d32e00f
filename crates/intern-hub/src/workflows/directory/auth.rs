use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AccountId, Role};

/// Sessions are valid for a fixed seven days from issuance.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Claims carried by a verified bearer token. The core trusts these verbatim
/// as the caller's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub account_id: AccountId,
    pub email: String,
    pub role: Role,
}

/// A freshly issued session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Session capability: issue a bearer token for verified claims and resolve
/// a presented token back to claims. Expired or unknown tokens resolve to
/// `None`.
pub trait SessionGateway: Send + Sync {
    fn issue(&self, claims: SessionClaims) -> Result<IssuedSession, SessionError>;
    fn verify(&self, token: &str) -> Option<SessionClaims>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Credential capability: opaque hash and compare.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("unable to hash credential: {0}")]
    Hash(String),
}
