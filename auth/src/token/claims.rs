use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity payload embedded in every issued token.
///
/// Carries the user id, login, and the opaque metadata blob attached to the
/// user record. The metadata is passed through untouched; nothing in the
/// token layer interprets it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenSubject {
    pub id: String,
    pub login: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Claims carried by a signed token: the subject fields plus issued-at and
/// absolute expiry timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Login of the subject
    pub login: String,

    /// Opaque user metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject with an absolute expiry computed from `ttl`.
    pub fn for_subject(subject: &TokenSubject, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: subject.id.clone(),
            login: subject.login.clone(),
            metadata: subject.metadata.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Recover the identity payload these claims were minted from.
    pub fn subject(&self) -> TokenSubject {
        TokenSubject {
            id: self.sub.clone(),
            login: self.login.clone(),
            metadata: self.metadata.clone(),
        }
    }
}
