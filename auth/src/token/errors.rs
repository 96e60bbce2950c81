use thiserror::Error;

/// Error type for token operations.
///
/// `Expired` and `Invalid` are deliberately distinct variants: callers branch
/// differently on a token whose signature verifies but whose expiry has
/// passed versus one that is tampered, malformed, or signed in another
/// domain.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(String),
}
