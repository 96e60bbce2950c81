//! Authentication primitives library
//!
//! Provides the building blocks the identity service is assembled from:
//! - Password hashing (Argon2id with per-password salt)
//! - Signed, expiring identity tokens (JWT, HS256)
//!
//! Token signing is organized around independent signing domains: each
//! [`TokenSigner`] is bound to one secret and one lifetime at construction,
//! so a token minted for one domain (e.g. access) never verifies in another
//! (e.g. refresh).
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Identity Tokens
//! ```
//! use auth::{TokenSigner, TokenSubject};
//! use chrono::Duration;
//!
//! let signer = TokenSigner::new(b"secret_key_at_least_32_bytes_long!", Duration::minutes(15));
//! let subject = TokenSubject {
//!     id: "user123".to_string(),
//!     login: "alice".to_string(),
//!     metadata: None,
//! };
//! let token = signer.issue(&subject).unwrap();
//! let claims = signer.verify(&token).unwrap();
//! assert_eq!(claims.subject(), subject);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenSigner;
pub use token::TokenSubject;
