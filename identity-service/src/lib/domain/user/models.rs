use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::errors::LoginError;
use crate::domain::user::errors::UserIdError;

/// User aggregate entity.
///
/// `metadata` is an opaque structured blob carried through token payloads
/// untouched; nothing in the service interprets it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub login: Login,
    pub password_hash: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Returns
    /// Parsed UserId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login value type
///
/// Logins are unique, case-sensitive, and otherwise opaque: any non-empty
/// string up to 255 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login(String);

impl Login {
    const MAX_LENGTH: usize = 255;

    /// Create a new valid login.
    ///
    /// # Arguments
    /// * `login` - Raw login string
    ///
    /// # Returns
    /// Validated Login value object
    ///
    /// # Errors
    /// * `Empty` - Login is empty
    /// * `TooLong` - Login longer than 255 bytes
    pub fn new(login: String) -> Result<Self, LoginError> {
        if login.is_empty() {
            return Err(LoginError::Empty);
        }
        if login.len() > Self::MAX_LENGTH {
            return Err(LoginError::TooLong {
                max: Self::MAX_LENGTH,
                actual: login.len(),
            });
        }
        Ok(Self(login))
    }

    /// Get login as string slice.
    ///
    /// # Returns
    /// Login string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new user with domain types
#[derive(Debug)]
pub struct CreateUserCommand {
    pub login: Login,
    pub password: String,
    pub metadata: Option<serde_json::Value>,
}

impl CreateUserCommand {
    /// Construct a new create user command.
    ///
    /// # Arguments
    /// * `login` - Validated login
    /// * `password` - Plain text password (will be hashed by service)
    /// * `metadata` - Opaque metadata blob to attach to the user
    pub fn new(login: Login, password: String, metadata: Option<serde_json::Value>) -> Self {
        Self {
            login,
            password,
            metadata,
        }
    }
}
