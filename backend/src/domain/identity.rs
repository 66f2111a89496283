//! User identity: name normalisation, user records, and access tokens.
//!
//! Two display names denote the same person when they are equal after
//! trimming surrounding whitespace and lowercasing. Every identity decision
//! (registration conflicts, login lookup, the admin check, duplicate
//! reconciliation) goes through [`normalize_name`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name whose normalised form grants administrative access.
pub const ADMIN_NAME: &str = "admin";

const TOKEN_PREFIX: &str = "user-";

/// Store-assigned user identifier.
///
/// Identifiers come from a database sequence and are never reused, so an id
/// removed by reconciliation cannot later resolve to a different user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A display name reduced to its identity key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedName(String);

impl NormalizedName {
    /// Borrow the normalised text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether nothing but whitespace was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this name carries administrative rights.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0 == ADMIN_NAME
    }

    /// Consume the wrapper, returning the normalised text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim surrounding whitespace and lowercase.
///
/// # Examples
/// ```
/// use teahouse::domain::normalize_name;
///
/// assert_eq!(normalize_name(" Admin ").as_str(), "admin");
/// assert_eq!(normalize_name(" Admin "), normalize_name("admin"));
/// ```
#[must_use]
pub fn normalize_name(raw: &str) -> NormalizedName {
    NormalizedName(raw.trim().to_lowercase())
}

/// Errors raised when a supplied name cannot identify a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NameValidationError {
    #[error("name must not be empty")]
    Empty,
}

/// Normalise `raw`, rejecting names that are blank once trimmed.
pub fn require_name(raw: &str) -> Result<NormalizedName, NameValidationError> {
    let name = normalize_name(raw);
    if name.is_empty() {
        return Err(NameValidationError::Empty);
    }
    Ok(name)
}

/// A registered user as stored.
///
/// `name` is kept exactly as persisted; rows written before registration
/// started storing normalised names may still carry padding or capitals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
}

impl User {
    /// Build a user from persisted fields.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Name as persisted.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Identity key for this user.
    #[must_use]
    pub fn normalized_name(&self) -> NormalizedName {
        normalize_name(&self.name)
    }

    /// Whether this user may call administrative operations.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.normalized_name().is_admin()
    }
}

/// Opaque bearer string handed out at registration and login.
///
/// The format is `user-<id>`; there is no signature and no expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

/// Reasons a presented token could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token must start with `{TOKEN_PREFIX}`")]
    MissingPrefix,
    #[error("token id `{0}` is not a positive integer")]
    InvalidId(String),
}

impl AccessToken {
    /// Issue the token for `user_id`.
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self(format!("{TOKEN_PREFIX}{user_id}"))
    }

    /// Borrow the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Decode the user identifier carried by `raw`.
    ///
    /// A leading `Bearer ` scheme is tolerated. Decoding says nothing about
    /// whether the user still exists; callers must resolve the id.
    ///
    /// # Examples
    /// ```
    /// use teahouse::domain::{AccessToken, UserId};
    ///
    /// assert_eq!(AccessToken::parse("Bearer user-7"), Ok(UserId::new(7)));
    /// assert!(AccessToken::parse("user-abc").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<UserId, TokenError> {
        let trimmed = raw.trim();
        let token = trimmed.strip_prefix("Bearer ").unwrap_or(trimmed).trim();
        let digits = token
            .strip_prefix(TOKEN_PREFIX)
            .ok_or(TokenError::MissingPrefix)?;
        match digits.parse::<i64>() {
            Ok(id) if id > 0 => Ok(UserId::new(id)),
            _ => Err(TokenError::InvalidId(digits.to_owned())),
        }
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
