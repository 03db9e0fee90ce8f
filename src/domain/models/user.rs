//! User domain model and the numeric key it is stored under.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::{DomainError, DomainResult};

/// Numeric entity key.
///
/// Always strictly positive. Construction is the only validation point for
/// keys, so an `EntityId` that exists has already passed the `InvalidKey`
/// check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct EntityId(i64);

impl EntityId {
    /// Validate `raw` as a key.
    pub fn new(raw: i64) -> DomainResult<Self> {
        if raw <= 0 {
            return Err(DomainError::InvalidKey(format!(
                "{raw} (keys must be positive)"
            )));
        }
        Ok(Self(raw))
    }

    /// The raw key value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for EntityId {
    type Error = DomainError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl FromStr for EntityId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidKey(format!("'{s}' is not a number")))?;
        Self::new(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user record.
///
/// `id` is `None` until the store assigns one on first save. The
/// timestamps are owned by the store and ignored on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,

    /// Display name.
    pub name: String,

    /// Email address, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Set by the store on first insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Set by the store on every write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Unsaved user with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the key to write under.
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Validate user attributes before they are written.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("User name cannot be empty".to_string());
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(format!("Invalid email address: {email}"));
            }
        }
        Ok(())
    }
}
