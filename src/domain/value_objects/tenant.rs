use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_TENANT_LEN: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TenantError {
    #[error("tenant identity is empty")]
    Empty,
    #[error("tenant identity is too long ({0} characters)")]
    TooLong(usize),
    #[error("tenant identity contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Resolved identity of one business account. Data of different tenants is
/// never mixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Parse a raw identity: trimmed, non-empty, ASCII alphanumerics, `-` and `_`.
    ///
    /// # Errors
    ///
    /// Returns `TenantError` when the identity cannot be resolved.
    pub fn parse(raw: &str) -> Result<Self, TenantError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TenantError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_TENANT_LEN {
            return Err(TenantError::TooLong(len));
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(TenantError::InvalidCharacter(bad));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantId {
    type Error = TenantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
