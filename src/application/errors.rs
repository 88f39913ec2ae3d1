use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::snapshot::SnapshotViolation;
use crate::domain::ports::source::SourceError;
use crate::domain::value_objects::tenant::TenantError;

/// Failures surfaced to the caller of an analytics run. Partial data is
/// never an error; it degrades the snapshot instead.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] TenantError),

    #[error("data access failed: {0}")]
    DataAccess(String),

    #[error("analytics run timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("snapshot failed validation: {0}")]
    InvalidSnapshot(#[from] SnapshotViolation),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AnalyticsError {
    /// HTTP-equivalent status code.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated(_) => 401,
            Self::Timeout(_) => 503,
            Self::DataAccess(_) | Self::InvalidSnapshot(_) | Self::Internal(_) => 500,
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

impl From<SourceError> for AnalyticsError {
    fn from(err: SourceError) -> Self {
        Self::DataAccess(err.to_string())
    }
}

/// `{"error": "..."}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(AnalyticsError::from(TenantError::Empty).status_code(), 401);
        assert_eq!(AnalyticsError::DataAccess("down".into()).status_code(), 500);
        assert_eq!(
            AnalyticsError::Timeout(Duration::from_secs(20)).status_code(),
            503
        );
        assert_eq!(AnalyticsError::Internal("bug".into()).status_code(), 500);
    }

    #[test]
    fn only_timeouts_are_retryable() {
        assert!(AnalyticsError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!AnalyticsError::DataAccess("down".into()).is_retryable());
        assert!(!AnalyticsError::from(TenantError::Empty).is_retryable());
    }

    #[test]
    fn body_serializes_as_error_object() {
        let err = AnalyticsError::from(SourceError::Unreachable("connection refused".into()));
        let json = serde_json::to_string(&err.body()).expect("serialize");
        assert_eq!(
            json,
            r#"{"error":"data access failed: data store unreachable: connection refused"}"#
        );
    }

    #[test]
    fn timeout_message_names_duration() {
        let err = AnalyticsError::Timeout(Duration::from_secs(20));
        assert_eq!(err.to_string(), "analytics run timed out after 20s");
    }
}
