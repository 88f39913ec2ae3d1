use serde::{Deserialize, Serialize};

/// Qualitative High/Medium/Low label used for volatility buckets and
/// sensitivity roll-ups.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Intensity {
    #[default]
    Low,
    Medium,
    High,
}

impl Intensity {
    /// Buckets a coefficient of variation: `< low` is Low, `> high` is High.
    #[must_use]
    pub fn from_variation(cv: f64, low: f64, high: f64) -> Self {
        if cv > high {
            Self::High
        } else if cv >= low {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Buckets an absolute correlation coefficient.
    #[must_use]
    pub fn from_correlation(r: f64) -> Self {
        let strength = r.abs();
        if strength >= 0.6 {
            Self::High
        } else if strength >= 0.3 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}
