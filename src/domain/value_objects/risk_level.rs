use serde::{Deserialize, Serialize};

use super::thresholds::ThresholdSet;

/// Per-product risk classification derived from numeric risk percentages
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// High above `risk_high`, Medium above `risk_medium`, Low otherwise.
    #[must_use]
    pub fn from_percent(percent: f64, thresholds: &ThresholdSet) -> Self {
        if percent > thresholds.risk_high {
            Self::High
        } else if percent > thresholds.risk_medium {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}
