use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// External signal recorded alongside sales. Payloads of unknown shape
/// deserialize to [`ExternalFactor::Unknown`] instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExternalFactor {
    #[serde(rename_all = "camelCase")]
    Weather {
        date: NaiveDate,
        #[serde(default)]
        temperature_c: Option<f64>,
        #[serde(default)]
        precipitation_mm: Option<f64>,
    },
    Event {
        date: NaiveDate,
        name: String,
    },
    Holiday {
        date: NaiveDate,
        name: String,
    },
    #[serde(other)]
    Unknown,
}

impl ExternalFactor {
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Weather { date, .. } | Self::Event { date, .. } | Self::Holiday { date, .. } => {
                Some(*date)
            }
            Self::Unknown => None,
        }
    }
}

/// A signal found to move sales during the analysed period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencingFactor {
    pub factor: String,
    pub description: String,
    pub impact: String,
    /// Relative strength in `[0, 1]`, used for ordering
    pub strength: f64,
}
