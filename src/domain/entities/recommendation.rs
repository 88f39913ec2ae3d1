use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Restock,
    Discount,
    Promote,
    Donate,
    Bulk,
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Restock => write!(f, "restock"),
            Self::Discount => write!(f, "discount"),
            Self::Promote => write!(f, "promote"),
            Self::Donate => write!(f, "donate"),
            Self::Bulk => write!(f, "bulk"),
        }
    }
}

/// A suggested action. Never executed by the engine itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub action: String,
    pub reason: String,
    pub impact: String,
    /// 1 is the highest priority
    pub priority: u32,
    pub kind: RecommendationKind,
    pub product_id: Option<String>,
    /// Estimated financial impact in currency units
    pub estimated_impact: f64,
}
