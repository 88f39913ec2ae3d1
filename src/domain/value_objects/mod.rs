pub mod intensity;
pub mod risk_level;
pub mod settings;
pub mod severity;
pub mod tenant;
pub mod thresholds;

pub use intensity::Intensity;
pub use risk_level::RiskLevel;
pub use settings::{ForecastSettings, LookbackWindow};
pub use severity::Severity;
pub use tenant::{TenantError, TenantId};
pub use thresholds::ThresholdSet;
