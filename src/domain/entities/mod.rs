pub mod alert;
pub mod dataset;
pub mod factor;
pub mod features;
pub mod forecast;
pub mod health;
pub mod order;
pub mod product;
pub mod recommendation;
pub mod risk;
pub mod sales;
pub mod snapshot;
pub mod top_product;

pub use alert::Alert;
pub use dataset::Dataset;
pub use factor::{ExternalFactor, InfluencingFactor};
pub use features::{DemandSource, ProductFeatures};
pub use forecast::{ForecastPoint, ProductForecast, SalesForecast};
pub use health::BusinessHealth;
pub use order::{OrderLineItem, OrderRecord, OrderStatus};
pub use product::ProductSnapshot;
pub use recommendation::{Recommendation, RecommendationKind};
pub use risk::{RiskDriver, RiskEngine, RiskProfile};
pub use sales::SalesRecord;
pub use snapshot::{AnalyticsSnapshot, CachedSnapshot, SnapshotViolation, SNAPSHOT_SCHEMA_VERSION};
pub use top_product::TopProduct;
