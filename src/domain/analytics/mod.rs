//! The analytics pipeline: feature building, forecasting, risk
//! classification, health scoring, recommendation ranking and factor
//! analysis. Everything here is pure and synchronous.

pub mod engine;
pub mod factors;
pub mod features;
pub mod forecast;
pub mod health;
pub mod recommendations;
pub mod risk;
pub mod stats;
pub mod top_products;

pub use engine::{compute, AnalyticsInput, AnalyticsReport, EngineSettings};
