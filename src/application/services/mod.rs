pub mod aggregator;
pub mod analytics;
