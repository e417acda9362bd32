//! Portfolio module - cross-currency aggregation for dashboards.

mod aggregator_model;
mod aggregator_service;


pub use aggregator_model::{
    AggregationPreferences, AllocationBucket, BucketAllocation, PortfolioSummary, TopAsset,
};
pub use aggregator_service::PortfolioAggregator;
