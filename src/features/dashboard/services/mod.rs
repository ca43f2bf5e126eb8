mod dashboard_service;
pub mod stats_aggregator;

pub use dashboard_service::DashboardService;
pub use stats_aggregator::{DefectStats, HistogramBucket};
