//! Analytics API implementation.
//!
//! Exposes the on-demand analytics report. Each request triggers a full
//! scan of the order collection; the report may be momentarily stale
//! relative to concurrent writes, which is acceptable for a dashboard.

use oms_core::{EngineError, OrderEngine};
use oms_types::AnalyticsReport;

/// Computes the analytics report over the full order collection.
pub async fn compute_analytics(engine: &OrderEngine) -> Result<AnalyticsReport, EngineError> {
	engine.compute_analytics().await
}
