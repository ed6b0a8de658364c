//! Analytics report types produced by the aggregation engine.
//!
//! The report is computed by a full scan over the order collection and is
//! returned to dashboard clients as a single JSON document. Field names
//! follow the camelCase convention of the existing dashboard wire format.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Summary statistics over the full order collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
	/// Count of all orders, any status.
	pub total_orders: u64,
	/// Count of orders still active.
	pub active_orders_count: u64,
	/// Count of completed orders.
	pub completed_orders_count: u64,
	/// Sum of total prices over all orders regardless of status.
	/// Active orders count toward revenue.
	pub total_revenue: Decimal,
	/// Order counts partitioned by pickup type.
	pub pickup_type_distribution: PickupTypeDistribution,
	/// Revenue partitioned by pickup type, same all-statuses scope as
	/// `total_revenue`.
	pub revenue_by_pickup_type: RevenueByPickupType,
	/// Most ordered item names by summed quantity, descending, truncated
	/// to the configured limit.
	pub most_ordered_items: Vec<ItemCount>,
	/// Order counts bucketed by UTC calendar date, ascending.
	pub orders_over_time: Vec<DateCount>,
}

/// Order counts partitioned by pickup type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupTypeDistribution {
	pub dine_in: u64,
	pub take_out: u64,
}

/// Revenue partitioned by pickup type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueByPickupType {
	pub dine_in: Decimal,
	pub take_out: Decimal,
}

/// An item name with its summed ordered quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCount {
	/// Menu item name.
	pub name: String,
	/// Total quantity ordered across all orders.
	pub count: i64,
}

/// An order count for one UTC calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCount {
	/// Calendar date in `YYYY-MM-DD` form.
	pub date: String,
	/// Number of orders created on that date.
	pub count: u64,
}
