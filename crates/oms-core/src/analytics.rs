//! Analytics aggregation over the order collection.
//!
//! One full scan per report: counts, revenue, pickup-type group-bys, a
//! top-N item ranking, and a per-day time series. No incremental or
//! cached aggregation is maintained; every call recomputes from scratch,
//! which keeps the logic simple and is the main scalability limit of
//! this component.

use oms_types::{
	AnalyticsReport, DateCount, ItemCount, Order, OrderStatus, PickupType,
	PickupTypeDistribution, RevenueByPickupType,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Computes the full analytics report for the given orders.
///
/// Revenue sums include orders of every status; an order contributes its
/// stored total price from the moment it is created. Orders are ranked
/// chronologically before aggregation so that ties in the item ranking
/// break deterministically by first appearance, independent of the
/// backend's scan order.
pub fn aggregate(orders: &[Order], top_items_limit: usize) -> AnalyticsReport {
	let mut ordered: Vec<&Order> = orders.iter().collect();
	ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

	let mut active_orders_count = 0u64;
	let mut completed_orders_count = 0u64;
	let mut total_revenue = Decimal::ZERO;
	let mut pickup_type_distribution = PickupTypeDistribution::default();
	let mut revenue_by_pickup_type = RevenueByPickupType::default();
	// item name -> (first appearance rank, summed quantity)
	let mut item_counts: HashMap<String, (usize, i64)> = HashMap::new();
	let mut orders_by_date: BTreeMap<String, u64> = BTreeMap::new();

	for order in &ordered {
		match order.status {
			OrderStatus::Active => active_orders_count += 1,
			OrderStatus::Completed => completed_orders_count += 1,
		}

		total_revenue += order.total_price;
		match order.pickup_type {
			PickupType::DineIn => {
				pickup_type_distribution.dine_in += 1;
				revenue_by_pickup_type.dine_in += order.total_price;
			},
			PickupType::TakeOut => {
				pickup_type_distribution.take_out += 1;
				revenue_by_pickup_type.take_out += order.total_price;
			},
		}

		for item in &order.items {
			let rank = item_counts.len();
			let entry = item_counts.entry(item.name.clone()).or_insert((rank, 0));
			entry.1 += item.quantity;
		}

		let date = order.created_at.format("%Y-%m-%d").to_string();
		*orders_by_date.entry(date).or_insert(0) += 1;
	}

	let mut ranked: Vec<(String, usize, i64)> = item_counts
		.into_iter()
		.map(|(name, (rank, count))| (name, rank, count))
		.collect();
	ranked.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)));
	ranked.truncate(top_items_limit);

	AnalyticsReport {
		total_orders: ordered.len() as u64,
		active_orders_count,
		completed_orders_count,
		total_revenue,
		pickup_type_distribution,
		revenue_by_pickup_type,
		most_ordered_items: ranked
			.into_iter()
			.map(|(name, _, count)| ItemCount { name, count })
			.collect(),
		orders_over_time: orders_by_date
			.into_iter()
			.map(|(date, count)| DateCount { date, count })
			.collect(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{DateTime, Utc};
	use oms_types::OrderItem;

	fn timestamp(value: &str) -> DateTime<Utc> {
		value.parse().unwrap()
	}

	fn order(
		id: &str,
		pickup_type: PickupType,
		status: OrderStatus,
		total_price: &str,
		created_at: &str,
		items: Vec<(&str, i64)>,
	) -> Order {
		Order {
			id: id.to_string(),
			customer_first_name: "Ada".to_string(),
			customer_last_name: "Lovelace".to_string(),
			pickup_type,
			items: items
				.into_iter()
				.map(|(name, quantity)| OrderItem {
					name: name.to_string(),
					unit_price: "1.00".parse().unwrap(),
					quantity,
				})
				.collect(),
			extra_charges: Decimal::ZERO,
			notes: String::new(),
			total_price: total_price.parse().unwrap(),
			status,
			created_at: timestamp(created_at),
			completed_at: None,
		}
	}

	#[test]
	fn test_empty_collection_yields_zeroes() {
		let report = aggregate(&[], 10);

		assert_eq!(report.total_orders, 0);
		assert_eq!(report.active_orders_count, 0);
		assert_eq!(report.completed_orders_count, 0);
		assert_eq!(report.total_revenue, Decimal::ZERO);
		assert_eq!(report.pickup_type_distribution, PickupTypeDistribution::default());
		assert!(report.most_ordered_items.is_empty());
		assert!(report.orders_over_time.is_empty());
	}

	#[test]
	fn test_distribution_and_revenue_by_pickup_type() {
		let orders = vec![
			order(
				"order_1_a",
				PickupType::DineIn,
				OrderStatus::Active,
				"10",
				"2025-01-01T09:00:00Z",
				vec![("Pad Thai", 1)],
			),
			order(
				"order_2_b",
				PickupType::DineIn,
				OrderStatus::Completed,
				"20",
				"2025-01-01T10:00:00Z",
				vec![("Pad Thai", 1)],
			),
			order(
				"order_3_c",
				PickupType::TakeOut,
				OrderStatus::Active,
				"5",
				"2025-01-01T11:00:00Z",
				vec![("Green Curry", 1)],
			),
		];

		let report = aggregate(&orders, 10);
		assert_eq!(report.total_orders, 3);
		assert_eq!(report.active_orders_count, 2);
		assert_eq!(report.completed_orders_count, 1);
		assert_eq!(report.pickup_type_distribution.dine_in, 2);
		assert_eq!(report.pickup_type_distribution.take_out, 1);
		assert_eq!(
			report.revenue_by_pickup_type.dine_in,
			"30".parse::<Decimal>().unwrap()
		);
		assert_eq!(
			report.revenue_by_pickup_type.take_out,
			"5".parse::<Decimal>().unwrap()
		);
		// Active orders count toward revenue
		assert_eq!(report.total_revenue, "35".parse::<Decimal>().unwrap());
	}

	#[test]
	fn test_most_ordered_items_ranking() {
		let orders = vec![
			order(
				"order_1_a",
				PickupType::TakeOut,
				OrderStatus::Active,
				"1",
				"2025-01-01T09:00:00Z",
				vec![("Pad Thai", 2), ("Spring Rolls", 3)],
			),
			order(
				"order_2_b",
				PickupType::TakeOut,
				OrderStatus::Active,
				"1",
				"2025-01-01T10:00:00Z",
				vec![("Pad Thai", 3), ("Green Curry", 3)],
			),
		];

		let report = aggregate(&orders, 10);
		let names: Vec<&str> = report
			.most_ordered_items
			.iter()
			.map(|item| item.name.as_str())
			.collect();

		// Pad Thai leads with 5; Spring Rolls and Green Curry tie at 3
		// and keep their first-appearance order
		assert_eq!(names, vec!["Pad Thai", "Spring Rolls", "Green Curry"]);
		assert_eq!(report.most_ordered_items[0].count, 5);
	}

	#[test]
	fn test_most_ordered_items_truncates_to_limit() {
		let orders = vec![order(
			"order_1_a",
			PickupType::TakeOut,
			OrderStatus::Active,
			"1",
			"2025-01-01T09:00:00Z",
			vec![("A", 5), ("B", 4), ("C", 3), ("D", 2)],
		)];

		let report = aggregate(&orders, 2);
		assert_eq!(report.most_ordered_items.len(), 2);
		assert_eq!(report.most_ordered_items[0].name, "A");
		assert_eq!(report.most_ordered_items[1].name, "B");
	}

	#[test]
	fn test_orders_over_time_buckets_by_utc_date() {
		let orders = vec![
			order(
				"order_1_a",
				PickupType::TakeOut,
				OrderStatus::Active,
				"1",
				"2025-01-02T23:59:00Z",
				vec![("A", 1)],
			),
			order(
				"order_2_b",
				PickupType::TakeOut,
				OrderStatus::Active,
				"1",
				"2025-01-01T00:00:00Z",
				vec![("A", 1)],
			),
			order(
				"order_3_c",
				PickupType::TakeOut,
				OrderStatus::Active,
				"1",
				"2025-01-02T08:00:00Z",
				vec![("A", 1)],
			),
		];

		let report = aggregate(&orders, 10);
		assert_eq!(
			report.orders_over_time,
			vec![
				DateCount {
					date: "2025-01-01".to_string(),
					count: 1
				},
				DateCount {
					date: "2025-01-02".to_string(),
					count: 2
				},
			]
		);
	}
}
