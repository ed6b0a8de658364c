//! Core engine for the order management system.
//!
//! This module provides the single source of truth for order pricing,
//! lifecycle transitions, and analytics. Transport adapters (HTTP or
//! otherwise) hold an `OrderEngine` and call into it; they contain no
//! business logic of their own, so every entry point prices and
//! aggregates identically.

use oms_config::Config;
use oms_storage::{StorageError, StorageInterface, StorageService};
use oms_types::{AnalyticsReport, NewOrderRequest, Order, OrderStatus};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod analytics;
pub mod factory;
pub mod lifecycle;

use lifecycle::OrderLifecycle;

/// Errors that can occur during engine operations.
///
/// All errors are terminal for the request that triggered them; nothing
/// is retried or recovered internally.
#[derive(Debug, Error)]
pub enum EngineError {
	/// Malformed or missing required input; the first violated rule.
	#[error("Validation error: {0}")]
	Validation(String),
	/// An operation referenced a nonexistent order id.
	#[error("Order not found: {0}")]
	NotFound(String),
	/// An operation raced a concurrent request and lost.
	#[error("Conflict: {0}")]
	Conflict(String),
	/// The underlying key-value store failed.
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
	/// The engine could not be constructed from its configuration.
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Main engine coordinating order creation, completion, listings, and
/// analytics over a single storage backend.
pub struct OrderEngine {
	/// Service configuration.
	config: Config,
	/// Lifecycle manager owning all order persistence.
	lifecycle: OrderLifecycle,
}

impl OrderEngine {
	/// Creates a new engine over an already constructed storage service.
	pub fn new(config: Config, storage: Arc<StorageService>) -> Self {
		Self {
			config,
			lifecycle: OrderLifecycle::new(storage),
		}
	}

	/// Returns the engine configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Validates, prices, and persists a new order.
	pub async fn create_order(&self, request: NewOrderRequest) -> Result<Order, EngineError> {
		let order = factory::build_order(&request, self.config.pricing.service_charge_rate)?;
		self.lifecycle.store_order(&order).await?;
		tracing::info!(order_id = %order.id, total_price = %order.total_price, "Order created");
		Ok(order)
	}

	/// Completes an active order, failing on unknown ids and on orders
	/// that are no longer active.
	pub async fn complete_order(&self, order_id: &str) -> Result<Order, EngineError> {
		let order = self.lifecycle.complete_order(order_id).await?;
		tracing::info!(order_id = %order.id, "Order completed");
		Ok(order)
	}

	/// Retrieves a single order by id.
	pub async fn get_order(&self, order_id: &str) -> Result<Order, EngineError> {
		self.lifecycle.get_order(order_id).await
	}

	/// Lists orders with exactly the given status, most recent first.
	pub async fn list_orders(&self, status: OrderStatus) -> Result<Vec<Order>, EngineError> {
		let mut orders = self.lifecycle.load_all().await?;
		orders.retain(|order| order.status == status);
		orders.sort_by(|a, b| {
			b.created_at
				.cmp(&a.created_at)
				.then_with(|| b.id.cmp(&a.id))
		});
		Ok(orders)
	}

	/// Scans the full order collection and computes the analytics
	/// report.
	pub async fn compute_analytics(&self) -> Result<AnalyticsReport, EngineError> {
		let orders = self.lifecycle.load_all().await?;
		Ok(analytics::aggregate(
			&orders,
			self.config.analytics.top_items_limit,
		))
	}
}

/// Builder for constructing an OrderEngine with a pluggable storage
/// backend.
pub struct EngineBuilder {
	config: Config,
}

impl EngineBuilder {
	/// Creates a new EngineBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the OrderEngine using the given storage factories.
	///
	/// Every configured implementation is instantiated so configuration
	/// mistakes surface at startup, then the primary is selected.
	pub fn build<SF>(self, storage_factories: HashMap<String, SF>) -> Result<OrderEngine, EngineError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let mut storage_impls = HashMap::new();
		for (name, config) in &self.config.storage.implementations {
			if let Some(factory) = storage_factories.get(name) {
				let implementation = factory(config).map_err(|e| {
					EngineError::Config(format!(
						"Failed to create storage implementation '{}': {}",
						name, e
					))
				})?;
				let is_primary = &self.config.storage.primary == name;
				tracing::info!(component = "storage", implementation = %name, enabled = %is_primary, "Loaded");
				storage_impls.insert(name.clone(), implementation);
			}
		}

		let primary_storage = &self.config.storage.primary;
		let storage_backend = storage_impls.remove(primary_storage).ok_or_else(|| {
			EngineError::Config(format!(
				"Primary storage '{}' has no registered factory",
				primary_storage
			))
		})?;

		let storage = Arc::new(StorageService::new(storage_backend));
		Ok(OrderEngine::new(self.config, storage))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use oms_storage::implementations::memory;
	use oms_types::RawOrderItem;

	fn test_config() -> Config {
		r#"
[service]
id = "test-oms"

[storage]
primary = "memory"
[storage.implementations.memory]
"#
		.parse()
		.unwrap()
	}

	fn engine() -> OrderEngine {
		let storage = Arc::new(StorageService::new(Box::new(
			memory::MemoryStorage::new(),
		)));
		OrderEngine::new(test_config(), storage)
	}

	fn request(first_name: &str, pickup_type: &str) -> NewOrderRequest {
		NewOrderRequest {
			customer_first_name: first_name.to_string(),
			customer_last_name: "Lovelace".to_string(),
			pickup_type: pickup_type.to_string(),
			items: vec![RawOrderItem {
				name: "Pad Thai".to_string(),
				unit_price: "10.00".parse().unwrap(),
				quantity: 1,
			}],
			extra_charges: None,
			notes: None,
		}
	}

	#[tokio::test]
	async fn test_create_and_list() {
		let engine = engine();

		let order = engine
			.create_order(request("Ada", "Take-Out"))
			.await
			.unwrap();
		assert_eq!(order.status, OrderStatus::Active);

		let active = engine.list_orders(OrderStatus::Active).await.unwrap();
		assert_eq!(active.len(), 1);
		assert_eq!(active[0].id, order.id);

		let completed = engine.list_orders(OrderStatus::Completed).await.unwrap();
		assert!(completed.is_empty());
	}

	#[tokio::test]
	async fn test_listings_never_mix_statuses_and_sort_newest_first() {
		let engine = engine();

		let first = engine
			.create_order(request("Ada", "Take-Out"))
			.await
			.unwrap();
		let second = engine
			.create_order(request("Grace", "Dine-In"))
			.await
			.unwrap();
		let third = engine
			.create_order(request("Edsger", "Take-Out"))
			.await
			.unwrap();
		engine.complete_order(&second.id).await.unwrap();

		let active = engine.list_orders(OrderStatus::Active).await.unwrap();
		let active_ids: Vec<&str> = active.iter().map(|o| o.id.as_str()).collect();
		assert_eq!(active_ids, vec![third.id.as_str(), first.id.as_str()]);
		assert!(active.iter().all(|o| o.status == OrderStatus::Active));

		let completed = engine.list_orders(OrderStatus::Completed).await.unwrap();
		assert_eq!(completed.len(), 1);
		assert_eq!(completed[0].id, second.id);
	}

	#[tokio::test]
	async fn test_validation_error_surfaces() {
		let engine = engine();

		let err = engine
			.create_order(request("", "Take-Out"))
			.await
			.unwrap_err();
		assert!(matches!(err, EngineError::Validation(_)));
	}

	#[tokio::test]
	async fn test_analytics_through_engine() {
		let engine = engine();

		engine
			.create_order(request("Ada", "Dine-In"))
			.await
			.unwrap();
		engine
			.create_order(request("Grace", "Take-Out"))
			.await
			.unwrap();

		let report = engine.compute_analytics().await.unwrap();
		assert_eq!(report.total_orders, 2);
		assert_eq!(report.pickup_type_distribution.dine_in, 1);
		assert_eq!(report.pickup_type_distribution.take_out, 1);
		// 10.00 take-out plus 11.00 dine-in (10% service charge)
		assert_eq!(
			report.total_revenue,
			"21.0000".parse::<rust_decimal::Decimal>().unwrap()
		);
	}

	#[tokio::test]
	async fn test_builder_selects_primary_backend() {
		let mut factories: HashMap<String, oms_storage::StorageFactory> = HashMap::new();
		factories.insert("memory".to_string(), memory::create_storage);

		let engine = EngineBuilder::new(test_config()).build(factories).unwrap();
		assert_eq!(engine.config().service.id, "test-oms");
	}

	#[tokio::test]
	async fn test_builder_rejects_unregistered_primary() {
		let factories: HashMap<String, oms_storage::StorageFactory> = HashMap::new();

		let result = EngineBuilder::new(test_config()).build(factories);
		assert!(matches!(result, Err(EngineError::Config(_))));
	}
}
