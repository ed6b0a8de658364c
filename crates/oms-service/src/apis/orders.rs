//! Order API implementation.
//!
//! This module implements the order endpoints: creation, status-filtered
//! listings, and completion. All behavior comes from the order engine;
//! this layer only wraps results in the wire envelopes.

use oms_core::{EngineError, OrderEngine};
use oms_types::{NewOrderRequest, OrderEnvelope, OrderListEnvelope, OrderStatus};

/// Validates, prices, and persists a new order.
pub async fn create_order(
	engine: &OrderEngine,
	request: NewOrderRequest,
) -> Result<OrderEnvelope, EngineError> {
	let order = engine.create_order(request).await?;
	Ok(OrderEnvelope::new(order))
}

/// Lists orders with exactly the given status, most recent first.
pub async fn list_orders(
	engine: &OrderEngine,
	status: OrderStatus,
) -> Result<OrderListEnvelope, EngineError> {
	let orders = engine.list_orders(status).await?;
	Ok(OrderListEnvelope { orders })
}

/// Completes an active order by id.
pub async fn complete_order(
	engine: &OrderEngine,
	order_id: &str,
) -> Result<OrderEnvelope, EngineError> {
	let order = engine.complete_order(order_id).await?;
	Ok(OrderEnvelope::new(order))
}

#[cfg(test)]
mod tests {
	use super::*;
	use oms_config::Config;
	use oms_storage::implementations::memory::MemoryStorage;
	use oms_storage::StorageService;
	use oms_types::RawOrderItem;
	use std::sync::Arc;

	fn engine() -> OrderEngine {
		let config: Config = r#"
[service]
id = "test-oms"

[storage]
primary = "memory"
[storage.implementations.memory]
"#
		.parse()
		.unwrap();
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		OrderEngine::new(config, storage)
	}

	fn request() -> NewOrderRequest {
		NewOrderRequest {
			customer_first_name: "Ada".to_string(),
			customer_last_name: "Lovelace".to_string(),
			pickup_type: "Dine-In".to_string(),
			items: vec![RawOrderItem {
				name: "Pad Thai".to_string(),
				unit_price: "12.99".parse().unwrap(),
				quantity: 2,
			}],
			extra_charges: None,
			notes: Some("extra spicy".to_string()),
		}
	}

	#[tokio::test]
	async fn test_create_order_envelope() {
		let engine = engine();

		let envelope = create_order(&engine, request()).await.unwrap();
		assert!(envelope.success);
		assert_eq!(envelope.order.notes, "extra spicy");

		let json = serde_json::to_value(&envelope).unwrap();
		assert_eq!(json["success"], true);
		assert_eq!(json["order"]["status"], "ACTIVE");
	}

	#[tokio::test]
	async fn test_listing_envelopes_filter_by_status() {
		let engine = engine();
		let created = create_order(&engine, request()).await.unwrap();
		complete_order(&engine, &created.order.id).await.unwrap();

		let active = list_orders(&engine, OrderStatus::Active).await.unwrap();
		assert!(active.orders.is_empty());

		let completed = list_orders(&engine, OrderStatus::Completed).await.unwrap();
		assert_eq!(completed.orders.len(), 1);
		assert_eq!(completed.orders[0].id, created.order.id);
	}

	#[tokio::test]
	async fn test_complete_unknown_order() {
		let engine = engine();

		let err = complete_order(&engine, "order_0_missing").await.unwrap_err();
		assert!(matches!(err, EngineError::NotFound(_)));
	}
}
