//! Order lifecycle management.
//!
//! Orders are created once and completed at most once; there is no
//! cancellation and no re-opening. The completion path uses an
//! optimistic compare-and-set against the bytes originally read, so two
//! racing completions cannot both succeed — the loser gets a conflict
//! instead of silently overwriting the completion timestamp.

use chrono::Utc;
use oms_storage::{StorageError, StorageService};
use oms_types::{Order, OrderStatus, StorageKey};
use std::sync::Arc;

use crate::EngineError;

/// Manages order persistence and the single ACTIVE to COMPLETED
/// transition.
pub struct OrderLifecycle {
	storage: Arc<StorageService>,
}

impl OrderLifecycle {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Gets an order by ID.
	pub async fn get_order(&self, order_id: &str) -> Result<Order, EngineError> {
		self.storage
			.retrieve(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(|e| not_found_or_storage(e, order_id))
	}

	/// Stores a new order.
	pub async fn store_order(&self, order: &Order) -> Result<(), EngineError> {
		self.storage
			.store(StorageKey::Orders.as_str(), &order.id, order)
			.await
			.map_err(EngineError::Storage)
	}

	/// Loads every persisted order, any status, in unspecified order.
	pub async fn load_all(&self) -> Result<Vec<Order>, EngineError> {
		self.storage
			.scan(StorageKey::Orders.as_str())
			.await
			.map_err(EngineError::Storage)
	}

	/// Transitions an active order to completed and persists it.
	///
	/// Fails with `NotFound` for an unknown id and with `Conflict` when
	/// the order is no longer active, whether that was observed on read
	/// or detected by the compare-and-set on write.
	pub async fn complete_order(&self, order_id: &str) -> Result<Order, EngineError> {
		let (order, raw): (Order, Vec<u8>) = self
			.storage
			.retrieve_entry(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(|e| not_found_or_storage(e, order_id))?;

		if order.status != OrderStatus::Active {
			return Err(EngineError::Conflict(format!(
				"order {} is already completed",
				order_id
			)));
		}

		let mut updated = order;
		updated.status = OrderStatus::Completed;
		updated.completed_at = Some(Utc::now());

		let swapped = self
			.storage
			.compare_and_set(StorageKey::Orders.as_str(), order_id, &raw, &updated)
			.await
			.map_err(EngineError::Storage)?;
		if !swapped {
			return Err(EngineError::Conflict(format!(
				"order {} was completed by a concurrent request",
				order_id
			)));
		}

		Ok(updated)
	}
}

fn not_found_or_storage(err: StorageError, order_id: &str) -> EngineError {
	match err {
		StorageError::NotFound => EngineError::NotFound(order_id.to_string()),
		other => EngineError::Storage(other),
	}
}
