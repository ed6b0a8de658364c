//! Storage module for the order management system.
//!
//! This module provides abstractions for persistent storage of order data,
//! supporting different backend implementations such as in-memory or
//! file-based storage. The interface is a plain key-value contract: point
//! lookup, point write, existence, delete, prefix scan, and an optimistic
//! compare-and-set used for safe status transitions.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found")]
	NotFound,
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the low-level interface for storage backends.
///
/// This trait must be implemented by any storage backend that wants to
/// integrate with the system. It provides basic key-value operations plus
/// a prefix scan for collection reads and a byte-level compare-and-set
/// for optimistic concurrency.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves raw bytes for the given key.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores raw bytes under the given key, creating or overwriting.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Deletes the value associated with the given key.
	async fn delete(&self, key: &str) -> Result<(), StorageError>;

	/// Checks if a key exists in storage.
	async fn exists(&self, key: &str) -> Result<bool, StorageError>;

	/// Returns the values of all keys starting with the given prefix.
	///
	/// Result order is unspecified; callers that need a stable order must
	/// sort on a field of the decoded values.
	async fn scan_prefix(&self, prefix: &str) -> Result<Vec<Vec<u8>>, StorageError>;

	/// Replaces the value at `key` with `new` only if the current value
	/// equals `expected`. Returns false when the precondition no longer
	/// holds. A missing key is an error, not a failed precondition.
	async fn compare_and_set_bytes(
		&self,
		key: &str,
		expected: &[u8],
		new: Vec<u8>,
	) -> Result<bool, StorageError>;
}

/// Type alias for storage factory functions.
///
/// This is the function signature that all storage implementations must
/// provide to create instances of their storage interface.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// High-level storage service that provides typed operations.
///
/// The StorageService wraps a low-level storage backend and provides
/// convenient methods for storing and retrieving typed data with
/// automatic serialization/deserialization. Keys are namespaced as
/// `<namespace>:<id>`.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	fn key(namespace: &str, id: &str) -> String {
		format!("{}:{}", namespace, id)
	}

	/// Stores a serializable value, creating or overwriting.
	///
	/// The namespace and id are combined to form a unique key.
	/// The data is serialized to JSON before storage.
	pub async fn store<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.set_bytes(&Self::key(namespace, id), bytes).await
	}

	/// Retrieves and deserializes a value from storage.
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		namespace: &str,
		id: &str,
	) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(&Self::key(namespace, id)).await?;
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	/// Retrieves a value together with the raw bytes it was decoded from.
	///
	/// The raw bytes are the `expected` argument for a later
	/// [`StorageService::compare_and_set`], so read-modify-write sequences
	/// can detect a concurrent writer.
	pub async fn retrieve_entry<T: DeserializeOwned>(
		&self,
		namespace: &str,
		id: &str,
	) -> Result<(T, Vec<u8>), StorageError> {
		let bytes = self.backend.get_bytes(&Self::key(namespace, id)).await?;
		let value = serde_json::from_slice(&bytes)
			.map_err(|e| StorageError::Serialization(e.to_string()))?;
		Ok((value, bytes))
	}

	/// Retrieves and deserializes every value in a namespace.
	pub async fn scan<T: DeserializeOwned>(&self, namespace: &str) -> Result<Vec<T>, StorageError> {
		let prefix = format!("{}:", namespace);
		let entries = self.backend.scan_prefix(&prefix).await?;
		entries
			.iter()
			.map(|bytes| {
				serde_json::from_slice(bytes)
					.map_err(|e| StorageError::Serialization(e.to_string()))
			})
			.collect()
	}

	/// Replaces a stored value only if its current bytes match `expected`.
	///
	/// Returns false when another writer got there first.
	pub async fn compare_and_set<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		expected: &[u8],
		data: &T,
	) -> Result<bool, StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend
			.compare_and_set_bytes(&Self::key(namespace, id), expected, bytes)
			.await
	}

	/// Checks if a value exists in storage.
	pub async fn exists(&self, namespace: &str, id: &str) -> Result<bool, StorageError> {
		self.backend.exists(&Self::key(namespace, id)).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use implementations::memory::MemoryStorage;
	use serde::Deserialize;

	#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
	struct Record {
		name: String,
		value: u32,
	}

	fn service() -> StorageService {
		StorageService::new(Box::new(MemoryStorage::new()))
	}

	#[tokio::test]
	async fn test_typed_round_trip() {
		let storage = service();
		let record = Record {
			name: "espresso".to_string(),
			value: 2,
		};

		storage.store("order", "a1", &record).await.unwrap();
		let loaded: Record = storage.retrieve("order", "a1").await.unwrap();
		assert_eq!(loaded, record);
		assert!(storage.exists("order", "a1").await.unwrap());
	}

	#[tokio::test]
	async fn test_scan_is_namespace_scoped() {
		let storage = service();
		for (id, value) in [("a", 1), ("b", 2)] {
			let record = Record {
				name: id.to_string(),
				value,
			};
			storage.store("order", id, &record).await.unwrap();
		}
		storage
			.store(
				"other",
				"c",
				&Record {
					name: "c".to_string(),
					value: 3,
				},
			)
			.await
			.unwrap();

		let records: Vec<Record> = storage.scan("order").await.unwrap();
		assert_eq!(records.len(), 2);
		assert!(records.iter().all(|r| r.value < 3));
	}

	#[tokio::test]
	async fn test_compare_and_set_detects_concurrent_writer() {
		let storage = service();
		let initial = Record {
			name: "latte".to_string(),
			value: 1,
		};
		storage.store("order", "a1", &initial).await.unwrap();

		let (_, raw): (Record, Vec<u8>) = storage.retrieve_entry("order", "a1").await.unwrap();

		// First writer wins
		let updated = Record {
			name: "latte".to_string(),
			value: 2,
		};
		assert!(storage
			.compare_and_set("order", "a1", &raw, &updated)
			.await
			.unwrap());

		// Second writer holds stale bytes and must lose
		let stale = Record {
			name: "latte".to_string(),
			value: 3,
		};
		assert!(!storage
			.compare_and_set("order", "a1", &raw, &stale)
			.await
			.unwrap());

		let current: Record = storage.retrieve("order", "a1").await.unwrap();
		assert_eq!(current.value, 2);
	}
}
