//! File-based storage backend implementation.
//!
//! This module stores each key as one file under a base directory,
//! providing simple persistence without external dependencies. Writes go
//! through a temp file plus rename so readers never observe a partial
//! value, and all mutations are serialized through an internal lock so
//! compare-and-set is atomic within the process.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// File-based storage implementation.
pub struct FileStorage {
	/// Base directory path for storing files.
	base_path: PathBuf,
	/// Serializes all mutations; reads go through the filesystem directly.
	write_lock: Mutex<()>,
}

impl FileStorage {
	/// Creates a new FileStorage instance with the specified base path.
	pub fn new(base_path: PathBuf) -> Self {
		Self {
			base_path,
			write_lock: Mutex::new(()),
		}
	}

	/// Converts a storage key to a filesystem-safe file path.
	///
	/// Sanitizes the key by replacing separator characters and appending
	/// a .bin extension.
	fn get_file_path(&self, key: &str) -> PathBuf {
		self.base_path.join(format!("{}.bin", Self::sanitize(key)))
	}

	fn sanitize(key: &str) -> String {
		key.replace(['/', ':'], "_")
	}

	async fn read_file(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
		match fs::read(path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	/// Writes atomically by writing to a temp file then renaming.
	async fn write_file(&self, path: &Path, value: &[u8]) -> Result<(), StorageError> {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		fs::rename(&temp_path, path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		Ok(())
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key);
		self.read_file(&path).await
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let _guard = self.write_lock.lock().await;
		let path = self.get_file_path(key);
		self.write_file(&path, &value).await
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let _guard = self.write_lock.lock().await;
		let path = self.get_file_path(key);

		match fs::remove_file(&path).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.get_file_path(key);
		Ok(path.exists())
	}

	async fn scan_prefix(&self, prefix: &str) -> Result<Vec<Vec<u8>>, StorageError> {
		let sanitized = Self::sanitize(prefix);

		let mut entries = match fs::read_dir(&self.base_path).await {
			Ok(entries) => entries,
			// A base directory that was never written to holds no values
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		let mut values = Vec::new();
		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
		{
			let path = entry.path();
			if path.extension() != Some(std::ffi::OsStr::new("bin")) {
				continue;
			}
			let matches = path
				.file_name()
				.and_then(|n| n.to_str())
				.is_some_and(|n| n.starts_with(&sanitized));
			if !matches {
				continue;
			}
			match self.read_file(&path).await {
				Ok(data) => values.push(data),
				// A file deleted between listing and reading is not an error
				Err(StorageError::NotFound) => {
					tracing::debug!("Skipping file {:?}: removed during scan", path);
					continue;
				},
				Err(e) => return Err(e),
			}
		}
		Ok(values)
	}

	async fn compare_and_set_bytes(
		&self,
		key: &str,
		expected: &[u8],
		new: Vec<u8>,
	) -> Result<bool, StorageError> {
		let _guard = self.write_lock.lock().await;
		let path = self.get_file_path(key);

		let current = self.read_file(&path).await?;
		if current != expected {
			return Ok(false);
		}
		self.write_file(&path, &new).await?;
		Ok(true)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for file storage (default: "./data/storage")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or("./data/storage")
		.to_string();

	if storage_path.is_empty() {
		return Err(StorageError::Configuration(
			"storage_path cannot be empty".into(),
		));
	}

	Ok(Box::new(FileStorage::new(PathBuf::from(storage_path))))
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	fn storage(dir: &tempfile::TempDir) -> FileStorage {
		FileStorage::new(dir.path().to_path_buf())
	}

	#[tokio::test]
	async fn test_round_trip_and_delete() {
		let dir = tempdir().unwrap();
		let storage = storage(&dir);

		storage
			.set_bytes("order:abc", b"payload".to_vec())
			.await
			.unwrap();
		assert_eq!(
			storage.get_bytes("order:abc").await.unwrap(),
			b"payload".to_vec()
		);
		assert!(storage.exists("order:abc").await.unwrap());

		storage.delete("order:abc").await.unwrap();
		assert!(!storage.exists("order:abc").await.unwrap());
		assert!(matches!(
			storage.get_bytes("order:abc").await,
			Err(StorageError::NotFound)
		));
	}

	#[tokio::test]
	async fn test_missing_key_is_not_found() {
		let dir = tempdir().unwrap();
		let storage = storage(&dir);

		let result = storage.get_bytes("order:missing").await;
		assert!(matches!(result, Err(StorageError::NotFound)));
	}

	#[tokio::test]
	async fn test_scan_prefix_skips_other_namespaces() {
		let dir = tempdir().unwrap();
		let storage = storage(&dir);

		storage.set_bytes("order:1", b"one".to_vec()).await.unwrap();
		storage.set_bytes("order:2", b"two".to_vec()).await.unwrap();
		storage
			.set_bytes("session:9", b"nine".to_vec())
			.await
			.unwrap();

		let mut values = storage.scan_prefix("order:").await.unwrap();
		values.sort();
		assert_eq!(values, vec![b"one".to_vec(), b"two".to_vec()]);
	}

	#[tokio::test]
	async fn test_scan_on_missing_directory_is_empty() {
		let dir = tempdir().unwrap();
		let storage = FileStorage::new(dir.path().join("never_created"));

		let values = storage.scan_prefix("order:").await.unwrap();
		assert!(values.is_empty());
	}

	#[tokio::test]
	async fn test_compare_and_set() {
		let dir = tempdir().unwrap();
		let storage = storage(&dir);

		storage.set_bytes("order:1", b"v1".to_vec()).await.unwrap();

		let swapped = storage
			.compare_and_set_bytes("order:1", b"v1", b"v2".to_vec())
			.await
			.unwrap();
		assert!(swapped);

		let swapped = storage
			.compare_and_set_bytes("order:1", b"v1", b"v3".to_vec())
			.await
			.unwrap();
		assert!(!swapped);
		assert_eq!(storage.get_bytes("order:1").await.unwrap(), b"v2".to_vec());
	}

	#[tokio::test]
	async fn test_factory_rejects_empty_path() {
		let config: toml::Value = toml::from_str("storage_path = \"\"").unwrap();
		assert!(matches!(
			create_storage(&config),
			Err(StorageError::Configuration(_))
		));
	}
}
