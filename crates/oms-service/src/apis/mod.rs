//! API implementations for the order management HTTP surface.
//!
//! Each submodule wraps one group of engine operations in the wire
//! envelopes clients expect. Error mapping to HTTP status codes lives
//! here so every endpoint reports failures identically.

use oms_core::EngineError;
use oms_types::ApiError;

pub mod analytics;
pub mod orders;

/// Maps an engine failure to the shared API error envelope.
pub fn to_api_error(err: EngineError) -> ApiError {
	match err {
		EngineError::Validation(message) => ApiError::BadRequest {
			error_type: "VALIDATION_ERROR".to_string(),
			message,
		},
		EngineError::NotFound(order_id) => ApiError::NotFound {
			error_type: "ORDER_NOT_FOUND".to_string(),
			message: format!("Order not found: {}", order_id),
		},
		EngineError::Conflict(message) => ApiError::Conflict {
			error_type: "ORDER_CONFLICT".to_string(),
			message,
		},
		EngineError::Storage(e) => ApiError::InternalServerError {
			error_type: "STORAGE_ERROR".to_string(),
			message: e.to_string(),
		},
		EngineError::Config(message) => ApiError::InternalServerError {
			error_type: "CONFIGURATION_ERROR".to_string(),
			message,
		},
	}
}
