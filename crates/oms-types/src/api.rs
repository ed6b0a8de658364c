//! API types for the order management HTTP API.
//!
//! This module defines the response envelopes and the structured error
//! type shared by all transport adapters, so every entry point maps
//! engine failures to the same HTTP status codes and JSON shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Order;

/// Response envelope for endpoints returning a single order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEnvelope {
	/// Always true; kept for compatibility with existing clients.
	pub success: bool,
	/// The created or updated order.
	pub order: Order,
}

impl OrderEnvelope {
	pub fn new(order: Order) -> Self {
		Self {
			success: true,
			order,
		}
	}
}

/// Response envelope for endpoints returning a list of orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListEnvelope {
	pub orders: Vec<Order>,
}

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code.
	pub error: String,
	/// Human-readable description.
	pub message: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
	/// Malformed or missing required input (400).
	BadRequest { error_type: String, message: String },
	/// Operation referenced a nonexistent order id (404).
	NotFound { error_type: String, message: String },
	/// Operation raced another request and lost (409).
	Conflict { error_type: String, message: String },
	/// Underlying store failed or an invariant broke (500).
	InternalServerError { error_type: String, message: String },
}

impl ApiError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			ApiError::BadRequest { .. } => 400,
			ApiError::NotFound { .. } => 404,
			ApiError::Conflict { .. } => 409,
			ApiError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let (error_type, message) = match self {
			ApiError::BadRequest {
				error_type,
				message,
			}
			| ApiError::NotFound {
				error_type,
				message,
			}
			| ApiError::Conflict {
				error_type,
				message,
			}
			| ApiError::InternalServerError {
				error_type,
				message,
			} => (error_type, message),
		};
		ErrorResponse {
			error: error_type.clone(),
			message: message.clone(),
		}
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ApiError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			ApiError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			ApiError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
			ApiError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for ApiError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ApiError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let error_response = self.to_error_response();
		(status, Json(error_response)).into_response()
	}
}
