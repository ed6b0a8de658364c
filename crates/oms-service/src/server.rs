//! HTTP server for the order management API.
//!
//! This module provides a minimal HTTP server infrastructure over the
//! order engine. Handlers stay thin: they deserialize the request, call
//! into the engine through the apis module, and map failures to the
//! shared error envelope.

use crate::apis;
use axum::{
	extract::{Path, State},
	response::Json,
	routing::{get, post, put},
	Router,
};
use oms_config::ApiConfig;
use oms_core::OrderEngine;
use oms_types::{
	AnalyticsReport, ApiError, NewOrderRequest, OrderEnvelope, OrderListEnvelope, OrderStatus,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the order engine for processing requests.
	pub engine: Arc<OrderEngine>,
}

/// Starts the HTTP server for the API.
///
/// This function creates and configures the HTTP server with routing,
/// middleware, and error handling for all endpoints.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<OrderEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app_state = AppState { engine };

	let app = Router::new()
		.route("/health", get(handle_health))
		.route("/orders", post(handle_create_order))
		.route("/orders/active", get(handle_list_active))
		.route("/orders/completed", get(handle_list_completed))
		.route("/orders/{id}/complete", put(handle_complete_order))
		.route("/analytics", get(handle_analytics))
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(app_state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Order API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles GET /health requests.
async fn handle_health() -> Json<serde_json::Value> {
	Json(serde_json::json!({ "status": "ok" }))
}

/// Handles POST /orders requests.
///
/// Validates and prices the submitted order, persists it, and returns
/// the created order.
async fn handle_create_order(
	State(state): State<AppState>,
	Json(request): Json<NewOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<OrderEnvelope>), ApiError> {
	match apis::orders::create_order(&state.engine, request).await {
		Ok(envelope) => Ok((axum::http::StatusCode::CREATED, Json(envelope))),
		Err(e) => {
			tracing::warn!("Order creation failed: {}", e);
			Err(apis::to_api_error(e))
		},
	}
}

/// Handles GET /orders/active requests.
async fn handle_list_active(
	State(state): State<AppState>,
) -> Result<Json<OrderListEnvelope>, ApiError> {
	match apis::orders::list_orders(&state.engine, OrderStatus::Active).await {
		Ok(envelope) => Ok(Json(envelope)),
		Err(e) => {
			tracing::warn!("Active order listing failed: {}", e);
			Err(apis::to_api_error(e))
		},
	}
}

/// Handles GET /orders/completed requests.
async fn handle_list_completed(
	State(state): State<AppState>,
) -> Result<Json<OrderListEnvelope>, ApiError> {
	match apis::orders::list_orders(&state.engine, OrderStatus::Completed).await {
		Ok(envelope) => Ok(Json(envelope)),
		Err(e) => {
			tracing::warn!("Completed order listing failed: {}", e);
			Err(apis::to_api_error(e))
		},
	}
}

/// Handles PUT /orders/{id}/complete requests.
async fn handle_complete_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<OrderEnvelope>, ApiError> {
	match apis::orders::complete_order(&state.engine, &id).await {
		Ok(envelope) => Ok(Json(envelope)),
		Err(e) => {
			tracing::warn!("Order completion failed: {}", e);
			Err(apis::to_api_error(e))
		},
	}
}

/// Handles GET /analytics requests.
async fn handle_analytics(
	State(state): State<AppState>,
) -> Result<Json<AnalyticsReport>, ApiError> {
	match apis::analytics::compute_analytics(&state.engine).await {
		Ok(report) => Ok(Json(report)),
		Err(e) => {
			tracing::warn!("Analytics computation failed: {}", e);
			Err(apis::to_api_error(e))
		},
	}
}
