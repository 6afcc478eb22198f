//! HTTP server for the relay API.
//!
//! Exposes transfer submission and execution lookup over a minimal axum
//! router.

use axum::{
	extract::{Path, State},
	response::Json,
	routing::{get, post},
	Router,
};
use relay_config::ApiConfig;
use relay_core::RelayExecutor;
use relay_types::{APIError, SubmitTransferRequest, SubmitTransferResponse};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the relay executor for processing requests.
	pub relay: Arc<RelayExecutor>,
}

/// Starts the HTTP server for the API.
///
/// Binds to the configured host/port and serves until the process receives
/// a shutdown signal.
pub async fn start_server(
	api_config: ApiConfig,
	relay: Arc<RelayExecutor>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(AppState { relay });

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Relay API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

/// Builds the API router with the /api base path.
pub fn router(state: AppState) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/transfers", post(handle_submit_transfer))
				.route("/transfers/{hash}", get(handle_get_transfer)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(state)
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!("Failed to install shutdown handler: {}", e);
	}
}

/// Handles POST /api/transfers requests.
///
/// Verifies the signature, consumes the authorization, and executes the
/// transfer on the token ledger.
async fn handle_submit_transfer(
	State(state): State<AppState>,
	Json(request): Json<SubmitTransferRequest>,
) -> Result<Json<SubmitTransferResponse>, APIError> {
	match crate::apis::transfer::submit_transfer(request, &state.relay).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Transfer submission failed: {}", e);
			Err(e)
		},
	}
}

/// Handles GET /api/transfers/{hash} requests.
///
/// Returns the execution record for a consumed authorization hash.
async fn handle_get_transfer(
	Path(hash): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<SubmitTransferResponse>, APIError> {
	match crate::apis::transfer::get_execution(&hash, &state.relay).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::debug!("Transfer lookup failed: {}", e);
			Err(e)
		},
	}
}
