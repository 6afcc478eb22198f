//! API types for the relay HTTP endpoints.
//!
//! Request and response structures for submitting signed transfer intents
//! and looking up execution records, together with the structured API error
//! type mapped onto HTTP status codes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::intent::ExecutionRecord;

/// Request body for submitting a signed transfer intent.
///
/// Addresses are 0x-prefixed hex strings; amount and nonce are decimal
/// strings; the signature is the 65-byte r||s||v payload in hex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTransferRequest {
	/// Account whose funds move; must match the recovered signer.
	pub sender: String,
	/// Transfer amount in the token's minor unit, decimal.
	pub amount: String,
	/// Account receiving the funds.
	pub recipient: String,
	/// Token ledger address.
	pub token: String,
	/// Signer-chosen uniqueness tag, decimal.
	pub nonce: String,
	/// Signature over the authorization hash.
	pub signature: String,
}

/// Response for a successfully executed transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTransferResponse {
	/// Always "executed" for a successful submit.
	pub status: String,
	/// The execution record persisted for this authorization.
	pub record: ExecutionRecord,
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
pub enum APIError {
	/// Bad request with validation errors (400).
	BadRequest { error_type: String, message: String },
	/// Unprocessable entity for rejected authorizations (422).
	UnprocessableEntity { error_type: String, message: String },
	/// Requested resource does not exist (404).
	NotFound { error_type: String, message: String },
	/// Internal server error (500).
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::NotFound { .. } => 404,
			APIError::UnprocessableEntity { .. } => 422,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let (error_type, message) = match self {
			APIError::BadRequest {
				error_type,
				message,
			}
			| APIError::UnprocessableEntity {
				error_type,
				message,
			}
			| APIError::NotFound {
				error_type,
				message,
			}
			| APIError::InternalServerError {
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

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			APIError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			APIError::UnprocessableEntity { message, .. } => {
				write!(f, "Unprocessable Entity: {}", message)
			},
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = match self.status_code() {
			400 => StatusCode::BAD_REQUEST,
			404 => StatusCode::NOT_FOUND,
			422 => StatusCode::UNPROCESSABLE_ENTITY,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		};

		(status, Json(self.to_error_response())).into_response()
	}
}
