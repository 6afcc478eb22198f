//! Transfer submission and lookup endpoints.
//!
//! Translates between the wire representation (hex addresses, decimal
//! amounts) and the typed intent the executor works with, and maps executor
//! rejections onto structured API errors.

use alloy_primitives::{Address, B256, U256};
use relay_core::{RelayExecutor, SubmitError};
use relay_types::{
	APIError, Signature, SubmitTransferRequest, SubmitTransferResponse, TransferIntent,
};
use std::str::FromStr;

/// Processes a transfer submission request.
pub async fn submit_transfer(
	request: SubmitTransferRequest,
	relay: &RelayExecutor,
) -> Result<SubmitTransferResponse, APIError> {
	let intent = parse_intent(&request)?;
	let signature = Signature::from_hex(&request.signature)
		.map_err(|e| bad_request("invalid_signature_encoding", e.to_string()))?;

	let record = relay
		.submit(&intent, &signature)
		.await
		.map_err(submit_error_to_api)?;

	Ok(SubmitTransferResponse {
		status: "executed".to_string(),
		record,
	})
}

/// Retrieves the execution record for an authorization hash.
pub async fn get_execution(
	hash: &str,
	relay: &RelayExecutor,
) -> Result<SubmitTransferResponse, APIError> {
	let hash = B256::from_str(hash)
		.map_err(|e| bad_request("invalid_hash", format!("Invalid authorization hash: {}", e)))?;

	let record = relay
		.execution(&hash)
		.await
		.map_err(|e| APIError::InternalServerError {
			error_type: "storage_error".to_string(),
			message: e.to_string(),
		})?
		.ok_or_else(|| APIError::NotFound {
			error_type: "unknown_authorization".to_string(),
			message: format!("No execution recorded for {}", hash),
		})?;

	Ok(SubmitTransferResponse {
		status: "executed".to_string(),
		record,
	})
}

fn parse_intent(request: &SubmitTransferRequest) -> Result<TransferIntent, APIError> {
	Ok(TransferIntent {
		sender: parse_address("sender", &request.sender)?,
		amount: parse_u256("amount", &request.amount)?,
		recipient: parse_address("recipient", &request.recipient)?,
		token: parse_address("token", &request.token)?,
		nonce: parse_u256("nonce", &request.nonce)?,
	})
}

fn parse_address(field: &str, value: &str) -> Result<Address, APIError> {
	Address::from_str(value)
		.map_err(|e| bad_request("invalid_address", format!("Invalid {}: {}", field, e)))
}

fn parse_u256(field: &str, value: &str) -> Result<U256, APIError> {
	U256::from_str(value)
		.map_err(|e| bad_request("invalid_amount", format!("Invalid {}: {}", field, e)))
}

fn bad_request(error_type: &str, message: String) -> APIError {
	APIError::BadRequest {
		error_type: error_type.to_string(),
		message,
	}
}

fn submit_error_to_api(err: SubmitError) -> APIError {
	let error_type = match &err {
		SubmitError::BadSignature(_) => "bad_signature",
		SubmitError::SignerMismatch { .. } => "signer_mismatch",
		SubmitError::ReplayDetected(_) => "replay_detected",
		SubmitError::TransferFailed(_) => "transfer_failed",
		SubmitError::Storage(_) => {
			return APIError::InternalServerError {
				error_type: "storage_error".to_string(),
				message: err.to_string(),
			}
		},
	};
	APIError::UnprocessableEntity {
		error_type: error_type.to_string(),
		message: err.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn request() -> SubmitTransferRequest {
		SubmitTransferRequest {
			sender: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
			amount: "10".to_string(),
			recipient: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string(),
			token: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
			nonce: "1".to_string(),
			signature: "0xab".to_string(),
		}
	}

	#[test]
	fn test_parse_intent_from_request() {
		let intent = parse_intent(&request()).unwrap();
		assert_eq!(intent.amount, U256::from(10u64));
		assert_eq!(intent.nonce, U256::from(1u64));
	}

	#[test]
	fn test_parse_rejects_bad_address() {
		let mut req = request();
		req.sender = "not-an-address".to_string();
		let err = parse_intent(&req).unwrap_err();
		assert!(matches!(err, APIError::BadRequest { .. }));
	}

	#[test]
	fn test_parse_rejects_bad_amount() {
		let mut req = request();
		req.amount = "ten".to_string();
		let err = parse_intent(&req).unwrap_err();
		assert!(matches!(err, APIError::BadRequest { .. }));
	}
}
