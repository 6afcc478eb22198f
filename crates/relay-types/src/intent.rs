//! Transfer intent types for the relay system.
//!
//! This module defines the value objects that travel between the relay
//! components: the signed transfer intent, the authorization hash derived
//! from it, the opaque signature bytes, and the execution record persisted
//! after a successful transfer.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::utils::without_0x_prefix;

/// Digest identifying one authorization.
///
/// Derived deterministically from a [`TransferIntent`] by
/// [`crate::encoding::intent_hash`]. Two intents differing in any field
/// produce different hashes; the same intent always produces the same hash.
pub type AuthorizationHash = B256;

/// A signer's declared transfer request.
///
/// Immutable value object created by the signer and never mutated. The field
/// declaration order is also the canonical encoding order (see
/// [`crate::encoding`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferIntent {
	/// Account whose funds are moved. Must match the recovered signer.
	pub sender: Address,
	/// Transfer amount in the token's minor unit.
	pub amount: U256,
	/// Account receiving the funds.
	pub recipient: Address,
	/// Identifier of the token ledger being moved.
	pub token: Address,
	/// Uniqueness tag chosen by the signer. Arbitrary values are valid;
	/// the nonce is not a sequence counter and no ordering is enforced.
	pub nonce: U256,
}

/// Errors that can occur when parsing a signature from its hex form.
#[derive(Debug, Error)]
pub enum SignatureParseError {
	/// The hex payload could not be decoded.
	#[error("Invalid hex: {0}")]
	InvalidHex(String),
}

/// Opaque signature bytes produced over an [`AuthorizationHash`].
///
/// The relay treats the signature as a byte blob; interpretation happens in
/// the signature verifier. Serialized as a 0x-prefixed hex string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
	/// Wraps raw signature bytes.
	pub fn new(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}

	/// Parses a signature from a hex string, with or without 0x prefix.
	pub fn from_hex(s: &str) -> Result<Self, SignatureParseError> {
		let bytes = hex::decode(without_0x_prefix(s))
			.map_err(|e| SignatureParseError::InvalidHex(e.to_string()))?;
		Ok(Self(bytes))
	}

	/// Returns the raw signature bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Returns the signature length in bytes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if the signature holds no bytes.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

impl From<Vec<u8>> for Signature {
	fn from(bytes: Vec<u8>) -> Self {
		Self::new(bytes)
	}
}

impl Serialize for Signature {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for Signature {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		Signature::from_hex(&s).map_err(serde::de::Error::custom)
	}
}

/// Record of a successfully executed authorization.
///
/// Persisted under the `executions` storage namespace keyed by the
/// authorization hash, and returned to the relayer from a successful submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
	/// The consumed authorization hash.
	pub hash: AuthorizationHash,
	/// Account that was debited.
	pub sender: Address,
	/// Account that was credited.
	pub recipient: Address,
	/// Token ledger the transfer moved funds on.
	pub token: Address,
	/// Amount moved, in minor units.
	pub amount: U256,
	/// Sender balance after the transfer.
	pub sender_balance: U256,
	/// Recipient balance after the transfer.
	pub recipient_balance: U256,
	/// Unix timestamp (seconds) when the transfer executed.
	pub executed_at: u64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_signature_hex_round_trip() {
		let sig = Signature::new(vec![0xab; 65]);
		let encoded = sig.to_string();
		assert!(encoded.starts_with("0x"));

		let decoded = Signature::from_hex(&encoded).unwrap();
		assert_eq!(decoded, sig);

		// Also accepted without the prefix
		let decoded = Signature::from_hex(encoded.trim_start_matches("0x")).unwrap();
		assert_eq!(decoded, sig);
	}

	#[test]
	fn test_signature_rejects_bad_hex() {
		assert!(Signature::from_hex("0xzz").is_err());
	}

	#[test]
	fn test_signature_serde() {
		let sig = Signature::new(vec![0x01, 0x02, 0x03]);
		let json = serde_json::to_string(&sig).unwrap();
		assert_eq!(json, "\"0x010203\"");

		let back: Signature = serde_json::from_str(&json).unwrap();
		assert_eq!(back, sig);
	}
}
