//! Canonical encoding and hashing of transfer intents.
//!
//! The encoder replaces ad-hoc byte concatenation with an explicit
//! fixed-width layout so that field boundaries are unambiguous. The layout,
//! concatenated in field declaration order:
//!
//! - sender: 20 bytes
//! - amount: 32 bytes, big-endian
//! - recipient: 20 bytes
//! - token: 20 bytes
//! - nonce: 32 bytes, big-endian
//!
//! 124 bytes total. The authorization hash is the keccak-256 digest of this
//! encoding. Both operations are pure and total: any well-typed intent
//! produces a hash and there is no error path.

use alloy_primitives::{keccak256, Address, U256};

use crate::intent::{AuthorizationHash, TransferIntent};

/// Length in bytes of an encoded [`TransferIntent`].
pub const ENCODED_INTENT_LEN: usize = 20 + 32 + 20 + 20 + 32;

/// Minimal fixed-width byte encoder for intent fields.
struct IntentEncoder {
	buf: Vec<u8>,
}

impl IntentEncoder {
	fn new() -> Self {
		Self {
			buf: Vec::with_capacity(ENCODED_INTENT_LEN),
		}
	}

	fn push_address(&mut self, addr: &Address) {
		self.buf.extend_from_slice(addr.as_slice());
	}

	fn push_u256(&mut self, v: U256) {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
	}

	fn finish(self) -> Vec<u8> {
		self.buf
	}
}

/// Serializes an intent into its canonical fixed-layout byte sequence.
pub fn encode_intent(intent: &TransferIntent) -> [u8; ENCODED_INTENT_LEN] {
	let mut enc = IntentEncoder::new();
	enc.push_address(&intent.sender);
	enc.push_u256(intent.amount);
	enc.push_address(&intent.recipient);
	enc.push_address(&intent.token);
	enc.push_u256(intent.nonce);

	let bytes = enc.finish();
	debug_assert_eq!(bytes.len(), ENCODED_INTENT_LEN);

	let mut out = [0u8; ENCODED_INTENT_LEN];
	out.copy_from_slice(&bytes);
	out
}

/// Derives the authorization hash: keccak256 of the canonical encoding.
pub fn intent_hash(intent: &TransferIntent) -> AuthorizationHash {
	keccak256(encode_intent(intent))
}
