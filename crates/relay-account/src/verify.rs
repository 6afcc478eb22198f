//! Signature recovery for authorization digests.
//!
//! Given a digest and a 65-byte r||s||v signature, recovery yields the
//! address whose private key produced the signature. The verifier does NOT
//! compare the recovered identity against any expected sender; that
//! comparison belongs to the relay executor.

use alloy_primitives::{keccak256, Address};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use relay_types::{AuthorizationHash, Signature};
use thiserror::Error;

/// Length in bytes of a recoverable r||s||v signature.
pub const SIGNATURE_LEN: usize = 65;

/// Errors that can occur during signature recovery.
///
/// All variants mean the signature is unusable; none of them is fatal to
/// the process.
#[derive(Debug, Error)]
pub enum VerifyError {
	/// The signature payload is not 65 bytes.
	#[error("Invalid signature length: expected {SIGNATURE_LEN} bytes, got {0}")]
	InvalidLength(usize),
	/// The recovery byte is not one of 0, 1, 27, 28.
	#[error("Invalid recovery id: {0}")]
	InvalidRecoveryId(u8),
	/// The r/s components are out of range or recovery mathematically failed.
	#[error("Recovery failed: {0}")]
	Recovery(String),
}

/// Trait for recovering a signing identity from (digest, signature).
///
/// Polymorphic over signature schemes; the relay ships exactly one
/// implementation, [`Secp256k1Verifier`].
pub trait SignatureVerifier: Send + Sync {
	/// Recovers the address that signed the given digest.
	fn recover_signer(
		&self,
		digest: &AuthorizationHash,
		signature: &Signature,
	) -> Result<Address, VerifyError>;
}

/// Recoverable ECDSA over secp256k1 with keccak-256 address derivation.
///
/// The fixed scheme used by the relay: the digest is signed directly
/// (no EIP-191 prefixing) and the signer address is the last 20 bytes of
/// the keccak-256 hash of the uncompressed public key.
pub struct Secp256k1Verifier;

impl SignatureVerifier for Secp256k1Verifier {
	fn recover_signer(
		&self,
		digest: &AuthorizationHash,
		signature: &Signature,
	) -> Result<Address, VerifyError> {
		let bytes = signature.as_bytes();
		if bytes.len() != SIGNATURE_LEN {
			return Err(VerifyError::InvalidLength(bytes.len()));
		}

		// Accept both raw parity (0/1) and the legacy 27/28 convention.
		let parity = match bytes[64] {
			v @ (0 | 1) => v,
			v @ (27 | 28) => v - 27,
			v => return Err(VerifyError::InvalidRecoveryId(v)),
		};
		let recovery_id =
			RecoveryId::from_byte(parity).ok_or(VerifyError::InvalidRecoveryId(parity))?;

		let sig = EcdsaSignature::from_slice(&bytes[..64])
			.map_err(|e| VerifyError::Recovery(e.to_string()))?;

		let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id)
			.map_err(|e| VerifyError::Recovery(e.to_string()))?;

		let encoded = key.to_encoded_point(false);
		// Skip the 0x04 uncompressed-point tag.
		let hashed = keccak256(&encoded.as_bytes()[1..]);
		Ok(Address::from_slice(&hashed[12..]))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, B256, U256};
	use alloy_signer::SignerSync;
	use alloy_signer_local::PrivateKeySigner;
	use relay_types::{intent_hash, TransferIntent};

	fn sign(signer: &PrivateKeySigner, digest: &B256) -> Signature {
		let sig = signer.sign_hash_sync(digest).unwrap();
		Signature::new(sig.as_bytes().to_vec())
	}

	#[test]
	fn test_recover_matches_signer() {
		let signer = PrivateKeySigner::random();
		let intent = TransferIntent {
			sender: signer.address(),
			amount: U256::from(10u64),
			recipient: address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"),
			token: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
			nonce: U256::from(1u64),
		};
		let digest = intent_hash(&intent);
		let signature = sign(&signer, &digest);

		let recovered = Secp256k1Verifier
			.recover_signer(&digest, &signature)
			.unwrap();
		assert_eq!(recovered, signer.address());
	}

	#[test]
	fn test_tampered_digest_does_not_recover_signer() {
		let signer = PrivateKeySigner::random();
		let digest = B256::repeat_byte(0x11);
		let signature = sign(&signer, &digest);

		let tampered = B256::repeat_byte(0x22);
		// Recovery over a different digest either fails outright or yields
		// some unrelated address; it must never yield the signer.
		match Secp256k1Verifier.recover_signer(&tampered, &signature) {
			Ok(recovered) => assert_ne!(recovered, signer.address()),
			Err(_) => {},
		}
	}

	#[test]
	fn test_wrong_length_is_rejected() {
		let digest = B256::repeat_byte(0x11);
		let signature = Signature::new(vec![0u8; 64]);
		assert!(matches!(
			Secp256k1Verifier.recover_signer(&digest, &signature),
			Err(VerifyError::InvalidLength(64))
		));
	}

	#[test]
	fn test_bad_recovery_byte_is_rejected() {
		let signer = PrivateKeySigner::random();
		let digest = B256::repeat_byte(0x11);
		let mut bytes = sign(&signer, &digest).as_bytes().to_vec();
		bytes[64] = 29;

		assert!(matches!(
			Secp256k1Verifier.recover_signer(&digest, &Signature::new(bytes)),
			Err(VerifyError::InvalidRecoveryId(29))
		));
	}

	#[test]
	fn test_out_of_range_components_are_rejected() {
		let digest = B256::repeat_byte(0x11);
		// r = s = 0 is not a valid signature.
		let mut bytes = vec![0u8; 65];
		bytes[64] = 27;
		assert!(matches!(
			Secp256k1Verifier.recover_signer(&digest, &Signature::new(bytes)),
			Err(VerifyError::Recovery(_))
		));
	}

	#[test]
	fn test_legacy_and_raw_parity_agree() {
		let signer = PrivateKeySigner::random();
		let digest = B256::repeat_byte(0x42);
		let bytes = sign(&signer, &digest).as_bytes().to_vec();

		let mut raw = bytes.clone();
		raw[64] = if bytes[64] >= 27 {
			bytes[64] - 27
		} else {
			bytes[64]
		};
		let mut legacy = bytes;
		legacy[64] = if legacy[64] < 27 {
			legacy[64] + 27
		} else {
			legacy[64]
		};

		let from_raw = Secp256k1Verifier
			.recover_signer(&digest, &Signature::new(raw))
			.unwrap();
		let from_legacy = Secp256k1Verifier
			.recover_signer(&digest, &Signature::new(legacy))
			.unwrap();
		assert_eq!(from_raw, from_legacy);
		assert_eq!(from_raw, signer.address());
	}
}
