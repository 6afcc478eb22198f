//! Local private-key account implementation.
//!
//! Holds a secp256k1 private key in memory and signs digests with it.
//! Intended for development and tests; production signers would live behind
//! the same interface.

use crate::{AccountError, AccountFactory, AccountInterface, AccountRegistry};
use alloy_primitives::Address;
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use relay_types::{
	without_0x_prefix, AuthorizationHash, ConfigSchema, Field, FieldType, ImplementationRegistry,
	Schema, SecretString, Signature, ValidationError,
};
use std::str::FromStr;

/// Account backed by an in-memory private key.
pub struct LocalAccount {
	signer: PrivateKeySigner,
}

impl LocalAccount {
	/// Creates a local account from a hex-encoded private key.
	pub fn new(private_key: &SecretString) -> Result<Self, AccountError> {
		let signer = PrivateKeySigner::from_str(without_0x_prefix(private_key.expose_secret()))
			.map_err(|e| AccountError::InvalidKey(e.to_string()))?;
		Ok(Self { signer })
	}
}

#[async_trait]
impl AccountInterface for LocalAccount {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LocalAccountSchema)
	}

	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	async fn sign_digest(&self, digest: &AuthorizationHash) -> Result<Signature, AccountError> {
		let sig = self
			.signer
			.sign_hash_sync(digest)
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;
		Ok(Signature::new(sig.as_bytes().to_vec()))
	}
}

/// Configuration schema for LocalAccount.
pub struct LocalAccountSchema;

impl ConfigSchema for LocalAccountSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("private_key", FieldType::String).with_validator(|v| {
					let key = v.as_str().unwrap_or_default();
					let hex_part = without_0x_prefix(key);
					if hex_part.len() != 64 {
						return Err("private key must be 32 bytes of hex".to_string());
					}
					if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
						return Err("private key must be valid hex".to_string());
					}
					Ok(())
				}),
			],
			vec![],
		);
		schema.validate(config)
	}
}

/// Registry for the local account implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "local";
	type Factory = AccountFactory;

	fn factory() -> Self::Factory {
		create_account
	}
}

impl AccountRegistry for Registry {}

/// Factory function to create a local account from configuration.
///
/// Configuration parameters:
/// - `private_key`: hex-encoded secp256k1 private key, with or without 0x
pub fn create_account(config: &toml::Value) -> Result<Box<dyn AccountInterface>, AccountError> {
	LocalAccountSchema
		.validate(config)
		.map_err(|e| AccountError::InvalidKey(e.to_string()))?;

	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.map(SecretString::from)
		.ok_or_else(|| AccountError::InvalidKey("private_key missing".to_string()))?;

	Ok(Box::new(LocalAccount::new(&private_key)?))
}
