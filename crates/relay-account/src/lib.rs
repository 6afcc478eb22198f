//! Account management module for the meta-transaction relay.
//!
//! This module provides abstractions for cryptographic identity: signing
//! authorization digests with a private key, and recovering the signing
//! identity from a signature (see [`verify`]). Signers live OUTSIDE the
//! relay's trust boundary; the relay itself only ever signs in tests and
//! tooling, and recovery is what the executor depends on.

use async_trait::async_trait;
use relay_types::{AuthorizationHash, ConfigSchema, ImplementationRegistry, Signature};
use thiserror::Error;

use alloy_primitives::Address;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Signature recovery.
pub mod verify;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when interacting with the account implementation.
	#[error("Implementation error: {0}")]
	Implementation(String),
}

/// Trait defining the interface for account implementations.
///
/// An account implementation holds key material and can sign arbitrary
/// 32-byte digests with it. The digest is signed as-is; no message prefix is
/// applied.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Returns the configuration schema for this account implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Retrieves the address associated with this account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs a 32-byte digest with the account's private key.
	///
	/// Returns the 65-byte r||s||v recoverable signature.
	async fn sign_digest(&self, digest: &AuthorizationHash) -> Result<Signature, AccountError>;
}

/// Type alias for account factory functions.
pub type AccountFactory = fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError>;

/// Registry trait for account implementations.
pub trait AccountRegistry: ImplementationRegistry<Factory = AccountFactory> {}

/// Get all registered account implementations.
///
/// Returns a vector of (name, factory) tuples for all available account
/// implementations, used by the service to assemble its factory maps.
pub fn get_all_implementations() -> Vec<(&'static str, AccountFactory)> {
	use implementations::local;

	vec![(local::Registry::NAME, local::Registry::factory())]
}

/// Service that manages account operations.
///
/// Wraps an underlying account implementation behind a concrete type the
/// rest of the system can hold.
pub struct AccountService {
	/// The underlying account implementation.
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	/// Creates a new AccountService with the specified implementation.
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Retrieves the address associated with the managed account.
	pub async fn address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	/// Signs a 32-byte digest using the managed account.
	pub async fn sign_digest(
		&self,
		digest: &AuthorizationHash,
	) -> Result<Signature, AccountError> {
		self.implementation.sign_digest(digest).await
	}
}
