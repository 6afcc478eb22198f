//! Builder pattern for constructing relay executors.
//!
//! Composes a [`RelayExecutor`](crate::RelayExecutor) from pluggable storage,
//! account, and token ledger implementations using factory functions keyed by
//! implementation name.

use crate::RelayExecutor;
use alloy_primitives::Address;
use relay_account::{verify::Secp256k1Verifier, AccountError, AccountInterface, AccountService};
use relay_config::Config;
use relay_storage::{ReplayLedger, StorageError, StorageInterface, StorageService};
use relay_token::{TokenError, TokenLedger};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during relay executor construction.
///
/// These errors indicate problems with configuration or missing required
/// components when building an executor instance.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Container for all factory functions needed to build a RelayExecutor.
///
/// Each factory function takes a TOML configuration value (token ledger
/// factories additionally receive the relay's address) and returns the
/// corresponding implementation.
pub struct RelayFactories<SF, AF, TF> {
	pub storage_factories: HashMap<String, SF>,
	pub account_factories: HashMap<String, AF>,
	pub token_factories: HashMap<String, TF>,
}

/// Builder for constructing a RelayExecutor with pluggable implementations.
pub struct RelayBuilder {
	config: Config,
}

impl RelayBuilder {
	/// Creates a new RelayBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the RelayExecutor using factories for each component type.
	pub async fn build<SF, AF, TF>(
		self,
		factories: RelayFactories<SF, AF, TF>,
	) -> Result<RelayExecutor, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
		AF: Fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError>,
		TF: Fn(&toml::Value, &Address) -> Result<Box<dyn TokenLedger>, TokenError>,
	{
		// Create the primary storage implementation
		let primary_storage = &self.config.storage.primary;
		let storage_config = self
			.config
			.storage
			.implementations
			.get(primary_storage)
			.ok_or_else(|| {
				BuilderError::Config(format!(
					"No configuration for storage implementation '{}'",
					primary_storage
				))
			})?;
		let storage_factory = factories
			.storage_factories
			.get(primary_storage)
			.ok_or_else(|| {
				BuilderError::MissingComponent(format!("storage factory '{}'", primary_storage))
			})?;
		let storage = match storage_factory(storage_config) {
			Ok(implementation) => {
				tracing::info!(component = "storage", implementation = %primary_storage, "Loaded");
				Arc::new(StorageService::new(implementation))
			},
			Err(e) => {
				tracing::error!(
					component = "storage",
					implementation = %primary_storage,
					error = %e,
					"Failed to create storage implementation"
				);
				return Err(BuilderError::Config(format!(
					"Failed to create storage implementation '{}': {}",
					primary_storage, e
				)));
			},
		};

		// Create the account implementation and resolve the relay's address
		let primary_account = &self.config.account.primary;
		let account_config = self
			.config
			.account
			.implementations
			.get(primary_account)
			.ok_or_else(|| {
				BuilderError::Config(format!(
					"No configuration for account implementation '{}'",
					primary_account
				))
			})?;
		let account_factory = factories
			.account_factories
			.get(primary_account)
			.ok_or_else(|| {
				BuilderError::MissingComponent(format!("account factory '{}'", primary_account))
			})?;
		let account = match account_factory(account_config) {
			Ok(implementation) => {
				tracing::info!(component = "account", implementation = %primary_account, "Loaded");
				AccountService::new(implementation)
			},
			Err(e) => {
				return Err(BuilderError::Config(format!(
					"Failed to create account implementation '{}': {}",
					primary_account, e
				)));
			},
		};
		let executor_address = account
			.address()
			.await
			.map_err(|e| BuilderError::Config(format!("Failed to resolve relay address: {}", e)))?;

		// Create the token ledger, bound to the relay's address for
		// allowance enforcement
		let primary_token = &self.config.token.primary;
		let token_config = self
			.config
			.token
			.implementations
			.get(primary_token)
			.ok_or_else(|| {
				BuilderError::Config(format!(
					"No configuration for token ledger implementation '{}'",
					primary_token
				))
			})?;
		let token_factory = factories.token_factories.get(primary_token).ok_or_else(|| {
			BuilderError::MissingComponent(format!("token ledger factory '{}'", primary_token))
		})?;
		let token: Arc<dyn TokenLedger> = match token_factory(token_config, &executor_address) {
			Ok(implementation) => {
				tracing::info!(component = "token", implementation = %primary_token, "Loaded");
				Arc::from(implementation)
			},
			Err(e) => {
				return Err(BuilderError::Config(format!(
					"Failed to create token ledger implementation '{}': {}",
					primary_token, e
				)));
			},
		};

		let replay = ReplayLedger::new(Arc::clone(&storage));

		tracing::info!(
			relay = %self.config.relay.id,
			address = %executor_address,
			"Relay executor assembled"
		);

		Ok(RelayExecutor::new(
			Arc::new(Secp256k1Verifier),
			replay,
			token,
			storage,
			executor_address,
		))
	}
}
