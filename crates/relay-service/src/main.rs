//! Main entry point for the meta-transaction relay service.
//!
//! This binary assembles a relay executor from pluggable storage, account,
//! and token ledger implementations and serves the HTTP API for submitting
//! signed transfer intents.

use clap::Parser;
use relay_config::Config;
use relay_core::{RelayBuilder, RelayExecutor, RelayFactories};
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

// Import implementations from individual crates
use relay_account::implementations::local::create_account;
use relay_storage::implementations::file::create_storage as create_file_storage;
use relay_storage::implementations::memory::create_storage as create_memory_storage;
use relay_token::implementations::memory::create_ledger as create_memory_ledger;

/// Command-line arguments for the relay service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the relay service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the relay executor with all implementations
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started relay");

	// Load configuration
	let config = Config::from_file(&args.config)?;
	tracing::info!("Loaded configuration [{}]", config.relay.id);

	let api_config = config.api.clone().unwrap_or_default();
	if !api_config.enabled {
		tracing::warn!("API server disabled in configuration, nothing to serve");
		return Ok(());
	}

	// Build the relay executor with implementations
	let relay = build_relay(config).await?;

	server::start_server(api_config, Arc::new(relay)).await?;

	tracing::info!("Stopped relay");
	Ok(())
}

/// Macro to create a factory HashMap with the appropriate type aliases
macro_rules! create_factory_map {
    ($interface:path, $error:path, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};

    // Variant for token ledger factories that take the relay's address
    ($interface:path, $error:path, token, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value, &alloy_primitives::Address) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};
}

/// Builds the relay executor with all necessary implementations.
///
/// This function wires up the concrete implementations for:
/// - Storage backends (in-memory, file)
/// - Account providers (local keys)
/// - Token ledgers (in-process development ledger)
async fn build_relay(config: Config) -> Result<RelayExecutor, Box<dyn std::error::Error>> {
	let builder = RelayBuilder::new(config);

	let storage_factories = create_factory_map!(
		relay_storage::StorageInterface,
		relay_storage::StorageError,
		"file" => create_file_storage,
		"memory" => create_memory_storage,
	);

	let account_factories = create_factory_map!(
		relay_account::AccountInterface,
		relay_account::AccountError,
		"local" => create_account,
	);

	let token_factories = create_factory_map!(
		relay_token::TokenLedger,
		relay_token::TokenError,
		token,
		"memory" => create_memory_ledger,
	);

	let factories = RelayFactories {
		storage_factories,
		account_factories,
		token_factories,
	};

	Ok(builder.build(factories).await?)
}
