//! Common types module for the meta-transaction relay.
//!
//! This module defines the core data types and structures shared by all
//! relay components. It provides a centralized location for the transfer
//! intent value object, its canonical encoding, and the supporting
//! configuration and API types.

/// API request/response types for the HTTP endpoints.
pub mod api;
/// Canonical fixed-layout encoding and hashing of transfer intents.
pub mod encoding;
/// The transfer intent value object and its companion types.
pub mod intent;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Secure string type for private keys and other secrets.
pub mod secret_string;
/// Storage namespace taxonomy.
pub mod storage;
/// Utility functions for hex formatting and display.
pub mod utils;
/// Configuration validation framework.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use encoding::{encode_intent, intent_hash, ENCODED_INTENT_LEN};
pub use intent::*;
pub use registry::ImplementationRegistry;
pub use secret_string::SecretString;
pub use storage::StorageKey;
pub use utils::{truncate_id, with_0x_prefix, without_0x_prefix};
pub use validation::*;
