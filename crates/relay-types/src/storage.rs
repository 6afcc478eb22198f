//! Storage-related types for the relay system.

use std::str::FromStr;

/// Storage namespaces for the relay's persisted collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Consumed authorization hashes (the replay ledger's backing set).
	Consumed,
	/// Execution records of successfully submitted transfers.
	Executions,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Consumed => "consumed",
			StorageKey::Executions => "executions",
		}
	}

	/// Returns an iterator over all StorageKey variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[Self::Consumed, Self::Executions].into_iter()
	}
}

impl FromStr for StorageKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"consumed" => Ok(Self::Consumed),
			"executions" => Ok(Self::Executions),
			_ => Err(()),
		}
	}
}

impl From<StorageKey> for &'static str {
	fn from(key: StorageKey) -> Self {
		key.as_str()
	}
}
