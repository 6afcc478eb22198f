//! Registry trait for self-registering implementations.
//!
//! Each pluggable component (storage backend, account provider, token
//! ledger) exposes a Registry struct implementing this trait, tying the name
//! used in configuration files to the factory that builds the component.

/// Base trait for implementation registries.
///
/// Implementations declare the configuration name they answer to and the
/// factory function that constructs them, for example "memory" for
/// `storage.implementations.memory` or "local" for
/// `account.implementations.local`.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
