//! Token ledger boundary for the meta-transaction relay.
//!
//! The token ledger is an external collaborator, not part of the relay
//! core: it owns balance and allowance bookkeeping. The relay only ever
//! calls `debit` after an authorization has passed signature and replay
//! checks, and expects the ledger to enforce the allowance the sender
//! granted to the relay's identity. An in-process development
//! implementation ships for tests and local runs.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use relay_types::{ConfigSchema, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

/// Errors that can occur during token ledger operations.
#[derive(Debug, Error)]
pub enum TokenError {
	/// The sender's balance does not cover the transfer amount.
	#[error("Insufficient balance: have {available}, need {required}")]
	InsufficientBalance { available: U256, required: U256 },
	/// The sender has not delegated enough allowance to the relay.
	#[error("Insufficient allowance: have {available}, need {required}")]
	InsufficientAllowance { available: U256, required: U256 },
	/// Error inside the ledger implementation itself.
	#[error("Ledger error: {0}")]
	Ledger(String),
}

/// Post-transfer balances reported by a successful debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
	/// Sender balance after the transfer.
	pub sender_balance: U256,
	/// Recipient balance after the transfer.
	pub recipient_balance: U256,
}

/// Trait defining the token ledger boundary.
///
/// Precondition for `debit`: the sender has pre-approved the relay's
/// identity to move at least `amount` of `token` on its behalf; enforcing
/// that allowance is the ledger's responsibility, not the relay's.
#[async_trait]
pub trait TokenLedger: Send + Sync {
	/// Returns the configuration schema for this ledger implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Moves `amount` of `token` from `sender` to `recipient`.
	///
	/// Balance check, allowance check, and the move itself are a single
	/// atomic step inside the ledger.
	async fn debit(
		&self,
		sender: Address,
		recipient: Address,
		amount: U256,
		token: Address,
	) -> Result<TransferOutcome, TokenError>;

	/// Returns the balance of `account` on `token`.
	async fn balance_of(&self, token: Address, account: Address) -> Result<U256, TokenError>;

	/// Returns the allowance `owner` has granted to the relay on `token`.
	async fn allowance(&self, token: Address, owner: Address) -> Result<U256, TokenError>;
}

/// Type alias for token ledger factory functions.
///
/// Besides configuration, factories receive the relay executor's address:
/// the identity the ledger enforces allowances against.
pub type TokenLedgerFactory =
	fn(&toml::Value, &Address) -> Result<Box<dyn TokenLedger>, TokenError>;

/// Registry trait for token ledger implementations.
pub trait TokenLedgerRegistry: ImplementationRegistry<Factory = TokenLedgerFactory> {}

/// Get all registered token ledger implementations.
pub fn get_all_implementations() -> Vec<(&'static str, TokenLedgerFactory)> {
	use implementations::memory;

	vec![(memory::Registry::NAME, memory::Registry::factory())]
}
