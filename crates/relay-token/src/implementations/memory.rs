//! In-process token ledger for development and tests.
//!
//! Keeps balances and allowances in memory, mirroring a standard fungible
//! token's approve/transferFrom flow: holders `mint` and `approve` the
//! relay executor, and `debit` moves funds while enforcing the approved
//! allowance. An allowance of `U256::MAX` is treated as unlimited and is
//! not decremented; finite allowances shrink with each debit.

use crate::{TokenError, TokenLedger, TokenLedgerFactory, TokenLedgerRegistry, TransferOutcome};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use relay_types::{
	without_0x_prefix, ConfigSchema, Field, FieldType, ImplementationRegistry, Schema,
	ValidationError,
};
use std::collections::HashMap;
use std::str::FromStr;
use tokio::sync::RwLock;

/// Balances and allowances, guarded together so a debit is atomic.
#[derive(Default)]
struct Books {
	/// (token, account) -> balance.
	balances: HashMap<(Address, Address), U256>,
	/// (token, owner) -> allowance granted to the executor.
	allowances: HashMap<(Address, Address), U256>,
}

/// In-memory token ledger.
pub struct MemoryTokenLedger {
	/// The relay identity allowances are enforced against.
	executor: Address,
	books: RwLock<Books>,
}

impl MemoryTokenLedger {
	/// Creates an empty ledger enforcing allowances against `executor`.
	pub fn new(executor: Address) -> Self {
		Self {
			executor,
			books: RwLock::new(Books::default()),
		}
	}

	/// Returns the executor identity this ledger enforces allowances for.
	pub fn executor(&self) -> Address {
		self.executor
	}

	/// Credits `amount` of `token` to `account`.
	pub async fn mint(&self, token: Address, account: Address, amount: U256) {
		let mut books = self.books.write().await;
		let balance = books.balances.entry((token, account)).or_default();
		*balance = balance.saturating_add(amount);
	}

	/// Sets the allowance `owner` grants the executor on `token`.
	///
	/// `U256::MAX` means unlimited.
	pub async fn approve(&self, token: Address, owner: Address, amount: U256) {
		let mut books = self.books.write().await;
		books.allowances.insert((token, owner), amount);
	}
}

#[async_trait]
impl TokenLedger for MemoryTokenLedger {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryTokenLedgerSchema)
	}

	async fn debit(
		&self,
		sender: Address,
		recipient: Address,
		amount: U256,
		token: Address,
	) -> Result<TransferOutcome, TokenError> {
		let mut books = self.books.write().await;

		let allowance = books
			.allowances
			.get(&(token, sender))
			.copied()
			.unwrap_or(U256::ZERO);
		if allowance < amount {
			return Err(TokenError::InsufficientAllowance {
				available: allowance,
				required: amount,
			});
		}

		let sender_balance = books
			.balances
			.get(&(token, sender))
			.copied()
			.unwrap_or(U256::ZERO);
		if sender_balance < amount {
			return Err(TokenError::InsufficientBalance {
				available: sender_balance,
				required: amount,
			});
		}

		if allowance != U256::MAX {
			books.allowances.insert((token, sender), allowance - amount);
		}

		let new_sender_balance = sender_balance - amount;
		books.balances.insert((token, sender), new_sender_balance);
		let recipient_balance = books.balances.entry((token, recipient)).or_default();
		*recipient_balance = recipient_balance.saturating_add(amount);
		let new_recipient_balance = *recipient_balance;

		tracing::debug!(
			%token,
			%sender,
			%recipient,
			amount = %amount,
			"Debited token ledger"
		);

		Ok(TransferOutcome {
			sender_balance: new_sender_balance,
			recipient_balance: new_recipient_balance,
		})
	}

	async fn balance_of(&self, token: Address, account: Address) -> Result<U256, TokenError> {
		let books = self.books.read().await;
		Ok(books
			.balances
			.get(&(token, account))
			.copied()
			.unwrap_or(U256::ZERO))
	}

	async fn allowance(&self, token: Address, owner: Address) -> Result<U256, TokenError> {
		let books = self.books.read().await;
		Ok(books
			.allowances
			.get(&(token, owner))
			.copied()
			.unwrap_or(U256::ZERO))
	}
}

/// Configuration schema for MemoryTokenLedger.
pub struct MemoryTokenLedgerSchema;

impl ConfigSchema for MemoryTokenLedgerSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![Field::new("seed", FieldType::Array).with_validator(|v| {
				for entry in v.as_array().cloned().unwrap_or_default() {
					let table = entry.as_table().ok_or("seed entries must be tables")?;
					for field in ["token", "holder", "amount"] {
						if !table.get(field).is_some_and(|f| f.is_str()) {
							return Err(format!("seed entry missing string field '{}'", field));
						}
					}
				}
				Ok(())
			})],
		);
		schema.validate(config)
	}
}

/// Registry for the memory token ledger implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = TokenLedgerFactory;

	fn factory() -> Self::Factory {
		create_ledger
	}
}

impl TokenLedgerRegistry for Registry {}

fn parse_address(s: &str) -> Result<Address, TokenError> {
	Address::from_str(s).map_err(|e| TokenError::Ledger(format!("invalid address '{}': {}", s, e)))
}

/// Factory function to create a memory token ledger from configuration.
///
/// Configuration parameters:
/// - `seed` (optional): array of `{ token, holder, amount }` tables. Each
///   seeded holder is credited `amount` minor units and grants the executor
///   an unlimited allowance, which keeps local runs usable out of the box.
pub fn create_ledger(
	config: &toml::Value,
	executor: &Address,
) -> Result<Box<dyn TokenLedger>, TokenError> {
	MemoryTokenLedgerSchema
		.validate(config)
		.map_err(|e| TokenError::Ledger(e.to_string()))?;

	// Seed the books before the lock ever gets shared; no async needed.
	let mut books = Books::default();
	if let Some(entries) = config.get("seed").and_then(|v| v.as_array()) {
		for entry in entries {
			let get = |field: &str| {
				entry
					.get(field)
					.and_then(|v| v.as_str())
					.ok_or_else(|| TokenError::Ledger(format!("seed entry missing '{}'", field)))
			};
			let token = parse_address(get("token")?)?;
			let holder = parse_address(get("holder")?)?;
			let amount = U256::from_str_radix(without_0x_prefix(get("amount")?), 10)
				.map_err(|e| TokenError::Ledger(format!("invalid seed amount: {}", e)))?;

			let balance = books.balances.entry((token, holder)).or_default();
			*balance = balance.saturating_add(amount);
			books.allowances.insert((token, holder), U256::MAX);
		}
	}

	Ok(Box::new(MemoryTokenLedger {
		executor: *executor,
		books: RwLock::new(books),
	}))
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	const TOKEN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
	const SENDER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
	const RECIPIENT: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
	const EXECUTOR: Address = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

	#[tokio::test]
	async fn test_debit_moves_funds() {
		let ledger = MemoryTokenLedger::new(EXECUTOR);
		ledger.mint(TOKEN, SENDER, U256::from(100u64)).await;
		ledger.approve(TOKEN, SENDER, U256::MAX).await;

		let outcome = ledger
			.debit(SENDER, RECIPIENT, U256::from(40u64), TOKEN)
			.await
			.unwrap();
		assert_eq!(outcome.sender_balance, U256::from(60u64));
		assert_eq!(outcome.recipient_balance, U256::from(40u64));

		assert_eq!(
			ledger.balance_of(TOKEN, SENDER).await.unwrap(),
			U256::from(60u64)
		);
		assert_eq!(
			ledger.balance_of(TOKEN, RECIPIENT).await.unwrap(),
			U256::from(40u64)
		);
	}

	#[tokio::test]
	async fn test_insufficient_balance() {
		let ledger = MemoryTokenLedger::new(EXECUTOR);
		ledger.mint(TOKEN, SENDER, U256::from(5u64)).await;
		ledger.approve(TOKEN, SENDER, U256::MAX).await;

		let err = ledger
			.debit(SENDER, RECIPIENT, U256::from(10u64), TOKEN)
			.await
			.unwrap_err();
		assert!(matches!(err, TokenError::InsufficientBalance { .. }));

		// Nothing moved.
		assert_eq!(
			ledger.balance_of(TOKEN, SENDER).await.unwrap(),
			U256::from(5u64)
		);
	}

	#[tokio::test]
	async fn test_insufficient_allowance() {
		let ledger = MemoryTokenLedger::new(EXECUTOR);
		ledger.mint(TOKEN, SENDER, U256::from(100u64)).await;

		let err = ledger
			.debit(SENDER, RECIPIENT, U256::from(10u64), TOKEN)
			.await
			.unwrap_err();
		assert!(matches!(err, TokenError::InsufficientAllowance { .. }));
	}

	#[tokio::test]
	async fn test_finite_allowance_decrements() {
		let ledger = MemoryTokenLedger::new(EXECUTOR);
		ledger.mint(TOKEN, SENDER, U256::from(100u64)).await;
		ledger.approve(TOKEN, SENDER, U256::from(15u64)).await;

		ledger
			.debit(SENDER, RECIPIENT, U256::from(10u64), TOKEN)
			.await
			.unwrap();
		assert_eq!(
			ledger.allowance(TOKEN, SENDER).await.unwrap(),
			U256::from(5u64)
		);

		let err = ledger
			.debit(SENDER, RECIPIENT, U256::from(10u64), TOKEN)
			.await
			.unwrap_err();
		assert!(matches!(err, TokenError::InsufficientAllowance { .. }));
	}

	#[tokio::test]
	async fn test_factory_seeds_balances_and_allowance() {
		let config: toml::Value = toml::from_str(
			r#"
			[[seed]]
			token = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
			holder = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
			amount = "10000"
			"#,
		)
		.unwrap();

		let ledger = create_ledger(&config, &EXECUTOR).unwrap();
		assert_eq!(
			ledger.balance_of(TOKEN, SENDER).await.unwrap(),
			U256::from(10_000u64)
		);
		assert_eq!(ledger.allowance(TOKEN, SENDER).await.unwrap(), U256::MAX);
	}

	#[tokio::test]
	async fn test_unlimited_allowance_is_not_decremented() {
		let ledger = MemoryTokenLedger::new(EXECUTOR);
		ledger.mint(TOKEN, SENDER, U256::from(100u64)).await;
		ledger.approve(TOKEN, SENDER, U256::MAX).await;

		ledger
			.debit(SENDER, RECIPIENT, U256::from(10u64), TOKEN)
			.await
			.unwrap();
		assert_eq!(ledger.allowance(TOKEN, SENDER).await.unwrap(), U256::MAX);
	}
}
