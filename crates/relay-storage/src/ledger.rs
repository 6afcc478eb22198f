//! Replay ledger: the authoritative set of consumed authorization hashes.
//!
//! An authorization hash moves through exactly one transition in its
//! lifetime: absent -> consumed. Entries are never deleted and never reset.
//! The check-and-mark in [`ReplayLedger::consume`] runs inside a single
//! mutex-guarded critical section, so concurrent callers racing on the same
//! hash linearize: exactly one observes [`ConsumeOutcome::Consumed`], every
//! other caller observes [`ConsumeOutcome::AlreadyConsumed`].

use crate::{StorageError, StorageService};
use alloy_primitives::B256;
use relay_types::StorageKey;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of attempting to consume an authorization hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
	/// This caller won the transition; the hash is now consumed.
	Consumed,
	/// The hash was already consumed by an earlier caller.
	AlreadyConsumed,
}

/// Persistent set of consumed authorization hashes.
///
/// Backed by the storage service so durability follows the configured
/// backend: with file storage the consumed set survives restarts, which is
/// required whenever the execution environment itself is not durable.
pub struct ReplayLedger {
	storage: Arc<StorageService>,
	/// Serializes the check-and-mark transition in `consume`.
	gate: Mutex<()>,
}

impl ReplayLedger {
	/// Creates a replay ledger over the given storage service.
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self {
			storage,
			gate: Mutex::new(()),
		}
	}

	fn id(hash: &B256) -> String {
		hex::encode(hash)
	}

	/// Returns whether the hash has already been consumed.
	pub async fn is_consumed(&self, hash: &B256) -> Result<bool, StorageError> {
		self.storage
			.exists(StorageKey::Consumed.as_str(), &Self::id(hash))
			.await
	}

	/// Atomically transitions the hash from absent to consumed.
	///
	/// At most one successful consume ever occurs per hash across the
	/// ledger's lifetime, regardless of how many callers race.
	pub async fn consume(&self, hash: &B256) -> Result<ConsumeOutcome, StorageError> {
		let _gate = self.gate.lock().await;

		let namespace = StorageKey::Consumed.as_str();
		let id = Self::id(hash);
		if self.storage.exists(namespace, &id).await? {
			return Ok(ConsumeOutcome::AlreadyConsumed);
		}
		self.storage.store(namespace, &id, &true).await?;
		tracing::debug!(authorization = %relay_types::truncate_id(&id), "Consumed authorization");
		Ok(ConsumeOutcome::Consumed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::memory::MemoryStorage;

	fn ledger() -> Arc<ReplayLedger> {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		Arc::new(ReplayLedger::new(storage))
	}

	#[tokio::test]
	async fn test_second_consume_is_rejected() {
		let ledger = ledger();
		let hash = B256::repeat_byte(0x01);

		assert!(!ledger.is_consumed(&hash).await.unwrap());
		assert_eq!(
			ledger.consume(&hash).await.unwrap(),
			ConsumeOutcome::Consumed
		);
		assert!(ledger.is_consumed(&hash).await.unwrap());
		assert_eq!(
			ledger.consume(&hash).await.unwrap(),
			ConsumeOutcome::AlreadyConsumed
		);
	}

	#[tokio::test]
	async fn test_distinct_hashes_do_not_interfere() {
		let ledger = ledger();
		let first = B256::repeat_byte(0x01);
		let second = B256::repeat_byte(0x02);

		assert_eq!(
			ledger.consume(&first).await.unwrap(),
			ConsumeOutcome::Consumed
		);
		assert_eq!(
			ledger.consume(&second).await.unwrap(),
			ConsumeOutcome::Consumed
		);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_concurrent_consume_is_at_most_once() {
		let ledger = ledger();
		let hash = B256::repeat_byte(0x42);

		let mut handles = Vec::new();
		for _ in 0..16 {
			let ledger = Arc::clone(&ledger);
			handles.push(tokio::spawn(async move {
				ledger.consume(&hash).await.unwrap()
			}));
		}

		let mut consumed = 0;
		let mut already = 0;
		for handle in handles {
			match handle.await.unwrap() {
				ConsumeOutcome::Consumed => consumed += 1,
				ConsumeOutcome::AlreadyConsumed => already += 1,
			}
		}

		assert_eq!(consumed, 1);
		assert_eq!(already, 15);
	}

	#[tokio::test]
	async fn test_consumed_set_survives_reopen_with_file_backend() {
		use crate::implementations::file::FileStorage;

		let dir = tempfile::tempdir().unwrap();
		let hash = B256::repeat_byte(0x77);

		{
			let storage = Arc::new(StorageService::new(Box::new(FileStorage::new(
				dir.path().to_path_buf(),
			))));
			let ledger = ReplayLedger::new(storage);
			ledger.consume(&hash).await.unwrap();
		}

		let storage = Arc::new(StorageService::new(Box::new(FileStorage::new(
			dir.path().to_path_buf(),
		))));
		let ledger = ReplayLedger::new(storage);
		assert!(ledger.is_consumed(&hash).await.unwrap());
		assert_eq!(
			ledger.consume(&hash).await.unwrap(),
			ConsumeOutcome::AlreadyConsumed
		);
	}
}
