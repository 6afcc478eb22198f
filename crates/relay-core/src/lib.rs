//! Core relay executor for the meta-transaction relay.
//!
//! The executor orchestrates the full submission pipeline: hash the intent,
//! recover and check the signer, consume the authorization in the replay
//! ledger, and delegate the transfer to the token ledger. It is the only
//! component allowed to mutate the replay ledger or to invoke the token
//! boundary.

use alloy_primitives::Address;
use relay_account::verify::{SignatureVerifier, VerifyError};
use relay_storage::{ConsumeOutcome, ReplayLedger, StorageError, StorageService};
use relay_token::{TokenError, TokenLedger};
use relay_types::{
	intent_hash, truncate_id, AuthorizationHash, ExecutionRecord, Signature, StorageKey,
	TransferIntent,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::instrument;

pub mod builder;

pub use builder::{BuilderError, RelayBuilder, RelayFactories};

/// Reasons a submission is rejected.
///
/// All of these are terminal for the submitted (intent, signature) pair and
/// recoverable for the caller; none is fatal to the process. Since the nonce
/// is baked into the hash, retrying requires the signer to mint a new intent
/// with a fresh nonce.
#[derive(Debug, Error)]
pub enum SubmitError {
	/// The signature is malformed or recovery mathematically failed.
	#[error("Bad signature: {0}")]
	BadSignature(VerifyError),
	/// The recovered identity is not the intent's declared sender.
	#[error("Signer mismatch: recovered {recovered}, expected {expected}")]
	SignerMismatch {
		expected: Address,
		recovered: Address,
	},
	/// The authorization hash was already consumed.
	#[error("Replay detected: authorization {0} already consumed")]
	ReplayDetected(AuthorizationHash),
	/// The token ledger refused the transfer. The authorization is burned:
	/// consumption happened before the transfer attempt.
	#[error("Transfer failed: {0}")]
	TransferFailed(#[from] TokenError),
	/// The backing store failed.
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

/// Orchestrates verification, replay consumption, and transfer dispatch.
pub struct RelayExecutor {
	/// Signature scheme used to recover signing identities.
	verifier: Arc<dyn SignatureVerifier>,
	/// Authoritative consumed-hash set.
	replay: ReplayLedger,
	/// External token ledger boundary.
	token: Arc<dyn TokenLedger>,
	/// Storage for execution records.
	storage: Arc<StorageService>,
	/// The relay's own identity; the spender senders approve on the ledger.
	executor_address: Address,
}

impl std::fmt::Debug for RelayExecutor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RelayExecutor")
			.field("executor_address", &self.executor_address)
			.finish_non_exhaustive()
	}
}

impl RelayExecutor {
	/// Creates a new executor from its collaborating parts.
	pub fn new(
		verifier: Arc<dyn SignatureVerifier>,
		replay: ReplayLedger,
		token: Arc<dyn TokenLedger>,
		storage: Arc<StorageService>,
		executor_address: Address,
	) -> Self {
		Self {
			verifier,
			replay,
			token,
			storage,
			executor_address,
		}
	}

	/// The relay's own identity.
	pub fn executor_address(&self) -> Address {
		self.executor_address
	}

	/// Submits a signed transfer intent for execution.
	///
	/// Consumption is ordered BEFORE the transfer: once the authorization
	/// hash is marked consumed it stays consumed, so a transfer failure (or
	/// a crash between the two steps) burns the authorization instead of
	/// leaving a window for a duplicate execution. The signer retries by
	/// signing a new intent with a fresh nonce.
	#[instrument(skip_all, fields(sender = %intent.sender, nonce = %intent.nonce))]
	pub async fn submit(
		&self,
		intent: &TransferIntent,
		signature: &Signature,
	) -> Result<ExecutionRecord, SubmitError> {
		let hash = intent_hash(intent);

		let signer = self
			.verifier
			.recover_signer(&hash, signature)
			.map_err(SubmitError::BadSignature)?;
		if signer != intent.sender {
			tracing::warn!(recovered = %signer, "Rejected submission: signer mismatch");
			return Err(SubmitError::SignerMismatch {
				expected: intent.sender,
				recovered: signer,
			});
		}

		match self.replay.consume(&hash).await? {
			ConsumeOutcome::AlreadyConsumed => {
				tracing::warn!(
					authorization = %truncate_id(&hex::encode(hash)),
					"Rejected submission: replay detected"
				);
				return Err(SubmitError::ReplayDetected(hash));
			},
			ConsumeOutcome::Consumed => {},
		}

		let outcome = self
			.token
			.debit(intent.sender, intent.recipient, intent.amount, intent.token)
			.await?;

		let record = ExecutionRecord {
			hash,
			sender: intent.sender,
			recipient: intent.recipient,
			token: intent.token,
			amount: intent.amount,
			sender_balance: outcome.sender_balance,
			recipient_balance: outcome.recipient_balance,
			executed_at: unix_now(),
		};
		self.storage
			.store(StorageKey::Executions.as_str(), &hex::encode(hash), &record)
			.await?;

		tracing::info!(
			authorization = %truncate_id(&hex::encode(hash)),
			amount = %intent.amount,
			"Executed transfer"
		);
		Ok(record)
	}

	/// Looks up the execution record for a consumed authorization.
	pub async fn execution(
		&self,
		hash: &AuthorizationHash,
	) -> Result<Option<ExecutionRecord>, StorageError> {
		match self
			.storage
			.retrieve::<ExecutionRecord>(StorageKey::Executions.as_str(), &hex::encode(hash))
			.await
		{
			Ok(record) => Ok(Some(record)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(e),
		}
	}
}

fn unix_now() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs()
}
