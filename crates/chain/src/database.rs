// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Transaction-level database façade
//!
//! Owns the object store, the balance ledger, the chain parameters and
//! the head block time, and drives the evaluator layer. Operations of a
//! transaction are evaluated serially in operation order; on any
//! failure the whole transaction is rolled back from a snapshot taken
//! at entry, so no partial mutations survive.

use tracing::{debug, warn};

use tote_sdk::ids::{AccountId, AssetId, BetId, EventId, ObjectId};
use tote_sdk::operations::Transaction;
use tote_sdk::types::{Amount, AssetAmount, Timestamp};

use crate::balance::BalanceLedger;
use crate::delay;
use crate::error::ChainError;
use crate::evaluator::{self, OpContext, OperationResult};
use crate::params::ChainParameters;
use crate::proposal;
use crate::store::ObjectStore;

/// Consistent copy of the mutable chain state, taken at transaction
/// entry and restored on rejection.
struct StateSnapshot {
	store: ObjectStore,
	ledger: BalanceLedger,
}

/// The chain state machine
#[derive(Debug, Default)]
pub struct Database {
	pub(crate) store: ObjectStore,
	pub(crate) ledger: BalanceLedger,
	pub(crate) params: ChainParameters,
	pub(crate) head_block_time: Timestamp,
}

impl Database {
	pub fn new(params: ChainParameters) -> Self {
		Self {
			store: ObjectStore::new(),
			ledger: BalanceLedger::new(),
			params,
			head_block_time: 0,
		}
	}

	pub fn store(&self) -> &ObjectStore {
		&self.store
	}

	pub fn params(&self) -> &ChainParameters {
		&self.params
	}

	/// The deterministic clock evaluators read instead of wall time.
	pub fn head_block_time(&self) -> Timestamp {
		self.head_block_time
	}

	/// Advance the block clock and admit delayed bets whose deadline has
	/// passed. Time never moves backwards. Returns the admitted bet ids.
	pub fn advance_block_time(&mut self, time: Timestamp) -> Result<Vec<BetId>, ChainError> {
		self.head_block_time = self.head_block_time.max(time);
		delay::flush_expired(&mut self.store, self.head_block_time)
	}

	// ---- balance interface ---------------------------------------------

	pub fn get_balance(&self, account: AccountId, asset: AssetId) -> Amount {
		self.ledger.balance(account, asset)
	}

	pub fn adjust_balance(&mut self, account: AccountId, delta: AssetAmount) {
		self.ledger.adjust(account, delta);
	}

	pub fn is_authorized_asset(&self, account: AccountId, asset: AssetId) -> bool {
		self.ledger.is_authorized_asset(account, asset)
	}

	/// Restrict an account to an explicit asset whitelist.
	pub fn restrict_account(
		&mut self,
		account: AccountId,
		assets: impl IntoIterator<Item = AssetId>,
	) {
		self.ledger.restrict_account(account, assets);
	}

	// ---- external-entity registration ----------------------------------

	pub fn register_account(&mut self) -> AccountId {
		self.store.register_account()
	}

	pub fn register_asset(&mut self) -> AssetId {
		self.store.register_asset()
	}

	pub fn register_event(&mut self) -> EventId {
		self.store.register_event()
	}

	// ---- transaction application ---------------------------------------

	/// Reject `tx` if it proposes an operation already pending in a
	/// stored proposal.
	pub fn check_transaction_for_duplicated_operations(
		&self,
		tx: &Transaction,
	) -> Result<(), ChainError> {
		proposal::check_transaction_for_duplicated_operations(&self.store, tx)
	}

	/// Apply a transaction atomically
	///
	/// Each operation is validated and applied in order; relative
	/// identifiers resolve against the objects created earlier in the
	/// same transaction. Any failure restores the pre-transaction state
	/// and surfaces the error. `is_proposed` marks the transaction as
	/// the content of an approved proposal, which the proposed-only
	/// lifecycle operations require.
	pub fn apply_transaction(
		&mut self,
		tx: &Transaction,
		is_proposed: bool,
	) -> Result<Vec<OperationResult>, ChainError> {
		self.check_transaction_for_duplicated_operations(tx)?;

		let snapshot = self.snapshot();
		match self.evaluate_operations(tx, is_proposed) {
			Ok(results) => Ok(results),
			Err(error) => {
				self.restore(snapshot);
				warn!("transaction rejected: {error}");
				Err(error)
			}
		}
	}

	fn evaluate_operations(
		&mut self,
		tx: &Transaction,
		is_proposed: bool,
	) -> Result<Vec<OperationResult>, ChainError> {
		let mut created: Vec<ObjectId> = Vec::new();
		let mut results = Vec::with_capacity(tx.operations.len());

		for op in &tx.operations {
			let ctx = OpContext {
				is_proposed,
				created: &created,
			};
			let result = evaluator::evaluate(self, &ctx, op)?;
			if let Some(id) = result.object_id() {
				debug!("operation created object {id}");
				created.push(id);
			}
			results.push(result);
		}

		Ok(results)
	}

	fn snapshot(&self) -> StateSnapshot {
		StateSnapshot {
			store: self.store.clone(),
			ledger: self.ledger.clone(),
		}
	}

	fn restore(&mut self, snapshot: StateSnapshot) {
		self.store = snapshot.store;
		self.ledger = snapshot.ledger;
	}
}
