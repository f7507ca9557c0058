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

//! Per-account per-asset balance ledger
//!
//! Evaluators debit escrow at bet placement, refund it on cancellation,
//! and credit payouts at resolution. Validators check balances before
//! any mutation, so a debit never overdraws.

use std::collections::{BTreeMap, BTreeSet};

use tote_sdk::ids::{AccountId, AssetId};
use tote_sdk::types::{Amount, AssetAmount};

/// In-memory balance ledger keyed by `(account, asset)`
#[derive(Debug, Clone, Default)]
pub struct BalanceLedger {
	balances: BTreeMap<(AccountId, AssetId), Amount>,
	/// Accounts restricted to an explicit asset whitelist. Absent means
	/// the account may transact any asset.
	restrictions: BTreeMap<AccountId, BTreeSet<AssetId>>,
}

impl BalanceLedger {
	pub fn new() -> Self {
		Self::default()
	}

	/// Current balance, zero for unknown pairs.
	pub fn balance(&self, account: AccountId, asset: AssetId) -> Amount {
		self.balances.get(&(account, asset)).copied().unwrap_or(0)
	}

	/// Apply a signed adjustment to an account's balance.
	pub fn adjust(&mut self, account: AccountId, delta: AssetAmount) {
		let balance = self.balances.entry((account, delta.asset_id)).or_insert(0);
		*balance += delta.amount;
		debug_assert!(*balance >= 0, "ledger overdraw for {account}");
	}

	/// Whether `account` may hold and transact `asset`.
	pub fn is_authorized_asset(&self, account: AccountId, asset: AssetId) -> bool {
		match self.restrictions.get(&account) {
			Some(whitelist) => whitelist.contains(&asset),
			None => true,
		}
	}

	/// Restrict an account to an explicit set of permitted assets.
	pub fn restrict_account(
		&mut self,
		account: AccountId,
		assets: impl IntoIterator<Item = AssetId>,
	) {
		self.restrictions
			.insert(account, assets.into_iter().collect());
	}
}
