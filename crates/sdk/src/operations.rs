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

//! Operation catalogue
//!
//! State-mutating operations as a tagged variant. Each operation kind
//! has a validate/apply evaluator pair in the chain crate; the variants
//! here are plain data.
//!
//! Reference fields that may name an object created earlier in the same
//! transaction (`event_id`, `rules_id`, `group_id` and their update
//! counterparts) are carried as untyped [`ObjectId`]s so they can hold a
//! relative marker; everything else is a typed id.

use serde::{Deserialize, Serialize};

use crate::ids::{AccountId, AssetId, BetId, GroupId, MarketId, ObjectId, RulesId};
use crate::types::{AssetAmount, BackOrLay, BetMultiplier};

/// Create a named betting market rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesCreate {
	pub name: String,
	pub description: String,
}

/// Update a rule set; at least one field must be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesUpdate {
	pub rules_id: RulesId,
	pub new_name: Option<String>,
	pub new_description: Option<String>,
}

/// Create a betting market group under an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCreate {
	/// May be relative.
	pub event_id: ObjectId,
	/// May be relative.
	pub rules_id: ObjectId,
	pub asset_id: AssetId,
	pub description: String,
}

/// Update a group; at least one field must be present, and `freeze` /
/// `delay_bets` must change the current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUpdate {
	pub group_id: GroupId,
	pub new_description: Option<String>,
	/// May be relative.
	pub new_rules_id: Option<ObjectId>,
	pub freeze: Option<bool>,
	pub delay_bets: Option<bool>,
}

/// Create a betting market inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketCreate {
	/// May be relative.
	pub group_id: ObjectId,
	pub description: String,
	pub payout_condition: String,
}

/// Update a market; at least one field must be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketUpdate {
	pub market_id: MarketId,
	/// May be relative.
	pub new_group_id: Option<ObjectId>,
	pub new_description: Option<String>,
	pub new_payout_condition: Option<String>,
}

/// Place a back or lay bet on a market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetPlace {
	pub bettor_id: AccountId,
	pub market_id: MarketId,
	pub amount_to_bet: AssetAmount,
	pub backer_multiplier: BetMultiplier,
	pub back_or_lay: BackOrLay,
}

/// Cancel one of the caller's own unmatched bets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetCancel {
	pub bettor_id: AccountId,
	pub bet_id: BetId,
}

/// Resolve every market of a group and settle matched positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResolve {
	pub group_id: GroupId,
	/// `(market, label)` pairs; labels are validated against the legal
	/// resolution vocabulary.
	pub resolutions: Vec<(MarketId, String)>,
}

/// Refund every currently-unmatched bet of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCancelUnmatchedBets {
	pub group_id: GroupId,
}

/// Move an asset amount between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
	pub from: AccountId,
	pub to: AccountId,
	pub amount: AssetAmount,
}

/// Stage a transaction's worth of operations for later approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCreate {
	pub proposed_ops: Vec<Operation>,
}

/// The full operation variant dispatched by the evaluator layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
	RulesCreate(RulesCreate),
	RulesUpdate(RulesUpdate),
	GroupCreate(GroupCreate),
	GroupUpdate(GroupUpdate),
	MarketCreate(MarketCreate),
	MarketUpdate(MarketUpdate),
	BetPlace(BetPlace),
	BetCancel(BetCancel),
	GroupResolve(GroupResolve),
	GroupCancelUnmatchedBets(GroupCancelUnmatchedBets),
	Transfer(Transfer),
	ProposalCreate(ProposalCreate),
}

/// Ordered list of operations applied atomically.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
	pub operations: Vec<Operation>,
}

impl Transaction {
	pub fn new(operations: Vec<Operation>) -> Self {
		Self { operations }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn transfer(amount: i64) -> Operation {
		Operation::Transfer(Transfer {
			from: AccountId(0),
			to: AccountId(1),
			amount: AssetAmount::new(AssetId(0), amount),
		})
	}

	#[test]
	fn test_structural_equality_includes_amounts() {
		assert_eq!(transfer(500), transfer(500));
		assert_ne!(transfer(500), transfer(501));
	}

	#[test]
	fn test_canonical_encoding_is_stable() {
		let a = serde_json::to_vec(&transfer(500)).unwrap();
		let b = serde_json::to_vec(&transfer(500)).unwrap();
		assert_eq!(a, b);

		let c = serde_json::to_vec(&transfer(501)).unwrap();
		assert_ne!(a, c);
	}
}
