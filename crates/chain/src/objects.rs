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

//! Persistent entities of the betting-market state machine

use serde::{Deserialize, Serialize};

use tote_sdk::ids::{
	AccountId, AssetId, BetId, EventId, GroupId, MarketId, PositionId, ProposalId, RulesId,
};
use tote_sdk::operations::Transaction;
use tote_sdk::types::{Amount, AssetAmount, BackOrLay, BetMultiplier, Timestamp};

/// Free-text rule set shared by betting market groups. Never destroyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingMarketRules {
	pub id: RulesId,
	pub name: String,
	pub description: String,
}

/// Book of related betting markets sharing rules, asset and event
///
/// `frozen` stops new bets; `delay_bets` routes new bets through the
/// delay controller. Both start out false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingMarketGroup {
	pub id: GroupId,
	pub event_id: EventId,
	pub rules_id: RulesId,
	pub asset_id: AssetId,
	pub description: String,
	pub frozen: bool,
	pub delay_bets: bool,
}

/// Single betting market inside a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingMarket {
	pub id: MarketId,
	pub group_id: GroupId,
	pub description: String,
	/// Opaque governance-chosen descriptor consulted at resolution.
	pub payout_condition: String,
}

/// An open bet
///
/// `amount_to_bet` is the remaining (unmatched) stake; it shrinks as the
/// bet crosses and the record is deleted once fully matched. A set
/// `end_of_delay` means the bet is quarantined and not yet in the book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
	pub id: BetId,
	pub bettor_id: AccountId,
	pub market_id: MarketId,
	pub amount_to_bet: AssetAmount,
	pub backer_multiplier: BetMultiplier,
	pub back_or_lay: BackOrLay,
	pub end_of_delay: Option<Timestamp>,
}

impl Bet {
	pub fn is_delayed(&self) -> bool {
		self.end_of_delay.is_some()
	}
}

/// Matched back/lay pair awaiting resolution
///
/// Both stakes are held in escrow; the winner of the market receives
/// `back_stake + lay_stake`, which keeps stake conservation exact under
/// integer truncation of the stake split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedPosition {
	pub id: PositionId,
	pub market_id: MarketId,
	pub back_bettor: AccountId,
	pub lay_bettor: AccountId,
	pub back_stake: Amount,
	pub lay_stake: Amount,
	/// Clearing price the pair matched at.
	pub backer_multiplier: BetMultiplier,
}

impl MatchedPosition {
	/// Total escrow released to the winning side.
	pub fn payout(&self) -> Amount {
		self.back_stake + self.lay_stake
	}
}

/// Staged transaction awaiting approval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
	pub id: ProposalId,
	pub proposed_transaction: Transaction,
}
