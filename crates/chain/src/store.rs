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

//! Typed object store with secondary indices
//!
//! All persistent entities live here, keyed by their typed ids, with
//! serials allocated from per-type counters. The store also maintains
//! the secondary views the engine iterates: markets by group, bets by
//! market and by bettor, matched positions by market, the per-market
//! order books, and the chain-wide delay queue ordered by
//! `(end_of_delay, bet id)`.
//!
//! Every collection is a BTreeMap/BTreeSet so iteration order is
//! deterministic across nodes.

use std::collections::{BTreeMap, BTreeSet};

use tote_sdk::ids::{
	AccountId, AssetId, BetId, EventId, GroupId, MarketId, ObjectType, PositionId, ProposalId,
	RulesId,
};
use tote_sdk::operations::Transaction;
use tote_sdk::types::{Amount, AssetAmount, BackOrLay, BetMultiplier, Timestamp};

use crate::book::MarketBook;
use crate::error::ChainError;
use crate::objects::{
	Bet, BettingMarket, BettingMarketGroup, BettingMarketRules, MatchedPosition, Proposal,
};

/// In-memory object store
///
/// Cloning the store yields a consistent snapshot; the database façade
/// uses that for transaction-level rollback.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
	accounts: BTreeSet<AccountId>,
	assets: BTreeSet<AssetId>,
	events: BTreeSet<EventId>,
	rules: BTreeMap<RulesId, BettingMarketRules>,
	groups: BTreeMap<GroupId, BettingMarketGroup>,
	markets: BTreeMap<MarketId, BettingMarket>,
	bets: BTreeMap<BetId, Bet>,
	positions: BTreeMap<PositionId, MatchedPosition>,
	proposals: BTreeMap<ProposalId, Proposal>,

	markets_by_group: BTreeMap<GroupId, BTreeSet<MarketId>>,
	bets_by_market: BTreeMap<MarketId, BTreeSet<BetId>>,
	bets_by_bettor: BTreeMap<AccountId, BTreeSet<BetId>>,
	positions_by_market: BTreeMap<MarketId, BTreeSet<PositionId>>,
	books: BTreeMap<MarketId, MarketBook>,
	/// Quarantined bets ordered by delay deadline, then id.
	delayed_bets: BTreeSet<(Timestamp, BetId)>,

	next_serial: BTreeMap<u8, u64>,
}

impl ObjectStore {
	pub fn new() -> Self {
		Self::default()
	}

	fn allocate(&mut self, object_type: ObjectType) -> u64 {
		let counter = self.next_serial.entry(object_type as u8).or_insert(0);
		let serial = *counter;
		*counter += 1;
		serial
	}

	// ---- external-entity registries ------------------------------------

	pub fn register_account(&mut self) -> AccountId {
		let id = AccountId(self.allocate(ObjectType::Account));
		self.accounts.insert(id);
		id
	}

	pub fn register_asset(&mut self) -> AssetId {
		let id = AssetId(self.allocate(ObjectType::Asset));
		self.assets.insert(id);
		id
	}

	pub fn register_event(&mut self) -> EventId {
		let id = EventId(self.allocate(ObjectType::Event));
		self.events.insert(id);
		id
	}

	pub fn account_exists(&self, id: AccountId) -> bool {
		self.accounts.contains(&id)
	}

	pub fn asset_exists(&self, id: AssetId) -> bool {
		self.assets.contains(&id)
	}

	pub fn event_exists(&self, id: EventId) -> bool {
		self.events.contains(&id)
	}

	// ---- rules ---------------------------------------------------------

	pub fn create_rules(&mut self, name: String, description: String) -> RulesId {
		let id = RulesId(self.allocate(ObjectType::BettingMarketRules));
		self.rules.insert(
			id,
			BettingMarketRules {
				id,
				name,
				description,
			},
		);
		id
	}

	pub fn rules(&self, id: RulesId) -> Result<&BettingMarketRules, ChainError> {
		self.rules
			.get(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))
	}

	pub fn rules_mut(&mut self, id: RulesId) -> Result<&mut BettingMarketRules, ChainError> {
		self.rules
			.get_mut(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))
	}

	// ---- groups --------------------------------------------------------

	pub fn create_group(
		&mut self,
		event_id: EventId,
		rules_id: RulesId,
		asset_id: AssetId,
		description: String,
	) -> GroupId {
		let id = GroupId(self.allocate(ObjectType::BettingMarketGroup));
		self.groups.insert(
			id,
			BettingMarketGroup {
				id,
				event_id,
				rules_id,
				asset_id,
				description,
				frozen: false,
				delay_bets: false,
			},
		);
		id
	}

	pub fn group(&self, id: GroupId) -> Result<&BettingMarketGroup, ChainError> {
		self.groups
			.get(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))
	}

	pub fn group_mut(&mut self, id: GroupId) -> Result<&mut BettingMarketGroup, ChainError> {
		self.groups
			.get_mut(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))
	}

	/// Retire a group record. Its markets, bets and positions must have
	/// been removed already.
	pub fn remove_group(&mut self, id: GroupId) {
		self.groups.remove(&id);
		self.markets_by_group.remove(&id);
	}

	// ---- markets -------------------------------------------------------

	pub fn create_market(
		&mut self,
		group_id: GroupId,
		description: String,
		payout_condition: String,
	) -> MarketId {
		let id = MarketId(self.allocate(ObjectType::BettingMarket));
		self.markets.insert(
			id,
			BettingMarket {
				id,
				group_id,
				description,
				payout_condition,
			},
		);
		self.markets_by_group.entry(group_id).or_default().insert(id);
		id
	}

	pub fn market(&self, id: MarketId) -> Result<&BettingMarket, ChainError> {
		self.markets
			.get(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))
	}

	pub fn market_mut(&mut self, id: MarketId) -> Result<&mut BettingMarket, ChainError> {
		self.markets
			.get_mut(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))
	}

	/// Re-home a market under a different group, keeping the by-group
	/// index consistent.
	pub fn move_market_to_group(
		&mut self,
		id: MarketId,
		new_group: GroupId,
	) -> Result<(), ChainError> {
		let old_group = self.market(id)?.group_id;
		if old_group == new_group {
			return Ok(());
		}
		if let Some(set) = self.markets_by_group.get_mut(&old_group) {
			set.remove(&id);
		}
		self.markets_by_group
			.entry(new_group)
			.or_default()
			.insert(id);
		self.market_mut(id)?.group_id = new_group;
		Ok(())
	}

	pub fn markets_of_group(&self, group_id: GroupId) -> Vec<MarketId> {
		self.markets_by_group
			.get(&group_id)
			.map(|set| set.iter().copied().collect())
			.unwrap_or_default()
	}

	/// Retire a market record. Its bets and positions must have been
	/// removed already.
	pub fn remove_market(&mut self, id: MarketId) {
		if let Some(market) = self.markets.remove(&id)
			&& let Some(set) = self.markets_by_group.get_mut(&market.group_id)
		{
			set.remove(&id);
		}
		self.bets_by_market.remove(&id);
		self.books.remove(&id);
	}

	// ---- bets ----------------------------------------------------------

	/// Create a bet record and index it
	///
	/// A bet with a delay deadline goes into the delay queue; an
	/// immediate bet stays out of the book until the matching engine
	/// inserts its unmatched residual.
	pub fn create_bet(
		&mut self,
		bettor_id: AccountId,
		market_id: MarketId,
		amount_to_bet: AssetAmount,
		backer_multiplier: BetMultiplier,
		back_or_lay: BackOrLay,
		end_of_delay: Option<Timestamp>,
	) -> BetId {
		let id = BetId(self.allocate(ObjectType::Bet));
		self.bets.insert(
			id,
			Bet {
				id,
				bettor_id,
				market_id,
				amount_to_bet,
				backer_multiplier,
				back_or_lay,
				end_of_delay,
			},
		);
		self.bets_by_market.entry(market_id).or_default().insert(id);
		self.bets_by_bettor.entry(bettor_id).or_default().insert(id);
		if let Some(deadline) = end_of_delay {
			self.delayed_bets.insert((deadline, id));
		}
		id
	}

	pub fn bet(&self, id: BetId) -> Result<&Bet, ChainError> {
		self.bets
			.get(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))
	}

	pub fn bet_exists(&self, id: BetId) -> bool {
		self.bets.contains_key(&id)
	}

	/// Put an open bet's residual into its market's book.
	pub fn insert_into_book(&mut self, id: BetId) -> Result<(), ChainError> {
		let bet = self
			.bets
			.get(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))?;
		self.books
			.entry(bet.market_id)
			.or_default()
			.insert(bet);
		Ok(())
	}

	/// Shrink a bet's unmatched stake after a cross; returns the
	/// remaining stake. The book key does not depend on the stake, so no
	/// re-index is needed.
	pub fn reduce_bet_stake(&mut self, id: BetId, matched: Amount) -> Result<Amount, ChainError> {
		let bet = self
			.bets
			.get_mut(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))?;
		bet.amount_to_bet.amount -= matched;
		debug_assert!(bet.amount_to_bet.amount >= 0, "bet {id} over-matched");
		Ok(bet.amount_to_bet.amount)
	}

	/// Clear a bet's delay marker, removing it from the delay queue. The
	/// caller feeds the bet to the matching engine afterwards.
	pub fn admit_delayed_bet(&mut self, id: BetId) -> Result<(), ChainError> {
		let bet = self
			.bets
			.get_mut(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))?;
		if let Some(deadline) = bet.end_of_delay.take() {
			self.delayed_bets.remove(&(deadline, id));
		}
		Ok(())
	}

	/// Delete a bet and every index entry pointing at it.
	pub fn remove_bet(&mut self, id: BetId) -> Result<Bet, ChainError> {
		let bet = self
			.bets
			.remove(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))?;
		if let Some(set) = self.bets_by_market.get_mut(&bet.market_id) {
			set.remove(&id);
		}
		if let Some(set) = self.bets_by_bettor.get_mut(&bet.bettor_id) {
			set.remove(&id);
		}
		if let Some(deadline) = bet.end_of_delay {
			self.delayed_bets.remove(&(deadline, id));
		} else if let Some(book) = self.books.get_mut(&bet.market_id) {
			book.remove(&bet);
		}
		Ok(bet)
	}

	/// Every open bet, in id order.
	pub fn bets(&self) -> impl Iterator<Item = &Bet> {
		self.bets.values()
	}

	pub fn bets_of_market(&self, market_id: MarketId) -> Vec<BetId> {
		self.bets_by_market
			.get(&market_id)
			.map(|set| set.iter().copied().collect())
			.unwrap_or_default()
	}

	pub fn bets_of_bettor(&self, bettor_id: AccountId) -> Vec<BetId> {
		self.bets_by_bettor
			.get(&bettor_id)
			.map(|set| set.iter().copied().collect())
			.unwrap_or_default()
	}

	pub fn book(&self, market_id: MarketId) -> Option<&MarketBook> {
		self.books.get(&market_id)
	}

	/// Delayed bets with a deadline at or before `deadline`, in
	/// `(end_of_delay, id)` order.
	pub fn delayed_bets_up_to(&self, deadline: Timestamp) -> Vec<(Timestamp, BetId)> {
		self.delayed_bets
			.range(..=(deadline, BetId(u64::MAX)))
			.copied()
			.collect()
	}

	/// Every delayed bet, in `(end_of_delay, id)` order.
	pub fn delayed_bets(&self) -> Vec<(Timestamp, BetId)> {
		self.delayed_bets.iter().copied().collect()
	}

	// ---- matched positions ---------------------------------------------

	#[allow(clippy::too_many_arguments)]
	pub fn create_position(
		&mut self,
		market_id: MarketId,
		back_bettor: AccountId,
		lay_bettor: AccountId,
		back_stake: Amount,
		lay_stake: Amount,
		backer_multiplier: BetMultiplier,
	) -> PositionId {
		let id = PositionId(self.allocate(ObjectType::MatchedPosition));
		self.positions.insert(
			id,
			MatchedPosition {
				id,
				market_id,
				back_bettor,
				lay_bettor,
				back_stake,
				lay_stake,
				backer_multiplier,
			},
		);
		self.positions_by_market
			.entry(market_id)
			.or_default()
			.insert(id);
		id
	}

	pub fn position(&self, id: PositionId) -> Result<&MatchedPosition, ChainError> {
		self.positions
			.get(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))
	}

	pub fn remove_position(&mut self, id: PositionId) -> Result<MatchedPosition, ChainError> {
		let position = self
			.positions
			.remove(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))?;
		if let Some(set) = self.positions_by_market.get_mut(&position.market_id) {
			set.remove(&id);
		}
		Ok(position)
	}

	/// Every matched position, in id order.
	pub fn positions(&self) -> impl Iterator<Item = &MatchedPosition> {
		self.positions.values()
	}

	pub fn positions_of_market(&self, market_id: MarketId) -> Vec<PositionId> {
		self.positions_by_market
			.get(&market_id)
			.map(|set| set.iter().copied().collect())
			.unwrap_or_default()
	}

	// ---- proposals -----------------------------------------------------

	pub fn create_proposal(&mut self, proposed_transaction: Transaction) -> ProposalId {
		let id = ProposalId(self.allocate(ObjectType::Proposal));
		self.proposals.insert(
			id,
			Proposal {
				id,
				proposed_transaction,
			},
		);
		id
	}

	pub fn proposal(&self, id: ProposalId) -> Result<&Proposal, ChainError> {
		self.proposals
			.get(&id)
			.ok_or(ChainError::ReferenceNotFound(id.into()))
	}

	pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
		self.proposals.values()
	}
}
