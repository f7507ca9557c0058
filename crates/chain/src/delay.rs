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

//! Delay controller
//!
//! Freshly placed bets on a `delay_bets` group are quarantined with an
//! `end_of_delay` deadline instead of entering the book. Two triggers
//! admit them: block time advancing past the deadline, and the group's
//! `delay_bets` flag switching off. A frozen group always retains its
//! delayed bets; the frozen state overrides both triggers.

use tracing::{debug, info};

use tote_sdk::ids::{BetId, GroupId};
use tote_sdk::types::Timestamp;

use crate::error::ChainError;
use crate::matching;
use crate::store::ObjectStore;

/// Admit every delayed bet whose deadline has passed as of `now`
///
/// Scans the front of the delay queue in `(end_of_delay, bet id)`
/// order. Bets whose group is frozen stay quarantined and are
/// reconsidered on the next advance. Returns the admitted bet ids.
pub fn flush_expired(store: &mut ObjectStore, now: Timestamp) -> Result<Vec<BetId>, ChainError> {
	let expired = store.delayed_bets_up_to(now);
	let mut admitted = Vec::new();

	for (_, bet_id) in expired {
		if group_of_bet_is_frozen(store, bet_id)? {
			debug!("bet {bet_id} stays delayed: its group is frozen");
			continue;
		}
		store.admit_delayed_bet(bet_id)?;
		matching::place_bet(store, bet_id)?;
		admitted.push(bet_id);
	}

	if !admitted.is_empty() {
		debug!("admitted {} delayed bets at block time {now}", admitted.len());
	}
	Ok(admitted)
}

/// Admit every delayed bet of `group_id` after its `delay_bets` flag
/// switched off
///
/// Only this group's bets are flushed; delayed bets of other groups are
/// untouched, and nothing happens while the group is frozen.
pub fn flush_group(store: &mut ObjectStore, group_id: GroupId) -> Result<Vec<BetId>, ChainError> {
	if store.group(group_id)?.frozen {
		return Ok(Vec::new());
	}

	let mut admitted = Vec::new();
	for (_, bet_id) in store.delayed_bets() {
		let market_id = store.bet(bet_id)?.market_id;
		if store.market(market_id)?.group_id != group_id {
			continue;
		}
		store.admit_delayed_bet(bet_id)?;
		matching::place_bet(store, bet_id)?;
		admitted.push(bet_id);
	}

	if !admitted.is_empty() {
		info!(
			"flushed {} delayed bets of group {group_id} into the book",
			admitted.len()
		);
	}
	Ok(admitted)
}

fn group_of_bet_is_frozen(store: &ObjectStore, bet_id: BetId) -> Result<bool, ChainError> {
	let market_id = store.bet(bet_id)?.market_id;
	let group_id = store.market(market_id)?.group_id;
	Ok(store.group(group_id)?.frozen)
}

#[cfg(test)]
mod tests {
	use super::*;
	use tote_sdk::ids::{AccountId, AssetId, MarketId};
	use tote_sdk::types::{AssetAmount, BackOrLay};

	struct Fixture {
		store: ObjectStore,
		group: GroupId,
		market: MarketId,
		asset: AssetId,
		bettor: AccountId,
	}

	fn fixture() -> Fixture {
		let mut store = ObjectStore::new();
		let rules = store.create_rules("rules".to_string(), String::new());
		let event = store.register_event();
		let asset = store.register_asset();
		let group = store.create_group(event, rules, asset, "group".to_string());
		let market = store.create_market(group, "market".to_string(), "win".to_string());
		let bettor = store.register_account();
		Fixture {
			store,
			group,
			market,
			asset,
			bettor,
		}
	}

	fn delayed_bet(fx: &mut Fixture, deadline: Timestamp) -> BetId {
		fx.store.create_bet(
			fx.bettor,
			fx.market,
			AssetAmount::new(fx.asset, 10),
			200,
			BackOrLay::Back,
			Some(deadline),
		)
	}

	#[test]
	fn test_flush_expired_admits_in_deadline_order() {
		let mut fx = fixture();
		let late = delayed_bet(&mut fx, 20);
		let early = delayed_bet(&mut fx, 10);

		let admitted = flush_expired(&mut fx.store, 15).unwrap();
		assert_eq!(admitted, vec![early]);
		assert_eq!(fx.store.book(fx.market).unwrap().bet_count(), 1);
		assert!(fx.store.bet(late).unwrap().is_delayed());

		let admitted = flush_expired(&mut fx.store, 20).unwrap();
		assert_eq!(admitted, vec![late]);
	}

	#[test]
	fn test_frozen_group_retains_expired_bets() {
		let mut fx = fixture();
		let bet = delayed_bet(&mut fx, 10);
		fx.store.group_mut(fx.group).unwrap().frozen = true;

		assert!(flush_expired(&mut fx.store, 50).unwrap().is_empty());
		assert!(fx.store.bet(bet).unwrap().is_delayed());

		// Unfreezing lets the next advance admit it.
		fx.store.group_mut(fx.group).unwrap().frozen = false;
		assert_eq!(flush_expired(&mut fx.store, 50).unwrap(), vec![bet]);
	}

	#[test]
	fn test_flush_group_only_touches_that_group() {
		let mut fx = fixture();
		let ours = delayed_bet(&mut fx, 100);

		let rules = fx.store.create_rules("other".to_string(), String::new());
		let event = fx.store.register_event();
		let other_group = fx
			.store
			.create_group(event, rules, fx.asset, "other".to_string());
		let other_market =
			fx.store
				.create_market(other_group, "other".to_string(), "win".to_string());
		let theirs = fx.store.create_bet(
			fx.bettor,
			other_market,
			AssetAmount::new(fx.asset, 10),
			200,
			BackOrLay::Back,
			Some(100),
		);

		let admitted = flush_group(&mut fx.store, fx.group).unwrap();
		assert_eq!(admitted, vec![ours]);
		assert!(fx.store.bet(theirs).unwrap().is_delayed());
	}

	#[test]
	fn test_flush_group_noop_when_frozen() {
		let mut fx = fixture();
		delayed_bet(&mut fx, 100);
		fx.store.group_mut(fx.group).unwrap().frozen = true;

		assert!(flush_group(&mut fx.store, fx.group).unwrap().is_empty());
	}
}
