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

//! Settlement: bet cancellation and group resolution
//!
//! Resolution validates that the submitted `(market, label)` pairs
//! cover the group's markets exactly and that every label is legal,
//! then settles each market's matched positions, refunds every
//! unmatched bet, and retires the group.

use std::collections::BTreeSet;

use tracing::{debug, info};

use tote_sdk::ids::{BetId, GroupId, MarketId};
use tote_sdk::types::{AssetAmount, Resolution};

use crate::balance::BalanceLedger;
use crate::error::ChainError;
use crate::store::ObjectStore;

/// Refund a bet's remaining stake and delete the record
///
/// Works for booked and delayed bets alike; matched stake already moved
/// into position records and is not touched.
pub fn cancel_bet(
	store: &mut ObjectStore,
	ledger: &mut BalanceLedger,
	bet_id: BetId,
) -> Result<(), ChainError> {
	let bet = store.remove_bet(bet_id)?;
	ledger.adjust(bet.bettor_id, bet.amount_to_bet);
	debug!(
		"cancelled bet {bet_id}, refunded {} to {}",
		bet.amount_to_bet.amount, bet.bettor_id
	);
	Ok(())
}

/// Refund every currently-unmatched bet of a group, leaving matched
/// positions intact. Returns the number of bets cancelled.
pub fn cancel_unmatched_bets(
	store: &mut ObjectStore,
	ledger: &mut BalanceLedger,
	group_id: GroupId,
) -> Result<usize, ChainError> {
	let mut cancelled = 0;
	for market_id in store.markets_of_group(group_id) {
		for bet_id in store.bets_of_market(market_id) {
			cancel_bet(store, ledger, bet_id)?;
			cancelled += 1;
		}
	}
	if cancelled > 0 {
		info!("cancelled {cancelled} unmatched bets on group {group_id}");
	}
	Ok(cancelled)
}

/// Check a resolution list against a group's markets
///
/// Every market of the group must appear exactly once, no foreign
/// market may appear, and every label must parse into the legal
/// resolution vocabulary. Returns the typed pairs for the apply phase.
pub fn validate_resolutions(
	store: &ObjectStore,
	group_id: GroupId,
	resolutions: &[(MarketId, String)],
) -> Result<Vec<(MarketId, Resolution)>, ChainError> {
	store.group(group_id)?;

	let mut unresolved: BTreeSet<MarketId> =
		store.markets_of_group(group_id).into_iter().collect();
	let mut resolved = Vec::with_capacity(resolutions.len());

	for (market_id, label) in resolutions {
		if !unresolved.remove(market_id) {
			let reason = if store.market(*market_id).is_ok() {
				format!("market {market_id} is not an unresolved member of group {group_id}")
			} else {
				format!("market {market_id} does not exist")
			};
			return Err(ChainError::ResolutionCoverageMismatch(reason));
		}
		let resolution: Resolution = label.parse()?;
		resolved.push((*market_id, resolution));
	}

	if !unresolved.is_empty() {
		return Err(ChainError::ResolutionCoverageMismatch(format!(
			"{} markets of group {group_id} are left unresolved",
			unresolved.len()
		)));
	}

	Ok(resolved)
}

/// Settle a group's markets and retire it
///
/// For each market, matched positions pay out per the resolution label:
/// `win` releases the pair's escrow to the back bettor, `not_win` to
/// the lay bettor, `cancel` refunds each side its own stake. Unmatched
/// bets are refunded, then the markets and the group are removed.
pub fn resolve_group(
	store: &mut ObjectStore,
	ledger: &mut BalanceLedger,
	group_id: GroupId,
	resolutions: &[(MarketId, Resolution)],
) -> Result<(), ChainError> {
	let asset_id = store.group(group_id)?.asset_id;

	for &(market_id, resolution) in resolutions {
		for position_id in store.positions_of_market(market_id) {
			let position = store.remove_position(position_id)?;
			match resolution {
				Resolution::Win => {
					ledger.adjust(
						position.back_bettor,
						AssetAmount::new(asset_id, position.payout()),
					);
				}
				Resolution::NotWin => {
					ledger.adjust(
						position.lay_bettor,
						AssetAmount::new(asset_id, position.payout()),
					);
				}
				Resolution::Cancel => {
					ledger.adjust(
						position.back_bettor,
						AssetAmount::new(asset_id, position.back_stake),
					);
					ledger.adjust(
						position.lay_bettor,
						AssetAmount::new(asset_id, position.lay_stake),
					);
				}
			}
		}
		debug!("market {market_id} resolved as {resolution}");
	}

	cancel_unmatched_bets(store, ledger, group_id)?;

	for &(market_id, _) in resolutions {
		store.remove_market(market_id);
	}
	store.remove_group(group_id);

	info!("group {group_id} resolved and retired");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use tote_sdk::ids::{AccountId, AssetId};
	use tote_sdk::types::{Amount, BackOrLay};

	use crate::matching;

	struct Fixture {
		store: ObjectStore,
		ledger: BalanceLedger,
		group: GroupId,
		market: MarketId,
		asset: AssetId,
		backer: AccountId,
		layer: AccountId,
	}

	fn fixture() -> Fixture {
		let mut store = ObjectStore::new();
		let mut ledger = BalanceLedger::new();
		let rules = store.create_rules("rules".to_string(), String::new());
		let event = store.register_event();
		let asset = store.register_asset();
		let group = store.create_group(event, rules, asset, "group".to_string());
		let market = store.create_market(group, "market".to_string(), "win".to_string());
		let backer = store.register_account();
		let layer = store.register_account();
		ledger.adjust(backer, AssetAmount::new(asset, 100));
		ledger.adjust(layer, AssetAmount::new(asset, 100));
		Fixture {
			store,
			ledger,
			group,
			market,
			asset,
			backer,
			layer,
		}
	}

	/// Escrow-debit and match, the way the bet-place evaluator does.
	fn place(fx: &mut Fixture, bettor: AccountId, side: BackOrLay, amount: Amount) -> BetId {
		let bet_id = fx.store.create_bet(
			bettor,
			fx.market,
			AssetAmount::new(fx.asset, amount),
			200,
			side,
			None,
		);
		fx.ledger.adjust(bettor, AssetAmount::new(fx.asset, -amount));
		matching::place_bet(&mut fx.store, bet_id).unwrap();
		bet_id
	}

	#[test]
	fn test_cancel_refunds_remaining_stake() {
		let mut fx = fixture();
		let backer_acc = fx.backer;
		let bet = place(&mut fx, backer_acc, BackOrLay::Back, 10);
		assert_eq!(fx.ledger.balance(fx.backer, fx.asset), 90);

		cancel_bet(&mut fx.store, &mut fx.ledger, bet).unwrap();
		assert_eq!(fx.ledger.balance(fx.backer, fx.asset), 100);
		assert!(!fx.store.bet_exists(bet));
	}

	#[test]
	fn test_validate_resolutions_coverage() {
		let fx = fixture();

		// Complete coverage passes.
		let resolved = validate_resolutions(
			&fx.store,
			fx.group,
			&[(fx.market, "win".to_string())],
		)
		.unwrap();
		assert_eq!(resolved, vec![(fx.market, Resolution::Win)]);

		// Missing market.
		assert!(matches!(
			validate_resolutions(&fx.store, fx.group, &[]),
			Err(ChainError::ResolutionCoverageMismatch(_))
		));

		// Duplicated market.
		assert!(matches!(
			validate_resolutions(
				&fx.store,
				fx.group,
				&[
					(fx.market, "win".to_string()),
					(fx.market, "win".to_string())
				],
			),
			Err(ChainError::ResolutionCoverageMismatch(_))
		));

		// Unknown label.
		assert!(matches!(
			validate_resolutions(
				&fx.store,
				fx.group,
				&[(fx.market, "draw".to_string())],
			),
			Err(ChainError::ResolutionLabelIllegal(_))
		));
	}

	#[test]
	fn test_win_pays_the_back_side() {
		let mut fx = fixture();
		let backer_acc = fx.backer;
		place(&mut fx, backer_acc, BackOrLay::Back, 10);
		let layer_acc = fx.layer;
		place(&mut fx, layer_acc, BackOrLay::Lay, 10);

		resolve_group(
			&mut fx.store,
			&mut fx.ledger,
			fx.group,
			&[(fx.market, Resolution::Win)],
		)
		.unwrap();

		assert_eq!(fx.ledger.balance(fx.backer, fx.asset), 110);
		assert_eq!(fx.ledger.balance(fx.layer, fx.asset), 90);
		assert!(fx.store.group(fx.group).is_err());
	}

	#[test]
	fn test_not_win_pays_the_lay_side() {
		let mut fx = fixture();
		let backer_acc = fx.backer;
		place(&mut fx, backer_acc, BackOrLay::Back, 10);
		let layer_acc = fx.layer;
		place(&mut fx, layer_acc, BackOrLay::Lay, 10);

		resolve_group(
			&mut fx.store,
			&mut fx.ledger,
			fx.group,
			&[(fx.market, Resolution::NotWin)],
		)
		.unwrap();

		assert_eq!(fx.ledger.balance(fx.backer, fx.asset), 90);
		assert_eq!(fx.ledger.balance(fx.layer, fx.asset), 110);
	}

	#[test]
	fn test_cancel_refunds_both_sides_and_unmatched() {
		let mut fx = fixture();
		let backer_acc = fx.backer;
		place(&mut fx, backer_acc, BackOrLay::Back, 10);
		let layer_acc = fx.layer;
		place(&mut fx, layer_acc, BackOrLay::Lay, 10);
		// Unmatched leftover back.
		let backer_acc = fx.backer;
		place(&mut fx, backer_acc, BackOrLay::Back, 7);

		resolve_group(
			&mut fx.store,
			&mut fx.ledger,
			fx.group,
			&[(fx.market, Resolution::Cancel)],
		)
		.unwrap();

		assert_eq!(fx.ledger.balance(fx.backer, fx.asset), 100);
		assert_eq!(fx.ledger.balance(fx.layer, fx.asset), 100);
	}

	#[test]
	fn test_cancel_unmatched_leaves_positions() {
		let mut fx = fixture();
		let backer_acc = fx.backer;
		place(&mut fx, backer_acc, BackOrLay::Back, 10);
		let layer_acc = fx.layer;
		place(&mut fx, layer_acc, BackOrLay::Lay, 10);
		let backer_acc = fx.backer;
		place(&mut fx, backer_acc, BackOrLay::Back, 7);

		let cancelled =
			cancel_unmatched_bets(&mut fx.store, &mut fx.ledger, fx.group).unwrap();
		assert_eq!(cancelled, 1);
		assert_eq!(fx.ledger.balance(fx.backer, fx.asset), 90 - 7 + 7);
		assert_eq!(fx.store.positions_of_market(fx.market).len(), 1);
	}
}
