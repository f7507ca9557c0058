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

//! Price-time matching of back and lay bets
//!
//! A back of stake `S_b` at multiplier `m` is covered by a lay of stake
//! `S_l = S_b * (m - 1)` (in decimal-odds terms), so that the pair's
//! escrow settles to the fixed payout `S_b * m = S_b + S_l`. A back at
//! `m_b` and a lay at `m_l` cross when `m_b <= m_l`, and the
//! earlier-placed bet dictates the clearing price.
//!
//! The engine applies deterministic price-time priority: on each placed
//! bet it repeatedly peels the best-priced opposing bet, crosses the
//! smaller of the two residual stakes into a matched-position record,
//! and deletes fully filled bets. Stake splits truncate toward zero;
//! single-unit residuals stay with the maker.

use tracing::debug;

use tote_sdk::ids::{BetId, PositionId};
use tote_sdk::types::{Amount, BackOrLay, BetMultiplier, ODDS_PRECISION};

use crate::error::ChainError;
use crate::objects::Bet;
use crate::store::ObjectStore;

/// Result of feeding one bet through the matching engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
	/// Matched-position records created, in match order.
	pub positions: Vec<PositionId>,
	/// Unmatched stake left on the book (zero if fully matched).
	pub remaining: Amount,
}

impl MatchOutcome {
	pub fn fully_matched(&self) -> bool {
		self.remaining == 0
	}
}

/// Lay stake required to cover `back` at `multiplier`, truncated.
fn lay_cover(back: Amount, multiplier: BetMultiplier) -> Amount {
	let liability = (multiplier - ODDS_PRECISION) as i128;
	(back as i128 * liability / ODDS_PRECISION as i128) as Amount
}

/// Largest back stake `lay` can cover at `multiplier`, truncated.
/// The caller guarantees `multiplier > ODDS_PRECISION`.
fn back_capacity(lay: Amount, multiplier: BetMultiplier) -> Amount {
	let liability = (multiplier - ODDS_PRECISION) as i128;
	(lay as i128 * ODDS_PRECISION as i128 / liability) as Amount
}

/// Stakes consumed when `taker` crosses `maker` at the maker's price
///
/// Returns `(matched back stake, matched lay stake)`, or `None` when
/// the maker's price is 1.00 (a zero-liability bet exchanges nothing
/// with a counterparty) or when truncation would leave either side of
/// the pair without stake at risk.
fn cross_amounts(taker: &Bet, maker: &Bet) -> Option<(Amount, Amount)> {
	let price = maker.backer_multiplier;
	if price <= ODDS_PRECISION {
		return None;
	}
	let (back_available, lay_available) = match taker.back_or_lay {
		BackOrLay::Back => (taker.amount_to_bet.amount, maker.amount_to_bet.amount),
		BackOrLay::Lay => (maker.amount_to_bet.amount, taker.amount_to_bet.amount),
	};

	let cover_needed = lay_cover(back_available, price);
	let (matched_back, matched_lay) = if cover_needed <= lay_available {
		(back_available, cover_needed)
	} else {
		let capacity = back_capacity(lay_available, price).min(back_available);
		(capacity, lay_cover(capacity, price))
	};

	// A cross must put stake at risk on both sides; a split that
	// truncates either side to zero would hand one bettor a free
	// position.
	(matched_back > 0 && matched_lay > 0).then_some((matched_back, matched_lay))
}

/// Feed an open bet through the book of its market
///
/// The bet must already exist in the store and must not be in the book
/// or the delay queue. Crossing consumes escrowed stake into matched
/// positions; whatever stake remains is inserted into the book. A fully
/// matched bet is deleted from the store.
pub fn place_bet(store: &mut ObjectStore, bet_id: BetId) -> Result<MatchOutcome, ChainError> {
	let mut positions = Vec::new();

	loop {
		let taker = store.bet(bet_id)?.clone();

		let maker_id = store
			.book(taker.market_id)
			.and_then(|book| book.best_counter_bet(taker.back_or_lay, taker.backer_multiplier));
		let Some(maker_id) = maker_id else {
			break;
		};
		let maker = store.bet(maker_id)?.clone();

		let Some((matched_back, matched_lay)) = cross_amounts(&taker, &maker) else {
			// No two-sided cross is possible at the maker's price;
			// whatever dust is involved rests where it lies.
			break;
		};

		let (back_bet, lay_bet, taker_matched, maker_matched) = match taker.back_or_lay {
			BackOrLay::Back => (&taker, &maker, matched_back, matched_lay),
			BackOrLay::Lay => (&maker, &taker, matched_lay, matched_back),
		};

		debug!(
			"crossed {} {} and {} {} at {}: back {} / lay {}",
			back_bet.back_or_lay,
			back_bet.id,
			lay_bet.back_or_lay,
			lay_bet.id,
			maker.backer_multiplier,
			matched_back,
			matched_lay,
		);

		positions.push(store.create_position(
			taker.market_id,
			back_bet.bettor_id,
			lay_bet.bettor_id,
			matched_back,
			matched_lay,
			maker.backer_multiplier,
		));

		if store.reduce_bet_stake(maker_id, maker_matched)? == 0 {
			store.remove_bet(maker_id)?;
		}
		if store.reduce_bet_stake(bet_id, taker_matched)? == 0 {
			store.remove_bet(bet_id)?;
			return Ok(MatchOutcome {
				positions,
				remaining: 0,
			});
		}
	}

	let remaining = store.bet(bet_id)?.amount_to_bet.amount;
	store.insert_into_book(bet_id)?;

	Ok(MatchOutcome {
		positions,
		remaining,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use tote_sdk::ids::{AccountId, AssetId, MarketId};
	use tote_sdk::types::AssetAmount;

	struct Fixture {
		store: ObjectStore,
		market: MarketId,
		asset: AssetId,
		backer: AccountId,
		layer: AccountId,
	}

	fn fixture() -> Fixture {
		let mut store = ObjectStore::new();
		let rules = store.create_rules("rules".to_string(), String::new());
		let event = store.register_event();
		let asset = store.register_asset();
		let group = store.create_group(event, rules, asset, "group".to_string());
		let market = store.create_market(group, "market".to_string(), "win".to_string());
		let backer = store.register_account();
		let layer = store.register_account();
		Fixture {
			store,
			market,
			asset,
			backer,
			layer,
		}
	}

	fn place(
		fx: &mut Fixture,
		bettor: AccountId,
		side: BackOrLay,
		amount: Amount,
		multiplier: BetMultiplier,
	) -> (BetId, MatchOutcome) {
		let bet_id = fx.store.create_bet(
			bettor,
			fx.market,
			AssetAmount::new(fx.asset, amount),
			multiplier,
			side,
			None,
		);
		let outcome = place_bet(&mut fx.store, bet_id).unwrap();
		(bet_id, outcome)
	}

	#[test]
	fn test_even_money_full_cross() {
		let mut fx = fixture();

		let backer_acc = fx.backer;
		let (back_id, outcome) = place(&mut fx, backer_acc, BackOrLay::Back, 10, 200);
		assert!(outcome.positions.is_empty());
		assert_eq!(outcome.remaining, 10);

		let layer_acc = fx.layer;
		let (lay_id, outcome) = place(&mut fx, layer_acc, BackOrLay::Lay, 10, 200);
		assert!(outcome.fully_matched());
		assert_eq!(outcome.positions.len(), 1);

		// Both bets fully consumed and deleted.
		assert!(!fx.store.bet_exists(back_id));
		assert!(!fx.store.bet_exists(lay_id));

		let position = fx.store.position(outcome.positions[0]).unwrap();
		assert_eq!(position.back_stake, 10);
		assert_eq!(position.lay_stake, 10);
		assert_eq!(position.backer_multiplier, 200);
		assert_eq!(position.payout(), 20);
	}

	#[test]
	fn test_no_cross_when_back_exceeds_lay() {
		let mut fx = fixture();

		let backer_acc = fx.backer;
		place(&mut fx, backer_acc, BackOrLay::Back, 10, 300);
		let layer_acc = fx.layer;
		let (_, outcome) = place(&mut fx, layer_acc, BackOrLay::Lay, 10, 200);

		assert!(outcome.positions.is_empty());
		assert_eq!(outcome.remaining, 10);
		assert_eq!(fx.store.book(fx.market).unwrap().bet_count(), 2);
	}

	#[test]
	fn test_maker_price_dictates_clearing() {
		let mut fx = fixture();

		// Maker lay offers 3.00; taker back asks only 2.00 and gets the
		// maker's better odds.
		let layer_acc = fx.layer;
		place(&mut fx, layer_acc, BackOrLay::Lay, 20, 300);
		let backer_acc = fx.backer;
		let (_, outcome) = place(&mut fx, backer_acc, BackOrLay::Back, 10, 200);

		assert!(outcome.fully_matched());
		let position = fx.store.position(outcome.positions[0]).unwrap();
		assert_eq!(position.backer_multiplier, 300);
		assert_eq!(position.back_stake, 10);
		assert_eq!(position.lay_stake, 20);
	}

	#[test]
	fn test_partial_fill_leaves_maker_residual() {
		let mut fx = fixture();

		let backer_acc = fx.backer;
		let (back_id, _) = place(&mut fx, backer_acc, BackOrLay::Back, 10, 300);
		// Covering a back of 10 at 3.00 takes a lay of 20; offer 30.
		let layer_acc = fx.layer;
		let (lay_id, outcome) = place(&mut fx, layer_acc, BackOrLay::Lay, 30, 300);

		assert_eq!(outcome.positions.len(), 1);
		assert_eq!(outcome.remaining, 10);
		assert!(!fx.store.bet_exists(back_id));
		assert_eq!(fx.store.bet(lay_id).unwrap().amount_to_bet.amount, 10);
	}

	#[test]
	fn test_time_priority_consumes_earlier_maker_first() {
		let mut fx = fixture();

		let backer_acc = fx.backer;
		let (first, _) = place(&mut fx, backer_acc, BackOrLay::Back, 10, 200);
		let backer_acc = fx.backer;
		let (second, _) = place(&mut fx, backer_acc, BackOrLay::Back, 10, 200);

		let layer_acc = fx.layer;
		let (_, outcome) = place(&mut fx, layer_acc, BackOrLay::Lay, 10, 200);
		assert!(outcome.fully_matched());
		assert!(!fx.store.bet_exists(first));
		assert!(fx.store.bet_exists(second));
	}

	#[test]
	fn test_truncated_split_keeps_dust_with_maker() {
		let mut fx = fixture();

		// Maker back of 10 at 2.50 needs a lay of 15 to fill; a lay of 8
		// covers back 5 (8 * 100 / 150 truncates), consuming lay 7.
		let backer_acc = fx.backer;
		let (back_id, _) = place(&mut fx, backer_acc, BackOrLay::Back, 10, 250);
		let layer_acc = fx.layer;
		let (lay_id, outcome) = place(&mut fx, layer_acc, BackOrLay::Lay, 8, 250);

		let position = fx.store.position(outcome.positions[0]).unwrap();
		assert_eq!(position.back_stake, 5);
		assert_eq!(position.lay_stake, 7);

		assert_eq!(fx.store.bet(back_id).unwrap().amount_to_bet.amount, 5);
		// The taker's unit of dust rests on the book as a maker.
		assert_eq!(outcome.remaining, 1);
		assert_eq!(fx.store.bet(lay_id).unwrap().amount_to_bet.amount, 1);
	}

	#[test]
	fn test_odds_of_one_never_cross() {
		let mut fx = fixture();

		// A maker at decimal odds 1.00 has no lay liability to
		// exchange, so nothing crosses against it in either direction.
		let backer_acc = fx.backer;
		place(&mut fx, backer_acc, BackOrLay::Back, 10, 100);
		let layer_acc = fx.layer;
		let (_, outcome) = place(&mut fx, layer_acc, BackOrLay::Lay, 10, 100);
		assert!(outcome.positions.is_empty());
		assert_eq!(outcome.remaining, 10);
		assert_eq!(fx.store.book(fx.market).unwrap().bet_count(), 2);

		let layer_acc = fx.layer;
		let (_, outcome) = place(&mut fx, layer_acc, BackOrLay::Lay, 10, 150);
		assert!(outcome.positions.is_empty());
		assert_eq!(fx.store.book(fx.market).unwrap().bet_count(), 3);
	}

	#[test]
	fn test_dust_never_creates_one_sided_position() {
		let mut fx = fixture();

		// Covering a back of 1 at 1.50 takes a lay of 0.5, which
		// truncates to nothing; the bets rest instead of pairing a
		// stake against an empty side.
		let layer_acc = fx.layer;
		place(&mut fx, layer_acc, BackOrLay::Lay, 10, 150);
		let backer_acc = fx.backer;
		let (back_id, outcome) = place(&mut fx, backer_acc, BackOrLay::Back, 1, 150);

		assert!(outcome.positions.is_empty());
		assert_eq!(outcome.remaining, 1);
		assert!(fx.store.bet_exists(back_id));
		for position in fx.store.positions() {
			assert!(position.back_stake > 0 && position.lay_stake > 0);
		}
	}

	#[test]
	fn test_stake_conservation_across_crosses() {
		let mut fx = fixture();

		let escrowed = 10 + 30;
		let backer_acc = fx.backer;
		let (_, _) = place(&mut fx, backer_acc, BackOrLay::Back, 10, 300);
		let layer_acc = fx.layer;
		let (lay_id, outcome) = place(&mut fx, layer_acc, BackOrLay::Lay, 30, 300);

		let matched: Amount = outcome
			.positions
			.iter()
			.map(|&id| fx.store.position(id).unwrap().payout())
			.sum();
		let residual = fx.store.bet(lay_id).unwrap().amount_to_bet.amount;
		assert_eq!(matched + residual, escrowed);
	}
}
