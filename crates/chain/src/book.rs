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

use std::cmp::Reverse;
use std::collections::BTreeMap;

use tote_sdk::ids::BetId;
use tote_sdk::types::{BackOrLay, BetMultiplier};

use crate::objects::Bet;

/// Per-market view of the open bets (single-threaded)
///
/// This is a deterministic order book over back and lay bets, using
/// BTreeMap for price-sorted entries. All operations are designed to be
/// called from the serial evaluation loop.
///
/// Design characteristics:
/// - No concurrent access (no locks, no Arc)
/// - Deterministic iteration order
/// - Price-time priority enforced via `(price, placement serial)` keys
/// - Back side: lowest multiplier first (the best counter-bet for an
///   incoming lay, which prefers low liability)
/// - Lay side: highest multiplier first via Reverse wrapper (the best
///   counter-bet for an incoming back, which prefers high odds)
///
/// Delayed bets are never in the book; they live in the chain-wide
/// delay queue until admitted.
#[derive(Debug, Clone, Default)]
pub struct MarketBook {
	backs: BTreeMap<(BetMultiplier, u64), BetId>,
	lays: BTreeMap<(Reverse<BetMultiplier>, u64), BetId>,
}

impl MarketBook {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add an open bet to its side of the book.
	pub fn insert(&mut self, bet: &Bet) {
		match bet.back_or_lay {
			BackOrLay::Back => {
				self.backs.insert((bet.backer_multiplier, bet.id.0), bet.id);
			}
			BackOrLay::Lay => {
				self.lays
					.insert((Reverse(bet.backer_multiplier), bet.id.0), bet.id);
			}
		}
	}

	/// Remove a bet from the book; returns false if it was not present.
	pub fn remove(&mut self, bet: &Bet) -> bool {
		match bet.back_or_lay {
			BackOrLay::Back => self.backs.remove(&(bet.backer_multiplier, bet.id.0)).is_some(),
			BackOrLay::Lay => self
				.lays
				.remove(&(Reverse(bet.backer_multiplier), bet.id.0))
				.is_some(),
		}
	}

	/// Best-priced opposing bet a taker at `multiplier` crosses with
	///
	/// A back at `m_b` crosses the lay with the highest multiplier
	/// `m_l` provided `m_b <= m_l`; a lay at `m_l` crosses the back
	/// with the lowest multiplier `m_b` provided `m_b <= m_l`. Equal
	/// price ties break by placement serial, earliest first.
	pub fn best_counter_bet(
		&self,
		taker_side: BackOrLay,
		multiplier: BetMultiplier,
	) -> Option<BetId> {
		match taker_side {
			BackOrLay::Back => {
				let (&(Reverse(best), _), &bet_id) = self.lays.first_key_value()?;
				(multiplier <= best).then_some(bet_id)
			}
			BackOrLay::Lay => {
				let (&(best, _), &bet_id) = self.backs.first_key_value()?;
				(best <= multiplier).then_some(bet_id)
			}
		}
	}

	/// Best (highest-multiplier) lay currently offered.
	pub fn best_lay(&self) -> Option<BetMultiplier> {
		self.lays.first_key_value().map(|(&(Reverse(m), _), _)| m)
	}

	/// Best (lowest-multiplier) back currently asked.
	pub fn best_back(&self) -> Option<BetMultiplier> {
		self.backs.first_key_value().map(|(&(m, _), _)| m)
	}

	pub fn bet_count(&self) -> usize {
		self.backs.len() + self.lays.len()
	}

	pub fn is_empty(&self) -> bool {
		self.backs.is_empty() && self.lays.is_empty()
	}
}
