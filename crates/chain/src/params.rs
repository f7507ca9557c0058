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

use serde::{Deserialize, Serialize};

use tote_sdk::types::BetMultiplier;

use crate::error::ChainError;

/// One entry of the permitted-odds schedule: bets with a multiplier
/// below `threshold` must land on a multiple of `increment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsIncrement {
	pub threshold: BetMultiplier,
	pub increment: BetMultiplier,
}

/// Governance-controlled chain parameters
///
/// Read-only from the evaluators' point of view; a node operator can
/// override the defaults through a config file or `TOTE_`-prefixed
/// environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainParameters {
	/// Lowest permitted backer multiplier (inclusive).
	pub min_bet_multiplier: BetMultiplier,
	/// Highest permitted backer multiplier (inclusive).
	pub max_bet_multiplier: BetMultiplier,
	/// Ordered threshold -> increment schedule; finer tick grid at
	/// shorter odds, coarser at longer odds. Empty disables the check.
	pub permitted_betting_odds_increments: Vec<OddsIncrement>,
	/// Seconds a freshly placed bet is quarantined on delayed groups.
	pub live_betting_delay_time: u64,
}

impl Default for ChainParameters {
	fn default() -> Self {
		Self {
			// 1.01 through 1000.00 decimal odds
			min_bet_multiplier: 101,
			max_bet_multiplier: 100_000,
			permitted_betting_odds_increments: vec![
				OddsIncrement { threshold: 200, increment: 1 },
				OddsIncrement { threshold: 300, increment: 2 },
				OddsIncrement { threshold: 400, increment: 5 },
				OddsIncrement { threshold: 600, increment: 10 },
				OddsIncrement { threshold: 1_000, increment: 20 },
				OddsIncrement { threshold: 2_000, increment: 50 },
				OddsIncrement { threshold: 3_000, increment: 100 },
				OddsIncrement { threshold: 5_000, increment: 200 },
				OddsIncrement { threshold: 10_000, increment: 500 },
				OddsIncrement { threshold: 100_000, increment: 1_000 },
			],
			live_betting_delay_time: 0,
		}
	}
}

impl ChainParameters {
	/// Load parameters from environment variables
	pub fn from_env() -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::Environment::with_prefix("TOTE"))
			.build()?;

		cfg.try_deserialize().map(Self::normalized)
	}

	/// Load parameters from file, with environment overrides
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(config::Environment::with_prefix("TOTE"))
			.build()?;

		cfg.try_deserialize().map(Self::normalized)
	}

	/// Re-establish the ascending-threshold ordering the schedule lookup
	/// relies on.
	fn normalized(mut self) -> Self {
		self.permitted_betting_odds_increments
			.sort_by_key(|entry| entry.threshold);
		self
	}

	/// The increment a given multiplier must land on: the least entry
	/// whose threshold is strictly greater than `multiplier`, or the
	/// last entry if none is. `None` when the schedule is empty.
	pub fn applicable_increment(&self, multiplier: BetMultiplier) -> Option<BetMultiplier> {
		self.permitted_betting_odds_increments
			.iter()
			.find(|entry| entry.threshold > multiplier)
			.or_else(|| self.permitted_betting_odds_increments.last())
			.map(|entry| entry.increment)
	}

	/// Check a backer multiplier against the range limits and the
	/// increment schedule.
	pub fn check_bet_multiplier(&self, multiplier: BetMultiplier) -> Result<(), ChainError> {
		if multiplier < self.min_bet_multiplier || multiplier > self.max_bet_multiplier {
			return Err(ChainError::OddsOutOfRange {
				multiplier,
				min: self.min_bet_multiplier,
				max: self.max_bet_multiplier,
			});
		}

		if let Some(increment) = self.applicable_increment(multiplier)
			&& multiplier % increment != 0
		{
			return Err(ChainError::OddsNotOnIncrement {
				multiplier,
				increment,
			});
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_increment_schedule_lookup() {
		let params = ChainParameters::default();

		// Below the first threshold every single tick is permitted.
		assert_eq!(params.applicable_increment(150), Some(1));
		// Exactly at a threshold the next band applies.
		assert_eq!(params.applicable_increment(200), Some(2));
		assert_eq!(params.applicable_increment(250), Some(2));
		// Past the last threshold the last entry wins.
		assert_eq!(params.applicable_increment(200_000), Some(1_000));
	}

	#[test]
	fn test_empty_schedule_disables_increment_check() {
		let params = ChainParameters {
			permitted_betting_odds_increments: Vec::new(),
			..ChainParameters::default()
		};

		assert_eq!(params.applicable_increment(137), None);
		assert!(params.check_bet_multiplier(137).is_ok());
	}

	#[test]
	fn test_multiplier_range() {
		let params = ChainParameters::default();

		assert!(matches!(
			params.check_bet_multiplier(100),
			Err(ChainError::OddsOutOfRange { .. })
		));
		assert!(matches!(
			params.check_bet_multiplier(100_001),
			Err(ChainError::OddsOutOfRange { .. })
		));
		assert!(params.check_bet_multiplier(101).is_ok());
		assert!(params.check_bet_multiplier(100_000).is_ok());
	}

	#[test]
	fn test_multiplier_off_the_grid() {
		let params = ChainParameters::default();

		// 2.01 falls in the (2.00, 3.00] band with increment 0.02.
		assert!(matches!(
			params.check_bet_multiplier(201),
			Err(ChainError::OddsNotOnIncrement { increment: 2, .. })
		));
		assert!(params.check_bet_multiplier(202).is_ok());
	}
}
