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

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::AssetId;

/// Block time in seconds since the unix epoch, taken only from
/// `head_block_time()` so every node evaluates against the same clock.
pub type Timestamp = u64;

/// Integer quantity of an asset.
pub type Amount = i64;

/// Integer-scaled decimal odds; `200` encodes decimal odds of `2.00`.
pub type BetMultiplier = u32;

/// Scale factor between decimal odds and [`BetMultiplier`].
pub const ODDS_PRECISION: BetMultiplier = 100;

/// Betting side
///
/// A back wagers that an outcome occurs; a lay wagers against it and
/// accepts the back's stake as potential payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackOrLay {
	Back,
	Lay,
}

impl BackOrLay {
	/// The side this side matches against.
	pub fn opposite(self) -> Self {
		match self {
			BackOrLay::Back => BackOrLay::Lay,
			BackOrLay::Lay => BackOrLay::Back,
		}
	}
}

impl fmt::Display for BackOrLay {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BackOrLay::Back => write!(f, "back"),
			BackOrLay::Lay => write!(f, "lay"),
		}
	}
}

/// A quantity of a specific asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
	pub asset_id: AssetId,
	pub amount: Amount,
}

impl AssetAmount {
	pub fn new(asset_id: AssetId, amount: Amount) -> Self {
		Self { asset_id, amount }
	}
}

/// Outcome assigned to a single market when its group is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
	/// The market's payout condition occurred; backs win.
	Win,
	/// The payout condition did not occur; lays win.
	NotWin,
	/// The market is voided; both sides are refunded.
	Cancel,
}

impl Resolution {
	pub fn as_str(self) -> &'static str {
		match self {
			Resolution::Win => "win",
			Resolution::NotWin => "not_win",
			Resolution::Cancel => "cancel",
		}
	}
}

impl fmt::Display for Resolution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A resolution label was not drawn from the legal vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resolution label {0:?}")]
pub struct UnknownResolutionLabel(pub String);

impl FromStr for Resolution {
	type Err = UnknownResolutionLabel;

	fn from_str(label: &str) -> Result<Self, Self::Err> {
		match label {
			"win" => Ok(Resolution::Win),
			"not_win" => Ok(Resolution::NotWin),
			"cancel" => Ok(Resolution::Cancel),
			other => Err(UnknownResolutionLabel(other.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_opposite_side() {
		assert_eq!(BackOrLay::Back.opposite(), BackOrLay::Lay);
		assert_eq!(BackOrLay::Lay.opposite(), BackOrLay::Back);
	}

	#[test]
	fn test_resolution_labels_round_trip() {
		for resolution in [Resolution::Win, Resolution::NotWin, Resolution::Cancel] {
			assert_eq!(resolution.as_str().parse(), Ok(resolution));
		}
	}

	#[test]
	fn test_unknown_resolution_label() {
		let err = "draw".parse::<Resolution>().unwrap_err();
		assert_eq!(err, UnknownResolutionLabel("draw".to_string()));
	}
}
