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

use thiserror::Error;

use tote_sdk::ids::{AccountId, AssetId, IdTypeError, ObjectId};
use tote_sdk::types::{Amount, BetMultiplier, UnknownResolutionLabel};

/// Why an operation was rejected
///
/// Every validator failure carries a human-readable reason; the enclosing
/// transaction is rejected whole. Apply-phase code only fails through the
/// `Encoding` variant (a storage-level fault).
#[derive(Debug, Error)]
pub enum ChainError {
	#[error("referenced object {0} does not exist")]
	ReferenceNotFound(ObjectId),
	#[error(transparent)]
	WrongReferenceType(#[from] IdTypeError),
	#[error("operation is only permitted inside a proposed transaction")]
	NotAProposal,
	#[error("nothing to update")]
	NothingToUpdate,
	#[error("{0} would not change the state of the betting market group")]
	RedundantNoOp(&'static str),
	#[error("asset type bet does not match the market's asset type")]
	AssetMismatch,
	#[error("unable to place bets while the market is frozen")]
	MarketFrozen,
	#[error("account {account} is not authorized to transact asset {asset}")]
	UnauthorizedAsset { account: AccountId, asset: AssetId },
	#[error("bet odds {multiplier} are outside the chain's limits [{min}, {max}]")]
	OddsOutOfRange {
		multiplier: BetMultiplier,
		min: BetMultiplier,
		max: BetMultiplier,
	},
	#[error("bet odds {multiplier} must be a multiple of {increment}")]
	OddsNotOnIncrement {
		multiplier: BetMultiplier,
		increment: BetMultiplier,
	},
	#[error("amount must be strictly positive")]
	NonPositiveAmount,
	#[error("insufficient balance: have {balance}, need {required}")]
	InsufficientBalance { balance: Amount, required: Amount },
	#[error("proposed operation duplicates one already pending")]
	DuplicateProposedOperation,
	#[error("resolution coverage mismatch: {0}")]
	ResolutionCoverageMismatch(String),
	#[error(transparent)]
	ResolutionLabelIllegal(#[from] UnknownResolutionLabel),
	#[error("only the bettor who placed a bet may cancel it")]
	CancelForeignBet,
	#[error("encoding error: {0}")]
	Encoding(String),
}
