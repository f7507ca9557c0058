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

use tracing::debug;

use tote_sdk::operations::{BetCancel, BetPlace};
use tote_sdk::types::AssetAmount;

use super::OperationResult;
use crate::database::Database;
use crate::error::ChainError;
use crate::matching;
use crate::resolve;

pub(crate) struct ValidatedBetPlace {
	pub delay_bets: bool,
}

pub(crate) fn validate_place(
	db: &Database,
	op: &BetPlace,
) -> Result<ValidatedBetPlace, ChainError> {
	if !db.store.account_exists(op.bettor_id) {
		return Err(ChainError::ReferenceNotFound(op.bettor_id.into()));
	}
	let market = db.store.market(op.market_id)?;
	let group = db.store.group(market.group_id)?;

	if op.amount_to_bet.asset_id != group.asset_id {
		return Err(ChainError::AssetMismatch);
	}
	if !db.ledger.is_authorized_asset(op.bettor_id, group.asset_id) {
		return Err(ChainError::UnauthorizedAsset {
			account: op.bettor_id,
			asset: group.asset_id,
		});
	}
	if group.frozen {
		return Err(ChainError::MarketFrozen);
	}

	db.params.check_bet_multiplier(op.backer_multiplier)?;

	if op.amount_to_bet.amount <= 0 {
		return Err(ChainError::NonPositiveAmount);
	}

	let balance = db.ledger.balance(op.bettor_id, group.asset_id);
	if balance < op.amount_to_bet.amount {
		return Err(ChainError::InsufficientBalance {
			balance,
			required: op.amount_to_bet.amount,
		});
	}

	Ok(ValidatedBetPlace {
		delay_bets: group.delay_bets,
	})
}

pub(crate) fn apply_place(
	db: &mut Database,
	op: &BetPlace,
	validated: ValidatedBetPlace,
) -> Result<OperationResult, ChainError> {
	let delay_time = db.params.live_betting_delay_time;
	let end_of_delay =
		(validated.delay_bets && delay_time > 0).then(|| db.head_block_time + delay_time);

	let bet_id = db.store.create_bet(
		op.bettor_id,
		op.market_id,
		op.amount_to_bet,
		op.backer_multiplier,
		op.back_or_lay,
		end_of_delay,
	);

	// Escrow the full stake up front.
	db.ledger.adjust(
		op.bettor_id,
		AssetAmount::new(op.amount_to_bet.asset_id, -op.amount_to_bet.amount),
	);

	match end_of_delay {
		Some(deadline) => {
			debug!("bet {bet_id} delayed until block time {deadline}");
		}
		None => {
			// The bet record may be consumed and deleted while matching;
			// the caller still gets the id it was created under.
			matching::place_bet(&mut db.store, bet_id)?;
		}
	}

	Ok(OperationResult::ObjectCreated(bet_id.into()))
}

pub(crate) fn validate_cancel(db: &Database, op: &BetCancel) -> Result<(), ChainError> {
	let bet = db.store.bet(op.bet_id)?;
	if bet.bettor_id != op.bettor_id {
		return Err(ChainError::CancelForeignBet);
	}
	Ok(())
}

pub(crate) fn apply_cancel(db: &mut Database, op: &BetCancel) -> Result<OperationResult, ChainError> {
	resolve::cancel_bet(&mut db.store, &mut db.ledger, op.bet_id)?;
	Ok(OperationResult::None)
}
