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

use tote_sdk::ids::GroupId;
use tote_sdk::operations::{MarketCreate, MarketUpdate};

use super::{OpContext, OperationResult};
use crate::database::Database;
use crate::error::ChainError;

pub(crate) struct ValidatedMarketCreate {
	pub group_id: GroupId,
}

pub(crate) fn validate_create(
	db: &Database,
	ctx: &OpContext<'_>,
	op: &MarketCreate,
) -> Result<ValidatedMarketCreate, ChainError> {
	ctx.require_proposal()?;

	let group_id: GroupId = ctx.resolve_id(op.group_id)?;
	db.store.group(group_id)?;

	Ok(ValidatedMarketCreate { group_id })
}

pub(crate) fn apply_create(
	db: &mut Database,
	op: &MarketCreate,
	validated: ValidatedMarketCreate,
) -> OperationResult {
	let id = db.store.create_market(
		validated.group_id,
		op.description.clone(),
		op.payout_condition.clone(),
	);
	OperationResult::ObjectCreated(id.into())
}

pub(crate) struct ValidatedMarketUpdate {
	pub group_id: Option<GroupId>,
}

pub(crate) fn validate_update(
	db: &Database,
	ctx: &OpContext<'_>,
	op: &MarketUpdate,
) -> Result<ValidatedMarketUpdate, ChainError> {
	ctx.require_proposal()?;
	let market = db.store.market(op.market_id)?;

	if op.new_group_id.is_none()
		&& op.new_description.is_none()
		&& op.new_payout_condition.is_none()
	{
		return Err(ChainError::NothingToUpdate);
	}

	let group_id = match op.new_group_id {
		Some(id) => {
			let group_id: GroupId = ctx.resolve_id(id)?;
			let new_group = db.store.group(group_id)?;
			// Re-homing a market must not orphan open bets or matched
			// positions denominated in the old group's asset.
			let old_asset = db.store.group(market.group_id)?.asset_id;
			if new_group.asset_id != old_asset
				&& (!db.store.bets_of_market(op.market_id).is_empty()
					|| !db.store.positions_of_market(op.market_id).is_empty())
			{
				return Err(ChainError::AssetMismatch);
			}
			Some(group_id)
		}
		None => None,
	};

	Ok(ValidatedMarketUpdate { group_id })
}

pub(crate) fn apply_update(
	db: &mut Database,
	op: &MarketUpdate,
	validated: ValidatedMarketUpdate,
) -> Result<OperationResult, ChainError> {
	if let Some(group_id) = validated.group_id {
		db.store.move_market_to_group(op.market_id, group_id)?;
	}
	let market = db.store.market_mut(op.market_id)?;
	if let Some(payout_condition) = &op.new_payout_condition {
		market.payout_condition = payout_condition.clone();
	}
	if let Some(description) = &op.new_description {
		market.description = description.clone();
	}
	Ok(OperationResult::None)
}
