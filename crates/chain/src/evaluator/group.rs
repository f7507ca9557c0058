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

use tote_sdk::ids::{EventId, MarketId, RulesId};
use tote_sdk::operations::{GroupCancelUnmatchedBets, GroupCreate, GroupResolve, GroupUpdate};
use tote_sdk::types::Resolution;

use super::{OpContext, OperationResult};
use crate::database::Database;
use crate::delay;
use crate::error::ChainError;
use crate::resolve;

pub(crate) struct ValidatedGroupCreate {
	pub event_id: EventId,
	pub rules_id: RulesId,
}

pub(crate) fn validate_create(
	db: &Database,
	ctx: &OpContext<'_>,
	op: &GroupCreate,
) -> Result<ValidatedGroupCreate, ChainError> {
	ctx.require_proposal()?;

	let event_id: EventId = ctx.resolve_id(op.event_id)?;
	if !db.store.event_exists(event_id) {
		return Err(ChainError::ReferenceNotFound(event_id.into()));
	}

	if !db.store.asset_exists(op.asset_id) {
		return Err(ChainError::ReferenceNotFound(op.asset_id.into()));
	}

	let rules_id: RulesId = ctx.resolve_id(op.rules_id)?;
	db.store.rules(rules_id)?;

	Ok(ValidatedGroupCreate { event_id, rules_id })
}

pub(crate) fn apply_create(
	db: &mut Database,
	op: &GroupCreate,
	validated: ValidatedGroupCreate,
) -> OperationResult {
	let id = db.store.create_group(
		validated.event_id,
		validated.rules_id,
		op.asset_id,
		op.description.clone(),
	);
	OperationResult::ObjectCreated(id.into())
}

pub(crate) struct ValidatedGroupUpdate {
	pub rules_id: Option<RulesId>,
}

pub(crate) fn validate_update(
	db: &Database,
	ctx: &OpContext<'_>,
	op: &GroupUpdate,
) -> Result<ValidatedGroupUpdate, ChainError> {
	ctx.require_proposal()?;
	let group = db.store.group(op.group_id)?;

	if op.new_description.is_none()
		&& op.new_rules_id.is_none()
		&& op.freeze.is_none()
		&& op.delay_bets.is_none()
	{
		return Err(ChainError::NothingToUpdate);
	}

	let rules_id = match op.new_rules_id {
		Some(id) => {
			let rules_id: RulesId = ctx.resolve_id(id)?;
			db.store.rules(rules_id)?;
			Some(rules_id)
		}
		None => None,
	};

	// Redundant flag flips are rejected to keep governance audit logs
	// meaningful.
	if let Some(freeze) = op.freeze
		&& group.frozen == freeze
	{
		return Err(ChainError::RedundantNoOp("freeze"));
	}
	if let Some(delay_bets) = op.delay_bets
		&& group.delay_bets == delay_bets
	{
		return Err(ChainError::RedundantNoOp("delay_bets"));
	}

	Ok(ValidatedGroupUpdate { rules_id })
}

pub(crate) fn apply_update(
	db: &mut Database,
	op: &GroupUpdate,
	validated: ValidatedGroupUpdate,
) -> Result<OperationResult, ChainError> {
	let group = db.store.group_mut(op.group_id)?;
	if let Some(description) = &op.new_description {
		group.description = description.clone();
	}
	if let Some(rules_id) = validated.rules_id {
		group.rules_id = rules_id;
	}
	// Freeze lands before the delay flush below reads the flag, so an
	// update that both freezes and un-delays keeps the bets quarantined.
	if let Some(freeze) = op.freeze {
		group.frozen = freeze;
	}
	if let Some(delay_bets) = op.delay_bets {
		group.delay_bets = delay_bets;
		if !delay_bets {
			delay::flush_group(&mut db.store, op.group_id)?;
		}
	}
	Ok(OperationResult::None)
}

pub(crate) fn validate_resolve(
	db: &Database,
	ctx: &OpContext<'_>,
	op: &GroupResolve,
) -> Result<Vec<(MarketId, Resolution)>, ChainError> {
	ctx.require_proposal()?;
	resolve::validate_resolutions(&db.store, op.group_id, &op.resolutions)
}

pub(crate) fn apply_resolve(
	db: &mut Database,
	op: &GroupResolve,
	validated: Vec<(MarketId, Resolution)>,
) -> Result<OperationResult, ChainError> {
	resolve::resolve_group(&mut db.store, &mut db.ledger, op.group_id, &validated)?;
	Ok(OperationResult::None)
}

pub(crate) fn validate_cancel_unmatched(
	db: &Database,
	ctx: &OpContext<'_>,
	op: &GroupCancelUnmatchedBets,
) -> Result<(), ChainError> {
	ctx.require_proposal()?;
	db.store.group(op.group_id)?;
	Ok(())
}

pub(crate) fn apply_cancel_unmatched(
	db: &mut Database,
	op: &GroupCancelUnmatchedBets,
) -> Result<OperationResult, ChainError> {
	resolve::cancel_unmatched_bets(&mut db.store, &mut db.ledger, op.group_id)?;
	Ok(OperationResult::None)
}
