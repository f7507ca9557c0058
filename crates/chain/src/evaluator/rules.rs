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

use tote_sdk::operations::{RulesCreate, RulesUpdate};

use super::{OpContext, OperationResult};
use crate::database::Database;
use crate::error::ChainError;

pub(crate) fn validate_create(
	_db: &Database,
	ctx: &OpContext<'_>,
	_op: &RulesCreate,
) -> Result<(), ChainError> {
	ctx.require_proposal()
}

pub(crate) fn apply_create(db: &mut Database, op: &RulesCreate) -> OperationResult {
	let id = db
		.store
		.create_rules(op.name.clone(), op.description.clone());
	OperationResult::ObjectCreated(id.into())
}

pub(crate) fn validate_update(
	db: &Database,
	ctx: &OpContext<'_>,
	op: &RulesUpdate,
) -> Result<(), ChainError> {
	ctx.require_proposal()?;
	db.store.rules(op.rules_id)?;
	if op.new_name.is_none() && op.new_description.is_none() {
		return Err(ChainError::NothingToUpdate);
	}
	Ok(())
}

pub(crate) fn apply_update(
	db: &mut Database,
	op: &RulesUpdate,
) -> Result<OperationResult, ChainError> {
	let rules = db.store.rules_mut(op.rules_id)?;
	if let Some(name) = &op.new_name {
		rules.name = name.clone();
	}
	if let Some(description) = &op.new_description {
		rules.description = description.clone();
	}
	Ok(OperationResult::None)
}
