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

use tote_sdk::operations::Transfer;
use tote_sdk::types::AssetAmount;

use super::OperationResult;
use crate::database::Database;
use crate::error::ChainError;

pub(crate) fn validate(db: &Database, op: &Transfer) -> Result<(), ChainError> {
	if !db.store.account_exists(op.from) {
		return Err(ChainError::ReferenceNotFound(op.from.into()));
	}
	if !db.store.account_exists(op.to) {
		return Err(ChainError::ReferenceNotFound(op.to.into()));
	}
	if !db.store.asset_exists(op.amount.asset_id) {
		return Err(ChainError::ReferenceNotFound(op.amount.asset_id.into()));
	}

	if op.amount.amount <= 0 {
		return Err(ChainError::NonPositiveAmount);
	}

	for account in [op.from, op.to] {
		if !db.ledger.is_authorized_asset(account, op.amount.asset_id) {
			return Err(ChainError::UnauthorizedAsset {
				account,
				asset: op.amount.asset_id,
			});
		}
	}

	let balance = db.ledger.balance(op.from, op.amount.asset_id);
	if balance < op.amount.amount {
		return Err(ChainError::InsufficientBalance {
			balance,
			required: op.amount.amount,
		});
	}

	Ok(())
}

pub(crate) fn apply(db: &mut Database, op: &Transfer) -> Result<OperationResult, ChainError> {
	db.ledger.adjust(
		op.from,
		AssetAmount::new(op.amount.asset_id, -op.amount.amount),
	);
	db.ledger.adjust(op.to, op.amount);
	Ok(OperationResult::None)
}
