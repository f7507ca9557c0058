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

use tote_sdk::operations::{ProposalCreate, Transaction};

use super::OperationResult;
use crate::database::Database;
use crate::error::ChainError;

/// The duplication guard already ran at transaction admission; staging
/// the operations cannot fail beyond that.
pub(crate) fn validate(_db: &Database, _op: &ProposalCreate) -> Result<(), ChainError> {
	Ok(())
}

pub(crate) fn apply(db: &mut Database, op: &ProposalCreate) -> OperationResult {
	let id = db
		.store
		.create_proposal(Transaction::new(op.proposed_ops.clone()));
	OperationResult::ObjectCreated(id.into())
}
