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

//! Proposal-duplication guard
//!
//! A transaction that stages new proposals is rejected when any staged
//! operation is structurally equal to an operation already pending in a
//! stored proposal, or to another operation staged by the same
//! transaction. Equality is computed over the canonical encoding of the
//! full operation tuple, so an identical operation kind with different
//! amounts is not a duplicate.

use std::collections::HashSet;

use tote_sdk::operations::{Operation, Transaction};

use crate::error::ChainError;
use crate::store::ObjectStore;

fn canonical_encoding(op: &Operation) -> Result<Vec<u8>, ChainError> {
	serde_json::to_vec(op).map_err(|e| ChainError::Encoding(e.to_string()))
}

/// Reject `tx` if any operation it proposes duplicates one already
/// pending across all stored proposals, or another operation proposed
/// by `tx` itself.
pub fn check_transaction_for_duplicated_operations(
	store: &ObjectStore,
	tx: &Transaction,
) -> Result<(), ChainError> {
	if !tx
		.operations
		.iter()
		.any(|op| matches!(op, Operation::ProposalCreate(_)))
	{
		return Ok(());
	}

	let mut pending: HashSet<Vec<u8>> = HashSet::new();
	for proposal in store.proposals() {
		for op in &proposal.proposed_transaction.operations {
			pending.insert(canonical_encoding(op)?);
		}
	}

	for op in &tx.operations {
		if let Operation::ProposalCreate(proposal_create) = op {
			for proposed in &proposal_create.proposed_ops {
				if !pending.insert(canonical_encoding(proposed)?) {
					return Err(ChainError::DuplicateProposedOperation);
				}
			}
		}
	}

	Ok(())
}
