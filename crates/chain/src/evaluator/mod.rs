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

//! Operation evaluators
//!
//! Each operation kind has a two-phase evaluator: **validate** reads
//! the store and may fail with a descriptive error, **apply** mutates
//! it. Validation resolves relative identifiers and hands the resolved,
//! typed lookup keys to the apply phase; nothing is cached across a
//! potential store mutation.
//!
//! Betting-market lifecycle operations are proposed-only: their
//! validators fail unless the enclosing transaction is marked as a
//! proposal. Bet placement, bet cancellation and transfers are not.

mod bet;
mod group;
mod market;
mod proposal;
mod rules;
mod transfer;

use tote_sdk::ids::{IdTypeError, ObjectId};
use tote_sdk::operations::Operation;

use crate::database::Database;
use crate::error::ChainError;

/// Per-operation evaluation context
///
/// `created` lists the ids of the objects created so far by the
/// enclosing transaction, in creation order; relative identifiers
/// resolve against it.
#[derive(Debug, Clone, Copy)]
pub struct OpContext<'a> {
	pub is_proposed: bool,
	pub created: &'a [ObjectId],
}

impl OpContext<'_> {
	/// Fail unless the enclosing transaction is a proposal.
	pub fn require_proposal(&self) -> Result<(), ChainError> {
		if self.is_proposed {
			Ok(())
		} else {
			Err(ChainError::NotAProposal)
		}
	}

	/// Resolve a possibly-relative identifier and check its type tag.
	pub fn resolve_id<T>(&self, id: ObjectId) -> Result<T, ChainError>
	where
		T: TryFrom<ObjectId, Error = IdTypeError>,
	{
		let resolved = if id.is_relative() {
			*self
				.created
				.get(id.serial as usize)
				.ok_or(ChainError::ReferenceNotFound(id))?
		} else {
			id
		};
		T::try_from(resolved).map_err(ChainError::from)
	}
}

/// What an applied operation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
	None,
	ObjectCreated(ObjectId),
}

impl OperationResult {
	pub fn object_id(&self) -> Option<ObjectId> {
		match self {
			OperationResult::None => None,
			OperationResult::ObjectCreated(id) => Some(*id),
		}
	}
}

/// Validate one operation and, if it passes, apply it.
pub(crate) fn evaluate(
	db: &mut Database,
	ctx: &OpContext<'_>,
	op: &Operation,
) -> Result<OperationResult, ChainError> {
	match op {
		Operation::RulesCreate(op) => {
			rules::validate_create(db, ctx, op)?;
			Ok(rules::apply_create(db, op))
		}
		Operation::RulesUpdate(op) => {
			rules::validate_update(db, ctx, op)?;
			rules::apply_update(db, op)
		}
		Operation::GroupCreate(op) => {
			let validated = group::validate_create(db, ctx, op)?;
			Ok(group::apply_create(db, op, validated))
		}
		Operation::GroupUpdate(op) => {
			let validated = group::validate_update(db, ctx, op)?;
			group::apply_update(db, op, validated)
		}
		Operation::MarketCreate(op) => {
			let validated = market::validate_create(db, ctx, op)?;
			Ok(market::apply_create(db, op, validated))
		}
		Operation::MarketUpdate(op) => {
			let validated = market::validate_update(db, ctx, op)?;
			market::apply_update(db, op, validated)
		}
		Operation::BetPlace(op) => {
			let validated = bet::validate_place(db, op)?;
			bet::apply_place(db, op, validated)
		}
		Operation::BetCancel(op) => {
			bet::validate_cancel(db, op)?;
			bet::apply_cancel(db, op)
		}
		Operation::GroupResolve(op) => {
			let validated = group::validate_resolve(db, ctx, op)?;
			group::apply_resolve(db, op, validated)
		}
		Operation::GroupCancelUnmatchedBets(op) => {
			group::validate_cancel_unmatched(db, ctx, op)?;
			group::apply_cancel_unmatched(db, op)
		}
		Operation::Transfer(op) => {
			transfer::validate(db, op)?;
			transfer::apply(db, op)
		}
		Operation::ProposalCreate(op) => {
			proposal::validate(db, op)?;
			Ok(proposal::apply(db, op))
		}
	}
}
