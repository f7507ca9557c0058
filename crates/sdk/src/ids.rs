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

//! Object identifiers
//!
//! Every persistent entity is addressed by an [`ObjectId`]: a
//! `(space, type, serial)` triple rendered as `space.type.serial`
//! (for example `1.5.7` is the betting market group with serial 7).
//!
//! Serials are allocated from per-type counters, so identifiers are
//! deterministic: replaying the same operations on any node produces
//! the same ids.
//!
//! Identifiers in the reserved [`RELATIVE_SPACE`] are placeholders:
//! `0.0.N` means "the N-th object created earlier in this transaction"
//! and is resolved by the evaluator layer before use.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Space tag for ordinary persistent objects.
pub const PROTOCOL_SPACE: u8 = 1;

/// Space tag reserved for relative identifiers.
pub const RELATIVE_SPACE: u8 = 0;

/// Type tags for the entity kinds held in the object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ObjectType {
	Account = 1,
	Asset = 2,
	Event = 3,
	BettingMarketRules = 4,
	BettingMarketGroup = 5,
	BettingMarket = 6,
	Bet = 7,
	MatchedPosition = 8,
	Proposal = 9,
}

/// Untyped object identifier as it appears on the wire
///
/// Operation fields that may name an object created earlier in the same
/// transaction carry an `ObjectId` rather than a typed id; validation
/// resolves the relative marker and checks the type tag.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ObjectId {
	pub space: u8,
	pub object_type: u8,
	pub serial: u64,
}

impl ObjectId {
	/// Identifier of an existing object of the given type.
	pub fn new(object_type: ObjectType, serial: u64) -> Self {
		Self {
			space: PROTOCOL_SPACE,
			object_type: object_type as u8,
			serial,
		}
	}

	/// Placeholder for the `serial`-th object created in the enclosing
	/// transaction (0-based).
	pub fn relative(serial: u64) -> Self {
		Self {
			space: RELATIVE_SPACE,
			object_type: 0,
			serial,
		}
	}

	pub fn is_relative(&self) -> bool {
		self.space == RELATIVE_SPACE
	}
}

impl fmt::Display for ObjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}.{}", self.space, self.object_type, self.serial)
	}
}

/// An [`ObjectId`] carried the wrong type tag for the context it was
/// used in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identifier {actual} does not refer to a {expected:?}")]
pub struct IdTypeError {
	pub expected: ObjectType,
	pub actual: ObjectId,
}

macro_rules! object_id_type {
	($(#[$meta:meta])* $name:ident => $object_type:ident) => {
		$(#[$meta])*
		#[derive(
			Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
		)]
		pub struct $name(pub u64);

		impl $name {
			pub const OBJECT_TYPE: ObjectType = ObjectType::$object_type;
		}

		impl From<$name> for ObjectId {
			fn from(id: $name) -> ObjectId {
				ObjectId::new(ObjectType::$object_type, id.0)
			}
		}

		impl TryFrom<ObjectId> for $name {
			type Error = IdTypeError;

			fn try_from(id: ObjectId) -> Result<Self, IdTypeError> {
				if id.space == PROTOCOL_SPACE
					&& id.object_type == ObjectType::$object_type as u8
				{
					Ok($name(id.serial))
				} else {
					Err(IdTypeError {
						expected: ObjectType::$object_type,
						actual: id,
					})
				}
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				fmt::Display::fmt(&ObjectId::from(*self), f)
			}
		}
	};
}

object_id_type!(
	/// Account holding balances and placing bets.
	AccountId => Account
);
object_id_type!(
	/// Settlement asset.
	AssetId => Asset
);
object_id_type!(
	/// External sporting event a group of markets refers to.
	EventId => Event
);
object_id_type!(
	/// Free-text rule set shared by betting market groups.
	RulesId => BettingMarketRules
);
object_id_type!(
	/// Group of related betting markets sharing rules, asset and event.
	GroupId => BettingMarketGroup
);
object_id_type!(
	/// Individual betting market inside a group.
	MarketId => BettingMarket
);
object_id_type!(
	/// Open (unmatched or partially matched) bet.
	BetId => Bet
);
object_id_type!(
	/// Matched back/lay pair awaiting resolution.
	PositionId => MatchedPosition
);
object_id_type!(
	/// Stored proposal holding a not-yet-executed transaction.
	ProposalId => Proposal
);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display_format() {
		assert_eq!(GroupId(7).to_string(), "1.5.7");
		assert_eq!(ObjectId::relative(2).to_string(), "0.0.2");
	}

	#[test]
	fn test_typed_conversion_round_trip() {
		let id: ObjectId = MarketId(3).into();
		assert_eq!(MarketId::try_from(id), Ok(MarketId(3)));
	}

	#[test]
	fn test_wrong_type_tag_rejected() {
		let id: ObjectId = MarketId(3).into();
		let err = GroupId::try_from(id).unwrap_err();
		assert_eq!(err.expected, ObjectType::BettingMarketGroup);
		assert_eq!(err.actual, id);
	}

	#[test]
	fn test_relative_marker() {
		assert!(ObjectId::relative(0).is_relative());
		assert!(!ObjectId::new(ObjectType::Bet, 0).is_relative());
	}
}
