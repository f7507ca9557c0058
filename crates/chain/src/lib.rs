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

//! Tote Chain - Betting-market state machine
//!
//! This crate provides the operation evaluators, data model and
//! matching engine of a peer-to-peer sportsbook chain: lifecycle of
//! rule sets, market groups and betting markets; placement, matching,
//! cancellation and delayed publication of bets; and final resolution
//! of groups of markets.
//!
//! Architecture:
//! - Single-threaded serial evaluation for deterministic behavior
//! - Validate-then-apply evaluator pairs per operation kind
//! - Price-time priority book with back/lay complementary stakes
//! - Chain-wide delay queue admitting bets when their delay expires
//! - Snapshot-based rollback at the transaction boundary
//!
//! The engine is a pure state transducer: given the same inputs it
//! produces byte-identical outputs on every node. No wall clocks, no
//! random identifiers, no unordered iteration.

pub mod balance;
pub mod book;
pub mod database;
pub mod delay;
pub mod error;
pub mod evaluator;
pub mod matching;
pub mod objects;
pub mod params;
pub mod proposal;
pub mod resolve;
pub mod store;

pub use balance::BalanceLedger;
pub use book::MarketBook;
pub use database::Database;
pub use error::ChainError;
pub use evaluator::{OpContext, OperationResult};
pub use matching::MatchOutcome;
pub use objects::{
	Bet, BettingMarket, BettingMarketGroup, BettingMarketRules, MatchedPosition, Proposal,
};
pub use params::{ChainParameters, OddsIncrement};
pub use store::ObjectStore;
