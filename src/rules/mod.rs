//! Match rules: the turn state machine and the decision boundary.
//!
//! - `Match`: owns both parties and walks the turn phases
//! - `DecisionProvider`: asked whenever a party has to choose something
//!
//! The engine never reads input or prints. Front ends implement
//! `DecisionProvider` and render `MatchEvent`s.

pub mod decision;
pub mod engine;

pub use decision::{DecisionProvider, RollPurpose, RollRequest, ScriptedDecisions, TurnView};
pub use engine::{Match, Phase, PlayReport};
