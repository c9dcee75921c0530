//! # dice-duel
//!
//! A deterministic rules engine for a two-party, dice-driven card duel.
//!
//! ## Design Principles
//!
//! 1. **Engine Owns the Rules**: Decks, dice, deferred resource changes and
//!    the turn state machine live here. Input and rendering sit behind
//!    `DecisionProvider`.
//!
//! 2. **Deterministic**: Every random draw goes through `RandomSource`. The
//!    same seed and the same decisions replay the same match.
//!
//! 3. **Effects Are Data**: Card behaviors are closed enums resolved by one
//!    exhaustive dispatch. Nothing is attached to a party at runtime that is
//!    not a typed field of `PlayerState`.
//!
//! ## Architecture
//!
//! - **Commit Protocol**: Effects stage HP/SAN deltas; the match commits both
//!   parties after each play (recovery clamped at the cap), then checks death.
//!
//! - **Persistent History**: Every observable step is a `MatchEvent`, kept in
//!   an `im::Vector` so snapshots are cheap.
//!
//! ## Modules
//!
//! - `core`: Parties, RNG, configuration, errors, player state, events
//! - `cards`: Card definitions, instances, catalog, deck builder
//! - `effects`: Outcome tables, effect variants, resolution engine
//! - `rules`: Decision provider boundary and the `Match` state machine
//! - `games`: Concrete card pools
//! - `presentation`: Console roll ticker and text rendering

pub mod core;
pub mod cards;
pub mod effects;
pub mod rules;
pub mod games;
pub mod presentation;

// Re-export commonly used types
pub use crate::core::{
    CatalogVariant, ConfigurationError, EngineError, GameRng, GameRngState, MatchConfig,
    MatchEvent, MatchOutcome, PlayerId, PlayerMap, PlayerState, PlayerStateSnapshot,
    RandomSource, ScriptedRolls, TurnChoice,
};

pub use crate::cards::{CardCatalog, CardDefinition, CardId, CardInstance, DeckBuilder, DiceSpec};

pub use crate::effects::{OutcomeTable, Resolution, ResolutionEngine, ResolutionKind};

pub use crate::rules::{DecisionProvider, Match, Phase, PlayReport, ScriptedDecisions};
