//! Core engine types: parties, state, actions, RNG, configuration, errors.
//!
//! Nothing in here knows about individual cards. Card behavior lives in
//! `effects` and the concrete card pool in `games::duel`.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;
pub mod state;

pub use entity::{EntityAllocator, EntityId};
pub use player::{PlayerId, PlayerMap};
pub use rng::{shuffle, GameRng, GameRngState, RandomSource, ScriptedRolls};
pub use config::{CatalogVariant, MatchConfig, NeutralizedPolicy};
pub use action::{EndReason, MatchEvent, MatchOutcome, Narrative, SkipReason, TurnChoice};
pub use error::{ConfigurationError, EngineError};
pub use state::{
    action_allowance, ActiveFlags, CommitReport, DrawOutcome, PlayerState, PlayerStateSnapshot,
    ResourceDeltas,
};
