//! Effect system for card plays.
//!
//! - `OutcomeTable` / `Outcome`: range-keyed dice outcomes, possibly nested
//! - `TerminalEffect` / `DirectEffect`: closed sets of card behaviors
//! - `ResolutionEngine`: resolves one play into staged deltas and narrative
//! - `DelayedEffect`: effects waiting for a later turn
//!
//! ## Design Philosophy
//!
//! Effects are data. Every kind is a variant, and the engine dispatches
//! with one exhaustive `match`, so adding a card behavior is a compile
//! error until it is handled everywhere.

mod behavior;
mod delayed;
mod effect;
mod resolver;

pub use delayed::{DelayedEffect, DelayedKind};
pub use effect::{
    DirectEffect, EffectTarget, Outcome, OutcomeTable, RollRange, Stat, TerminalEffect, Vital,
};
pub use resolver::{EffectContext, Resolution, ResolutionEngine, ResolutionKind};
