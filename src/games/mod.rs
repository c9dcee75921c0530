//! Concrete card pools built on the engine.

pub mod duel;
