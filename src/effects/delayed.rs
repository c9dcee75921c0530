//! Delayed effects scheduled for a later turn.
//!
//! A delayed effect sits in its owner's queue until the turn index reaches
//! `trigger_turn`. At each turn start the orchestrator drains due entries in
//! insertion order, applies them to the owner and commits immediately.

use serde::{Deserialize, Serialize};

use super::effect::Vital;
use crate::core::PlayerState;

/// What a delayed effect does when it fires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayedKind {
    /// Stage `amount` on the owner's vital.
    Restore { vital: Vital, amount: i64 },
}

/// An effect waiting for its turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedEffect {
    /// Turn index at (or after) which the effect fires.
    pub trigger_turn: u32,
    pub kind: DelayedKind,
    /// Name of the card that scheduled it.
    pub source: String,
}

impl DelayedEffect {
    #[must_use]
    pub fn new(trigger_turn: u32, kind: DelayedKind, source: impl Into<String>) -> Self {
        Self {
            trigger_turn,
            kind,
            source: source.into(),
        }
    }

    /// Whether the effect fires at `turn_index`.
    #[must_use]
    pub fn is_due(&self, turn_index: u32) -> bool {
        self.trigger_turn <= turn_index
    }

    /// Stage the effect on its owner and describe it.
    pub fn apply(&self, owner: &mut PlayerState) -> String {
        match self.kind {
            DelayedKind::Restore { vital, amount } => {
                owner.stage(vital, amount);
                format!("{} triggers for {}: {amount:+} {vital}", self.source, owner.name)
            }
        }
    }
}
