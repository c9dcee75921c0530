//! Turn choices and the match event log.
//!
//! A party's decision during the action loop is a [`TurnChoice`]. Every
//! observable step of a match is recorded as a [`MatchEvent`]; the log is
//! what front ends render and what tests assert on.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use super::state::CommitReport;
use crate::effects::ResolutionKind;

/// What the active party does next in the action loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnChoice {
    /// Play the card at this hand index against the opponent.
    Play(usize),
    /// Stop playing cards this turn.
    EndTurn,
    /// Concede the match.
    Surrender,
}

/// Why a party's action loop did not run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// The skip-next-turn flag was set.
    Flagged,
    /// Action debt left no action points.
    ActionDebt,
}

/// How a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The loser reached 0 HP or 0 SAN.
    Death,
    /// The loser conceded.
    Surrender,
}

/// Terminal result of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub reason: EndReason,
}

impl MatchOutcome {
    /// `loser` lost for `reason`; the other party wins.
    #[must_use]
    pub fn lost_by(loser: PlayerId, reason: EndReason) -> Self {
        Self {
            winner: loser.opponent(),
            loser,
            reason,
        }
    }
}

/// Narrative lines of one event. Most plays produce one or two.
pub type Narrative = SmallVec<[String; 2]>;

/// One observable step of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// Both parties rolled for the first move. One pair per attempt.
    FirstMoverRolled {
        rolls: SmallVec<[(i64, i64); 2]>,
        first_mover: PlayerId,
    },

    TurnStarted {
        player: PlayerId,
        turn_index: u32,
        round: u32,
    },

    DelayedEffectFired {
        player: PlayerId,
        description: String,
    },

    ActionDebtRecovered {
        player: PlayerId,
        recovered: i64,
        remaining: i64,
    },

    TurnSkipped {
        player: PlayerId,
        reason: SkipReason,
    },

    CardDrawn {
        player: PlayerId,
        card: String,
        reshuffled: bool,
    },

    /// A draw found deck and discard both empty.
    DrawFailed { player: PlayerId },

    CardPlayed {
        player: PlayerId,
        target: PlayerId,
        card: String,
        kind: ResolutionKind,
        roll: Option<i64>,
        narrative: Narrative,
    },

    /// The card went to discard without resolving.
    CardNeutralized {
        player: PlayerId,
        card: String,
        consumed_action: bool,
    },

    Committed(CommitReport),

    CardDiscarded {
        player: PlayerId,
        card: String,
    },

    TurnEnded {
        player: PlayerId,
        turn_index: u32,
    },

    MatchEnded(MatchOutcome),
}

impl MatchEvent {
    /// The party the event is about, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            MatchEvent::FirstMoverRolled { first_mover, .. } => Some(*first_mover),
            MatchEvent::TurnStarted { player, .. }
            | MatchEvent::DelayedEffectFired { player, .. }
            | MatchEvent::ActionDebtRecovered { player, .. }
            | MatchEvent::TurnSkipped { player, .. }
            | MatchEvent::CardDrawn { player, .. }
            | MatchEvent::DrawFailed { player }
            | MatchEvent::CardPlayed { player, .. }
            | MatchEvent::CardNeutralized { player, .. }
            | MatchEvent::CardDiscarded { player, .. }
            | MatchEvent::TurnEnded { player, .. } => Some(*player),
            MatchEvent::Committed(report) => Some(report.player),
            MatchEvent::MatchEnded(_) => None,
        }
    }
}
