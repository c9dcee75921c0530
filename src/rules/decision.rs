//! Decision provider trait: the boundary between the engine and whoever
//! makes choices for the parties.
//!
//! The engine never reads input or renders anything. When it needs a
//! choice it asks the `DecisionProvider`:
//! - Which card to play, or end the turn, or surrender
//! - Which card to discard when over the hand limit
//! - Which stat to hit (Turtle 300) and which preset to set (Debug Card)
//!
//! It also tells the provider when a roll is about to be captured (so a
//! front end can run and stop its ticker) and reports every match event.
//!
//! ## Implementation Notes
//!
//! - Calls are synchronous. The match waits for the answer.
//! - A bad index is answered with `InvalidAction` by the public API, or
//!   asked again by `Match::run`.
//! - `capture_roll_stop` must not decide the roll. The engine samples once
//!   after it returns.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cards::DiceSpec;
use crate::core::{MatchEvent, PlayerId, PlayerStateSnapshot, TurnChoice};
use crate::effects::Stat;

/// Why a roll is being made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollPurpose {
    /// Opposed roll for the first move.
    FirstMover,
    /// The roll a dice card is resolved with.
    Primary,
    /// One of the extra rolls demanded by recursion debt.
    Confirmation { attempt: u32, of: u32 },
    /// Fresh roll for a nested outcome table.
    Nested,
    /// A follow-up roll inside an effect.
    Secondary,
}

/// Everything a front end needs to animate a roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    pub player: PlayerId,
    /// What is being rolled for (card name or a short label).
    pub label: String,
    pub dice: DiceSpec,
    pub purpose: RollPurpose,
    /// Show garbage instead of numbers for this roll.
    pub garbled: bool,
    /// Ticker interval of the roller.
    pub interval_ms: u64,
}

/// What the active party can see when asked to act.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnView {
    pub player: PlayerId,
    pub turn_index: u32,
    pub round: u32,
    pub actions_remaining: i64,
    pub me: PlayerStateSnapshot,
    pub opponent: PlayerStateSnapshot,
}

impl TurnView {
    /// Cards that must still go before the hand fits the limit.
    #[must_use]
    pub fn excess_cards(&self) -> usize {
        let limit = self.me.base_action_points.max(2) as usize;
        self.me.hand.len().saturating_sub(limit)
    }
}

/// Source of party decisions.
pub trait DecisionProvider {
    /// Pick the next step of the action loop.
    fn choose_action(&mut self, view: &TurnView) -> TurnChoice;

    /// Pick a hand index to discard.
    fn choose_discard(&mut self, view: &TurnView) -> usize;

    /// Pick the stat a Turtle 300 hit goes to.
    fn choose_stat(&mut self, chooser: PlayerId) -> Stat;

    /// Pick a preset for `player`'s next roll. `None` means no valid input.
    fn choose_preset_roll(&mut self, player: PlayerId) -> Option<i64>;

    /// Block until the front end has stopped its roll display.
    fn capture_roll_stop(&mut self, _request: &RollRequest) {}

    /// Receive a match event as it happens.
    fn observe(&mut self, _event: &MatchEvent) {}
}

impl<D: DecisionProvider + ?Sized> DecisionProvider for Box<D> {
    fn choose_action(&mut self, view: &TurnView) -> TurnChoice {
        (**self).choose_action(view)
    }

    fn choose_discard(&mut self, view: &TurnView) -> usize {
        (**self).choose_discard(view)
    }

    fn choose_stat(&mut self, chooser: PlayerId) -> Stat {
        (**self).choose_stat(chooser)
    }

    fn choose_preset_roll(&mut self, player: PlayerId) -> Option<i64> {
        (**self).choose_preset_roll(player)
    }

    fn capture_roll_stop(&mut self, request: &RollRequest) {
        (**self).capture_roll_stop(request);
    }

    fn observe(&mut self, event: &MatchEvent) {
        (**self).observe(event);
    }
}

/// Decisions replayed from queues. For tests and scripted demos.
///
/// Exhausted queues fall back to: end the turn, discard index 0, hit HP,
/// no preset.
///
/// ```
/// use dice_duel::core::TurnChoice;
/// use dice_duel::rules::ScriptedDecisions;
///
/// let decisions = ScriptedDecisions::new()
///     .with_actions([TurnChoice::Play(0), TurnChoice::EndTurn])
///     .with_discards([1]);
/// assert_eq!(decisions.pending_actions(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedDecisions {
    actions: VecDeque<TurnChoice>,
    discards: VecDeque<usize>,
    stats: VecDeque<Stat>,
    presets: VecDeque<Option<i64>>,
    /// Every roll request received, in order.
    pub captured: Vec<RollRequest>,
    /// Every event observed, in order.
    pub events: Vec<MatchEvent>,
}

impl ScriptedDecisions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_actions(mut self, choices: impl IntoIterator<Item = TurnChoice>) -> Self {
        self.actions.extend(choices);
        self
    }

    #[must_use]
    pub fn with_discards(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.discards.extend(indices);
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: impl IntoIterator<Item = Stat>) -> Self {
        self.stats.extend(stats);
        self
    }

    #[must_use]
    pub fn with_presets(mut self, presets: impl IntoIterator<Item = Option<i64>>) -> Self {
        self.presets.extend(presets);
        self
    }

    /// Queue more turn choices.
    pub fn push_actions(&mut self, choices: impl IntoIterator<Item = TurnChoice>) {
        self.actions.extend(choices);
    }

    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.actions.len()
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn choose_action(&mut self, _view: &TurnView) -> TurnChoice {
        self.actions.pop_front().unwrap_or(TurnChoice::EndTurn)
    }

    fn choose_discard(&mut self, _view: &TurnView) -> usize {
        self.discards.pop_front().unwrap_or(0)
    }

    fn choose_stat(&mut self, _chooser: PlayerId) -> Stat {
        self.stats.pop_front().unwrap_or(Stat::Hp)
    }

    fn choose_preset_roll(&mut self, _player: PlayerId) -> Option<i64> {
        self.presets.pop_front().flatten()
    }

    fn capture_roll_stop(&mut self, request: &RollRequest) {
        self.captured.push(request.clone());
    }

    fn observe(&mut self, event: &MatchEvent) {
        self.events.push(event.clone());
    }
}
