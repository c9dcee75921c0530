//! Per-party state and the deferred commit protocol.
//!
//! ## PlayerState
//!
//! Everything one party owns in a match:
//! - Vitality (`hp`, `san`) and the pending deltas staged against them
//! - Action budget (`base_action_points`, `action_debt`)
//! - One-shot flags (skip, roll override, garbled display, recursion debt,
//!   neutralized next card)
//! - Delayed effects waiting for a later turn
//! - Deck, hand and discard
//!
//! ## Commit protocol
//!
//! Effects only ever call [`PlayerState::stage`]. The orchestrator calls
//! [`PlayerState::commit`] once per play, which applies the pending deltas,
//! clamps at the ceiling and clears the pending fields. Death is checked
//! after the commit, never during resolution.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::player::PlayerId;
use super::rng::{shuffle, RandomSource};
use crate::cards::CardInstance;
use crate::effects::{DelayedEffect, Vital};

/// Pair of HP/SAN deltas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceDeltas {
    pub hp: i64,
    pub san: i64,
}

impl ResourceDeltas {
    /// No change.
    pub const ZERO: ResourceDeltas = ResourceDeltas { hp: 0, san: 0 };

    #[must_use]
    pub const fn new(hp: i64, san: i64) -> Self {
        Self { hp, san }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.hp == 0 && self.san == 0
    }

    /// The delta on one vital.
    #[must_use]
    pub fn get(&self, vital: Vital) -> i64 {
        match vital {
            Vital::Hp => self.hp,
            Vital::San => self.san,
        }
    }

    fn add(&mut self, vital: Vital, amount: i64) {
        match vital {
            Vital::Hp => self.hp += amount,
            Vital::San => self.san += amount,
        }
    }

    /// Component-wise `self - earlier`.
    #[must_use]
    pub fn since(&self, earlier: ResourceDeltas) -> ResourceDeltas {
        ResourceDeltas::new(self.hp - earlier.hp, self.san - earlier.san)
    }
}

impl std::fmt::Display for ResourceDeltas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HP {:+}, SAN {:+}", self.hp, self.san)
    }
}

/// What a commit did to one party.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    pub player: PlayerId,
    pub hp_before: i64,
    pub hp_after: i64,
    pub san_before: i64,
    pub san_after: i64,
}

impl CommitReport {
    /// Whether either value moved.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.hp_before != self.hp_after || self.san_before != self.san_after
    }

    /// Net change after clamping.
    #[must_use]
    pub fn delta(&self) -> ResourceDeltas {
        ResourceDeltas::new(
            self.hp_after - self.hp_before,
            self.san_after - self.san_before,
        )
    }
}

/// Result of drawing one card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    /// Name of the drawn card, `None` if deck and discard were both empty.
    pub card: Option<String>,
    /// The discard pile was shuffled into the deck first.
    pub reshuffled: bool,
}

/// `max(2, hp / 2)`, flooring for negative hp.
#[must_use]
pub fn action_allowance(hp: i64) -> i64 {
    hp.div_euclid(2).max(2)
}

/// Mutable state of one party.
#[derive(Clone, Debug)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,

    // === Vitality ===
    /// Death at `<= 0`. Recovery stops at `cap`; there is no floor.
    pub hp: i64,
    pub san: i64,
    cap: i64,
    pending: ResourceDeltas,

    // === Actions ===
    base_action_points: i64,
    action_debt: i64,

    // === One-shot flags ===
    skip_next_turn: bool,
    roll_override: Option<i64>,
    garbled: bool,
    recursion_debt: u32,
    neutralize_next_card: bool,

    delayed: Vec<DelayedEffect>,

    // === Cards ===
    deck: VecDeque<CardInstance>,
    hand: Vec<CardInstance>,
    discard: Vec<CardInstance>,

    /// Roll ticker interval. Cosmetic.
    pub dice_interval_ms: u64,
    /// HP missing at the previous Blood Armor Snail play.
    last_lost_hp: i64,
}

impl PlayerState {
    /// Create a party with empty card piles.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, hp: i64, san: i64, cap: i64) -> Self {
        Self {
            id,
            name: name.into(),
            hp,
            san,
            cap,
            pending: ResourceDeltas::ZERO,
            base_action_points: action_allowance(hp),
            action_debt: 0,
            skip_next_turn: false,
            roll_override: None,
            garbled: false,
            recursion_debt: 0,
            neutralize_next_card: false,
            delayed: Vec::new(),
            deck: VecDeque::new(),
            hand: Vec::new(),
            discard: Vec::new(),
            dice_interval_ms: 120,
            last_lost_hp: 0,
        }
    }

    /// Set the ticker interval.
    #[must_use]
    pub fn with_dice_interval(mut self, interval_ms: u64) -> Self {
        self.dice_interval_ms = interval_ms;
        self
    }

    /// Recovery ceiling.
    #[must_use]
    pub fn cap(&self) -> i64 {
        self.cap
    }

    // === Commit protocol ===

    /// Deltas staged since the last commit.
    #[must_use]
    pub fn pending(&self) -> ResourceDeltas {
        self.pending
    }

    /// Stage a change to `vital`. Applied by the next [`commit`](Self::commit).
    pub fn stage(&mut self, vital: Vital, amount: i64) {
        self.pending.add(vital, amount);
    }

    /// Committed value plus whatever is staged.
    #[must_use]
    pub fn projected(&self, vital: Vital) -> i64 {
        match vital {
            Vital::Hp => self.hp + self.pending.hp,
            Vital::San => self.san + self.pending.san,
        }
    }

    /// Apply pending deltas, clamp at the cap, clear pending.
    ///
    /// ```
    /// use dice_duel::core::{PlayerId, PlayerState};
    /// use dice_duel::effects::Vital;
    ///
    /// let mut party = PlayerState::new(PlayerId::FIRST, "A", 9, 10, 10);
    /// party.stage(Vital::Hp, 4);
    /// party.stage(Vital::San, -12);
    ///
    /// let report = party.commit();
    /// assert_eq!((party.hp, party.san), (10, -2));
    /// assert!(party.pending().is_zero());
    /// assert_eq!(report.delta().hp, 1);
    /// ```
    pub fn commit(&mut self) -> CommitReport {
        let hp_before = self.hp;
        let san_before = self.san;

        self.hp = (self.hp + self.pending.hp).min(self.cap);
        self.san = (self.san + self.pending.san).min(self.cap);
        self.pending = ResourceDeltas::ZERO;

        let report = CommitReport {
            player: self.id,
            hp_before,
            hp_after: self.hp,
            san_before,
            san_after: self.san,
        };
        if report.changed() {
            log::debug!(
                "{} commit: HP {} -> {}, SAN {} -> {}",
                self.name,
                hp_before,
                self.hp,
                san_before,
                self.san
            );
        }
        report
    }

    /// Dead once either committed vital is at or below zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0 || self.san <= 0
    }

    // === Actions ===

    #[must_use]
    pub fn base_action_points(&self) -> i64 {
        self.base_action_points
    }

    /// Recompute the base budget from the current hp.
    pub fn recompute_base_actions(&mut self) -> i64 {
        self.base_action_points = action_allowance(self.hp);
        self.base_action_points
    }

    #[must_use]
    pub fn action_debt(&self) -> i64 {
        self.action_debt
    }

    /// Replace the debt (negative values become zero).
    pub fn set_action_debt(&mut self, debt: i64) {
        self.action_debt = debt.max(0);
    }

    /// Pay debt back by `max(2, hp / 2)`. Returns the amount recovered.
    pub fn recover_action_debt(&mut self) -> i64 {
        let recovered = action_allowance(self.hp).min(self.action_debt);
        self.action_debt -= recovered;
        recovered
    }

    /// `max(0, base - debt)`.
    #[must_use]
    pub fn available_actions(&self) -> i64 {
        (self.base_action_points - self.action_debt).max(0)
    }

    /// Most cards a hand may hold after the discard phase.
    #[must_use]
    pub fn hand_limit(&self) -> usize {
        self.base_action_points.max(2) as usize
    }

    // === One-shot flags ===

    #[must_use]
    pub fn skip_next_turn(&self) -> bool {
        self.skip_next_turn
    }

    pub fn set_skip_next_turn(&mut self) {
        self.skip_next_turn = true;
    }

    /// Read and clear the skip flag.
    pub fn take_skip_next_turn(&mut self) -> bool {
        std::mem::take(&mut self.skip_next_turn)
    }

    #[must_use]
    pub fn roll_override(&self) -> Option<i64> {
        self.roll_override
    }

    /// Force the next dice resolution to `value` (if it is a legal face).
    pub fn set_roll_override(&mut self, value: i64) {
        self.roll_override = Some(value);
    }

    /// Read and clear the override.
    pub fn take_roll_override(&mut self) -> Option<i64> {
        self.roll_override.take()
    }

    #[must_use]
    pub fn is_garbled(&self) -> bool {
        self.garbled
    }

    pub fn set_garbled(&mut self) {
        self.garbled = true;
    }

    /// Read and clear the garbled-display flag.
    pub fn take_garbled(&mut self) -> bool {
        std::mem::take(&mut self.garbled)
    }

    #[must_use]
    pub fn recursion_debt(&self) -> u32 {
        self.recursion_debt
    }

    pub fn set_recursion_debt(&mut self, confirmations: u32) {
        self.recursion_debt = confirmations;
    }

    /// Read and clear the recursion debt.
    pub fn take_recursion_debt(&mut self) -> u32 {
        std::mem::take(&mut self.recursion_debt)
    }

    #[must_use]
    pub fn neutralize_next_card(&self) -> bool {
        self.neutralize_next_card
    }

    pub fn set_neutralize_next_card(&mut self) {
        self.neutralize_next_card = true;
    }

    /// Read and clear the neutralize flag.
    pub fn take_neutralized(&mut self) -> bool {
        std::mem::take(&mut self.neutralize_next_card)
    }

    /// Remember how much HP was missing, returning the previous value.
    pub fn replace_last_lost_hp(&mut self, lost: i64) -> i64 {
        std::mem::replace(&mut self.last_lost_hp, lost)
    }

    #[must_use]
    pub fn last_lost_hp(&self) -> i64 {
        self.last_lost_hp
    }

    // === Delayed effects ===

    /// Queue an effect for a later turn.
    pub fn schedule(&mut self, effect: DelayedEffect) {
        self.delayed.push(effect);
    }

    /// Remove and return every effect due at `turn_index`, in insertion order.
    pub fn take_due_effects(&mut self, turn_index: u32) -> Vec<DelayedEffect> {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.delayed)
            .into_iter()
            .partition(|effect| effect.is_due(turn_index));
        self.delayed = waiting;
        due
    }

    #[must_use]
    pub fn delayed_effects(&self) -> &[DelayedEffect] {
        &self.delayed
    }

    // === Cards ===

    /// Replace the deck. Front of `cards` is drawn first.
    pub fn set_deck(&mut self, cards: Vec<CardInstance>) {
        self.deck = cards.into();
    }

    #[must_use]
    pub fn hand(&self) -> &[CardInstance] {
        &self.hand
    }

    #[must_use]
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn discard_pile(&self) -> &[CardInstance] {
        &self.discard
    }

    /// Cards across deck, hand and discard.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len()
    }

    /// Draw one card, shuffling the discard pile into an empty deck first.
    ///
    /// With deck and discard both empty nothing happens.
    pub fn draw<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> DrawOutcome {
        let mut reshuffled = false;
        if self.deck.is_empty() && !self.discard.is_empty() {
            let mut pile = std::mem::take(&mut self.discard);
            shuffle(rng, &mut pile);
            self.deck = pile.into();
            reshuffled = true;
            log::debug!("{} shuffles the discard pile into the deck", self.name);
        }

        let card = self.deck.pop_front().map(|card| {
            let name = card.name().to_string();
            self.hand.push(card);
            name
        });
        DrawOutcome { card, reshuffled }
    }

    /// Move a card from hand to discard for playing it.
    pub fn play_from_hand(&mut self, index: usize) -> Result<CardInstance, EngineError> {
        let card = self.remove_from_hand(index)?;
        self.discard.push(card.clone());
        Ok(card)
    }

    /// Move a card from hand to discard without playing it.
    pub fn discard_from_hand(&mut self, index: usize) -> Result<CardInstance, EngineError> {
        self.play_from_hand(index)
    }

    fn remove_from_hand(&mut self, index: usize) -> Result<CardInstance, EngineError> {
        if index >= self.hand.len() {
            return Err(EngineError::invalid(format!(
                "card index {index} out of range (hand has {} cards)",
                self.hand.len()
            )));
        }
        Ok(self.hand.remove(index))
    }

    /// Observable view, with `actions` supplied by the caller.
    #[must_use]
    pub fn snapshot(&self, actions: i64) -> PlayerStateSnapshot {
        PlayerStateSnapshot {
            player: self.id,
            name: self.name.clone(),
            hp: self.hp,
            san: self.san,
            pending: self.pending,
            base_action_points: self.base_action_points,
            action_debt: self.action_debt,
            actions,
            hand: self.hand.iter().map(|c| c.name().to_string()).collect(),
            deck_count: self.deck.len(),
            discard_count: self.discard.len(),
            flags: ActiveFlags {
                skip_next_turn: self.skip_next_turn,
                roll_override: self.roll_override,
                garbled: self.garbled,
                recursion_debt: self.recursion_debt,
                neutralize_next_card: self.neutralize_next_card,
                delayed_effects: self.delayed.len(),
            },
            dice_interval_ms: self.dice_interval_ms,
        }
    }
}

/// One-shot flags and queues currently set on a party.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFlags {
    pub skip_next_turn: bool,
    pub roll_override: Option<i64>,
    pub garbled: bool,
    pub recursion_debt: u32,
    pub neutralize_next_card: bool,
    pub delayed_effects: usize,
}

impl ActiveFlags {
    /// Whether nothing is set.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        *self == ActiveFlags::default()
    }
}

/// Read-only view of a party for front ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStateSnapshot {
    pub player: PlayerId,
    pub name: String,
    pub hp: i64,
    pub san: i64,
    pub pending: ResourceDeltas,
    pub base_action_points: i64,
    pub action_debt: i64,
    pub actions: i64,
    pub hand: Vec<String>,
    pub deck_count: usize,
    pub discard_count: usize,
    pub flags: ActiveFlags,
    pub dice_interval_ms: u64,
}
