//! Turn orchestration: the match state machine.
//!
//! A `Match` owns both parties, the RNG and the decision provider, and
//! walks the phases:
//!
//! ```text
//! MatchStart -> TurnStart -> SkipCheck -> ActionLoop -> EndOfTurnDraw
//!            -> DiscardPhase -> TurnStart (next party) ...
//! ```
//!
//! Automatic phases run on their own. The match stops and waits in exactly
//! two places: `ActionLoop` (play a card, end the turn, or surrender) and
//! `DiscardPhase` (discard until the hand fits). Callers either drive those
//! with [`Match::play_card`], [`Match::end_turn`] and [`Match::discard`], or
//! hand control to the decision provider with [`Match::run`].
//!
//! ## Implementation Notes
//!
//! - A refused request (`InvalidAction`) never changes state.
//! - Every play commits both parties, then checks death: actor first.
//! - Turn `t` belongs to the first mover when `t` is even.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::decision::{DecisionProvider, RollPurpose, TurnView};
use crate::cards::{CardCatalog, DeckBuilder, DiceSpec};
use crate::core::{
    CommitReport, EndReason, EngineError, GameRng, GameRngState, MatchConfig, MatchEvent,
    MatchOutcome, NeutralizedPolicy, PlayerId, PlayerMap, PlayerState, PlayerStateSnapshot,
    RandomSource, SkipReason, TurnChoice,
};
use crate::effects::{EffectContext, Resolution, ResolutionEngine};
use crate::games::duel::standard_catalog;

/// Where the match is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    MatchStart,
    TurnStart,
    SkipCheck,
    /// Waiting for the active party to play, end the turn or surrender.
    ActionLoop,
    EndOfTurnDraw,
    /// Waiting for the active party to discard down to the hand limit.
    DiscardPhase,
    Finished,
}

/// What one `play_card` call did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayReport {
    pub player: PlayerId,
    pub card: String,
    /// `None` when the card was neutralized.
    pub resolution: Option<Resolution>,
    /// Commit reports for actor and target, in that order.
    pub commits: SmallVec<[CommitReport; 2]>,
    /// Set when the play ended the match.
    pub outcome: Option<MatchOutcome>,
}

impl PlayReport {
    #[must_use]
    pub fn is_neutralized(&self) -> bool {
        self.resolution.is_none()
    }
}

/// A running duel.
///
/// ## Example
///
/// ```
/// use dice_duel::core::{MatchConfig, PlayerId, TurnChoice};
/// use dice_duel::rules::{Match, Phase, ScriptedDecisions};
///
/// let decisions = ScriptedDecisions::new().with_actions([TurnChoice::Surrender]);
/// let mut duel = Match::new(MatchConfig::new().with_seed(9), decisions).unwrap();
/// assert_eq!(duel.phase(), Phase::ActionLoop);
///
/// let loser = duel.active_player();
/// let outcome = duel.run().unwrap();
/// assert_eq!(outcome.loser, loser);
/// assert_eq!(duel.phase(), Phase::Finished);
/// ```
pub struct Match<D, R = GameRng> {
    config: MatchConfig,
    catalog: CardCatalog,
    rng: R,
    decisions: D,
    players: PlayerMap<PlayerState>,
    first_mover: PlayerId,
    turn_index: u32,
    phase: Phase,
    actions_remaining: i64,
    outcome: Option<MatchOutcome>,
    history: Vector<MatchEvent>,
}

impl<D: DecisionProvider> Match<D, GameRng> {
    /// Start a match with the catalog named in `config` and an RNG seeded
    /// from `config.seed`.
    pub fn new(config: MatchConfig, decisions: D) -> Result<Self, EngineError> {
        let catalog = standard_catalog(config.catalog)?;
        let rng = GameRng::new(config.seed);
        Self::with_parts(config, catalog, rng, decisions)
    }

    /// Checkpoint of the match RNG.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }
}

impl<D: DecisionProvider, R: RandomSource> Match<D, R> {
    /// Start a match from explicit parts.
    ///
    /// Builds both decks, deals the opening hands, rolls for the first move
    /// and runs up to the first decision.
    pub fn with_parts(
        config: MatchConfig,
        catalog: CardCatalog,
        mut rng: R,
        decisions: D,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let mut builder = DeckBuilder::new();
        let mut players = PlayerMap::new(|id| {
            PlayerState::new(
                id,
                id.to_string(),
                config.starting_hp,
                config.starting_san,
                config.vitality_cap,
            )
            .with_dice_interval(config.dice_interval_ms)
        });
        for (_, player) in players.iter_mut() {
            player.set_deck(builder.build(&catalog, config.deck_size, &mut rng)?);
        }

        let mut duel = Self {
            config,
            catalog,
            rng,
            decisions,
            players,
            first_mover: PlayerId::FIRST,
            turn_index: 0,
            phase: Phase::MatchStart,
            actions_remaining: 0,
            outcome: None,
            history: Vector::new(),
        };
        duel.match_start();
        duel.advance();
        Ok(duel)
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Party whose turn it is.
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        if self.turn_index % 2 == 0 {
            self.first_mover
        } else {
            self.first_mover.opponent()
        }
    }

    #[must_use]
    pub fn first_mover(&self) -> PlayerId {
        self.first_mover
    }

    #[must_use]
    pub fn turn_index(&self) -> u32 {
        self.turn_index
    }

    /// Both parties' turns make one round. Starts at 1.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.turn_index / 2 + 1
    }

    /// Action points the active party has left this turn.
    #[must_use]
    pub fn actions_remaining(&self) -> i64 {
        self.actions_remaining
    }

    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    /// Every event so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<MatchEvent> {
        &self.history
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id]
    }

    /// Direct access to a party, for setting up scenarios.
    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id]
    }

    #[must_use]
    pub fn decisions(&self) -> &D {
        &self.decisions
    }

    pub fn decisions_mut(&mut self) -> &mut D {
        &mut self.decisions
    }

    /// Observable state of `party`.
    #[must_use]
    pub fn query_state(&self, party: PlayerId) -> PlayerStateSnapshot {
        let player = &self.players[party];
        let actions = if party == self.active_player() && self.outcome.is_none() {
            self.actions_remaining
        } else {
            player.available_actions()
        };
        player.snapshot(actions)
    }

    /// What the active party sees when asked to decide.
    #[must_use]
    pub fn turn_view(&self) -> TurnView {
        let active = self.active_player();
        TurnView {
            player: active,
            turn_index: self.turn_index,
            round: self.round(),
            actions_remaining: self.actions_remaining,
            me: self.query_state(active),
            opponent: self.query_state(active.opponent()),
        }
    }

    // === Requests ===

    /// Play the card at `index` of the active party's hand against `target`.
    pub fn play_card(&mut self, index: usize, target: PlayerId) -> Result<PlayReport, EngineError> {
        self.expect_phase(Phase::ActionLoop)?;
        let active = self.active_player();
        if target == active {
            return Err(EngineError::invalid("a card cannot target the party playing it"));
        }

        let card = self.players[active].play_from_hand(index)?;
        let name = card.name().to_string();

        if self.players[active].take_neutralized() {
            let consumed = self.config.neutralized_policy == NeutralizedPolicy::ConsumesAction;
            if consumed {
                self.actions_remaining -= 1;
            }
            log::debug!("{} plays {}, but it is neutralized", self.players[active].name, name);
            self.record(MatchEvent::CardNeutralized {
                player: active,
                card: name.clone(),
                consumed_action: consumed,
            });
            self.advance();
            return Ok(PlayReport {
                player: active,
                card: name,
                resolution: None,
                commits: SmallVec::new(),
                outcome: None,
            });
        }

        let resolution = {
            let (actor, opponent) = self.players.pair_mut(active);
            let mut ctx = EffectContext::new(&mut self.rng, &mut self.decisions, self.turn_index)
                .with_interactive_dice(self.config.interactive_dice);
            ResolutionEngine::resolve(card.definition(), actor, opponent, &mut ctx)
        };
        self.actions_remaining -= 1;

        self.record(MatchEvent::CardPlayed {
            player: active,
            target,
            card: name.clone(),
            kind: resolution.kind,
            roll: resolution.roll,
            narrative: resolution.narrative.clone(),
        });

        let mut commits = SmallVec::new();
        for party in [active, target] {
            let report = self.players[party].commit();
            if report.changed() {
                self.record(MatchEvent::Committed(report));
            }
            commits.push(report);
        }

        for party in [active, target] {
            if self.players[party].is_dead() {
                self.finish(MatchOutcome::lost_by(party, EndReason::Death));
                break;
            }
        }

        self.advance();
        Ok(PlayReport {
            player: active,
            card: name,
            resolution: Some(resolution),
            commits,
            outcome: self.outcome,
        })
    }

    /// Stop playing cards this turn.
    pub fn end_turn(&mut self) -> Result<(), EngineError> {
        self.expect_phase(Phase::ActionLoop)?;
        log::debug!("{} ends the turn", self.players[self.active_player()].name);
        self.phase = Phase::EndOfTurnDraw;
        self.advance();
        Ok(())
    }

    /// Discard the card at `index` of the active party's hand.
    ///
    /// Returns the discarded card's name.
    pub fn discard(&mut self, index: usize) -> Result<String, EngineError> {
        self.expect_phase(Phase::DiscardPhase)?;
        let active = self.active_player();
        let card = self.players[active].discard_from_hand(index)?;
        let name = card.name().to_string();

        log::debug!("{} discards {}", self.players[active].name, name);
        self.record(MatchEvent::CardDiscarded {
            player: active,
            card: name.clone(),
        });
        self.advance();
        Ok(name)
    }

    /// `party` concedes; the other party wins.
    pub fn surrender(&mut self, party: PlayerId) -> Result<MatchOutcome, EngineError> {
        if self.outcome.is_some() {
            return Err(EngineError::MatchOver);
        }
        let outcome = MatchOutcome::lost_by(party, EndReason::Surrender);
        self.finish(outcome);
        Ok(outcome)
    }

    /// Drive the match with the decision provider until it ends.
    ///
    /// Refused choices are logged and asked for again.
    pub fn run(&mut self) -> Result<MatchOutcome, EngineError> {
        loop {
            if let Some(outcome) = self.outcome {
                return Ok(outcome);
            }
            let active = self.active_player();
            let result = match self.phase {
                Phase::ActionLoop => {
                    let view = self.turn_view();
                    match self.decisions.choose_action(&view) {
                        TurnChoice::Play(index) => {
                            self.play_card(index, active.opponent()).map(drop)
                        }
                        TurnChoice::EndTurn => self.end_turn(),
                        TurnChoice::Surrender => self.surrender(active).map(drop),
                    }
                }
                Phase::DiscardPhase => {
                    let view = self.turn_view();
                    let index = self.decisions.choose_discard(&view);
                    self.discard(index).map(drop)
                }
                _ => self.expect_phase(Phase::ActionLoop),
            };

            match result {
                Err(err) if err.is_invalid_action() => log::warn!("{err}, asking again"),
                other => other?,
            }
        }
    }

    // === Phases ===

    fn expect_phase(&self, phase: Phase) -> Result<(), EngineError> {
        if self.outcome.is_some() {
            return Err(EngineError::MatchOver);
        }
        if self.phase != phase {
            return Err(EngineError::invalid(format!(
                "expected {phase:?}, match is in {:?}",
                self.phase
            )));
        }
        Ok(())
    }

    fn record(&mut self, event: MatchEvent) {
        self.decisions.observe(&event);
        self.history.push_back(event);
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        log::info!(
            "{} wins, {} lost by {:?}",
            outcome.winner,
            outcome.loser,
            outcome.reason
        );
        self.outcome = Some(outcome);
        self.phase = Phase::Finished;
        self.record(MatchEvent::MatchEnded(outcome));
    }

    fn draw_card(&mut self, party: PlayerId) {
        let drawn = self.players[party].draw(&mut self.rng);
        match drawn.card {
            Some(card) => self.record(MatchEvent::CardDrawn {
                player: party,
                card,
                reshuffled: drawn.reshuffled,
            }),
            None => self.record(MatchEvent::DrawFailed { player: party }),
        }
    }

    fn roll(&mut self, party: PlayerId, dice: DiceSpec) -> i64 {
        let mut ctx = EffectContext::new(&mut self.rng, &mut self.decisions, self.turn_index)
            .with_interactive_dice(self.config.interactive_dice);
        ctx.roll(&mut self.players[party], "first move", dice, RollPurpose::FirstMover)
    }

    fn match_start(&mut self) {
        for party in [PlayerId::FIRST, PlayerId::SECOND] {
            for _ in 0..self.config.starting_hand {
                self.draw_card(party);
            }
        }

        let die = DiceSpec::d(self.config.first_mover_die);
        let mut rolls = SmallVec::new();
        let first = self.roll(PlayerId::FIRST, die);
        let second = self.roll(PlayerId::SECOND, die);
        rolls.push((first, second));

        let first_mover = if first != second {
            if first > second {
                PlayerId::FIRST
            } else {
                PlayerId::SECOND
            }
        } else {
            let first = self.roll(PlayerId::FIRST, die);
            let second = self.roll(PlayerId::SECOND, die);
            rolls.push((first, second));
            if first >= second {
                PlayerId::FIRST
            } else {
                PlayerId::SECOND
            }
        };

        log::info!("first mover: {first_mover} (rolls {rolls:?})");
        self.first_mover = first_mover;
        self.record(MatchEvent::FirstMoverRolled { rolls, first_mover });
        self.phase = Phase::TurnStart;
    }

    /// Run automatic phases until a decision is needed or the match ends.
    fn advance(&mut self) {
        loop {
            if self.outcome.is_some() {
                self.phase = Phase::Finished;
                return;
            }
            log::trace!("turn {} phase {:?}", self.turn_index, self.phase);
            match self.phase {
                Phase::MatchStart => self.match_start(),
                Phase::TurnStart => self.turn_start(),
                Phase::SkipCheck => self.skip_check(),
                Phase::ActionLoop => {
                    if self.awaiting_action() {
                        return;
                    }
                }
                Phase::EndOfTurnDraw => {
                    self.draw_card(self.active_player());
                    self.phase = Phase::DiscardPhase;
                }
                Phase::DiscardPhase => {
                    let player = &self.players[self.active_player()];
                    if player.hand().len() > player.hand_limit() {
                        return;
                    }
                    self.end_of_turn();
                }
                Phase::Finished => return,
            }
        }
    }

    fn turn_start(&mut self) {
        let active = self.active_player();
        log::info!(
            "turn {} (round {}): {}",
            self.turn_index,
            self.round(),
            self.players[active].name
        );
        self.record(MatchEvent::TurnStarted {
            player: active,
            turn_index: self.turn_index,
            round: self.round(),
        });

        self.players[active].recompute_base_actions();
        self.fire_delayed_effects(active);
        if self.outcome.is_some() {
            return;
        }

        if self.players[active].action_debt() > 0 {
            let recovered = self.players[active].recover_action_debt();
            let remaining = self.players[active].action_debt();
            log::debug!("{active} pays back {recovered} action debt, {remaining} left");
            self.record(MatchEvent::ActionDebtRecovered {
                player: active,
                recovered,
                remaining,
            });
        }
        self.phase = Phase::SkipCheck;
    }

    /// Drain due delayed effects, the active party's queue first.
    fn fire_delayed_effects(&mut self, active: PlayerId) {
        for owner in [active, active.opponent()] {
            let due = self.players[owner].take_due_effects(self.turn_index);
            for effect in due {
                let description = effect.apply(&mut self.players[owner]);
                log::debug!("{description}");
                self.record(MatchEvent::DelayedEffectFired {
                    player: owner,
                    description,
                });
                let report = self.players[owner].commit();
                self.record(MatchEvent::Committed(report));

                if self.players[owner].is_dead() {
                    self.finish(MatchOutcome::lost_by(owner, EndReason::Death));
                    return;
                }
            }
        }
    }

    fn skip_check(&mut self) {
        let active = self.active_player();
        let player = &mut self.players[active];
        let reason = if player.take_skip_next_turn() {
            Some(SkipReason::Flagged)
        } else if player.available_actions() == 0 {
            Some(SkipReason::ActionDebt)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                log::debug!("{active} skips the turn ({reason:?})");
                self.actions_remaining = 0;
                self.record(MatchEvent::TurnSkipped {
                    player: active,
                    reason,
                });
                self.draw_card(active);
                self.phase = Phase::DiscardPhase;
            }
            None => {
                self.actions_remaining = self.players[active].available_actions();
                self.phase = Phase::ActionLoop;
            }
        }
    }

    /// Whether the action loop needs a decision. Otherwise moves on.
    fn awaiting_action(&mut self) -> bool {
        let active = self.active_player();
        if self.actions_remaining <= 0 {
            self.phase = Phase::EndOfTurnDraw;
            return false;
        }
        if self.players[active].hand().is_empty() {
            log::debug!("{active} has no cards, forced draw");
            self.draw_card(active);
            self.phase = Phase::EndOfTurnDraw;
            return false;
        }
        true
    }

    fn end_of_turn(&mut self) {
        self.record(MatchEvent::TurnEnded {
            player: self.active_player(),
            turn_index: self.turn_index,
        });
        self.turn_index += 1;
        self.phase = Phase::TurnStart;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};
    use crate::core::ScriptedRolls;
    use crate::effects::{DirectEffect, EffectTarget, Vital};
    use crate::rules::ScriptedDecisions;

    fn jab_catalog() -> CardCatalog {
        CardCatalog::from_definitions([CardDefinition::new(CardId::new(1), "Jab")
            .with_direct(DirectEffect::adjust(EffectTarget::Target, Vital::Hp, -1))])
        .unwrap()
    }

    fn scripted(rolls: &[i64]) -> Match<ScriptedDecisions, ScriptedRolls> {
        Match::with_parts(
            MatchConfig::new(),
            jab_catalog(),
            ScriptedRolls::new(rolls.iter().copied()),
            ScriptedDecisions::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_first_mover_by_higher_roll() {
        assert_eq!(scripted(&[2, 5]).first_mover(), PlayerId::SECOND);
        assert_eq!(scripted(&[5, 2]).first_mover(), PlayerId::FIRST);
    }

    #[test]
    fn test_first_mover_double_tie_favors_first() {
        let duel = scripted(&[3, 3, 4, 4]);
        assert_eq!(duel.first_mover(), PlayerId::FIRST);
        match duel.history().iter().find(|e| matches!(e, MatchEvent::FirstMoverRolled { .. })) {
            Some(MatchEvent::FirstMoverRolled { rolls, .. }) => assert_eq!(rolls.len(), 2),
            other => panic!("unexpected {other:?}"),
        }

        assert_eq!(scripted(&[3, 3, 1, 6]).first_mover(), PlayerId::SECOND);
    }

    #[test]
    fn test_opening_state() {
        let duel = scripted(&[6, 1]);
        assert_eq!(duel.phase(), Phase::ActionLoop);
        assert_eq!(duel.turn_index(), 0);
        assert_eq!(duel.round(), 1);
        assert_eq!(duel.actions_remaining(), 5);
        for party in PlayerId::both() {
            assert_eq!(duel.player(party).hand().len(), 5);
            assert_eq!(duel.player(party).deck_len(), 7);
        }
    }

    #[test]
    fn test_self_target_rejected_without_change() {
        let mut duel = scripted(&[6, 1]);
        let err = duel.play_card(0, PlayerId::FIRST).unwrap_err();
        assert!(err.is_invalid_action());
        assert_eq!(duel.player(PlayerId::FIRST).hand().len(), 5);
        assert_eq!(duel.actions_remaining(), 5);
    }

    #[test]
    fn test_wrong_phase_requests_rejected() {
        let mut duel = scripted(&[6, 1]);
        assert!(duel.discard(0).unwrap_err().is_invalid_action());

        duel.surrender(PlayerId::SECOND).unwrap();
        assert_eq!(duel.end_turn(), Err(EngineError::MatchOver));
        assert_eq!(duel.surrender(PlayerId::FIRST), Err(EngineError::MatchOver));
    }

    #[test]
    fn test_turns_alternate() {
        let mut duel = scripted(&[6, 1]);
        duel.end_turn().unwrap();
        // 6 cards in hand, limit 5.
        assert_eq!(duel.phase(), Phase::DiscardPhase);
        duel.discard(0).unwrap();

        assert_eq!(duel.turn_index(), 1);
        assert_eq!(duel.active_player(), PlayerId::SECOND);
        assert_eq!(duel.round(), 1);
    }

    #[test]
    fn test_query_state_reports_actions() {
        let mut duel = scripted(&[6, 1]);
        duel.play_card(0, PlayerId::SECOND).unwrap();

        assert_eq!(duel.query_state(PlayerId::FIRST).actions, 4);
        assert_eq!(duel.query_state(PlayerId::SECOND).actions, 5);
        assert_eq!(duel.query_state(PlayerId::SECOND).hp, 9);
    }
}
