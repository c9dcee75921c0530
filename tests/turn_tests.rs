//! Turn state machine tests.
//!
//! These tests drive a `Match` step by step with scripted dice:
//! - Turn start: delayed effects, action debt, skips
//! - Action loop: plays, neutralized cards, forced draws, death
//! - End of turn: draws, reshuffles, discards

use dice_duel::cards::{CardCatalog, CardDefinition, CardId, DiceSpec};
use dice_duel::core::{
    ConfigurationError, EndReason, EngineError, MatchConfig, MatchEvent, NeutralizedPolicy,
    PlayerId, ScriptedRolls, SkipReason,
};
use dice_duel::effects::{
    DelayedEffect, DelayedKind, DirectEffect, EffectTarget, OutcomeTable, RollRange,
    TerminalEffect, Vital,
};
use dice_duel::rules::{Match, Phase, ScriptedDecisions};

const A: PlayerId = PlayerId::FIRST;
const B: PlayerId = PlayerId::SECOND;

fn jab_catalog() -> CardCatalog {
    CardCatalog::from_definitions([CardDefinition::new(CardId::new(1), "Jab")
        .with_direct(DirectEffect::adjust(EffectTarget::Target, Vital::Hp, -1))])
    .unwrap()
}

/// A match where party A moves first.
fn duel(config: MatchConfig, catalog: CardCatalog) -> Match<ScriptedDecisions, ScriptedRolls> {
    Match::with_parts(config, catalog, ScriptedRolls::new([6, 1]), ScriptedDecisions::new())
        .unwrap()
}

fn jab_duel() -> Match<ScriptedDecisions, ScriptedRolls> {
    duel(MatchConfig::new(), jab_catalog())
}

/// The active party ends the turn and discards down to the limit.
fn pass_turn(duel: &mut Match<ScriptedDecisions, ScriptedRolls>) {
    let active = duel.active_player();
    duel.end_turn().unwrap();
    while duel.phase() == Phase::DiscardPhase && duel.active_player() == active {
        duel.discard(0).unwrap();
    }
}

fn skipped(duel: &Match<ScriptedDecisions, ScriptedRolls>) -> Vec<(PlayerId, SkipReason)> {
    duel.history()
        .iter()
        .filter_map(|event| match event {
            MatchEvent::TurnSkipped { player, reason } => Some((*player, *reason)),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Turn Start
// =============================================================================

/// Test that a flagged party loses exactly one turn.
#[test]
fn test_skip_flag_costs_one_turn() {
    let mut duel = jab_duel();
    duel.player_mut(B).set_skip_next_turn();

    pass_turn(&mut duel);
    // B skipped, drew to 6 and has to discard.
    assert_eq!(duel.phase(), Phase::DiscardPhase);
    assert_eq!(duel.active_player(), B);
    duel.discard(0).unwrap();

    assert_eq!(skipped(&duel), vec![(B, SkipReason::Flagged)]);
    assert_eq!(duel.turn_index(), 2);
    assert_eq!(duel.active_player(), A);
    assert!(!duel.player(B).skip_next_turn());
}

/// Test that action debt is paid back before actions are granted.
#[test]
fn test_partial_action_debt() {
    let mut duel = jab_duel();
    duel.player_mut(B).set_action_debt(7);

    pass_turn(&mut duel);

    assert_eq!(duel.active_player(), B);
    assert_eq!(duel.player(B).action_debt(), 2);
    assert_eq!(duel.actions_remaining(), 3);
    assert!(duel.history().iter().any(|event| matches!(
        event,
        MatchEvent::ActionDebtRecovered { player, recovered: 5, remaining: 2 } if *player == B
    )));
}

/// Test that debt larger than the budget blocks the turn.
#[test]
fn test_heavy_action_debt_skips() {
    let mut duel = jab_duel();
    duel.player_mut(B).set_action_debt(300);

    pass_turn(&mut duel);
    while duel.phase() == Phase::DiscardPhase {
        duel.discard(0).unwrap();
    }

    assert_eq!(skipped(&duel), vec![(B, SkipReason::ActionDebt)]);
    assert_eq!(duel.player(B).action_debt(), 295);
    assert_eq!(duel.active_player(), A);
}

/// Test that a delayed effect fires at its turn and is committed.
#[test]
fn test_delayed_effect_fires_on_time() {
    let mut duel = jab_duel();
    duel.player_mut(A).san = 3;
    duel.player_mut(A).schedule(DelayedEffect::new(
        2,
        DelayedKind::Restore {
            vital: Vital::San,
            amount: 5,
        },
        "Chicken Machine",
    ));

    pass_turn(&mut duel);
    assert_eq!(duel.player(A).san, 3);

    pass_turn(&mut duel);
    assert_eq!(duel.turn_index(), 2);
    assert_eq!(duel.player(A).san, 8);
    assert!(duel.player(A).delayed_effects().is_empty());
}

/// Test that delayed effects of the waiting party fire too.
#[test]
fn test_delayed_effects_drain_both_parties() {
    let mut duel = jab_duel();
    duel.player_mut(A).san = 3;
    duel.player_mut(A).schedule(DelayedEffect::new(
        1,
        DelayedKind::Restore {
            vital: Vital::San,
            amount: 5,
        },
        "Chicken Machine",
    ));

    pass_turn(&mut duel);

    assert_eq!(duel.active_player(), B);
    assert_eq!(duel.player(A).san, 8);
}

/// Test that a lethal delayed effect ends the match at turn start.
#[test]
fn test_delayed_effect_can_kill() {
    let mut duel = jab_duel();
    duel.player_mut(B).schedule(DelayedEffect::new(
        1,
        DelayedKind::Restore {
            vital: Vital::Hp,
            amount: -10,
        },
        "Curse",
    ));

    pass_turn(&mut duel);

    let outcome = duel.outcome().unwrap();
    assert_eq!(outcome.loser, B);
    assert_eq!(outcome.reason, EndReason::Death);
    assert_eq!(duel.phase(), Phase::Finished);
}

// =============================================================================
// Action Loop
// =============================================================================

/// Test that each play spends one action and commits the target.
#[test]
fn test_play_spends_action_and_commits() {
    let mut duel = jab_duel();
    let report = duel.play_card(0, B).unwrap();

    assert_eq!(report.card, "Jab");
    assert!(!report.is_neutralized());
    assert_eq!(report.commits[1].hp_after, 9);
    assert_eq!(duel.actions_remaining(), 4);
    assert_eq!(duel.player(A).hand().len(), 4);
    assert_eq!(duel.player(A).discard_pile().len(), 1);
}

/// Test that spending the last action ends the turn.
#[test]
fn test_turn_ends_when_actions_run_out() {
    let mut duel = jab_duel();
    for _ in 0..5 {
        duel.play_card(0, B).unwrap();
    }

    // Hand was 5, drew 1 at end of turn: 1 card, nothing to discard.
    assert_eq!(duel.active_player(), B);
    assert_eq!(duel.player(A).hand().len(), 1);
    assert_eq!(duel.player(B).hp, 5);
}

/// Test that a bad index is refused without touching the match.
#[test]
fn test_invalid_index_changes_nothing() {
    let mut duel = jab_duel();
    let events = duel.history().len();

    let err = duel.play_card(9, B).unwrap_err();
    assert!(err.is_invalid_action());
    assert_eq!(duel.history().len(), events);
    assert_eq!(duel.actions_remaining(), 5);

    assert!(duel.discard(0).unwrap_err().is_invalid_action());
}

/// Test that a bad discard index leaves the discard phase untouched.
#[test]
fn test_invalid_discard_changes_nothing() {
    let mut duel = jab_duel();
    duel.end_turn().unwrap();
    assert_eq!(duel.phase(), Phase::DiscardPhase);
    assert_eq!(duel.player(A).hand().len(), 6);
    let events = duel.history().len();

    assert!(duel.discard(9).unwrap_err().is_invalid_action());
    assert_eq!(duel.phase(), Phase::DiscardPhase);
    assert_eq!(duel.active_player(), A);
    assert_eq!(duel.player(A).hand().len(), 6);
    assert!(duel.player(A).discard_pile().is_empty());
    assert_eq!(duel.history().len(), events);

    duel.discard(0).unwrap();
    assert_eq!(duel.player(A).hand().len(), 5);
    assert_eq!(duel.active_player(), B);
}

/// Test a neutralized card under the default policy.
#[test]
fn test_neutralized_card_spends_action() {
    let mut duel = jab_duel();
    duel.player_mut(A).set_neutralize_next_card();

    let report = duel.play_card(0, B).unwrap();

    assert!(report.is_neutralized());
    assert_eq!(duel.player(B).hp, 10);
    assert_eq!(duel.actions_remaining(), 4);
    assert_eq!(duel.player(A).discard_pile().len(), 1);
    assert!(!duel.player(A).neutralize_next_card());
}

/// Test a neutralized card under the free policy.
#[test]
fn test_neutralized_card_free_policy() {
    let config = MatchConfig::new().with_neutralized_policy(NeutralizedPolicy::Free);
    let mut duel = duel(config, jab_catalog());
    duel.player_mut(A).set_neutralize_next_card();

    duel.play_card(0, B).unwrap();
    assert_eq!(duel.actions_remaining(), 5);
    assert_eq!(duel.player(A).hand().len(), 4);

    duel.play_card(0, B).unwrap();
    assert_eq!(duel.player(B).hp, 9);
}

/// Test that an empty hand forces a draw and ends the loop.
#[test]
fn test_empty_hand_forces_draw() {
    let config = MatchConfig::new().with_starting_hand(0);
    let duel = duel(config, jab_catalog());

    // Both opening turns were a forced draw plus the end-of-turn draw.
    assert_eq!(duel.turn_index(), 2);
    assert_eq!(duel.phase(), Phase::ActionLoop);
    assert_eq!(duel.player(A).hand().len(), 2);
    assert_eq!(duel.player(B).hand().len(), 2);
}

/// Test that the discard pile is reshuffled when the deck runs dry.
#[test]
fn test_reshuffle_on_empty_deck() {
    let config = MatchConfig::new().with_deck_size(5);
    let mut duel = duel(config, jab_catalog());
    assert_eq!(duel.player(A).deck_len(), 0);

    for _ in 0..5 {
        duel.play_card(0, B).unwrap();
    }

    assert!(duel.history().iter().any(|event| matches!(
        event,
        MatchEvent::CardDrawn { player, reshuffled: true, .. } if *player == A
    )));
    assert_eq!(duel.player(A).hand().len(), 1);
    assert_eq!(duel.player(A).deck_len(), 4);
    assert_eq!(duel.player(A).card_count(), 5);
}

// =============================================================================
// Match End
// =============================================================================

/// Test that killing the target ends the match and freezes it.
#[test]
fn test_death_ends_match() {
    let mut duel = jab_duel();
    duel.player_mut(B).hp = 1;

    let report = duel.play_card(0, B).unwrap();

    let outcome = report.outcome.unwrap();
    assert_eq!((outcome.winner, outcome.loser), (A, B));
    assert_eq!(duel.phase(), Phase::Finished);
    assert_eq!(duel.play_card(0, B).unwrap_err(), EngineError::MatchOver);
    assert_eq!(duel.end_turn().unwrap_err(), EngineError::MatchOver);
}

/// Test that the actor's death is reported when both parties die.
#[test]
fn test_mutual_death_reports_actor() {
    let both_bleed = CardDefinition::new(CardId::new(2), "Bloodletting")
        .with_dice(DiceSpec::d(1))
        .with_outcomes(OutcomeTable::new().with_terminal(
            RollRange::single(1),
            TerminalEffect::Batch(vec![
                TerminalEffect::adjust(EffectTarget::Actor, Vital::Hp, -1),
                TerminalEffect::adjust(EffectTarget::Target, Vital::Hp, -1),
            ]),
        ));
    let catalog = CardCatalog::from_definitions([both_bleed]).unwrap();
    let mut duel = duel(MatchConfig::new(), catalog);
    duel.player_mut(A).hp = 1;
    duel.player_mut(B).hp = 1;

    duel.play_card(0, B).unwrap();

    let outcome = duel.outcome().unwrap();
    assert_eq!(outcome.loser, A);
    assert_eq!(outcome.winner, B);
}

/// Test that a party may surrender on the other party's turn.
#[test]
fn test_surrender() {
    let mut duel = jab_duel();
    let outcome = duel.surrender(B).unwrap();

    assert_eq!(outcome.winner, A);
    assert_eq!(outcome.reason, EndReason::Surrender);
    assert!(matches!(duel.history().last(), Some(MatchEvent::MatchEnded(_))));
}

/// Test that a zero-card deck never starts a match.
#[test]
fn test_zero_deck_refused() {
    let config = MatchConfig::new().with_deck_size(0);
    let result = Match::with_parts(
        config,
        jab_catalog(),
        ScriptedRolls::default(),
        ScriptedDecisions::new(),
    );
    assert!(matches!(result, Err(EngineError::Configuration(_))));
}

/// Test that a first-mover die with no sides is refused instead of rolled.
#[test]
fn test_faceless_first_mover_die_refused() {
    let mut config = MatchConfig::new();
    config.first_mover_die = 0;
    let result = Match::new(config, ScriptedDecisions::new());
    assert!(matches!(
        result,
        Err(EngineError::Configuration(ConfigurationError::FirstMoverDie(0)))
    ));
}
