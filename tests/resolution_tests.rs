//! Card resolution tests.
//!
//! These tests drive `ResolutionEngine` directly with scripted dice:
//! - Confirmation rolls from recursion debt
//! - Presets, no-match rolls and nested tables
//! - The standard card behaviors

use dice_duel::cards::{CardDefinition, CardId, DiceSpec};
use dice_duel::core::{CatalogVariant, PlayerId, PlayerState, ScriptedRolls};
use dice_duel::effects::{
    EffectContext, EffectTarget, Outcome, OutcomeTable, Resolution, ResolutionEngine,
    ResolutionKind, RollRange, Stat, TerminalEffect, Vital,
};
use dice_duel::games::duel::{ids, standard_catalog};
use dice_duel::rules::ScriptedDecisions;

/// Two fresh parties plus scripted dice and decisions.
struct Table {
    actor: PlayerState,
    target: PlayerState,
    rng: ScriptedRolls,
    decisions: ScriptedDecisions,
}

impl Table {
    fn new(rolls: &[i64]) -> Self {
        Self {
            actor: PlayerState::new(PlayerId::FIRST, "A", 10, 10, 10),
            target: PlayerState::new(PlayerId::SECOND, "B", 10, 10, 10),
            rng: ScriptedRolls::new(rolls.iter().copied()),
            decisions: ScriptedDecisions::new(),
        }
    }

    fn play(&mut self, card: &CardDefinition) -> Resolution {
        let mut ctx = EffectContext::new(&mut self.rng, &mut self.decisions, 0);
        ResolutionEngine::resolve(card, &mut self.actor, &mut self.target, &mut ctx)
    }

    fn play_standard(&mut self, id: CardId) -> Resolution {
        let catalog = standard_catalog(CatalogVariant::WithDebug).unwrap();
        let card = catalog.get(id).unwrap().clone();
        self.play(&card)
    }
}

/// d6 card: 1-3 hits the target for 1 HP.
fn low_roll_jab() -> CardDefinition {
    CardDefinition::new(CardId::new(90), "Low Jab")
        .with_dice(DiceSpec::d(6))
        .with_outcomes(OutcomeTable::new().with_terminal(
            RollRange::new(1, 3),
            TerminalEffect::adjust(EffectTarget::Target, Vital::Hp, -1),
        ))
}

// =============================================================================
// Recursion Debt
// =============================================================================

/// Test that two of three rolls in range confirms the effect.
#[test]
fn test_two_of_three_confirms() {
    let mut table = Table::new(&[2, 3, 6]);
    table.actor.set_recursion_debt(2);

    let resolution = table.play(&low_roll_jab());

    assert_eq!(resolution.kind, ResolutionKind::Applied);
    assert_eq!(resolution.roll, Some(2));
    assert_eq!(resolution.target_delta.hp, -1);
    assert_eq!(table.actor.recursion_debt(), 0);
}

/// Test that one of three rolls in range cancels the effect.
#[test]
fn test_one_of_three_fails() {
    let mut table = Table::new(&[2, 5, 6]);
    table.actor.set_recursion_debt(2);

    let resolution = table.play(&low_roll_jab());

    assert_eq!(resolution.kind, ResolutionKind::ConfirmationFailed);
    assert!(resolution.target_delta.is_zero());
    assert_eq!(table.actor.recursion_debt(), 0);
    assert_eq!(table.rng.drawn(), 3);
}

/// Test that a single confirmation always passes: the original roll is a majority.
#[test]
fn test_single_confirmation_passes() {
    let mut table = Table::new(&[1, 6]);
    table.actor.set_recursion_debt(1);

    let resolution = table.play(&low_roll_jab());

    assert_eq!(resolution.kind, ResolutionKind::Applied);
    assert_eq!(table.rng.drawn(), 2);
}

/// Test that no confirmations are rolled when the first roll misses.
#[test]
fn test_debt_cleared_on_no_match() {
    let mut table = Table::new(&[5]);
    table.actor.set_recursion_debt(2);

    let resolution = table.play(&low_roll_jab());

    assert_eq!(resolution.kind, ResolutionKind::NoMatch);
    assert!(resolution.actor_delta.is_zero());
    assert!(resolution.target_delta.is_zero());
    assert_eq!(table.actor.recursion_debt(), 0);
    assert_eq!(table.rng.drawn(), 1);
}

// =============================================================================
// Presets and Nested Tables
// =============================================================================

/// Test that a legal preset replaces the sample and is consumed.
#[test]
fn test_preset_roll_is_used_once() {
    let mut table = Table::new(&[6]);
    table.actor.set_roll_override(3);

    let first = table.play(&low_roll_jab());
    assert_eq!(first.roll, Some(3));
    assert_eq!(first.kind, ResolutionKind::Applied);
    assert_eq!(table.rng.drawn(), 0);

    let second = table.play(&low_roll_jab());
    assert_eq!(second.roll, Some(6));
    assert_eq!(second.kind, ResolutionKind::NoMatch);
}

/// Test that a nested table takes a fresh roll of the same die.
#[test]
fn test_nested_table_rolls_again() {
    let inner = OutcomeTable::new()
        .with_terminal(
            RollRange::new(1, 3),
            TerminalEffect::adjust(EffectTarget::Target, Vital::Hp, -1),
        )
        .with_terminal(
            RollRange::new(4, 6),
            TerminalEffect::adjust(EffectTarget::Target, Vital::Hp, -2),
        );
    let card = CardDefinition::new(CardId::new(91), "Double Or Nothing")
        .with_dice(DiceSpec::d(6))
        .with_outcomes(OutcomeTable::new().with(RollRange::new(1, 6), Outcome::Nested(inner)));

    let mut table = Table::new(&[1, 5]);
    let resolution = table.play(&card);

    assert_eq!(resolution.kind, ResolutionKind::Applied);
    assert_eq!(resolution.roll, Some(1));
    assert_eq!(resolution.target_delta.hp, -2);
}

/// Test that nothing is committed by a resolution.
#[test]
fn test_resolution_only_stages() {
    let mut table = Table::new(&[2]);
    table.play(&low_roll_jab());

    assert_eq!(table.target.hp, 10);
    assert_eq!(table.target.pending().hp, -1);

    let report = table.target.commit();
    assert_eq!(report.hp_after, 9);
    assert!(table.target.pending().is_zero());
}

// =============================================================================
// Standard Cards
// =============================================================================

/// Test Blood Frenzy on a low and a high roll.
#[test]
fn test_blood_frenzy() {
    let mut table = Table::new(&[2, 6]);

    let low = table.play_standard(ids::BLOOD_FRENZY);
    assert_eq!(low.target_delta.hp, -3);
    assert_eq!(low.actor_delta.san, -1);

    let high = table.play_standard(ids::BLOOD_FRENZY);
    assert!(high.target_delta.is_zero());
    assert_eq!(high.actor_delta.san, -2);
}

/// Test that a roll of 17 falls in the 17-19 range but deals 1.
#[test]
fn test_twilight_lizard_boundaries() {
    let mut table = Table::new(&[17, 18, 24]);

    assert_eq!(table.play_standard(ids::TWILIGHT_LIZARD).target_delta.hp, -1);
    assert_eq!(table.play_standard(ids::TWILIGHT_LIZARD).target_delta.hp, -4);
    assert_eq!(table.play_standard(ids::TWILIGHT_LIZARD).target_delta.hp, -2);
}

/// Test that Mentos God heals up to the cap and no further.
#[test]
fn test_mentos_god_caps_heals() {
    let mut table = Table::new(&[7, 5]);
    table.actor.san = 6;

    let resolution = table.play_standard(ids::MENTOS_GOD);

    assert_eq!(resolution.actor_delta.san, 3);
    // HP is already at the cap.
    assert_eq!(resolution.actor_delta.hp, 0);
}

/// Test Turtle 300 hitting the action pool.
#[test]
fn test_turtle_sets_action_debt() {
    let mut table = Table::new(&[300]);
    table.decisions = ScriptedDecisions::new().with_stats([Stat::Actions]);

    let resolution = table.play_standard(ids::TURTLE_300);

    assert_eq!(resolution.kind, ResolutionKind::Applied);
    assert_eq!(table.target.action_debt(), 300);
    assert!(resolution.target_delta.is_zero());
}

/// Test that Void Box sets the target's confirmations from the roll.
#[test]
fn test_void_box_tiers() {
    let mut table = Table::new(&[1, 3, 5]);

    table.play_standard(ids::VOID_BOX);
    assert_eq!(table.target.recursion_debt(), 0);
    table.play_standard(ids::VOID_BOX);
    assert_eq!(table.target.recursion_debt(), 1);
    table.play_standard(ids::VOID_BOX);
    assert_eq!(table.target.recursion_debt(), 2);
}

/// Test that Strawman Fallacy only neutralizes on a 1.
#[test]
fn test_strawman_fallacy() {
    let mut table = Table::new(&[2, 1]);

    let miss = table.play_standard(ids::STRAWMAN_FALLACY);
    assert_eq!(miss.kind, ResolutionKind::NoMatch);
    assert!(!table.target.neutralize_next_card());

    table.play_standard(ids::STRAWMAN_FALLACY);
    assert!(table.target.neutralize_next_card());
}

/// Test that the Debug Card preset feeds the next dice card.
#[test]
fn test_debug_card_presets_next_roll() {
    let mut table = Table::new(&[]);
    table.decisions = ScriptedDecisions::new().with_presets([Some(19)]);

    let direct = table.play_standard(ids::DEBUG_CARD);
    assert_eq!(direct.kind, ResolutionKind::Direct);

    let lizard = table.play_standard(ids::TWILIGHT_LIZARD);
    assert_eq!(lizard.roll, Some(19));
    assert_eq!(lizard.target_delta.hp, -4);
}

/// Test that the Chicken Machine refund waits four turns.
#[test]
fn test_chicken_machine_schedules_refund() {
    let mut table = Table::new(&[]);
    let resolution = table.play_standard(ids::CHICKEN_MACHINE);

    assert_eq!(resolution.actor_delta.san, -2);
    let queued = table.actor.delayed_effects();
    assert_eq!(queued.len(), 1);
    assert!(!queued[0].is_due(3));
    assert!(queued[0].is_due(4));
}
