//! Plain-text rendering of snapshots and match events for the console.

use crate::core::{ActiveFlags, EndReason, MatchEvent, PlayerStateSnapshot, SkipReason};

use super::ticker::GARBLED_CHARS;

/// `HP:10 SAN:10 actions:5` plus debt and pile sizes.
#[must_use]
pub fn status_line(snapshot: &PlayerStateSnapshot) -> String {
    let mut line = format!(
        "{} -> HP:{} SAN:{} actions:{}",
        snapshot.name, snapshot.hp, snapshot.san, snapshot.actions
    );
    if snapshot.action_debt > 0 {
        line.push_str(&format!(" (debt {})", snapshot.action_debt));
    }
    line.push_str(&format!(
        " | hand {} deck {} discard {}",
        snapshot.hand.len(),
        snapshot.deck_count,
        snapshot.discard_count
    ));
    if let Some(flags) = flags_line(&snapshot.flags) {
        line.push_str(" | ");
        line.push_str(&flags);
    }
    line
}

/// Active one-shot flags, or `None` when nothing is set.
#[must_use]
pub fn flags_line(flags: &ActiveFlags) -> Option<String> {
    let mut parts = Vec::new();
    if flags.skip_next_turn {
        parts.push("skips next turn".to_string());
    }
    if let Some(value) = flags.roll_override {
        parts.push(format!("preset roll {value}"));
    }
    if flags.garbled {
        parts.push("garbled dice".to_string());
    }
    if flags.recursion_debt > 0 {
        parts.push(format!("{} confirmation roll(s)", flags.recursion_debt));
    }
    if flags.neutralize_next_card {
        parts.push("next card neutralized".to_string());
    }
    if flags.delayed_effects > 0 {
        parts.push(format!("{} delayed effect(s)", flags.delayed_effects));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// `0:Normal Attack, 1:Void Box`
#[must_use]
pub fn hand_listing(hand: &[String]) -> String {
    hand.iter()
        .enumerate()
        .map(|(i, name)| format!("{i}:{name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lines describing `event`. Empty for events the console does not show.
///
/// With `hide_roll`, a card's roll is printed as garbage.
#[must_use]
pub fn describe_event(event: &MatchEvent, hide_roll: bool) -> Vec<String> {
    match event {
        MatchEvent::FirstMoverRolled { rolls, first_mover } => {
            let mut lines: Vec<String> = rolls
                .iter()
                .map(|(a, b)| format!("Party A rolls {a}, Party B rolls {b}"))
                .collect();
            lines.push(format!("{first_mover} moves first"));
            lines
        }
        MatchEvent::TurnStarted {
            player,
            turn_index,
            round,
        } => vec![format!("===== Round {round} (turn {turn_index}): {player} =====")],
        MatchEvent::DelayedEffectFired { description, .. } => vec![description.clone()],
        MatchEvent::ActionDebtRecovered {
            player,
            recovered,
            remaining,
        } => vec![format!(
            "{player} recovers {recovered} action debt, {remaining} left"
        )],
        MatchEvent::TurnSkipped { player, reason } => vec![match reason {
            SkipReason::Flagged => format!("{player} is forced to skip this turn"),
            SkipReason::ActionDebt => format!("{player} has no actions left and skips the turn"),
        }],
        MatchEvent::CardDrawn {
            player,
            card,
            reshuffled,
        } => {
            let mut lines = Vec::new();
            if *reshuffled {
                lines.push(format!("{player} shuffles the discard pile into the deck"));
            }
            lines.push(format!("{player} draws {card}"));
            lines
        }
        MatchEvent::DrawFailed { player } => vec![format!("{player} has nothing left to draw")],
        MatchEvent::CardPlayed {
            player,
            target,
            card,
            roll,
            narrative,
            ..
        } => {
            let mut lines = vec![format!("{player} plays {card} on {target}")];
            if let Some(roll) = roll {
                if hide_roll {
                    lines.push(format!("Final roll: {GARBLED_CHARS}"));
                } else {
                    lines.push(format!("Final roll: {roll}"));
                }
            }
            lines.extend(narrative.iter().cloned());
            lines
        }
        MatchEvent::CardNeutralized {
            player,
            card,
            consumed_action,
        } => {
            let cost = if *consumed_action {
                "the action is spent"
            } else {
                "no action spent"
            };
            vec![format!("{player} plays {card}, but it does nothing ({cost})")]
        }
        MatchEvent::Committed(report) => {
            if report.changed() {
                vec![format!(
                    "{}: HP {} -> {}, SAN {} -> {}",
                    report.player,
                    report.hp_before,
                    report.hp_after,
                    report.san_before,
                    report.san_after
                )]
            } else {
                Vec::new()
            }
        }
        MatchEvent::CardDiscarded { player, card } => vec![format!("{player} discards {card}")],
        MatchEvent::TurnEnded { .. } => Vec::new(),
        MatchEvent::MatchEnded(outcome) => vec![match outcome.reason {
            EndReason::Death => format!("{} is dead, {} wins!", outcome.loser, outcome.winner),
            EndReason::Surrender => {
                format!("{} surrenders, {} wins!", outcome.loser, outcome.winner)
            }
        }],
    }
}
