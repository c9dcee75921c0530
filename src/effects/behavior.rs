//! What each effect variant does to the two parties.
//!
//! Every arm stages deltas or sets flags and pushes one narrative line per
//! visible consequence. None of them commit.

use super::delayed::{DelayedEffect, DelayedKind};
use super::effect::{DirectEffect, EffectTarget, Stat, TerminalEffect, Vital};
use super::resolver::EffectContext;
use crate::cards::DiceSpec;
use crate::core::{Narrative, PlayerState};
use crate::rules::RollPurpose;

/// Floor for the ticker interval after a Haste Potion.
const MIN_DICE_INTERVAL_MS: u64 = 20;

fn pick<'p>(
    side: EffectTarget,
    actor: &'p mut PlayerState,
    target: &'p mut PlayerState,
) -> &'p mut PlayerState {
    match side {
        EffectTarget::Actor => actor,
        EffectTarget::Target => target,
    }
}

fn stage_and_tell(
    party: &mut PlayerState,
    vital: Vital,
    amount: i64,
    narrative: &mut Narrative,
    prefix: &str,
) {
    party.stage(vital, amount);
    narrative.push(format!("{prefix} -> {} {amount:+} {vital}", party.name));
}

/// Mentos God heal table.
fn mentos_heal(roll: i64) -> i64 {
    match roll {
        i64::MIN..=2 => 0,
        3..=4 => 1,
        5..=6 => 2,
        _ => 3,
    }
}

/// Heal `vital` by up to `amount`, never past the cap counting pending deltas.
fn capped_heal(party: &mut PlayerState, vital: Vital, amount: i64, narrative: &mut Narrative) {
    let room = party.cap() - party.projected(vital);
    let healed = amount.min(room);
    if healed > 0 {
        party.stage(vital, healed);
        narrative.push(format!("{} recovers {healed} {vital}", party.name));
    } else {
        narrative.push(format!("{} recovers no {vital}", party.name));
    }
}

impl TerminalEffect {
    /// Apply with the roll that selected this effect.
    pub fn apply(
        &self,
        card: &str,
        roll: i64,
        actor: &mut PlayerState,
        target: &mut PlayerState,
        ctx: &mut EffectContext<'_>,
        narrative: &mut Narrative,
    ) {
        let prefix = format!("{} {card} ({roll})", actor.name);
        match self {
            TerminalEffect::Adjust {
                target: side,
                vital,
                amount,
            } => {
                let party = pick(*side, actor, target);
                stage_and_tell(party, *vital, *amount, narrative, &prefix);
            }

            TerminalEffect::Batch(effects) => {
                for effect in effects {
                    effect.apply(card, roll, actor, target, ctx, narrative);
                }
            }

            TerminalEffect::BloodFrenzy => {
                if (1..=4).contains(&roll) {
                    stage_and_tell(target, Vital::Hp, -3, narrative, &prefix);
                    stage_and_tell(actor, Vital::San, -1, narrative, &prefix);
                } else {
                    stage_and_tell(actor, Vital::San, -2, narrative, &prefix);
                }
            }

            TerminalEffect::WeekendSlacking => {
                if roll == 6 || roll == 7 {
                    target.set_skip_next_turn();
                    narrative.push(format!("{prefix} -> {} skips their next turn", target.name));
                } else {
                    narrative.push(format!("{prefix} -> nothing happens"));
                }
            }

            TerminalEffect::MentosGod => {
                capped_heal(actor, Vital::San, mentos_heal(roll), narrative);
                let second = ctx.roll(actor, card, DiceSpec::d(7), RollPurpose::Secondary);
                narrative.push(format!("{card} second roll: {second}"));
                capped_heal(actor, Vital::Hp, mentos_heal(second), narrative);
            }

            TerminalEffect::Turtle { amount } => {
                let stat = ctx.choose_stat(actor.id);
                match stat {
                    Stat::Hp => target.stage(Vital::Hp, -amount),
                    Stat::San => target.stage(Vital::San, -amount),
                    Stat::Actions => target.set_action_debt(*amount),
                }
                narrative.push(format!("{prefix} -> {} {stat} -{amount}", target.name));
            }

            TerminalEffect::TwilightLizard => {
                let damage = match roll {
                    14..=17 => 1,
                    18..=19 => 4,
                    20..=24 => 2,
                    _ => 0,
                };
                if damage > 0 {
                    stage_and_tell(target, Vital::Hp, -damage, narrative, &prefix);
                } else {
                    narrative.push(format!("{prefix} -> no effect"));
                }
            }

            TerminalEffect::GlassesFrog => match roll {
                1..=5 => stage_and_tell(actor, Vital::San, 2, narrative, &prefix),
                6..=10 => {
                    stage_and_tell(target, Vital::Hp, -1, narrative, &prefix);
                    stage_and_tell(target, Vital::Hp, -1, narrative, &prefix);
                }
                _ => narrative.push(format!("{prefix} -> no effect")),
            },

            TerminalEffect::VoidBox => {
                let confirmations = match roll {
                    i64::MIN..=1 => 0,
                    2..=4 => 1,
                    _ => 2,
                };
                target.set_recursion_debt(confirmations);
                narrative.push(format!(
                    "{prefix} -> {}'s next roll needs {confirmations} confirmation(s)",
                    target.name
                ));
            }

            TerminalEffect::Neutralize => {
                target.set_neutralize_next_card();
                narrative.push(format!("{prefix} -> {}'s next card is neutralized", target.name));
            }
        }
    }
}

impl DirectEffect {
    /// Apply a card that does not roll.
    pub fn apply(
        &self,
        card: &str,
        actor: &mut PlayerState,
        target: &mut PlayerState,
        ctx: &mut EffectContext<'_>,
        narrative: &mut Narrative,
    ) {
        let prefix = format!("{} {card}", actor.name);
        match self {
            DirectEffect::Adjust {
                target: side,
                vital,
                amount,
            } => {
                let party = pick(*side, actor, target);
                stage_and_tell(party, *vital, *amount, narrative, &prefix);
            }

            DirectEffect::SlowPotion => {
                actor.dice_interval_ms = actor.dice_interval_ms * 8 / 5;
                narrative.push(format!(
                    "{prefix} -> own dice now tick every {} ms",
                    actor.dice_interval_ms
                ));
            }

            DirectEffect::HastePotion => {
                target.dice_interval_ms = (target.dice_interval_ms / 2).max(MIN_DICE_INTERVAL_MS);
                narrative.push(format!(
                    "{prefix} -> {}'s dice now tick every {} ms",
                    target.name, target.dice_interval_ms
                ));
            }

            DirectEffect::DebugPreset => match ctx.decisions.choose_preset_roll(actor.id) {
                Some(value) => {
                    actor.set_roll_override(value);
                    narrative.push(format!("{prefix} -> next roll preset to {value}"));
                }
                None => narrative.push(format!("{prefix} -> no valid preset given")),
            },

            DirectEffect::ChickenMachine {
                cost,
                refund,
                delay,
            } => {
                stage_and_tell(actor, Vital::San, -cost, narrative, &prefix);
                let trigger_turn = ctx.turn_index + delay;
                actor.schedule(DelayedEffect::new(
                    trigger_turn,
                    DelayedKind::Restore {
                        vital: Vital::San,
                        amount: *refund,
                    },
                    card,
                ));
                narrative.push(format!("{} +{refund} SAN at turn {trigger_turn}", actor.name));
            }

            DirectEffect::QiuLuo => {
                target.set_garbled();
                narrative.push(format!("{prefix} -> {}'s next roll shows garbage", target.name));
            }

            DirectEffect::BloodArmorSnail => {
                let lost = actor.cap() - actor.hp;
                let base = lost.div_euclid(2);
                stage_and_tell(target, Vital::Hp, -base, narrative, &prefix);

                let roll = ctx.roll(actor, card, DiceSpec::d(10), RollPurpose::Secondary);
                if roll == 10 {
                    let extra = actor.last_lost_hp().div_euclid(3);
                    let follow_up = format!("{card} follow-up (10)");
                    stage_and_tell(target, Vital::Hp, -extra, narrative, &follow_up);
                    stage_and_tell(actor, Vital::San, -extra, narrative, &follow_up);
                } else {
                    narrative.push(format!("{card} follow-up ({roll}) -> nothing"));
                }
                actor.replace_last_lost_hp(lost);
            }
        }
    }
}
