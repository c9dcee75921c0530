//! Effect resolution - turning one card play into staged deltas.
//!
//! `ResolutionEngine::resolve` is the single dispatch point for every card:
//!
//! 1. No dice: apply the direct effect (or report an undefined card).
//! 2. Dice: take the roll from the preset override if it is a legal face,
//!    otherwise sample. The override is cleared either way.
//! 3. Recursion debt `n` is cleared. If the roll matched a range and
//!    `n > 0`, roll `n` more times; the effect fires only if more than
//!    `n / 2` of the `n + 1` rolls (the original included) landed in the
//!    matched range.
//! 4. A terminal outcome applies with the original roll. A nested table
//!    takes a fresh roll of the same die. Nested rolls never consume the
//!    preset or recursion debt.
//!
//! Nothing here commits. The caller commits both parties afterwards.

use serde::{Deserialize, Serialize};

use super::effect::{Outcome, OutcomeTable};
use crate::cards::{CardDefinition, DiceSpec};
use crate::core::{Narrative, PlayerId, PlayerState, RandomSource, ResourceDeltas};
use crate::rules::{DecisionProvider, RollPurpose, RollRequest};

/// What a resolution ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionKind {
    /// A dice outcome fired.
    Applied,
    /// The roll matched no range.
    NoMatch,
    /// Recursion debt demanded confirmations and too few agreed.
    ConfirmationFailed,
    /// A direct effect fired.
    Direct,
    /// The card has neither dice nor a direct effect.
    Undefined,
}

/// Result of resolving one card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub kind: ResolutionKind,
    /// The roll the outcome was chosen with, for dice cards.
    pub roll: Option<i64>,
    pub narrative: Narrative,
    /// Deltas staged on the actor by this resolution.
    pub actor_delta: ResourceDeltas,
    /// Deltas staged on the target by this resolution.
    pub target_delta: ResourceDeltas,
}

impl Resolution {
    /// Whether the card did anything beyond rolling.
    #[must_use]
    pub fn fired(&self) -> bool {
        matches!(self.kind, ResolutionKind::Applied | ResolutionKind::Direct)
    }
}

/// Collaborators a resolution needs besides the two parties.
pub struct EffectContext<'a> {
    pub rng: &'a mut dyn RandomSource,
    pub decisions: &'a mut dyn DecisionProvider,
    /// Turn index the play happens on (delayed effects count from it).
    pub turn_index: u32,
    /// Ask the decision provider to stop its ticker before each roll.
    pub interactive_dice: bool,
}

impl<'a> EffectContext<'a> {
    pub fn new(
        rng: &'a mut dyn RandomSource,
        decisions: &'a mut dyn DecisionProvider,
        turn_index: u32,
    ) -> Self {
        Self {
            rng,
            decisions,
            turn_index,
            interactive_dice: false,
        }
    }

    #[must_use]
    pub fn with_interactive_dice(mut self, enabled: bool) -> Self {
        self.interactive_dice = enabled;
        self
    }

    /// Roll `dice` for `roller`: capture first (if interactive), then
    /// sample once. Consumes the roller's garbled flag.
    pub fn roll(
        &mut self,
        roller: &mut PlayerState,
        label: &str,
        dice: DiceSpec,
        purpose: RollPurpose,
    ) -> i64 {
        let garbled = roller.take_garbled();
        if self.interactive_dice {
            self.decisions.capture_roll_stop(&RollRequest {
                player: roller.id,
                label: label.to_string(),
                dice,
                purpose,
                garbled,
                interval_ms: roller.dice_interval_ms,
            });
        }
        let value = self.rng.sample(dice.min_value, dice.sides);
        log::trace!("{} rolls {} for {} ({:?}): {}", roller.name, dice, label, purpose, value);
        value
    }

    /// Ask for a stat choice on behalf of `chooser`.
    pub(crate) fn choose_stat(&mut self, chooser: PlayerId) -> super::effect::Stat {
        self.decisions.choose_stat(chooser)
    }
}

/// Resolves card plays.
pub struct ResolutionEngine;

impl ResolutionEngine {
    /// Resolve `card` played by `actor` against `target`.
    ///
    /// ```
    /// use dice_duel::cards::{CardDefinition, CardId, DiceSpec};
    /// use dice_duel::core::{PlayerId, PlayerState, ScriptedRolls};
    /// use dice_duel::effects::*;
    /// use dice_duel::rules::ScriptedDecisions;
    ///
    /// let card = CardDefinition::new(CardId::new(1), "Jab")
    ///     .with_dice(DiceSpec::d(6))
    ///     .with_outcomes(OutcomeTable::new().with_terminal(
    ///         RollRange::new(1, 6),
    ///         TerminalEffect::adjust(EffectTarget::Target, Vital::Hp, -1),
    ///     ));
    /// let mut a = PlayerState::new(PlayerId::FIRST, "A", 10, 10, 10);
    /// let mut b = PlayerState::new(PlayerId::SECOND, "B", 10, 10, 10);
    /// let mut rng = ScriptedRolls::new([4]);
    /// let mut decisions = ScriptedDecisions::new();
    /// let mut ctx = EffectContext::new(&mut rng, &mut decisions, 0);
    ///
    /// let resolution = ResolutionEngine::resolve(&card, &mut a, &mut b, &mut ctx);
    /// assert_eq!(resolution.kind, ResolutionKind::Applied);
    /// assert_eq!(resolution.target_delta.hp, -1);
    /// assert_eq!(b.hp, 10); // staged, not committed
    /// ```
    pub fn resolve(
        card: &CardDefinition,
        actor: &mut PlayerState,
        target: &mut PlayerState,
        ctx: &mut EffectContext<'_>,
    ) -> Resolution {
        let actor_before = actor.pending();
        let target_before = target.pending();
        let mut narrative = Narrative::new();

        let (kind, roll) = match (card.dice, &card.direct) {
            (Some(dice), _) => {
                let (kind, roll) =
                    Self::resolve_dice(card, dice, actor, target, ctx, &mut narrative);
                (kind, Some(roll))
            }
            (None, Some(effect)) => {
                effect.apply(&card.name, actor, target, ctx, &mut narrative);
                (ResolutionKind::Direct, None)
            }
            (None, None) => {
                narrative.push(format!("{} has no defined effect", card.name));
                (ResolutionKind::Undefined, None)
            }
        };

        log::debug!("{} plays {}: {:?} (roll {:?})", actor.name, card.name, kind, roll);
        Resolution {
            kind,
            roll,
            narrative,
            actor_delta: actor.pending().since(actor_before),
            target_delta: target.pending().since(target_before),
        }
    }

    fn resolve_dice(
        card: &CardDefinition,
        dice: DiceSpec,
        actor: &mut PlayerState,
        target: &mut PlayerState,
        ctx: &mut EffectContext<'_>,
        narrative: &mut Narrative,
    ) -> (ResolutionKind, i64) {
        let roll = match actor.take_roll_override() {
            Some(preset) if dice.admits(preset) => {
                narrative.push(format!("{} uses preset roll {preset}", actor.name));
                preset
            }
            Some(preset) => {
                narrative.push(format!(
                    "preset {preset} is outside {dice}, rolling instead"
                ));
                ctx.roll(actor, &card.name, dice, RollPurpose::Primary)
            }
            None => ctx.roll(actor, &card.name, dice, RollPurpose::Primary),
        };

        let confirmations = actor.take_recursion_debt();

        let Some((range, outcome)) = card.outcomes.find(roll) else {
            narrative.push(no_match(&card.name, roll));
            return (ResolutionKind::NoMatch, roll);
        };

        if confirmations > 0 {
            let mut valid = 1;
            for attempt in 1..=confirmations {
                let check = ctx.roll(
                    actor,
                    &card.name,
                    dice,
                    RollPurpose::Confirmation {
                        attempt,
                        of: confirmations,
                    },
                );
                if range.contains(check) {
                    valid += 1;
                }
            }

            let total = confirmations + 1;
            if valid <= confirmations / 2 {
                narrative.push(format!(
                    "{} rolled {roll}, but only {valid}/{total} rolls landed in {range}: no effect",
                    card.name
                ));
                return (ResolutionKind::ConfirmationFailed, roll);
            }
            narrative.push(format!("{valid}/{total} rolls landed in {range}: confirmed"));
        }

        let kind = Self::apply_outcome(card, dice, outcome, roll, actor, target, ctx, narrative);
        (kind, roll)
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_outcome(
        card: &CardDefinition,
        dice: DiceSpec,
        outcome: &Outcome,
        roll: i64,
        actor: &mut PlayerState,
        target: &mut PlayerState,
        ctx: &mut EffectContext<'_>,
        narrative: &mut Narrative,
    ) -> ResolutionKind {
        match outcome {
            Outcome::Terminal(effect) => {
                effect.apply(&card.name, roll, actor, target, ctx, narrative);
                ResolutionKind::Applied
            }
            Outcome::Nested(table) => {
                Self::apply_nested(card, dice, table, actor, target, ctx, narrative)
            }
        }
    }

    fn apply_nested(
        card: &CardDefinition,
        dice: DiceSpec,
        table: &OutcomeTable,
        actor: &mut PlayerState,
        target: &mut PlayerState,
        ctx: &mut EffectContext<'_>,
        narrative: &mut Narrative,
    ) -> ResolutionKind {
        let roll = ctx.roll(actor, &card.name, dice, RollPurpose::Nested);
        narrative.push(format!("{} rolls again: {roll}", card.name));
        match table.find(roll) {
            Some((_, outcome)) => {
                Self::apply_outcome(card, dice, outcome, roll, actor, target, ctx, narrative)
            }
            None => {
                narrative.push(no_match(&card.name, roll));
                ResolutionKind::NoMatch
            }
        }
    }
}

fn no_match(card: &str, roll: i64) -> String {
    format!("{card} rolled {roll}: nothing matches")
}
