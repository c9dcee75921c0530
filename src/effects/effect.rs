//! Effect definitions.
//!
//! Every card behavior is a closed variant. A dice card maps roll ranges to
//! an [`Outcome`]: either a [`TerminalEffect`] applied with the roll, or a
//! nested [`OutcomeTable`] consulted with a fresh roll of the same die. A
//! card without dice applies a [`DirectEffect`] instead.
//!
//! Effects never touch `hp`/`san` directly. They stage deltas on the
//! parties, and the orchestrator commits them after the play.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::ConfigurationError;

/// Inclusive roll range `[low, high]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RollRange {
    pub low: i64,
    pub high: i64,
}

impl RollRange {
    /// Create a range covering `low..=high`.
    #[must_use]
    pub const fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// A range covering exactly one face.
    #[must_use]
    pub const fn single(value: i64) -> Self {
        Self::new(value, value)
    }

    /// Whether `roll` lies inside the range.
    #[must_use]
    pub fn contains(&self, roll: i64) -> bool {
        self.low <= roll && roll <= self.high
    }
}

impl std::fmt::Display for RollRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

/// What a matched range does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Apply an effect with the roll.
    Terminal(TerminalEffect),
    /// Roll the same die again and consult another table.
    Nested(OutcomeTable),
}

/// Ordered range-to-outcome mapping.
///
/// Ranges are scanned in declaration order; the first one containing the
/// roll wins. Overlaps are legal, gaps are legal (a roll in a gap is a
/// no-match).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTable {
    entries: Vec<(RollRange, Outcome)>,
}

impl OutcomeTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    #[must_use]
    pub fn with(mut self, range: RollRange, outcome: Outcome) -> Self {
        self.entries.push((range, outcome));
        self
    }

    /// Append a terminal entry.
    #[must_use]
    pub fn with_terminal(self, range: RollRange, effect: TerminalEffect) -> Self {
        self.with(range, Outcome::Terminal(effect))
    }

    /// First entry whose range contains `roll`.
    #[must_use]
    pub fn find(&self, roll: i64) -> Option<(RollRange, &Outcome)> {
        self.entries
            .iter()
            .find(|(range, _)| range.contains(roll))
            .map(|(range, outcome)| (*range, outcome))
    }

    /// Iterate over entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &(RollRange, Outcome)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject inverted ranges, nested tables included.
    pub fn validate(&self, card: CardId) -> Result<(), ConfigurationError> {
        for (range, outcome) in &self.entries {
            if range.low > range.high {
                return Err(ConfigurationError::InvertedRange {
                    card,
                    low: range.low,
                    high: range.high,
                });
            }
            if let Outcome::Nested(inner) = outcome {
                inner.validate(card)?;
            }
        }
        Ok(())
    }
}

/// One of the two vitality resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vital {
    Hp,
    San,
}

impl std::fmt::Display for Vital {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vital::Hp => write!(f, "HP"),
            Vital::San => write!(f, "SAN"),
        }
    }
}

/// A stat an actor may choose to attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Hp,
    San,
    Actions,
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stat::Hp => write!(f, "HP"),
            Stat::San => write!(f, "SAN"),
            Stat::Actions => write!(f, "actions"),
        }
    }
}

/// Which side of a play an effect lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTarget {
    /// The party playing the card.
    Actor,
    /// The party the card was played against.
    Target,
}

/// Effect applied after a roll matched a range.
///
/// `Adjust` is the generic building block. The named variants carry card
/// behavior that reads the roll, rolls again, or asks for a decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalEffect {
    /// Stage `amount` on one party's vital.
    Adjust {
        target: EffectTarget,
        vital: Vital,
        amount: i64,
    },

    /// Several effects applied in order.
    Batch(Vec<TerminalEffect>),

    // === Card behaviors ===

    /// 1-4: target -3 HP, actor -1 SAN. Otherwise actor -2 SAN.
    BloodFrenzy,

    /// 6-7: the target skips their next turn.
    WeekendSlacking,

    /// Heal SAN by roll, then roll again for HP. Both capped at the ceiling.
    MentosGod,

    /// Actor chooses HP, SAN or actions; hit it for `amount`.
    Turtle { amount: i64 },

    /// Target HP loss keyed on the exact roll: 14-17 -1, 18-19 -4, 20-24 -2.
    TwilightLizard,

    /// 1-5: actor +2 SAN. 6-10: target -1 HP, twice.
    GlassesFrog,

    /// Set the target's recursion debt: roll 1 -> 0, 2-4 -> 1, 5 -> 2.
    VoidBox,

    /// The target's next card is discarded without resolving.
    Neutralize,
}

impl TerminalEffect {
    /// Shorthand for [`TerminalEffect::Adjust`].
    #[must_use]
    pub const fn adjust(target: EffectTarget, vital: Vital, amount: i64) -> Self {
        Self::Adjust {
            target,
            vital,
            amount,
        }
    }
}

/// Effect of a card without dice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectEffect {
    /// Stage `amount` on one party's vital.
    Adjust {
        target: EffectTarget,
        vital: Vital,
        amount: i64,
    },

    /// Stretch the actor's dice ticker interval by 1.6.
    SlowPotion,

    /// Halve the target's dice ticker interval, never below 20 ms.
    HastePotion,

    /// Ask the actor for a preset value for their next roll.
    DebugPreset,

    /// Actor loses `cost` SAN now and regains `refund` SAN `delay` turns later.
    ChickenMachine { cost: i64, refund: i64, delay: u32 },

    /// Garble the target's next roll display.
    QiuLuo,

    /// Hit back with half the HP the actor is missing; a natural 10 adds
    /// a third of what was missing last time.
    BloodArmorSnail,
}

impl DirectEffect {
    /// Shorthand for [`DirectEffect::Adjust`].
    #[must_use]
    pub const fn adjust(target: EffectTarget, vital: Vital, amount: i64) -> Self {
        Self::Adjust {
            target,
            vital,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(amount: i64) -> Outcome {
        Outcome::Terminal(TerminalEffect::adjust(EffectTarget::Target, Vital::Hp, -amount))
    }

    #[test]
    fn test_roll_range_contains() {
        let range = RollRange::new(2, 4);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
        assert!(RollRange::single(7).contains(7));
        assert_eq!(format!("{}", RollRange::single(7)), "7");
        assert_eq!(format!("{}", range), "2-4");
    }

    #[test]
    fn test_find_uses_declaration_order() {
        let table = OutcomeTable::new()
            .with(RollRange::new(1, 6), hit(1))
            .with(RollRange::new(3, 3), hit(9));

        let (range, outcome) = table.find(3).unwrap();
        assert_eq!(range, RollRange::new(1, 6));
        assert_eq!(outcome, &hit(1));
    }

    #[test]
    fn test_find_in_gap_is_none() {
        let table = OutcomeTable::new()
            .with(RollRange::new(1, 2), hit(1))
            .with(RollRange::new(6, 6), hit(2));

        assert!(table.find(5).is_none());
        assert!(OutcomeTable::new().find(1).is_none());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let table = OutcomeTable::new().with(RollRange::new(4, 3), hit(1));
        assert_eq!(
            table.validate(CardId::new(2)),
            Err(ConfigurationError::InvertedRange {
                card: CardId::new(2),
                low: 4,
                high: 3
            })
        );
    }

    #[test]
    fn test_effect_serialization() {
        let table = OutcomeTable::new()
            .with_terminal(RollRange::new(1, 4), TerminalEffect::Turtle { amount: 300 })
            .with(
                RollRange::new(5, 6),
                Outcome::Nested(OutcomeTable::new().with(RollRange::new(1, 6), hit(2))),
            );

        let json = serde_json::to_string(&table).unwrap();
        let back: OutcomeTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);
    }
}
