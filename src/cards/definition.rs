//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type: its
//! dice (if any), the outcome table consulted after a roll, the direct
//! effect used when there are no dice, and its rarity.
//!
//! Per-copy data (which copy, where it is) lives in `CardInstance`.

use serde::{Deserialize, Serialize};

use crate::core::ConfigurationError;
use crate::effects::{DirectEffect, OutcomeTable};

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Blood Frenzy"), not one
/// copy of it in a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A die: rolls land in `[min_value, sides]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceSpec {
    pub sides: i64,
    pub min_value: i64,
}

impl DiceSpec {
    /// A regular die rolling `1..=sides`.
    #[must_use]
    pub const fn d(sides: i64) -> Self {
        Self {
            sides,
            min_value: 1,
        }
    }

    /// A die rolling `min_value..=sides`.
    #[must_use]
    pub const fn ranged(min_value: i64, sides: i64) -> Self {
        Self { sides, min_value }
    }

    /// Whether `roll` is a face of this die.
    #[must_use]
    pub fn admits(&self, roll: i64) -> bool {
        (self.min_value..=self.sides).contains(&roll)
    }

    /// Check the die is well-formed.
    pub fn validate(&self, card: CardId) -> Result<(), ConfigurationError> {
        if self.sides < 1 {
            return Err(ConfigurationError::NoSides {
                card,
                sides: self.sides,
            });
        }
        if self.min_value < 1 {
            return Err(ConfigurationError::MinValueTooLow {
                card,
                min_value: self.min_value,
            });
        }
        if self.min_value > self.sides {
            return Err(ConfigurationError::MinValueAboveSides {
                card,
                min_value: self.min_value,
                sides: self.sides,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min_value, self.sides)
    }
}

/// Static card definition.
///
/// A card either rolls `dice` and consults `outcomes`, or applies its
/// `direct` effect. A card with neither is legal and does nothing.
///
/// ## Example
///
/// ```
/// use dice_duel::cards::{CardDefinition, CardId, DiceSpec};
/// use dice_duel::effects::{Outcome, OutcomeTable, RollRange, TerminalEffect, Vital, EffectTarget};
///
/// let lunge = CardDefinition::new(CardId::new(1), "Lunge")
///     .with_dice(DiceSpec::d(6))
///     .with_outcomes(OutcomeTable::new().with(
///         RollRange::new(4, 6),
///         Outcome::Terminal(TerminalEffect::adjust(EffectTarget::Target, Vital::Hp, -2)),
///     ))
///     .with_rarity(30);
///
/// assert_eq!(lunge.weight(), 70);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for display).
    pub name: String,

    /// Rules text (for display).
    pub description: String,

    /// Die rolled when the card is played.
    pub dice: Option<DiceSpec>,

    /// Ranges consulted after the roll, in declaration order.
    pub outcomes: OutcomeTable,

    /// Effect applied when there are no dice.
    pub direct: Option<DirectEffect>,

    /// 0-100, higher is rarer.
    pub rarity: u8,
}

impl CardDefinition {
    /// Create a card with no effect and middling rarity.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            dice: None,
            outcomes: OutcomeTable::new(),
            direct: None,
            rarity: 50,
        }
    }

    /// Set the rules text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the die.
    #[must_use]
    pub fn with_dice(mut self, dice: DiceSpec) -> Self {
        self.dice = Some(dice);
        self
    }

    /// Set the outcome table.
    #[must_use]
    pub fn with_outcomes(mut self, outcomes: OutcomeTable) -> Self {
        self.outcomes = outcomes;
        self
    }

    /// Set the direct effect.
    #[must_use]
    pub fn with_direct(mut self, effect: DirectEffect) -> Self {
        self.direct = Some(effect);
        self
    }

    /// Set the rarity, clamped to 0-100.
    #[must_use]
    pub fn with_rarity(mut self, rarity: u8) -> Self {
        self.rarity = rarity.min(100);
        self
    }

    /// Deck-building weight: `max(1, 100 - rarity)`.
    #[must_use]
    pub fn weight(&self) -> u64 {
        (100 - u64::from(self.rarity.min(100))).max(1)
    }

    /// Check the die and every outcome range.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(dice) = &self.dice {
            dice.validate(self.id)?;
        }
        self.outcomes.validate(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectTarget, Outcome, RollRange, TerminalEffect, Vital};

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_weight_never_zero() {
        let common = CardDefinition::new(CardId::new(1), "Common").with_rarity(0);
        let legendary = CardDefinition::new(CardId::new(2), "Legendary").with_rarity(100);
        let clamped = CardDefinition::new(CardId::new(3), "Clamped").with_rarity(250);

        assert_eq!(common.weight(), 100);
        assert_eq!(legendary.weight(), 1);
        assert_eq!(clamped.rarity, 100);
        assert_eq!(clamped.weight(), 1);
    }

    #[test]
    fn test_dice_validation() {
        let card = CardId::new(9);
        assert!(DiceSpec::d(6).validate(card).is_ok());
        assert!(DiceSpec::ranged(14, 24).validate(card).is_ok());
        assert_eq!(
            DiceSpec::d(0).validate(card),
            Err(ConfigurationError::NoSides { card, sides: 0 })
        );
        assert_eq!(
            DiceSpec::ranged(0, 6).validate(card),
            Err(ConfigurationError::MinValueTooLow { card, min_value: 0 })
        );
        assert_eq!(
            DiceSpec::ranged(7, 6).validate(card),
            Err(ConfigurationError::MinValueAboveSides {
                card,
                min_value: 7,
                sides: 6
            })
        );
    }

    #[test]
    fn test_dice_admits() {
        let die = DiceSpec::ranged(14, 24);
        assert!(die.admits(14));
        assert!(die.admits(24));
        assert!(!die.admits(13));
        assert!(!die.admits(25));
    }

    #[test]
    fn test_definition_validates_nested_ranges() {
        let inner = OutcomeTable::new().with(
            RollRange::new(5, 2),
            Outcome::Terminal(TerminalEffect::adjust(EffectTarget::Target, Vital::Hp, -1)),
        );
        let card = CardDefinition::new(CardId::new(4), "Broken")
            .with_dice(DiceSpec::d(6))
            .with_outcomes(OutcomeTable::new().with(RollRange::new(1, 6), Outcome::Nested(inner)));

        assert_eq!(
            card.validate(),
            Err(ConfigurationError::InvertedRange {
                card: CardId::new(4),
                low: 5,
                high: 2
            })
        );
    }
}
