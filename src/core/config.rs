//! Match configuration.
//!
//! Everything a match needs to know up front lives in one `MatchConfig`
//! record that is handed to `Match` at construction. There are no
//! process-wide toggles: the console front end builds a config from its
//! menu and passes it in like any other caller.

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

/// Which card catalog a match is built from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogVariant {
    /// The regular card pool.
    #[default]
    Standard,
    /// The regular pool plus the Debug Card (sets the next roll).
    WithDebug,
}

/// What a neutralized card costs.
///
/// A neutralized card always moves to discard without resolving. Whether
/// it still uses up an action point is a house rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeutralizedPolicy {
    /// The card costs one action point like any other play.
    #[default]
    ConsumesAction,
    /// The card is discarded for free.
    Free,
}

/// Complete match configuration.
///
/// ```
/// use dice_duel::core::{CatalogVariant, MatchConfig};
///
/// let config = MatchConfig::new()
///     .with_deck_size(20)
///     .with_catalog(CatalogVariant::WithDebug)
///     .with_seed(7);
///
/// assert_eq!(config.deck_size, 20);
/// assert_eq!(config.starting_hand, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Cards per deck.
    pub deck_size: usize,

    /// Cards each party draws before the first turn.
    pub starting_hand: usize,

    /// Recovery ceiling for HP and SAN.
    pub vitality_cap: i64,

    /// HP each party starts with.
    pub starting_hp: i64,

    /// SAN each party starts with.
    pub starting_san: i64,

    /// Card pool to build decks from.
    pub catalog: CatalogVariant,

    /// Seed for the match RNG.
    pub seed: u64,

    /// Ask the presentation layer to run a roll ticker before each dice roll.
    pub interactive_dice: bool,

    /// Default ticker interval per party, in milliseconds. Cosmetic only.
    pub dice_interval_ms: u64,

    /// Sides of the die used to pick the first mover.
    pub first_mover_die: i64,

    /// Action point cost of a neutralized card.
    pub neutralized_policy: NeutralizedPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            deck_size: 12,
            starting_hand: 5,
            vitality_cap: 10,
            starting_hp: 10,
            starting_san: 10,
            catalog: CatalogVariant::Standard,
            seed: 0,
            interactive_dice: false,
            dice_interval_ms: 120,
            first_mover_die: 6,
            neutralized_policy: NeutralizedPolicy::ConsumesAction,
        }
    }
}

impl MatchConfig {
    /// Create a configuration with the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deck size.
    #[must_use]
    pub fn with_deck_size(mut self, deck_size: usize) -> Self {
        self.deck_size = deck_size;
        self
    }

    /// Set the starting hand size.
    #[must_use]
    pub fn with_starting_hand(mut self, cards: usize) -> Self {
        self.starting_hand = cards;
        self
    }

    /// Set the card pool.
    #[must_use]
    pub fn with_catalog(mut self, catalog: CatalogVariant) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Turn the roll ticker on or off.
    #[must_use]
    pub fn with_interactive_dice(mut self, enabled: bool) -> Self {
        self.interactive_dice = enabled;
        self
    }

    /// Set the neutralized-card policy.
    #[must_use]
    pub fn with_neutralized_policy(mut self, policy: NeutralizedPolicy) -> Self {
        self.neutralized_policy = policy;
        self
    }

    /// Set starting HP and SAN.
    #[must_use]
    pub fn with_starting_vitality(mut self, hp: i64, san: i64) -> Self {
        self.starting_hp = hp;
        self.starting_san = san;
        self
    }

    /// Check the values a match cannot start without.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.deck_size == 0 {
            return Err(ConfigurationError::EmptyDeck);
        }
        if self.first_mover_die < 1 {
            return Err(ConfigurationError::FirstMoverDie(self.first_mover_die));
        }
        Ok(())
    }
}
