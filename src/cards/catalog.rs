//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores the definitions decks are built from. It keeps
//! declaration order (deck building breaks ties by it) and validates every
//! definition on the way in, so a malformed die never reaches a match.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use crate::core::ConfigurationError;

/// Ordered, validated set of card definitions.
///
/// ## Example
///
/// ```
/// use dice_duel::cards::{CardCatalog, CardDefinition, CardId, DiceSpec};
///
/// let mut catalog = CardCatalog::new();
/// let coin = CardDefinition::new(CardId::new(1), "Coin").with_dice(DiceSpec::d(2));
/// catalog.register(coin).unwrap();
/// assert_eq!(catalog.get(CardId::new(1)).unwrap().name, "Coin");
///
/// let faceless = CardDefinition::new(CardId::new(2), "Bad").with_dice(DiceSpec::d(0));
/// assert!(catalog.register(faceless).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<Arc<CardDefinition>>,
    index: FxHashMap<CardId, usize>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions, failing on the first bad one.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = CardDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.register(definition)?;
        }
        Ok(catalog)
    }

    /// Validate and register a card definition.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), ConfigurationError> {
        if self.index.contains_key(&card.id) {
            return Err(ConfigurationError::DuplicateCard(card.id));
        }
        card.validate()?;
        self.index.insert(card.id, self.cards.len());
        self.cards.push(Arc::new(card));
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.index.get(&id).map(|&i| self.cards[i].as_ref())
    }

    /// Find a card definition by name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&CardDefinition> {
        self.cards.iter().map(Arc::as_ref).find(|c| c.name == name)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.index.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.iter().map(Arc::as_ref)
    }

    /// Iterate over shared handles in declaration order.
    pub(crate) fn shared_iter(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.cards.iter()
    }

    /// A catalog with the cards matching `predicate`, order preserved.
    #[must_use]
    pub fn filtered<F>(&self, predicate: F) -> Self
    where
        F: Fn(&CardDefinition) -> bool,
    {
        let mut catalog = Self::new();
        for card in self.cards.iter().filter(|c| predicate(c)) {
            catalog.index.insert(card.id, catalog.cards.len());
            catalog.cards.push(Arc::clone(card));
        }
        catalog
    }
}
