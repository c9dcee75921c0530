//! Weighted deck construction.
//!
//! Copy counts come from a largest-remainder allocation over the catalog's
//! rarity weights: every definition gets `floor(weight / total * size)`
//! copies, and the slots left over go to the largest fractional parts.
//! The arithmetic is exact integer arithmetic, so the same catalog always
//! yields the same counts.

use std::sync::Arc;

use super::catalog::CardCatalog;
use super::definition::CardId;
use super::instance::CardInstance;
use crate::core::{shuffle, ConfigurationError, EntityAllocator, RandomSource};

/// Builds shuffled decks and hands out unique instance IDs.
///
/// Keep one builder per match so instances in both decks get distinct IDs.
///
/// ```
/// use dice_duel::cards::{CardCatalog, CardDefinition, CardId, DeckBuilder};
/// use dice_duel::core::GameRng;
///
/// let catalog = CardCatalog::from_definitions([
///     CardDefinition::new(CardId::new(1), "Common").with_rarity(0),
///     CardDefinition::new(CardId::new(2), "Uncommon").with_rarity(50),
/// ])
/// .unwrap();
///
/// let mut builder = DeckBuilder::new();
/// let deck = builder.build(&catalog, 12, &mut GameRng::new(1)).unwrap();
/// assert_eq!(deck.len(), 12);
/// assert_eq!(deck.iter().filter(|c| c.name() == "Common").count(), 8);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DeckBuilder {
    ids: EntityAllocator,
}

impl DeckBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy count per definition, in catalog order. Counts sum to `target_size`.
    pub fn allocate<R: RandomSource + ?Sized>(
        catalog: &CardCatalog,
        target_size: usize,
        rng: &mut R,
    ) -> Result<Vec<(CardId, usize)>, ConfigurationError> {
        if catalog.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }
        if target_size == 0 {
            return Err(ConfigurationError::EmptyDeck);
        }

        let weights: Vec<u64> = catalog.iter().map(|card| card.weight()).collect();
        let total: u64 = weights.iter().sum();
        let size = target_size as u64;

        let mut copies: Vec<usize> = weights.iter().map(|w| (w * size / total) as usize).collect();
        let remainders: Vec<u64> = weights.iter().map(|w| w * size % total).collect();

        let assigned: usize = copies.iter().sum();
        let remaining = target_size - assigned;

        // Stable sort: equal remainders keep catalog order.
        let mut order: Vec<usize> = (0..copies.len()).collect();
        order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));
        for &i in order.iter().take(remaining) {
            copies[i] += 1;
        }

        if copies.iter().all(|&c| c == 0) {
            fill_degenerate(&mut copies, target_size, rng);
        }

        Ok(catalog.iter().map(|card| card.id).zip(copies).collect())
    }

    /// Instantiate an allocation as a shuffled deck of independent copies.
    pub fn build<R: RandomSource + ?Sized>(
        &mut self,
        catalog: &CardCatalog,
        target_size: usize,
        rng: &mut R,
    ) -> Result<Vec<CardInstance>, ConfigurationError> {
        let counts = Self::allocate(catalog, target_size, rng)?;

        let mut deck = Vec::with_capacity(target_size);
        for (definition, (_, count)) in catalog.shared_iter().zip(&counts) {
            for _ in 0..*count {
                deck.push(CardInstance::new(self.ids.alloc(), Arc::clone(definition)));
            }
        }
        shuffle(rng, &mut deck);

        log::debug!(
            "built deck of {} from {} definitions: {:?}",
            deck.len(),
            catalog.len(),
            counts
        );
        Ok(deck)
    }

    /// Number of instances created so far.
    #[must_use]
    pub fn instances_created(&self) -> u32 {
        self.ids.allocated()
    }
}

/// One copy each, then randomly trim or pad to `target_size`.
fn fill_degenerate<R: RandomSource + ?Sized>(
    copies: &mut [usize],
    target_size: usize,
    rng: &mut R,
) {
    copies.iter_mut().for_each(|c| *c = 1);
    let mut total = copies.len();

    while total > target_size {
        let stocked: Vec<usize> = (0..copies.len()).filter(|&i| copies[i] > 0).collect();
        let i = stocked[rng.pick(stocked.len())];
        copies[i] -= 1;
        total -= 1;
    }
    while total < target_size {
        let i = rng.pick(copies.len());
        copies[i] += 1;
        total += 1;
    }
}
