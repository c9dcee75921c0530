//! Card instances - one copy of a card in a match.
//!
//! A `CardInstance` pairs a fresh `EntityId` with a shared handle to its
//! definition. Copies of the same definition are distinct instances and
//! move between deck, hand and discard independently.

use std::sync::Arc;

use super::definition::{CardDefinition, CardId};
use crate::core::EntityId;

/// A card copy in a match.
///
/// Equality is identity: two copies of the same definition are different
/// instances.
#[derive(Clone, Debug)]
pub struct CardInstance {
    /// Unique ID of this copy.
    pub entity_id: EntityId,

    /// The definition this copy was made from.
    definition: Arc<CardDefinition>,
}

impl CardInstance {
    /// Create a copy of `definition` with the given identity.
    #[must_use]
    pub fn new(entity_id: EntityId, definition: Arc<CardDefinition>) -> Self {
        Self {
            entity_id,
            definition,
        }
    }

    /// The definition this copy was made from.
    #[must_use]
    pub fn definition(&self) -> &CardDefinition {
        &self.definition
    }

    /// ID of the definition.
    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.definition.id
    }

    /// Card name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

impl PartialEq for CardInstance {
    fn eq(&self, other: &Self) -> bool {
        self.entity_id == other.entity_id
    }
}

impl Eq for CardInstance {}

impl std::hash::Hash for CardInstance {
    fn hash<H: std::hash::Hasher>(&self, hasher: &mut H) {
        self.entity_id.hash(hasher);
    }
}
