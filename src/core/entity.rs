//! Card copy identification.
//!
//! Every card copy built into a deck gets its own `EntityId`, so several
//! copies of one definition can sit in deck, hand and discard at once and
//! still be told apart.
//!
//! ```
//! use dice_duel::core::{EntityAllocator, EntityId};
//!
//! let mut ids = EntityAllocator::new();
//! assert_eq!(ids.alloc(), EntityId(0));
//! assert_eq!(ids.alloc(), EntityId(1));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier of one card copy within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing entity IDs.
///
/// One allocator serves a whole match so IDs never repeat across the two
/// decks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EntityAllocator {
    next: u32,
}

impl EntityAllocator {
    /// Create an allocator starting at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next ID.
    pub fn alloc(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of IDs handed out so far.
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.next
    }
}
