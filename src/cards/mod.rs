//! Card system: definitions, instances, catalog and deck building.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `DiceSpec`: The die a card rolls, `[min_value, sides]`
//! - `CardDefinition`: Static card data (dice, outcome table, direct effect, rarity)
//! - `CardInstance`: One copy of a definition inside a match
//! - `CardCatalog`: Validated, ordered definition lookup
//! - `DeckBuilder`: Rarity-weighted deck construction

pub mod catalog;
pub mod deck;
pub mod definition;
pub mod instance;

pub use catalog::CardCatalog;
pub use deck::DeckBuilder;
pub use definition::{CardDefinition, CardId, DiceSpec};
pub use instance::CardInstance;
