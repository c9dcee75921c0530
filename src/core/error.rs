//! Engine error types.
//!
//! Two families:
//!
//! - [`ConfigurationError`]: the catalog or match configuration is malformed.
//!   Raised while loading, so a match never starts with a broken catalog.
//! - [`EngineError`]: a request against a running match was refused.
//!   `InvalidAction` never mutates state; the caller may simply ask again.

use thiserror::Error;

use crate::cards::CardId;

/// A malformed catalog or match configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("card {card}: dice needs at least one side (got {sides})")]
    NoSides { card: CardId, sides: i64 },
    #[error("card {card}: minimum die value must be at least 1 (got {min_value})")]
    MinValueTooLow { card: CardId, min_value: i64 },
    #[error("card {card}: minimum die value {min_value} exceeds sides {sides}")]
    MinValueAboveSides {
        card: CardId,
        min_value: i64,
        sides: i64,
    },
    #[error("card {card}: outcome range {low}-{high} is inverted")]
    InvertedRange { card: CardId, low: i64, high: i64 },
    #[error("card {0} is registered twice")]
    DuplicateCard(CardId),
    #[error("catalog has no cards")]
    EmptyCatalog,
    #[error("deck size must be at least 1")]
    EmptyDeck,
    #[error("first-mover die needs at least one side (got {0})")]
    FirstMoverDie(i64),
}

/// A refused request against a match.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("invalid action: {reason}")]
    InvalidAction { reason: String },
    #[error("the match is already over")]
    MatchOver,
}

impl EngineError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidAction {
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix this by choosing differently.
    #[must_use]
    pub fn is_invalid_action(&self) -> bool {
        matches!(self, Self::InvalidAction { .. })
    }
}
