//! The dice duel card pool.
//!
//! Fourteen standard cards plus the Debug Card, which only joins the pool
//! with `CatalogVariant::WithDebug`. Catalog order is the order cards are
//! listed here; deck building breaks remainder ties by it.

mod catalog;

pub use catalog::{ids, standard_catalog, standard_definitions};
