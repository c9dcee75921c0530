//! Console presentation helpers used by the `dice-duel` binary.
//!
//! - `RollTicker`: background dice animation, stopped on demand
//! - `text`: one-line renderings of parties, hands and match events
//!
//! Nothing here feeds back into the rules. The engine samples every roll
//! itself after the ticker stops.

mod ticker;
pub mod text;

pub use ticker::{ticker_frame, RollTicker, GARBLED_CHARS, JOIN_TIMEOUT};
