//! # Domain Models
//!
//! Value types flowing through the conductor pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`MarketMetrics`] | One tick of raw metrics |
//! | [`MarketState`] | Classification label |
//! | [`Composition`] | Output parameters for a state |
//! | [`Urgency`] | Attention level of a composition |
//! | [`MessageType`] | Voice persona for the speech channel |
//! | [`Bell`] | Named harmonic bells for manual dispatch |
//! | [`UtcDateTime`] | Record timestamp |
//!
//! Constructors validate numeric invariants and return [`ValidationError`]
//! on violation; deserialization goes through the same checks.
//!
//! [`ValidationError`]: crate::ValidationError

mod bell;
mod composition;
mod metrics;
mod state;
mod timestamp;

pub use bell::Bell;
pub use composition::Composition;
pub use metrics::MarketMetrics;
pub use state::{MarketState, MessageType, Urgency};
pub use timestamp::UtcDateTime;
