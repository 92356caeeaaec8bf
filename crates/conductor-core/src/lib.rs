//! # Conductor Core
//!
//! Turns a stream of market metrics into tone, speech, and visual output.
//!
//! ## Overview
//!
//! Each market event passes through the same pipeline:
//!
//! - **Classifier** labels the metrics with a [`MarketState`] (first matching rule wins)
//! - **Catalog** maps the state to a [`Composition`]
//! - **Selector** combines the two
//! - **Orchestrator** sends the composition to all three channels at once and
//!   gathers a [`DispatchRecord`]
//! - **Event loop** repeats this for every event, strictly in order
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | State → composition table |
//! | [`channel`] | Output channel traits and per-channel results |
//! | [`circuit_breaker`] | Per-channel circuit breaker |
//! | [`classifier`] | Rule chain producing a market state |
//! | [`config`] | Startup configuration |
//! | [`devices`] | Simulated tone, speech, and visual devices |
//! | [`domain`] | Metrics, states, compositions, bells |
//! | [`error`] | Core error types |
//! | [`event_loop`] | Event sources, observers, and the loop driver |
//! | [`orchestrator`] | Concurrent channel fan-out |
//! | [`phonics`] | Message templates and prosody |
//! | [`selector`] | Classifier + catalog seam |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use conductor_core::{CompositionSelector, IterSource, MarketEventLoop, MarketMetrics, OutputOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let event_loop = MarketEventLoop::new(
//!         CompositionSelector::default(),
//!         OutputOrchestrator::default(),
//!         1.0,
//!     )?;
//!
//!     let mut source = IterSource::new(vec![MarketMetrics::new(60.0, -5.0, false, 20.0, -8.0)?]);
//!     let mut records = Vec::new();
//!     event_loop.run(&mut source, &mut records).await?;
//!
//!     println!("{} -> {:?}", records[0].state, records[0].composition);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use conductor_core::{ChannelError, ChannelErrorKind};
//!
//! fn describe(error: &ChannelError) -> &'static str {
//!     match error.kind() {
//!         ChannelErrorKind::CircuitOpen => "skipped while the device recovers",
//!         ChannelErrorKind::Timeout => "device too slow",
//!         ChannelErrorKind::InvalidParameter => "bad arguments",
//!         _ => "device failure",
//!     }
//! }
//! ```
//!
//! Channel failures are data, not errors: they are recorded in the
//! [`DispatchRecord`] and never stop the loop. Only an incomplete catalog
//! ([`ConfigurationError`]) prevents the loop from starting.

pub mod catalog;
pub mod channel;
pub mod circuit_breaker;
pub mod classifier;
pub mod config;
pub mod devices;
pub mod domain;
pub mod error;
pub mod event_loop;
pub mod orchestrator;
pub mod phonics;
pub mod selector;

// Catalog
pub use catalog::CompositionCatalog;

// Channels
pub use channel::{
    ChannelError, ChannelErrorKind, ChannelKind, ChannelOutcome, ChannelPayload, ChannelResult,
    PatternImage, SpeechChannel, ToneChannel, ToneHandle, Utterance, VisualChannel,
};

// Circuit breaker
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};

// Classification
pub use classifier::{classify, MarketStateClassifier};

// Configuration
pub use config::ConductorConfig;

// Simulated devices
pub use devices::{SimulatedSpeech, SimulatedTone, SimulatedVisual};

// Domain models
pub use domain::{Bell, Composition, MarketMetrics, MarketState, MessageType, Urgency, UtcDateTime};

// Error types
pub use error::{ConfigurationError, CoreError, DispatchError, ValidationError};

// Event loop
pub use event_loop::{
    DispatchObserver, EventSource, IterSource, LoopStats, MarketEventLoop, NdjsonObserver,
    NdjsonSource, ReceiverSource, TracingObserver,
};

// Orchestration
pub use orchestrator::{DispatchContext, DispatchRecord, OrchestratorConfig, OutputOrchestrator};

// Phonics
pub use phonics::{message_for, Prosody};

// Selection
pub use selector::{CompositionSelector, Selection};
