//! Fan-out of one composition to the tone, speech, and visual channels.
//!
//! ```text
//!                    ┌──────────────┐
//!   Composition ───▶ │ DispatchPlan │ ── InvalidParameter (no channel calls)
//!                    └──────┬───────┘
//!          ┌────────────────┼────────────────┐
//!          ▼                ▼                ▼
//!   breaker+timeout  breaker+timeout  breaker+timeout
//!       tone             speech           visual
//!          └────────────────┼────────────────┘
//!                           ▼
//!                    DispatchRecord
//! ```
//!
//! The three calls are joined, not chained: none of them sees another's
//! outcome, and the record is produced only after all three settle. A channel
//! that panics is reported as `channel.internal` like any other failure.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use serde::Serialize;
use tracing::{debug, warn};

use crate::channel::{
    ChannelError, ChannelErrorKind, ChannelKind, ChannelPayload, ChannelResult, SpeechChannel,
    ToneChannel, VisualChannel,
};
use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use crate::devices::{SimulatedSpeech, SimulatedTone, SimulatedVisual};
use crate::error::{require_positive, require_unit_interval};
use crate::phonics::{message_for, Prosody};
use crate::{Bell, Composition, DispatchError, MarketState, UtcDateTime};

/// Per-dispatch inputs besides the composition itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchContext {
    /// Market state name or bell name, carried into the record.
    pub label: String,
    pub state: MarketState,
    /// Multiplier applied to the composition's base frequency; must be > 0.
    pub intensity_scale: f64,
}

impl DispatchContext {
    pub fn for_state(state: MarketState, intensity_scale: f64) -> Self {
        Self {
            label: state.as_str().to_owned(),
            state,
            intensity_scale,
        }
    }

    pub fn for_bell(bell: Bell, intensity: f64) -> Self {
        Self {
            label: bell.as_str().to_owned(),
            state: MarketState::Unclassified,
            intensity_scale: intensity,
        }
    }
}

/// Aggregated outcome of sending one composition to every channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchRecord {
    /// Position in the event stream; zero for dispatches outside a loop.
    pub sequence: u64,
    pub label: String,
    pub state: MarketState,
    pub composition: Composition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_frequency: Option<f64>,
    pub dispatched_at: UtcDateTime,
    pub latency_ms: u64,
    pub tone: ChannelResult,
    pub speech: ChannelResult,
    pub visual: ChannelResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

impl DispatchRecord {
    /// Record for a dispatch refused before any channel was called.
    pub fn rejected(
        composition: &Composition,
        context: &DispatchContext,
        error: &DispatchError,
    ) -> Self {
        let skipped = |channel| {
            ChannelResult::failure(
                channel,
                ChannelError::invalid_parameter(format!("not invoked: {error}")),
            )
        };

        Self {
            sequence: 0,
            label: context.label.clone(),
            state: context.state,
            composition: *composition,
            effective_frequency: None,
            dispatched_at: UtcDateTime::now(),
            latency_ms: 0,
            tone: skipped(ChannelKind::Tone),
            speech: skipped(ChannelKind::Speech),
            visual: skipped(ChannelKind::Visual),
            rejection: Some(error.to_string()),
        }
    }

    pub fn results(&self) -> [&ChannelResult; 3] {
        [&self.tone, &self.speech, &self.visual]
    }

    pub fn result_for(&self, channel: ChannelKind) -> &ChannelResult {
        match channel {
            ChannelKind::Tone => &self.tone,
            ChannelKind::Speech => &self.speech,
            ChannelKind::Visual => &self.visual,
        }
    }

    pub fn failure_count(&self) -> usize {
        self.results()
            .iter()
            .filter(|result| !result.is_success())
            .count()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

/// Orchestrator tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrchestratorConfig {
    /// Upper bound for a single channel call.
    pub channel_timeout: Duration,
    pub breaker: CircuitBreakerConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_timeout: Duration::from_secs(5),
            breaker: CircuitBreakerConfig::default(),
        }
    }
}

/// Validated channel arguments derived from a composition and context.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DispatchPlan {
    frequency_hz: f64,
    amplitude: f64,
    message: &'static str,
    prosody: Prosody,
}

impl DispatchPlan {
    fn new(composition: &Composition, context: &DispatchContext) -> Result<Self, DispatchError> {
        let scale = require_positive("intensity_scale", context.intensity_scale)
            .map_err(|reason| DispatchError::invalid_parameter("intensity_scale", reason))?;
        let base = require_positive("base_frequency", composition.base_frequency)
            .map_err(|reason| DispatchError::invalid_parameter("base_frequency", reason))?;
        let frequency_hz = require_positive("effective_frequency", base * scale)
            .map_err(|reason| DispatchError::invalid_parameter("effective_frequency", reason))?;
        let amplitude = require_unit_interval("harmonic_intensity", composition.harmonic_intensity)
            .map_err(|reason| DispatchError::invalid_parameter("harmonic_intensity", reason))?;

        Ok(Self {
            frequency_hz,
            amplitude,
            message: message_for(composition.message_type),
            prosody: Prosody::for_urgency(composition.urgency),
        })
    }
}

#[derive(Debug)]
struct ChannelBreakers {
    tone: CircuitBreaker,
    speech: CircuitBreaker,
    visual: CircuitBreaker,
}

impl ChannelBreakers {
    fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            tone: CircuitBreaker::new(ChannelKind::Tone, config),
            speech: CircuitBreaker::new(ChannelKind::Speech, config),
            visual: CircuitBreaker::new(ChannelKind::Visual, config),
        }
    }

    fn get(&self, channel: ChannelKind) -> &CircuitBreaker {
        match channel {
            ChannelKind::Tone => &self.tone,
            ChannelKind::Speech => &self.speech,
            ChannelKind::Visual => &self.visual,
        }
    }
}

/// Drives the three output channels for each composition.
pub struct OutputOrchestrator {
    tone: Arc<dyn ToneChannel>,
    speech: Arc<dyn SpeechChannel>,
    visual: Arc<dyn VisualChannel>,
    config: OrchestratorConfig,
    breakers: ChannelBreakers,
}

impl Default for OutputOrchestrator {
    fn default() -> Self {
        Self::new(
            Arc::new(SimulatedTone::default()),
            Arc::new(SimulatedSpeech::default()),
            Arc::new(SimulatedVisual::default()),
        )
    }
}

impl OutputOrchestrator {
    pub fn new(
        tone: Arc<dyn ToneChannel>,
        speech: Arc<dyn SpeechChannel>,
        visual: Arc<dyn VisualChannel>,
    ) -> Self {
        let config = OrchestratorConfig::default();
        Self {
            tone,
            speech,
            visual,
            config,
            breakers: ChannelBreakers::new(config.breaker),
        }
    }

    /// Replaces the tuning; breaker history is reset.
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self.breakers = ChannelBreakers::new(config.breaker);
        self
    }

    pub fn config(&self) -> OrchestratorConfig {
        self.config
    }

    pub fn breaker_state(&self, channel: ChannelKind) -> CircuitState {
        self.breakers.get(channel).state()
    }

    /// Sends `composition` to every channel.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidParameter`] when the intensity scale,
    /// base frequency, or harmonic intensity is out of range; no channel is
    /// called in that case. Channel failures never produce an `Err`; they are
    /// reported inside the returned record.
    pub async fn dispatch(
        &self,
        composition: &Composition,
        context: &DispatchContext,
    ) -> Result<DispatchRecord, DispatchError> {
        let plan = DispatchPlan::new(composition, context)?;
        let started = Instant::now();
        debug!(
            label = %context.label,
            frequency_hz = plan.frequency_hz,
            amplitude = plan.amplitude,
            urgency = %composition.urgency,
            "dispatching composition"
        );

        let (tone, speech, visual) = tokio::join!(
            self.guarded(ChannelKind::Tone, async {
                self.tone
                    .play_tone(plan.frequency_hz, plan.amplitude)
                    .await
                    .map(ChannelPayload::Tone)
            }),
            self.guarded(ChannelKind::Speech, async {
                self.speech
                    .speak(plan.message, plan.prosody.rate, plan.prosody.pitch)
                    .await
                    .map(ChannelPayload::Speech)
            }),
            self.guarded(ChannelKind::Visual, async {
                self.visual
                    .render_pattern(plan.frequency_hz, plan.amplitude)
                    .await
                    .map(ChannelPayload::Visual)
            }),
        );

        Ok(DispatchRecord {
            sequence: 0,
            label: context.label.clone(),
            state: context.state,
            composition: *composition,
            effective_frequency: Some(plan.frequency_hz),
            dispatched_at: UtcDateTime::now(),
            latency_ms: elapsed_ms(started),
            tone,
            speech,
            visual,
            rejection: None,
        })
    }

    async fn guarded<F>(&self, channel: ChannelKind, call: F) -> ChannelResult
    where
        F: Future<Output = Result<ChannelPayload, ChannelError>>,
    {
        let breaker = self.breakers.get(channel);
        if !breaker.allow_request() {
            return ChannelResult::failure(channel, ChannelError::circuit_open());
        }

        let timeout = self.config.channel_timeout;
        let call = AssertUnwindSafe(call).catch_unwind();
        let error = match tokio::time::timeout(timeout, call).await {
            Ok(Ok(Ok(payload))) => {
                breaker.record_success();
                return ChannelResult::success(channel, payload);
            }
            Ok(Ok(Err(error))) => error,
            Ok(Err(payload)) => {
                ChannelError::internal(format!("channel panicked: {}", panic_message(&*payload)))
            }
            Err(_) => ChannelError::timeout(duration_ms(timeout)),
        };

        // Bad arguments say nothing about device health.
        if error.kind() != ChannelErrorKind::InvalidParameter {
            breaker.record_failure();
        }
        warn!(channel = %channel, code = error.code(), error = %error, "channel call failed");
        ChannelResult::failure(channel, error)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    duration_ms(started.elapsed())
}

fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis().min(u128::from(u64::MAX)) as u64
}
