//! Output channel contracts and per-channel results.
//!
//! Each output modality is a separate trait so an implementation can be
//! swapped without touching the others. Methods return boxed futures, matching
//! how the orchestrator drives all three concurrently.
//!
//! | Channel | Trait | Success payload |
//! |---------|-------|-----------------|
//! | Tone | [`ToneChannel`] | [`ToneHandle`] |
//! | Speech | [`SpeechChannel`] | [`Utterance`] |
//! | Visual | [`VisualChannel`] | [`PatternImage`] |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Output modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Tone,
    Speech,
    Visual,
}

impl ChannelKind {
    pub const ALL: [Self; 3] = [Self::Tone, Self::Speech, Self::Visual];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tone => "tone",
            Self::Speech => "speech",
            Self::Visual => "visual",
        }
    }
}

impl Display for ChannelKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel-level failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelErrorKind {
    Unavailable,
    Timeout,
    CircuitOpen,
    InvalidParameter,
    Internal,
}

/// Structured failure of a single channel call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelError {
    kind: ChannelErrorKind,
    message: String,
    retryable: bool,
}

impl ChannelError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: ChannelErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        Self {
            kind: ChannelErrorKind::Timeout,
            message: format!("channel did not settle within {timeout_ms}ms"),
            retryable: true,
        }
    }

    pub fn circuit_open() -> Self {
        Self {
            kind: ChannelErrorKind::CircuitOpen,
            message: String::from("circuit breaker is open; call skipped"),
            retryable: true,
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self {
            kind: ChannelErrorKind::InvalidParameter,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ChannelErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> ChannelErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ChannelErrorKind::Unavailable => "channel.unavailable",
            ChannelErrorKind::Timeout => "channel.timeout",
            ChannelErrorKind::CircuitOpen => "channel.circuit_open",
            ChannelErrorKind::InvalidParameter => "channel.invalid_parameter",
            ChannelErrorKind::Internal => "channel.internal",
        }
    }
}

impl Display for ChannelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ChannelError {}

/// Handle to a tone that has started playing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneHandle {
    pub id: u64,
    pub frequency_hz: f64,
    pub amplitude: f64,
    pub sample_rate: u32,
    pub sample_count: u64,
}

/// Summary of a spoken message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub message: String,
    pub rate: f64,
    pub pitch: f64,
    pub words_per_minute: f64,
}

/// Raw grayscale raster produced by the visual channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternImage {
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing, default)]
    pub pixels: Vec<u8>,
}

impl PatternImage {
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

/// Successful channel output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelPayload {
    Tone(ToneHandle),
    Speech(Utterance),
    Visual(PatternImage),
}

/// Outcome of one channel call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChannelOutcome {
    Success { payload: ChannelPayload },
    Failure { code: String, error: ChannelError },
}

/// Tagged per-channel result inside a dispatch record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelResult {
    pub channel: ChannelKind,
    pub outcome: ChannelOutcome,
}

impl ChannelResult {
    pub fn success(channel: ChannelKind, payload: ChannelPayload) -> Self {
        Self {
            channel,
            outcome: ChannelOutcome::Success { payload },
        }
    }

    pub fn failure(channel: ChannelKind, error: ChannelError) -> Self {
        Self {
            channel,
            outcome: ChannelOutcome::Failure {
                code: error.code().to_owned(),
                error,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ChannelOutcome::Success { .. })
    }

    pub fn payload(&self) -> Option<&ChannelPayload> {
        match &self.outcome {
            ChannelOutcome::Success { payload } => Some(payload),
            ChannelOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ChannelError> {
        match &self.outcome {
            ChannelOutcome::Success { .. } => None,
            ChannelOutcome::Failure { error, .. } => Some(error),
        }
    }
}

pub type ChannelFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ChannelError>> + Send + 'a>>;

/// Audible tone output.
///
/// Implementations must be `Send + Sync`; the orchestrator shares them across
/// dispatches through `Arc`.
pub trait ToneChannel: Send + Sync {
    /// Starts a tone at `frequency_hz` (> 0) with `amplitude` in `[0, 1]`.
    fn play_tone<'a>(&'a self, frequency_hz: f64, amplitude: f64) -> ChannelFuture<'a, ToneHandle>;
}

/// Spoken-word output.
pub trait SpeechChannel: Send + Sync {
    /// Speaks `message` with relative `rate` and `pitch` (both > 0, 1.0 is baseline).
    fn speak<'a>(&'a self, message: &'a str, rate: f64, pitch: f64) -> ChannelFuture<'a, Utterance>;
}

/// Visual pattern output.
pub trait VisualChannel: Send + Sync {
    /// Renders a pattern for `frequency_hz` (> 0) with `amplitude` in `[0, 1]`.
    fn render_pattern<'a>(
        &'a self,
        frequency_hz: f64,
        amplitude: f64,
    ) -> ChannelFuture<'a, PatternImage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ChannelError::timeout(10).code(), "channel.timeout");
        assert_eq!(ChannelError::circuit_open().code(), "channel.circuit_open");
        assert_eq!(ChannelError::unavailable("x").code(), "channel.unavailable");
        assert!(!ChannelError::invalid_parameter("x").retryable());
    }

    #[test]
    fn failure_result_serializes_with_status_tag() {
        let result = ChannelResult::failure(ChannelKind::Speech, ChannelError::unavailable("muted"));
        let json = serde_json::to_value(&result).expect("serializable");

        assert_eq!(json["channel"], "speech");
        assert_eq!(json["outcome"]["status"], "failure");
        assert_eq!(json["outcome"]["code"], "channel.unavailable");
        assert!(result.payload().is_none());
    }

    #[test]
    fn success_result_exposes_payload() {
        let result = ChannelResult::success(
            ChannelKind::Visual,
            ChannelPayload::Visual(PatternImage {
                width: 2,
                height: 2,
                pixels: vec![0, 1, 2, 3],
            }),
        );

        assert!(result.is_success());
        assert!(result.error().is_none());
        match result.payload() {
            Some(ChannelPayload::Visual(image)) => assert_eq!(image.byte_len(), 4),
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
