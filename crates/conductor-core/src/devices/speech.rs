use std::sync::Mutex;

use super::DeviceControl;
use crate::channel::{ChannelError, ChannelFuture, SpeechChannel, Utterance};

/// Engine speaking rate at `rate == 1.0`.
const BASE_WORDS_PER_MINUTE: f64 = 150.0;

/// Speech device that records what it was asked to say.
#[derive(Debug)]
pub struct SimulatedSpeech {
    control: DeviceControl,
    spoken: Mutex<Vec<String>>,
}

impl Default for SimulatedSpeech {
    fn default() -> Self {
        Self {
            control: DeviceControl::new("speech"),
            spoken: Mutex::new(Vec::new()),
        }
    }
}

impl SimulatedSpeech {
    pub fn with_failure_rate(failure_rate: f64, seed: u64) -> Self {
        Self {
            control: DeviceControl::new("speech").with_failure_rate(failure_rate, seed),
            ..Self::default()
        }
    }

    pub fn set_available(&self, available: bool) {
        self.control.set_available(available);
    }

    pub fn calls(&self) -> usize {
        self.control.calls()
    }

    /// Messages spoken successfully, oldest first.
    pub fn transcript(&self) -> Vec<String> {
        self.spoken
            .lock()
            .map(|spoken| spoken.clone())
            .unwrap_or_default()
    }
}

impl SpeechChannel for SimulatedSpeech {
    fn speak<'a>(&'a self, message: &'a str, rate: f64, pitch: f64) -> ChannelFuture<'a, Utterance> {
        Box::pin(async move {
            self.control.begin_call()?;

            if message.trim().is_empty() {
                return Err(ChannelError::invalid_parameter("message cannot be empty"));
            }
            for (name, value) in [("rate", rate), ("pitch", pitch)] {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ChannelError::invalid_parameter(format!(
                        "{name} must be positive, got {value}"
                    )));
                }
            }

            self.spoken
                .lock()
                .map_err(|_| ChannelError::internal("transcript lock poisoned"))?
                .push(message.to_owned());

            Ok(Utterance {
                message: message.to_owned(),
                rate,
                pitch,
                words_per_minute: BASE_WORDS_PER_MINUTE * rate,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scales_words_per_minute_by_rate() {
        let speech = SimulatedSpeech::default();
        let utterance = speech.speak("hello", 1.5, 1.2).await.expect("speaks");

        assert_eq!(utterance.words_per_minute, 225.0);
        assert_eq!(speech.transcript(), vec![String::from("hello")]);
    }

    #[tokio::test]
    async fn offline_engine_says_nothing() {
        let speech = SimulatedSpeech::default();
        speech.set_available(false);

        let err = speech.speak("hello", 1.0, 1.0).await.expect_err("offline");
        assert_eq!(err.code(), "channel.unavailable");
        assert!(speech.transcript().is_empty());
    }

    #[tokio::test]
    async fn rejects_zero_pitch() {
        let speech = SimulatedSpeech::default();
        let err = speech.speak("hello", 1.0, 0.0).await.expect_err("must fail");
        assert!(err.message().contains("pitch"));
    }
}
