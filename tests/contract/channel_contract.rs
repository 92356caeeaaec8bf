use std::sync::Arc;

use conductor_core::{
    ChannelErrorKind, SimulatedSpeech, SimulatedTone, SimulatedVisual, SpeechChannel, ToneChannel,
    VisualChannel,
};

struct FrequencyCase {
    name: &'static str,
    tone: Arc<dyn ToneChannel>,
    visual: Arc<dyn VisualChannel>,
}

fn frequency_cases() -> Vec<FrequencyCase> {
    vec![
        FrequencyCase {
            name: "default",
            tone: Arc::new(SimulatedTone::default()),
            visual: Arc::new(SimulatedVisual::default()),
        },
        FrequencyCase {
            name: "small raster",
            tone: Arc::new(SimulatedTone::with_failure_rate(0.0, 11)),
            visual: Arc::new(SimulatedVisual::default().with_size(4)),
        },
    ]
}

#[tokio::test]
async fn tone_echoes_requested_frequency_and_amplitude() {
    for case in frequency_cases() {
        for (frequency, amplitude) in [(432.0, 0.4), (111.11, 0.9), (963.0, 0.0), (450.0, 1.0)] {
            let handle = case
                .tone
                .play_tone(frequency, amplitude)
                .await
                .unwrap_or_else(|error| panic!("case '{}': tone failed: {error}", case.name));

            assert_eq!(handle.frequency_hz, frequency, "case '{}': frequency", case.name);
            assert_eq!(handle.amplitude, amplitude, "case '{}': amplitude", case.name);
            assert!(handle.sample_rate > 0, "case '{}': sample rate", case.name);
        }
    }
}

#[tokio::test]
async fn visual_raster_is_square_and_fully_populated() {
    for case in frequency_cases() {
        let image = case
            .visual
            .render_pattern(528.0, 0.7)
            .await
            .unwrap_or_else(|error| panic!("case '{}': render failed: {error}", case.name));

        assert_eq!(image.width, image.height, "case '{}': square", case.name);
        assert_eq!(
            image.byte_len(),
            (image.width * image.height) as usize,
            "case '{}': pixel count",
            case.name
        );
    }
}

#[tokio::test]
async fn non_positive_frequency_is_an_invalid_parameter() {
    for case in frequency_cases() {
        for frequency in [0.0, -432.0, f64::NAN, f64::INFINITY] {
            let tone_error = case
                .tone
                .play_tone(frequency, 0.5)
                .await
                .expect_err("tone must reject");
            let visual_error = case
                .visual
                .render_pattern(frequency, 0.5)
                .await
                .expect_err("visual must reject");

            assert_eq!(
                tone_error.kind(),
                ChannelErrorKind::InvalidParameter,
                "case '{}': tone at {frequency}",
                case.name
            );
            assert_eq!(
                visual_error.kind(),
                ChannelErrorKind::InvalidParameter,
                "case '{}': visual at {frequency}",
                case.name
            );
            assert!(!tone_error.retryable());
        }
    }
}

#[tokio::test]
async fn amplitude_outside_unit_interval_is_an_invalid_parameter() {
    for case in frequency_cases() {
        for amplitude in [-0.1, 1.01, f64::NAN] {
            let error = case
                .tone
                .play_tone(432.0, amplitude)
                .await
                .expect_err("tone must reject");
            assert_eq!(error.code(), "channel.invalid_parameter", "case '{}'", case.name);

            let error = case
                .visual
                .render_pattern(432.0, amplitude)
                .await
                .expect_err("visual must reject");
            assert_eq!(error.code(), "channel.invalid_parameter", "case '{}'", case.name);
        }
    }
}

#[tokio::test]
async fn speech_reports_rate_scaled_words_per_minute() {
    let speech: Arc<dyn SpeechChannel> = Arc::new(SimulatedSpeech::default());

    let baseline = speech
        .speak("Markets are calm.", 1.0, 1.0)
        .await
        .expect("speaks");
    let urgent = speech
        .speak("Breathe.", 1.5, 1.2)
        .await
        .expect("speaks");

    assert!(urgent.words_per_minute > baseline.words_per_minute);
    assert_eq!(urgent.message, "Breathe.");
    assert_eq!(urgent.pitch, 1.2);
}

#[tokio::test]
async fn speech_rejects_blank_messages_and_non_positive_prosody() {
    let speech: Arc<dyn SpeechChannel> = Arc::new(SimulatedSpeech::default());

    for (message, rate, pitch) in [("   ", 1.0, 1.0), ("hello", 0.0, 1.0), ("hello", 1.0, -1.0)] {
        let error = speech
            .speak(message, rate, pitch)
            .await
            .expect_err("must reject");
        assert_eq!(
            error.kind(),
            ChannelErrorKind::InvalidParameter,
            "speak({message:?}, {rate}, {pitch})"
        );
    }
}

#[tokio::test]
async fn offline_devices_report_retryable_unavailability() {
    let tone = SimulatedTone::default();
    let speech = SimulatedSpeech::default();
    let visual = SimulatedVisual::default();
    tone.set_available(false);
    speech.set_available(false);
    visual.set_available(false);

    let errors = [
        tone.play_tone(432.0, 0.4).await.expect_err("offline"),
        speech.speak("hello", 1.0, 1.0).await.expect_err("offline"),
        visual.render_pattern(432.0, 0.4).await.expect_err("offline"),
    ];

    for error in errors {
        assert_eq!(error.kind(), ChannelErrorKind::Unavailable);
        assert!(error.retryable());
    }
}

#[tokio::test]
async fn seeded_failure_injection_is_reproducible() {
    async fn outcomes(seed: u64) -> Vec<bool> {
        let tone = SimulatedTone::with_failure_rate(0.5, seed);
        let mut outcomes = Vec::new();
        for _ in 0..24 {
            outcomes.push(tone.play_tone(432.0, 0.4).await.is_ok());
        }
        outcomes
    }

    let first = outcomes(1234).await;
    assert_eq!(first, outcomes(1234).await);
    assert!(first.iter().any(|ok| *ok));
    assert!(first.iter().any(|ok| !*ok));
}
