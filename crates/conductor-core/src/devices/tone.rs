use std::sync::atomic::{AtomicU64, Ordering};

use super::{check_amplitude, check_frequency, DeviceControl};
use crate::channel::{ChannelFuture, ToneChannel, ToneHandle};

const SAMPLE_RATE: u32 = 44_100;
const DURATION_SECS: f64 = 2.0;

/// Tone device that hands out playback handles without producing sound.
#[derive(Debug)]
pub struct SimulatedTone {
    control: DeviceControl,
    next_id: AtomicU64,
}

impl Default for SimulatedTone {
    fn default() -> Self {
        Self {
            control: DeviceControl::new("tone"),
            next_id: AtomicU64::new(1),
        }
    }
}

impl SimulatedTone {
    pub fn with_failure_rate(failure_rate: f64, seed: u64) -> Self {
        Self {
            control: DeviceControl::new("tone").with_failure_rate(failure_rate, seed),
            ..Self::default()
        }
    }

    pub fn set_available(&self, available: bool) {
        self.control.set_available(available);
    }

    pub fn calls(&self) -> usize {
        self.control.calls()
    }
}

impl ToneChannel for SimulatedTone {
    fn play_tone<'a>(&'a self, frequency_hz: f64, amplitude: f64) -> ChannelFuture<'a, ToneHandle> {
        Box::pin(async move {
            self.control.begin_call()?;
            let frequency_hz = check_frequency(frequency_hz)?;
            let amplitude = check_amplitude(amplitude)?;

            Ok(ToneHandle {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                frequency_hz,
                amplitude,
                sample_rate: SAMPLE_RATE,
                sample_count: (f64::from(SAMPLE_RATE) * DURATION_SECS) as u64,
            })
        })
    }
}
