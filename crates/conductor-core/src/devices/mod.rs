//! Deterministic in-process output devices.
//!
//! These implement the channel traits without touching audio, speech, or
//! graphics hardware. They validate their inputs the way a real device would,
//! count calls, and can be told to fail, either always (`set_available(false)`)
//! or with a seeded probability, so the orchestrator's isolation guarantees can
//! be exercised end to end.

mod speech;
mod tone;
mod visual;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub use speech::SimulatedSpeech;
pub use tone::SimulatedTone;
pub use visual::SimulatedVisual;

use crate::ChannelError;

/// Availability switch, call counter, and seeded random failure source shared
/// by the simulated devices.
#[derive(Debug)]
pub(crate) struct DeviceControl {
    name: &'static str,
    available: AtomicBool,
    calls: AtomicUsize,
    failure_rate: f64,
    rng: Mutex<fastrand::Rng>,
}

impl DeviceControl {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            available: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
            failure_rate: 0.0,
            rng: Mutex::new(fastrand::Rng::with_seed(0)),
        }
    }

    pub(crate) fn with_failure_rate(mut self, failure_rate: f64, seed: u64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self.rng = Mutex::new(fastrand::Rng::with_seed(seed));
        self
    }

    pub(crate) fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Counts the call and decides whether it fails.
    pub(crate) fn begin_call(&self) -> Result<(), ChannelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.available.load(Ordering::SeqCst) {
            return Err(ChannelError::unavailable(format!(
                "{} device is offline",
                self.name
            )));
        }

        if self.failure_rate > 0.0 {
            let roll = self
                .rng
                .lock()
                .map(|mut rng| rng.f64())
                .map_err(|_| ChannelError::internal("device rng lock poisoned"))?;
            if roll < self.failure_rate {
                return Err(ChannelError::unavailable(format!(
                    "{} device glitched",
                    self.name
                )));
            }
        }

        Ok(())
    }
}

pub(crate) fn check_frequency(frequency_hz: f64) -> Result<f64, ChannelError> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Ok(frequency_hz)
    } else {
        Err(ChannelError::invalid_parameter(format!(
            "frequency must be positive, got {frequency_hz}"
        )))
    }
}

pub(crate) fn check_amplitude(amplitude: f64) -> Result<f64, ChannelError> {
    if (0.0..=1.0).contains(&amplitude) {
        Ok(amplitude)
    } else {
        Err(ChannelError::invalid_parameter(format!(
            "amplitude must be within [0, 1], got {amplitude}"
        )))
    }
}
