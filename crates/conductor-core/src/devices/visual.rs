use std::f64::consts::PI;

use super::{check_amplitude, check_frequency, DeviceControl};
use crate::channel::{ChannelFuture, PatternImage, VisualChannel};

const DEFAULT_SIZE: u32 = 32;
/// Audible frequencies are mapped down to standing-wave mode numbers.
const FREQUENCY_DIVISOR: f64 = 100.0;

/// Renders a small grayscale standing-wave raster.
#[derive(Debug)]
pub struct SimulatedVisual {
    control: DeviceControl,
    size: u32,
}

impl Default for SimulatedVisual {
    fn default() -> Self {
        Self {
            control: DeviceControl::new("visual"),
            size: DEFAULT_SIZE,
        }
    }
}

impl SimulatedVisual {
    pub fn with_failure_rate(failure_rate: f64, seed: u64) -> Self {
        Self {
            control: DeviceControl::new("visual").with_failure_rate(failure_rate, seed),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size.max(1);
        self
    }

    pub fn set_available(&self, available: bool) {
        self.control.set_available(available);
    }

    pub fn calls(&self) -> usize {
        self.control.calls()
    }
}

impl VisualChannel for SimulatedVisual {
    fn render_pattern<'a>(
        &'a self,
        frequency_hz: f64,
        amplitude: f64,
    ) -> ChannelFuture<'a, PatternImage> {
        Box::pin(async move {
            self.control.begin_call()?;
            let frequency_hz = check_frequency(frequency_hz)?;
            let amplitude = check_amplitude(amplitude)?;

            Ok(render(self.size, frequency_hz / FREQUENCY_DIVISOR, amplitude))
        })
    }
}

fn render(size: u32, mode: f64, amplitude: f64) -> PatternImage {
    let scale = f64::from(size.saturating_sub(1).max(1));
    let mut pixels = Vec::with_capacity((size as usize) * (size as usize));

    for row in 0..size {
        let y = f64::from(row) / scale;
        for col in 0..size {
            let x = f64::from(col) / scale;
            let wave = (mode * PI * x).sin() * (mode * PI * y).sin();
            let level = (amplitude * wave + 1.0) / 2.0;
            pixels.push((level.clamp(0.0, 1.0) * 255.0).round() as u8);
        }
    }

    PatternImage {
        width: size,
        height: size,
        pixels,
    }
}
