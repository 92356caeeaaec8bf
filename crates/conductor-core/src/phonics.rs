//! Speech text and prosody derived from a composition.

use serde::{Deserialize, Serialize};

use crate::{MessageType, Urgency};

/// Relative speaking rate and pitch; `1.0` is the engine's baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prosody {
    pub rate: f64,
    pub pitch: f64,
}

impl Prosody {
    pub const BASELINE: Self = Self {
        rate: 1.0,
        pitch: 1.0,
    };

    pub const URGENT: Self = Self {
        rate: 1.5,
        pitch: 1.2,
    };

    pub const fn for_urgency(urgency: Urgency) -> Self {
        if urgency.is_elevated() {
            Self::URGENT
        } else {
            Self::BASELINE
        }
    }
}

/// Fixed message text for each voice persona.
pub const fn message_for(message_type: MessageType) -> &'static str {
    match message_type {
        MessageType::Analyst => "Markets are calm. Quiet accumulation is underway.",
        MessageType::Mentor => "Breathe. Fear is moving the market; hold to your plan.",
        MessageType::Strategist => "Breakout confirmed. Volume and momentum are aligned.",
        MessageType::Warning => "Warning: RSI is overheating.",
        MessageType::Bullish => "Strong bullish momentum detected.",
    }
}
