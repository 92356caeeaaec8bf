use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// The seven named harmonic bells and their resting frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bell {
    Clarity,
    Strength,
    Transformation,
    Integrity,
    Intuition,
    Manifestation,
    Sovereignty,
}

impl Bell {
    pub const ALL: [Self; 7] = [
        Self::Clarity,
        Self::Strength,
        Self::Transformation,
        Self::Integrity,
        Self::Intuition,
        Self::Manifestation,
        Self::Sovereignty,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clarity => "clarity",
            Self::Strength => "strength",
            Self::Transformation => "transformation",
            Self::Integrity => "integrity",
            Self::Intuition => "intuition",
            Self::Manifestation => "manifestation",
            Self::Sovereignty => "sovereignty",
        }
    }

    /// Resting frequency in Hz.
    pub const fn frequency(self) -> f64 {
        match self {
            Self::Clarity => 396.0,
            Self::Strength => 417.0,
            Self::Transformation => 528.0,
            Self::Integrity => 639.0,
            Self::Intuition => 741.0,
            Self::Manifestation => 852.0,
            Self::Sovereignty => 963.0,
        }
    }
}

impl Display for Bell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bell {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|bell| bell.as_str() == normalized)
            .ok_or(ValidationError::InvalidBell { value: normalized })
    }
}
