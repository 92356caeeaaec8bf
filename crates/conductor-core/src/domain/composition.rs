use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{require_positive, require_unit_interval};
use crate::{MessageType, Urgency, ValidationError};

/// Output parameters chosen for a market state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Composition {
    /// Mix level shared by the tone and visual channels, in `[0, 1]`.
    pub harmonic_intensity: f64,
    pub urgency: Urgency,
    pub message_type: MessageType,
    /// Tone frequency in Hz before intensity scaling.
    pub base_frequency: f64,
}

impl Composition {
    pub fn new(
        harmonic_intensity: f64,
        urgency: Urgency,
        message_type: MessageType,
        base_frequency: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            harmonic_intensity: require_unit_interval("harmonic_intensity", harmonic_intensity)?,
            urgency,
            message_type,
            base_frequency: require_positive("base_frequency", base_frequency)?,
        })
    }

    /// Same composition retuned to another base frequency.
    pub fn with_base_frequency(self, base_frequency: f64) -> Result<Self, ValidationError> {
        Self::new(
            self.harmonic_intensity,
            self.urgency,
            self.message_type,
            base_frequency,
        )
    }
}

#[derive(Deserialize)]
struct RawComposition {
    harmonic_intensity: f64,
    urgency: Urgency,
    message_type: MessageType,
    base_frequency: f64,
}

impl<'de> Deserialize<'de> for Composition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawComposition::deserialize(deserializer)?;
        Self::new(
            raw.harmonic_intensity,
            raw.urgency,
            raw.message_type,
            raw.base_frequency,
        )
        .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_intensity_above_one() {
        let err = Composition::new(1.5, Urgency::Low, MessageType::Analyst, 432.0)
            .expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::OutOfUnitRange {
                field: "harmonic_intensity",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_positive_frequency() {
        let err = Composition::new(0.5, Urgency::Low, MessageType::Analyst, 0.0)
            .expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::NonPositiveValue {
                field: "base_frequency",
                ..
            }
        ));
    }

    #[test]
    fn serde_uses_snake_case_enums() {
        let composition =
            Composition::new(0.9, Urgency::Critical, MessageType::Mentor, 111.11).expect("valid");
        let json = serde_json::to_value(composition).expect("serializable");

        assert_eq!(json["urgency"], "critical");
        assert_eq!(json["message_type"], "mentor");

        let back: Composition = serde_json::from_value(json).expect("deserializable");
        assert_eq!(back, composition);
    }

    #[test]
    fn retuning_keeps_everything_but_frequency() {
        let composition =
            Composition::new(0.7, Urgency::Medium, MessageType::Analyst, 432.0).expect("valid");
        let retuned = composition.with_base_frequency(528.0).expect("valid");

        assert_eq!(retuned.base_frequency, 528.0);
        assert_eq!(retuned.urgency, Urgency::Medium);
        assert!(composition.with_base_frequency(-1.0).is_err());
    }
}
