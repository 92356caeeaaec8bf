//! State → composition table.
//!
//! A [`CompositionCatalog`] is built once at startup, either from the literal
//! default table or from a JSON file, and is read-only afterwards. Every
//! constructor checks completeness over [`MarketState::ALL`], so a catalog that
//! exists can always answer [`CompositionCatalog::lookup`] for any state the
//! classifier produces.
//!
//! # File format
//!
//! ```json
//! {
//!   "entries": {
//!     "calm_accumulation": { "harmonic_intensity": 0.4, "urgency": "low", "message_type": "analyst", "base_frequency": 432 },
//!     "panic_selling":     { "harmonic_intensity": 0.9, "urgency": "critical", "message_type": "mentor", "base_frequency": 111.11 },
//!     "bull_breakout":     { "harmonic_intensity": 0.7, "urgency": "high", "message_type": "strategist", "base_frequency": 450 },
//!     "unclassified":      { "harmonic_intensity": 0.7, "urgency": "medium", "message_type": "analyst", "base_frequency": 432 }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Bell, Composition, ConfigurationError, MarketState, MessageType, Urgency};

/// Complete, validated mapping from every market state to a composition.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionCatalog {
    entries: BTreeMap<MarketState, Composition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    entries: BTreeMap<MarketState, CatalogEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CatalogEntry {
    harmonic_intensity: f64,
    urgency: Urgency,
    message_type: MessageType,
    base_frequency: f64,
}

impl Default for CompositionCatalog {
    fn default() -> Self {
        Self {
            entries: MarketState::ALL
                .into_iter()
                .map(|state| (state, default_composition(state)))
                .collect(),
        }
    }
}

impl CompositionCatalog {
    /// Builds a catalog from explicit entries, rejecting incomplete tables.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (MarketState, Composition)>,
    ) -> Result<Self, ConfigurationError> {
        let catalog = Self {
            entries: entries.into_iter().collect(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigurationError> {
        let file: CatalogFile = serde_json::from_str(input)
            .map_err(|error| ConfigurationError::Malformed(error.to_string()))?;

        let mut entries = BTreeMap::new();
        for (state, entry) in file.entries {
            let composition = Composition::new(
                entry.harmonic_intensity,
                entry.urgency,
                entry.message_type,
                entry.base_frequency,
            )
            .map_err(|reason| ConfigurationError::InvalidEntry { state, reason })?;
            entries.insert(state, composition);
        }

        Self::from_entries(entries)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|error| ConfigurationError::Unreadable {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        Self::from_json_str(&contents)
    }

    /// Checks that every state has an entry.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match MarketState::ALL
            .into_iter()
            .find(|state| !self.entries.contains_key(state))
        {
            Some(state) => Err(ConfigurationError::MissingEntry { state }),
            None => Ok(()),
        }
    }

    pub fn lookup(&self, state: MarketState) -> Result<Composition, ConfigurationError> {
        self.entries
            .get(&state)
            .copied()
            .ok_or(ConfigurationError::MissingEntry { state })
    }

    /// The `Unclassified` composition retuned to the bell's frequency.
    pub fn bell_composition(&self, bell: Bell) -> Result<Composition, ConfigurationError> {
        let state = MarketState::Unclassified;
        self.lookup(state)?
            .with_base_frequency(bell.frequency())
            .map_err(|reason| ConfigurationError::InvalidEntry { state, reason })
    }

    pub fn iter(&self) -> impl Iterator<Item = (MarketState, &Composition)> {
        self.entries.iter().map(|(state, composition)| (*state, composition))
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let file = CatalogFile {
            entries: self
                .entries
                .iter()
                .map(|(state, composition)| {
                    (
                        *state,
                        CatalogEntry {
                            harmonic_intensity: composition.harmonic_intensity,
                            urgency: composition.urgency,
                            message_type: composition.message_type,
                            base_frequency: composition.base_frequency,
                        },
                    )
                })
                .collect(),
        };
        serde_json::to_string_pretty(&file)
    }
}

fn default_composition(state: MarketState) -> Composition {
    let (harmonic_intensity, urgency, message_type, base_frequency) = match state {
        MarketState::CalmAccumulation => (0.4, Urgency::Low, MessageType::Analyst, 432.0),
        // Return-to-sender frequency.
        MarketState::PanicSelling => (0.9, Urgency::Critical, MessageType::Mentor, 111.11),
        MarketState::BullBreakout => (0.7, Urgency::High, MessageType::Strategist, 450.0),
        MarketState::Unclassified => (0.7, Urgency::Medium, MessageType::Analyst, 432.0),
    };

    Composition {
        harmonic_intensity,
        urgency,
        message_type,
        base_frequency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_complete() {
        let catalog = CompositionCatalog::default();
        assert_eq!(catalog.validate(), Ok(()));
        for state in MarketState::ALL {
            assert!(catalog.lookup(state).is_ok(), "missing {state}");
        }
    }

    #[test]
    fn default_entries_validate_as_compositions() {
        for (state, composition) in CompositionCatalog::default().iter() {
            Composition::new(
                composition.harmonic_intensity,
                composition.urgency,
                composition.message_type,
                composition.base_frequency,
            )
            .unwrap_or_else(|error| panic!("default entry for {state} is invalid: {error}"));
        }
    }

    #[test]
    fn incomplete_entries_are_rejected() {
        let calm = CompositionCatalog::default()
            .lookup(MarketState::CalmAccumulation)
            .expect("present");

        let err = CompositionCatalog::from_entries([(MarketState::CalmAccumulation, calm)])
            .expect_err("must fail");

        assert_eq!(
            err,
            ConfigurationError::MissingEntry {
                state: MarketState::PanicSelling
            }
        );
    }

    #[test]
    fn json_round_trip_preserves_entries() {
        let catalog = CompositionCatalog::default();
        let json = catalog.to_json_string().expect("serializable");
        let parsed = CompositionCatalog::from_json_str(&json).expect("parseable");
        assert_eq!(parsed, catalog);
    }

    #[test]
    fn json_entry_out_of_range_names_the_state() {
        let json = r#"{"entries":{
            "calm_accumulation":{"harmonic_intensity":0.4,"urgency":"low","message_type":"analyst","base_frequency":432},
            "panic_selling":{"harmonic_intensity":2.0,"urgency":"critical","message_type":"mentor","base_frequency":111.11},
            "bull_breakout":{"harmonic_intensity":0.7,"urgency":"high","message_type":"strategist","base_frequency":450},
            "unclassified":{"harmonic_intensity":0.7,"urgency":"medium","message_type":"analyst","base_frequency":432}
        }}"#;

        let err = CompositionCatalog::from_json_str(json).expect_err("must fail");
        assert!(matches!(
            err,
            ConfigurationError::InvalidEntry {
                state: MarketState::PanicSelling,
                ..
            }
        ));
    }

    #[test]
    fn unknown_state_key_is_malformed() {
        let err = CompositionCatalog::from_json_str(r#"{"entries":{"euphoria":{}}}"#)
            .expect_err("must fail");
        assert!(matches!(err, ConfigurationError::Malformed(_)));
    }

    #[test]
    fn bell_composition_keeps_unclassified_voice() {
        let catalog = CompositionCatalog::default();
        let composition = catalog.bell_composition(Bell::Integrity).expect("complete");

        assert_eq!(composition.base_frequency, 639.0);
        assert_eq!(composition.harmonic_intensity, 0.7);
        assert_eq!(composition.urgency, Urgency::Medium);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = CompositionCatalog::from_path("/definitely/not/here.json").expect_err("must fail");
        assert!(matches!(err, ConfigurationError::Unreadable { .. }));
    }
}
