use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Discrete market classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketState {
    CalmAccumulation,
    PanicSelling,
    BullBreakout,
    /// Used for dispatches that did not come from classification, such as bells.
    Unclassified,
}

impl MarketState {
    pub const ALL: [Self; 4] = [
        Self::CalmAccumulation,
        Self::PanicSelling,
        Self::BullBreakout,
        Self::Unclassified,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CalmAccumulation => "calm_accumulation",
            Self::PanicSelling => "panic_selling",
            Self::BullBreakout => "bull_breakout",
            Self::Unclassified => "unclassified",
        }
    }
}

impl Display for MarketState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketState {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "calm_accumulation" => Ok(Self::CalmAccumulation),
            "panic_selling" => Ok(Self::PanicSelling),
            "bull_breakout" => Ok(Self::BullBreakout),
            "unclassified" => Ok(Self::Unclassified),
            other => Err(ValidationError::InvalidMarketState {
                value: other.to_owned(),
            }),
        }
    }
}

/// How loudly a composition should demand attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl Display for Urgency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(ValidationError::InvalidUrgency {
                value: other.to_owned(),
            }),
        }
    }
}

/// Voice persona used to pick the spoken message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Analyst,
    Mentor,
    Strategist,
    Warning,
    Bullish,
}

impl MessageType {
    pub const ALL: [Self; 5] = [
        Self::Analyst,
        Self::Mentor,
        Self::Strategist,
        Self::Warning,
        Self::Bullish,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analyst => "analyst",
            Self::Mentor => "mentor",
            Self::Strategist => "strategist",
            Self::Warning => "warning",
            Self::Bullish => "bullish",
        }
    }
}

impl Display for MessageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "analyst" => Ok(Self::Analyst),
            "mentor" => Ok(Self::Mentor),
            "strategist" => Ok(Self::Strategist),
            "warning" => Ok(Self::Warning),
            "bullish" => Ok(Self::Bullish),
            other => Err(ValidationError::InvalidMessageType {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_state_round_trips_through_str() {
        for state in MarketState::ALL {
            assert_eq!(state.as_str().parse::<MarketState>(), Ok(state));
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(" Panic_Selling ".parse(), Ok(MarketState::PanicSelling));
        assert_eq!("CRITICAL".parse(), Ok(Urgency::Critical));
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        let err = "poet".parse::<MessageType>().expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidMessageType { .. }));
    }

    #[test]
    fn only_high_and_critical_are_elevated() {
        assert!(!Urgency::Low.is_elevated());
        assert!(!Urgency::Medium.is_elevated());
        assert!(Urgency::High.is_elevated());
        assert!(Urgency::Critical.is_elevated());
    }
}
