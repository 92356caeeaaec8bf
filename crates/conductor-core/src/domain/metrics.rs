use serde::{Deserialize, Deserializer, Serialize};

use crate::error::require_finite;
use crate::ValidationError;

/// One tick of market metrics, consumed once by the classifier.
///
/// All numeric fields are finite; [`MarketMetrics::new`] and the serde
/// implementation both reject NaN and infinities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketMetrics {
    pub volatility: f64,
    pub price_change: f64,
    pub volume_spike: bool,
    pub rsi: f64,
    pub change_24h: f64,
}

impl MarketMetrics {
    pub fn new(
        volatility: f64,
        price_change: f64,
        volume_spike: bool,
        rsi: f64,
        change_24h: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            volatility: require_finite("volatility", volatility)?,
            price_change: require_finite("price_change", price_change)?,
            volume_spike,
            rsi: require_finite("rsi", rsi)?,
            change_24h: require_finite("change_24h", change_24h)?,
        })
    }
}

#[derive(Deserialize)]
struct RawMetrics {
    volatility: f64,
    price_change: f64,
    #[serde(default)]
    volume_spike: bool,
    rsi: f64,
    #[serde(default)]
    change_24h: f64,
}

impl<'de> Deserialize<'de> for MarketMetrics {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawMetrics::deserialize(deserializer)?;
        Self::new(
            raw.volatility,
            raw.price_change,
            raw.volume_spike,
            raw.rsi,
            raw.change_24h,
        )
        .map_err(serde::de::Error::custom)
    }
}
