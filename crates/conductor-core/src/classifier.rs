//! Rule chain turning raw metrics into a [`MarketState`].
//!
//! Rules are evaluated in priority order and the first match wins; the chain
//! ends in an unconditional default so every input is classified.
//!
//! | Priority | Condition | State |
//! |----------|-----------|-------|
//! | 1 | `volatility > 50 && price_change < -3` | `PanicSelling` |
//! | 2 | `volume_spike && rsi > 70` | `BullBreakout` |
//! | 3 | otherwise | `CalmAccumulation` |

use crate::{MarketMetrics, MarketState};

pub const PANIC_VOLATILITY_THRESHOLD: f64 = 50.0;
pub const PANIC_PRICE_CHANGE_THRESHOLD: f64 = -3.0;
pub const BREAKOUT_RSI_THRESHOLD: f64 = 70.0;

/// Stateless first-match-wins classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketStateClassifier;

impl MarketStateClassifier {
    pub const fn new() -> Self {
        Self
    }

    pub fn classify(&self, metrics: &MarketMetrics) -> MarketState {
        classify(metrics)
    }
}

pub fn classify(metrics: &MarketMetrics) -> MarketState {
    if metrics.volatility > PANIC_VOLATILITY_THRESHOLD
        && metrics.price_change < PANIC_PRICE_CHANGE_THRESHOLD
    {
        MarketState::PanicSelling
    } else if metrics.volume_spike && metrics.rsi > BREAKOUT_RSI_THRESHOLD {
        MarketState::BullBreakout
    } else {
        MarketState::CalmAccumulation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(volatility: f64, price_change: f64, rsi: f64, volume_spike: bool) -> MarketMetrics {
        MarketMetrics::new(volatility, price_change, volume_spike, rsi, 0.0).expect("valid metrics")
    }

    #[test]
    fn high_volatility_drop_is_panic_selling() {
        assert_eq!(classify(&metrics(60.0, -5.0, 20.0, false)), MarketState::PanicSelling);
    }

    #[test]
    fn volume_spike_with_hot_rsi_is_bull_breakout() {
        assert_eq!(classify(&metrics(10.0, 1.0, 75.0, true)), MarketState::BullBreakout);
    }

    #[test]
    fn quiet_market_is_calm_accumulation() {
        assert_eq!(classify(&metrics(5.0, 0.5, 50.0, false)), MarketState::CalmAccumulation);
    }

    #[test]
    fn panic_rule_beats_breakout_rule() {
        assert_eq!(classify(&metrics(80.0, -10.0, 90.0, true)), MarketState::PanicSelling);
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(classify(&metrics(50.0, -5.0, 20.0, false)), MarketState::CalmAccumulation);
        assert_eq!(classify(&metrics(60.0, -3.0, 20.0, false)), MarketState::CalmAccumulation);
        assert_eq!(classify(&metrics(10.0, 1.0, 70.0, true)), MarketState::CalmAccumulation);
    }

    #[test]
    fn hot_rsi_without_volume_spike_stays_calm() {
        assert_eq!(classify(&metrics(10.0, 1.0, 95.0, false)), MarketState::CalmAccumulation);
    }

    #[test]
    fn classification_is_total_over_a_grid() {
        let volatilities = [-1.0, 0.0, 50.0, 50.5, 1e6];
        let changes = [-1e6, -3.5, -3.0, 0.0, 12.0];
        let rsis = [0.0, 70.0, 70.1, 100.0];

        for &volatility in &volatilities {
            for &price_change in &changes {
                for &rsi in &rsis {
                    for spike in [false, true] {
                        let state = classify(&metrics(volatility, price_change, rsi, spike));
                        assert_ne!(state, MarketState::Unclassified);
                    }
                }
            }
        }
    }
}
