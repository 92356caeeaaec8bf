//! Startup configuration for a conductor pipeline.
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `CONDUCTOR_CATALOG` | Path to a catalog JSON file, used when no path is given explicitly |

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::channel::{SpeechChannel, ToneChannel, VisualChannel};
use crate::circuit_breaker::CircuitBreakerConfig;
use crate::event_loop::MarketEventLoop;
use crate::orchestrator::{OrchestratorConfig, OutputOrchestrator};
use crate::selector::CompositionSelector;
use crate::{CompositionCatalog, ConfigurationError};

pub const CATALOG_ENV_VAR: &str = "CONDUCTOR_CATALOG";

/// Everything needed to assemble a [`MarketEventLoop`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConductorConfig {
    /// Catalog file; the built-in table is used when `None`.
    pub catalog_path: Option<PathBuf>,
    pub intensity_scale: f64,
    pub orchestrator: OrchestratorConfig,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            intensity_scale: 1.0,
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

impl ConductorConfig {
    /// Defaults, with the catalog path taken from `CONDUCTOR_CATALOG` if set.
    pub fn from_env() -> Self {
        Self {
            catalog_path: env::var_os(CATALOG_ENV_VAR).map(PathBuf::from),
            ..Self::default()
        }
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn with_intensity_scale(mut self, intensity_scale: f64) -> Self {
        self.intensity_scale = intensity_scale;
        self
    }

    pub fn with_channel_timeout(mut self, timeout: Duration) -> Self {
        self.orchestrator.channel_timeout = timeout;
        self
    }

    pub fn with_breaker(mut self, breaker: CircuitBreakerConfig) -> Self {
        self.orchestrator.breaker = breaker;
        self
    }

    pub fn load_catalog(&self) -> Result<CompositionCatalog, ConfigurationError> {
        match &self.catalog_path {
            Some(path) => CompositionCatalog::from_path(path),
            None => Ok(CompositionCatalog::default()),
        }
    }

    /// Loads and validates the catalog and wires the channels into a loop.
    pub fn build_loop(
        &self,
        tone: Arc<dyn ToneChannel>,
        speech: Arc<dyn SpeechChannel>,
        visual: Arc<dyn VisualChannel>,
    ) -> Result<MarketEventLoop, ConfigurationError> {
        let selector = CompositionSelector::new(Arc::new(self.load_catalog()?))?;
        let orchestrator =
            OutputOrchestrator::new(tone, speech, visual).with_config(self.orchestrator);
        MarketEventLoop::new(selector, orchestrator, self.intensity_scale)
    }
}
