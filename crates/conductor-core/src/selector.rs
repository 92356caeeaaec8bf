use std::sync::Arc;

use serde::Serialize;

use crate::classifier::MarketStateClassifier;
use crate::{Composition, CompositionCatalog, ConfigurationError, MarketMetrics, MarketState};

/// Classified state paired with the composition chosen for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection {
    pub state: MarketState,
    pub composition: Composition,
}

/// Classification policy plus catalog, kept apart so either can be swapped.
#[derive(Debug, Clone)]
pub struct CompositionSelector {
    classifier: MarketStateClassifier,
    catalog: Arc<CompositionCatalog>,
}

impl Default for CompositionSelector {
    fn default() -> Self {
        Self {
            classifier: MarketStateClassifier::new(),
            catalog: Arc::new(CompositionCatalog::default()),
        }
    }
}

impl CompositionSelector {
    pub fn new(catalog: Arc<CompositionCatalog>) -> Result<Self, ConfigurationError> {
        catalog.validate()?;
        Ok(Self {
            classifier: MarketStateClassifier::new(),
            catalog,
        })
    }

    pub fn catalog(&self) -> &Arc<CompositionCatalog> {
        &self.catalog
    }

    pub fn select(&self, metrics: &MarketMetrics) -> Result<Composition, ConfigurationError> {
        self.resolve(metrics).map(|selection| selection.composition)
    }

    pub fn resolve(&self, metrics: &MarketMetrics) -> Result<Selection, ConfigurationError> {
        let state = self.classifier.classify(metrics);
        let composition = self.catalog.lookup(state)?;
        Ok(Selection { state, composition })
    }
}
