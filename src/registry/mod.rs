use std::sync::Arc;

use crate::catalog::CandidateList;
use crate::core::error::ConfigError;
use crate::core::traits::ProviderAdapter;
use crate::core::types::RequestShape;

/// Request shape -> adapter lookup. Populated at startup, read-only after.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<(RequestShape, Arc<dyn ProviderAdapter>)>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a second adapter for the same shape replaces the first.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        let shape = adapter.shape();

        if let Some((_, existing_adapter)) = self
            .adapters
            .iter_mut()
            .find(|(registered_shape, _)| *registered_shape == shape)
        {
            *existing_adapter = adapter;
            return;
        }

        self.adapters.push((shape, adapter));
    }

    pub fn resolve(&self, shape: RequestShape) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters
            .iter()
            .find(|(registered_shape, _)| *registered_shape == shape)
            .map(|(_, adapter)| Arc::clone(adapter))
    }

    pub fn shapes(&self) -> Vec<RequestShape> {
        self.adapters.iter().map(|(shape, _)| *shape).collect()
    }

    /// Fails on the first candidate whose shape has no adapter.
    pub fn ensure_covers(&self, candidates: &CandidateList) -> Result<(), ConfigError> {
        match candidates
            .iter()
            .find(|candidate| self.resolve(candidate.request_shape).is_none())
        {
            Some(candidate) => Err(ConfigError::MissingAdapter {
                candidate: candidate.id.clone(),
                shape: candidate.request_shape,
            }),
            None => Ok(()),
        }
    }
}
