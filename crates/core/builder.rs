//! Engine builder
//!
//! Wires configuration and the two collaborators (proximity index and
//! position store) into an [`Engine`].

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::storage::{Ephemeris, PositionStore, ProximityIndex};
use std::sync::Arc;

#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    index: Option<Arc<dyn ProximityIndex>>,
    positions: Option<Arc<dyn PositionStore>>,
}

impl EngineBuilder {
    /// Create a new builder with default configuration and no collaborators.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the geospatial index answering proximity queries.
    pub fn index(mut self, index: Arc<dyn ProximityIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the store resolving positions.
    pub fn positions(mut self, positions: Arc<dyn PositionStore>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Use one in-memory ephemeris as both index and position store.
    pub fn ephemeris(self, ephemeris: Arc<Ephemeris>) -> Self {
        self.index(ephemeris.clone()).positions(ephemeris)
    }

    /// Build the engine.
    pub fn build(self) -> Result<Engine> {
        self.config.validate().map_err(EngineError::Config)?;

        let index = self
            .index
            .ok_or_else(|| EngineError::Config("no proximity index configured".to_string()))?;
        let positions = self
            .positions
            .ok_or_else(|| EngineError::Config("no position store configured".to_string()))?;

        Ok(Engine::from_parts(self.config, index, positions))
    }
}

impl std::fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("config", &self.config)
            .field("index", &self.index.is_some())
            .field("positions", &self.positions.is_some())
            .finish()
    }
}
