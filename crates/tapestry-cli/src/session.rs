//! Engine setup for a single CLI invocation.

use crate::error::Result;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tapestry_backend::{BackendFixture, InMemoryBackend};
use tapestry_orchestrator::{Orchestrator, OrchestratorConfig};
use tracing::{debug, info};

/// Orchestrator and the backend it runs against.
pub struct Session {
    /// The organization engine
    pub orchestrator: Orchestrator<InMemoryBackend>,

    /// Backend seeded from the fixture
    pub backend: Arc<InMemoryBackend>,
}

impl Session {
    /// Build a session from optional config (TOML) and fixture (JSON) files.
    ///
    /// Without a config file the default configuration is used; without a
    /// fixture the backend starts empty.
    pub fn load(config: Option<&Path>, fixture: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => {
                debug!("Loading engine configuration from {}", path.display());
                OrchestratorConfig::from_file(path)?
            }
            None => OrchestratorConfig::default(),
        };

        let backend = match fixture {
            Some(path) => {
                let json = fs::read_to_string(path)?;
                let fixture = BackendFixture::from_json(&json)?;
                info!(
                    "Loaded fixture {}: {} items, {} relationships, {} rules",
                    path.display(),
                    fixture.items.len(),
                    fixture.relationships.len(),
                    fixture.rules.len()
                );
                fixture.into_backend()
            }
            None => InMemoryBackend::new(),
        };

        Ok(Self::new(Arc::new(backend), config))
    }

    /// Build a session over an existing backend.
    pub fn new(backend: Arc<InMemoryBackend>, config: OrchestratorConfig) -> Self {
        Self {
            orchestrator: Orchestrator::new(Arc::clone(&backend), config),
            backend,
        }
    }
}
