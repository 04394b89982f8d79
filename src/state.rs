use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::pipeline::{enrich::DetailEnricher, enrich::PageEnricher, sync::SyncLocks};
use crate::store::{ActivityStore, MemoryStore};
use crate::strava::{HttpConnector, StravaConnector};

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    connector: Arc<dyn StravaConnector>,
    enricher: Arc<dyn DetailEnricher>,
    store: Arc<dyn ActivityStore>,
    sync_locks: Arc<SyncLocks>,
}

impl AppState {
    /// Production wiring: reqwest-backed API and page scraper, in-memory store.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let connector = HttpConnector::new(&config)
            .map_err(|err| AppError::Internal(err.to_string()))?;
        let enricher = PageEnricher::new(&config)
            .map_err(|err| AppError::Internal(err.to_string()))?;

        Ok(Self::with_parts(
            config,
            Arc::new(connector),
            Arc::new(enricher),
            Arc::new(MemoryStore::new()),
        ))
    }

    pub fn with_parts(
        config: Config,
        connector: Arc<dyn StravaConnector>,
        enricher: Arc<dyn DetailEnricher>,
        store: Arc<dyn ActivityStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            connector,
            enricher,
            store,
            sync_locks: Arc::new(SyncLocks::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn connector(&self) -> &dyn StravaConnector {
        self.connector.as_ref()
    }

    pub fn enricher(&self) -> &dyn DetailEnricher {
        self.enricher.as_ref()
    }

    pub fn store(&self) -> &dyn ActivityStore {
        self.store.as_ref()
    }

    pub fn sync_locks(&self) -> &SyncLocks {
        &self.sync_locks
    }
}
