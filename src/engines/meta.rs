//! Search backend over the registered HTML engines

use super::registry::EngineRegistry;
use super::traits::{Engine, SearchBackend, SearchParams};
use crate::config::Settings;
use crate::network::HttpClient;
use crate::results::RawResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Backend name that tries every registered engine in order
pub const AUTO_BACKEND: &str = "auto";

/// Web search backend dispatching to the registered engines
///
/// With the `auto` backend the engines are tried in registration order and
/// the first one returning results wins. A named backend only queries that
/// engine.
pub struct MetaSearch {
    client: HttpClient,
    registry: Arc<EngineRegistry>,
    max_timeout: Duration,
}

impl MetaSearch {
    pub fn new(client: HttpClient, registry: Arc<EngineRegistry>) -> Self {
        Self {
            client,
            registry,
            max_timeout: Duration::from_secs(30),
        }
    }

    /// Build the client and registry from settings
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let registry = EngineRegistry::from_names(&settings.search.engines);
        if registry.is_empty() {
            return Err(anyhow::anyhow!("no usable search engine configured"));
        }

        info!("Search engines: {}", registry.names().join(", "));
        Ok(Self::new(client, Arc::new(registry))
            .with_max_timeout(settings.outgoing.timeout()))
    }

    /// Set maximum per-engine timeout
    pub fn with_max_timeout(mut self, max_timeout: Duration) -> Self {
        self.max_timeout = max_timeout;
        self
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    fn select(&self, backend: &str) -> anyhow::Result<Vec<Arc<dyn Engine>>> {
        let backend = backend.trim().to_lowercase();
        if backend.is_empty() || backend == AUTO_BACKEND {
            return Ok(self.registry.engines().to_vec());
        }

        self.registry
            .get(&backend)
            .map(|engine| vec![Arc::clone(engine)])
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown search backend '{}' (available: {})",
                    backend,
                    self.registry.names().join(", ")
                )
            })
    }

    /// Search a single engine
    async fn search_engine(
        &self,
        engine: &Arc<dyn Engine>,
        params: &SearchParams,
    ) -> anyhow::Result<Vec<RawResult>> {
        let engine_timeout = Duration::try_from_secs_f64(engine.timeout())
            .map_or(self.max_timeout, |t| t.min(self.max_timeout));
        let start = Instant::now();

        debug!(
            "Searching engine {} with timeout {:?} (safesearch {})",
            engine.name(),
            engine_timeout,
            params.safesearch.as_str()
        );

        let request = engine.request(params)?;
        let response = timeout(
            engine_timeout,
            self.client.execute_with_timeout(request, engine_timeout),
        )
        .await
        .map_err(|_| anyhow::anyhow!("{} timed out after {:?}", engine.name(), engine_timeout))??;

        let results = engine.response(response)?;
        debug!(
            "Engine {} returned {} results in {:?}",
            engine.name(),
            results.len(),
            start.elapsed()
        );

        Ok(results)
    }
}

#[async_trait]
impl SearchBackend for MetaSearch {
    async fn search(&self, params: &SearchParams) -> anyhow::Result<Vec<RawResult>> {
        let engines = self.select(&params.backend)?;
        let mut last_error = None;

        for engine in &engines {
            match self.search_engine(engine, params).await {
                Ok(mut results) if !results.is_empty() => {
                    results.truncate(params.max_results);
                    return Ok(results);
                }
                Ok(_) => debug!("Engine {} had no results for '{}'", engine.name(), params.query),
                Err(e) => {
                    warn!("Engine {} failed: {}", engine.name(), e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(Vec::new()),
        }
    }
}
