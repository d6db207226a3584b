//! Concurrent lookups over many requests

use super::finder::{Pipeline, ProfileFinder};
use super::models::SearchRequest;
use crate::config::Settings;
use crate::engines::{MetaSearch, SearchBackend};
use crate::error::Result;
use crate::results::SearchOutcome;
use crate::validation::{build_validator, Validator};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Creates a fresh search backend for one batch item
pub type BackendFactory =
    Arc<dyn Fn() -> anyhow::Result<Arc<dyn SearchBackend>> + Send + Sync>;

/// Runs lookups on a bounded number of workers
///
/// Every item gets its own finder and backend, so each keeps its own
/// inter-query delay. Outcomes come back in input order.
pub struct BatchRunner {
    pipeline: Arc<Pipeline>,
    validator: Arc<dyn Validator>,
    factory: BackendFactory,
    workers: usize,
}

impl BatchRunner {
    pub const DEFAULT_WORKERS: usize = 3;

    pub fn new(
        pipeline: Arc<Pipeline>,
        validator: Arc<dyn Validator>,
        factory: BackendFactory,
    ) -> Self {
        Self {
            pipeline,
            validator,
            factory,
            workers: Self::DEFAULT_WORKERS,
        }
    }

    /// Runner over the configured web search engines
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let pipeline = Arc::new(Pipeline::new(settings)?);
        let validator = build_validator(settings)?;
        let settings = settings.clone();
        let factory: BackendFactory = Arc::new(move || -> anyhow::Result<Arc<dyn SearchBackend>> {
            let backend = MetaSearch::from_settings(&settings)?;
            Ok(Arc::new(backend) as Arc<dyn SearchBackend>)
        });
        Ok(Self::new(pipeline, validator, factory))
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every request; `outcomes[i]` belongs to `requests[i]`
    pub async fn run(&self, requests: Vec<SearchRequest>) -> Vec<SearchOutcome> {
        info!(
            "Running {} searches on {} workers",
            requests.len(),
            self.workers
        );

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let handles: Vec<_> = requests
            .into_iter()
            .enumerate()
            .map(|(index, request)| {
                let semaphore = Arc::clone(&semaphore);
                let pipeline = Arc::clone(&self.pipeline);
                let validator = Arc::clone(&self.validator);
                let factory = Arc::clone(&self.factory);

                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await?;
                    debug!("Batch item {} started", index);

                    let backend = factory()?;
                    let finder = ProfileFinder::new(pipeline, backend, validator);
                    Ok::<_, anyhow::Error>(finder.search(&request).await)
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .enumerate()
            .map(|(index, joined)| {
                let error = match joined {
                    Ok(Ok(outcome)) => return outcome,
                    Ok(Err(e)) => e.to_string(),
                    Err(e) => e.to_string(),
                };
                warn!("Batch item {} failed: {}", index, error);
                SearchOutcome::failure(format!("Error processing search: {}", error))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::SearchParams;
    use crate::results::RawResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    /// Answers with a profile for the quoted name, slower for earlier names
    struct EchoBackend {
        gauge: Arc<Gauge>,
    }

    #[async_trait]
    impl SearchBackend for EchoBackend {
        async fn search(&self, params: &SearchParams) -> anyhow::Result<Vec<RawResult>> {
            let now = self.gauge.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.gauge.peak.fetch_max(now, Ordering::SeqCst);

            let name = params.query.split('"').nth(1).unwrap_or_default().to_string();
            let rank = name.chars().next().map(|c| c as u64).unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(1000 - rank)).await;

            self.gauge.current.fetch_sub(1, Ordering::SeqCst);
            let slug = name.to_lowercase().replace(' ', "");
            Ok(vec![RawResult::new(
                format!("https://www.linkedin.com/in/{}", slug),
                format!("{} | LinkedIn", name),
                "",
            )])
        }
    }

    fn runner(factory: BackendFactory) -> BatchRunner {
        let settings = Settings::default();
        BatchRunner::new(
            Arc::new(Pipeline::new(&settings).unwrap()),
            build_validator(&settings).unwrap(),
            factory,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcomes_keep_input_order() {
        let gauge = Arc::new(Gauge::default());
        let factory_gauge = Arc::clone(&gauge);
        let factory: BackendFactory = Arc::new(move || -> anyhow::Result<Arc<dyn SearchBackend>> {
            Ok(Arc::new(EchoBackend {
                gauge: Arc::clone(&factory_gauge),
            }) as Arc<dyn SearchBackend>)
        });

        let names = ["Amy Adams", "Ben Burke", "Cal Chen", "Dee Diaz", "Eve Egan"];
        let requests = names.iter().map(|n| SearchRequest::new(*n)).collect();
        let outcomes = runner(factory).with_workers(2).run(requests).await;

        assert_eq!(outcomes.len(), 5);
        for (name, outcome) in names.iter().zip(&outcomes) {
            let slug = name.to_lowercase().replace(' ', "");
            assert!(outcome.success, "{} failed: {:?}", name, outcome.error);
            assert_eq!(
                outcome.profile_url.as_deref(),
                Some(format!("https://www.linkedin.com/in/{}", slug).as_str())
            );
        }
        assert!(gauge.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_errors_become_failed_outcomes() {
        let factory: BackendFactory = Arc::new(|| -> anyhow::Result<Arc<dyn SearchBackend>> {
            Err(anyhow::anyhow!("no engines"))
        });
        let requests = vec![SearchRequest::new("Amy Adams"), SearchRequest::new("")];

        let outcomes = runner(factory).run(requests).await;

        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert!(!outcome.success);
            assert_eq!(
                outcome.error.as_deref(),
                Some("Error processing search: no engines")
            );
        }
    }

    /// Panics for one name, echoes the others
    struct PanickyBackend {
        inner: EchoBackend,
        poison: &'static str,
    }

    #[async_trait]
    impl SearchBackend for PanickyBackend {
        async fn search(&self, params: &SearchParams) -> anyhow::Result<Vec<RawResult>> {
            if params.query.contains(self.poison) {
                panic!("engine page crashed the parser");
            }
            self.inner.search(params).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_item_does_not_sink_the_batch() {
        let gauge = Arc::new(Gauge::default());
        let factory: BackendFactory = Arc::new(move || -> anyhow::Result<Arc<dyn SearchBackend>> {
            Ok(Arc::new(PanickyBackend {
                inner: EchoBackend {
                    gauge: Arc::clone(&gauge),
                },
                poison: "Ben Burke",
            }) as Arc<dyn SearchBackend>)
        });

        let names = ["Amy Adams", "Ben Burke", "Cal Chen"];
        let requests = names.iter().map(|n| SearchRequest::new(*n)).collect();
        let outcomes = runner(factory).run(requests).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].success, "{:?}", outcomes[0].error);
        assert!(outcomes[2].success, "{:?}", outcomes[2].error);
        assert_eq!(
            outcomes[2].profile_url.as_deref(),
            Some("https://www.linkedin.com/in/calchen")
        );

        assert!(!outcomes[1].success);
        assert!(outcomes[1].profile_url.is_none());
        assert!(outcomes[1]
            .error
            .as_deref()
            .unwrap_or_default()
            .starts_with("Error processing search: "));
    }

    #[test]
    fn test_workers_floor() {
        let factory: BackendFactory = Arc::new(|| -> anyhow::Result<Arc<dyn SearchBackend>> {
            Err(anyhow::anyhow!("unused"))
        });
        assert_eq!(runner(factory).with_workers(0).workers(), 1);
    }
}
