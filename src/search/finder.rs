//! Profile lookup orchestration

use super::filter::ProfileUrlFilter;
use super::models::SearchRequest;
use crate::config::{self, FinderSettings, SearchSettings, Settings};
use crate::engines::{MetaSearch, SearchBackend, SearchParams};
use crate::error::{FinderError, Result};
use crate::extract::SnippetParser;
use crate::query::{split_simple_query, QuerySynthesizer, SearchStrategy, TextNormalizer};
use crate::results::{ExtractedProfile, RawResult, SearchOutcome};
use crate::validation::{build_validator, Validator};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// The read-only parts of a lookup, shared by every finder of a process
pub struct Pipeline {
    finder: FinderSettings,
    search: SearchSettings,
    normalizer: TextNormalizer,
    synthesizer: QuerySynthesizer,
    parser: SnippetParser,
    filter: ProfileUrlFilter,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            finder: settings.finder.clone(),
            search: settings.search.clone(),
            normalizer: TextNormalizer::new(&settings.patterns)?,
            synthesizer: QuerySynthesizer::new(&settings.finder),
            parser: SnippetParser::new(&settings.finder, &settings.patterns)?,
            filter: ProfileUrlFilter::new(&settings.finder, &settings.patterns),
        })
    }

    pub fn finder_settings(&self) -> &FinderSettings {
        &self.finder
    }

    pub fn search_settings(&self) -> &SearchSettings {
        &self.search
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    fn name_check_active(&self) -> bool {
        self.finder.name_similarity_threshold > 0.0
    }

    fn company_check_active(&self, company: &str) -> bool {
        !company.is_empty() && self.finder.company_similarity_threshold > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FinderState {
    NotStarted,
    TryingStrategy(usize),
    Accepted,
    Exhausted,
}

impl FinderState {
    fn advance(&mut self, next: FinderState, name: &str) {
        debug!("{}: {:?} -> {:?}", name, self, next);
        *self = next;
    }
}

/// Finds the profile page of one person at a time
///
/// Strategies run strictly one after another. Every query waits at least the
/// configured delay, counted from the previous query of the same finder. The first result that is a
/// profile URL and passes the active validations is returned.
pub struct ProfileFinder {
    pipeline: Arc<Pipeline>,
    backend: Arc<dyn SearchBackend>,
    validator: Arc<dyn Validator>,
    last_query: Mutex<Option<Instant>>,
}

impl ProfileFinder {
    pub fn new(
        pipeline: Arc<Pipeline>,
        backend: Arc<dyn SearchBackend>,
        validator: Arc<dyn Validator>,
    ) -> Self {
        Self {
            pipeline,
            backend,
            validator,
            last_query: Mutex::new(None),
        }
    }

    /// Finder over the configured web search engines
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let pipeline = Arc::new(Pipeline::new(settings)?);
        let backend =
            MetaSearch::from_settings(settings).map_err(|e| FinderError::Config(e.to_string()))?;
        let validator = build_validator(settings)?;
        Ok(Self::new(pipeline, Arc::new(backend), validator))
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    pub fn validator(&self) -> &Arc<dyn Validator> {
        &self.validator
    }

    /// Look up one person
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        let pipeline = &self.pipeline;
        let name = pipeline.normalizer.clean_name(&request.name);
        if name.is_empty() {
            let error = FinderError::InvalidRequest("a person name is required".to_string());
            warn!("Rejected search request {:?}: {}", request.name, error);
            return SearchOutcome::failure(error.to_string());
        }
        let company = pipeline.normalizer.clean_company(request.company());
        let job_title = pipeline.normalizer.clean_job_title(request.job_title());

        info!(
            "Searching profile for '{}' (company: '{}', job title: '{}')",
            name, company, job_title
        );

        let mut state = FinderState::NotStarted;
        let strategies = pipeline.synthesizer.synthesize(&name, &company, &job_title);

        for strategy in &strategies {
            state.advance(FinderState::TryingStrategy(strategy.index), &name);

            let results = self.run_query(strategy).await;
            if let Some(outcome) = self.first_valid(&results, &name, &company, strategy).await {
                state.advance(FinderState::Accepted, &name);
                info!(
                    "Found profile {} with strategy {} ({})",
                    outcome.profile_url.as_deref().unwrap_or_default(),
                    strategy.index,
                    strategy.kind
                );
                return outcome;
            }
        }

        state.advance(FinderState::Exhausted, &name);
        let error = self.exhaustion_message(&name, &company, strategies.len());
        warn!("{}", error);
        SearchOutcome::failure(error)
    }

    /// Look up a free-form "first last company" query
    pub async fn search_simple(&self, query: &str) -> SearchOutcome {
        match split_simple_query(query) {
            Ok((name, company)) => {
                self.search(&SearchRequest::new(name).with_company(company))
                    .await
            }
            Err(e) => {
                warn!("Rejected simple query '{}': {}", query, e);
                SearchOutcome::failure(e.to_string())
            }
        }
    }

    /// Hold back the minimum delay before every query
    ///
    /// The first query of a finder waits the full delay, later ones wait
    /// until the delay since the previous query has passed.
    async fn wait_turn(&self) {
        let mut last = self.last_query.lock().await;
        let delay = self.pipeline.finder.delay();
        let ready = match *last {
            Some(previous) => previous + delay,
            None => Instant::now() + delay,
        };
        if ready > Instant::now() {
            debug!("Waiting {:?} before next query", ready - Instant::now());
            sleep_until(ready).await;
        }
        *last = Some(Instant::now());
    }

    async fn run_query(&self, strategy: &SearchStrategy) -> Vec<RawResult> {
        self.wait_turn().await;
        debug!(
            "Strategy {} ({}): {}",
            strategy.index, strategy.kind, strategy.query
        );

        let params = SearchParams::from_settings(strategy.query.clone(), &self.pipeline.search);
        match self.backend.search(&params).await {
            Ok(results) => {
                debug!("Strategy {} returned {} results", strategy.index, results.len());
                results
            }
            Err(e) => {
                warn!("Search failed for strategy {}: {}", strategy.index, e);
                Vec::new()
            }
        }
    }

    async fn first_valid(
        &self,
        results: &[RawResult],
        name: &str,
        company: &str,
        strategy: &SearchStrategy,
    ) -> Option<SearchOutcome> {
        for result in results {
            if !self.pipeline.filter.accepts(&result.url) {
                debug!("Skipping non-profile URL {}", result.url);
                continue;
            }

            let extracted = self.pipeline.parser.parse(&result.title, &result.body);
            match self.rejection(name, company, &extracted).await {
                None => return Some(SearchOutcome::found(result, extracted, strategy)),
                Some(reason) => debug!("Rejected {}: {}", result.url, reason),
            }
        }
        None
    }

    /// Reason the candidate fails an active validation, if any
    async fn rejection(
        &self,
        name: &str,
        company: &str,
        extracted: &ExtractedProfile,
    ) -> Option<String> {
        if self.pipeline.name_check_active() {
            let found = match non_blank(&extracted.name) {
                Some(found) => found,
                None => return Some("no name in result".to_string()),
            };
            let context = extracted.context();
            let verdict = self
                .validator
                .validate_name_match(name, found, context.as_deref())
                .await;
            if !verdict.is_match {
                return Some(format!(
                    "name '{}' does not match '{}' ({:.2}): {}",
                    found, name, verdict.confidence, verdict.reasoning
                ));
            }
        }

        if self.pipeline.company_check_active(company) {
            let found = match non_blank(&extracted.company) {
                Some(found) => found,
                None => return Some("no company in result".to_string()),
            };
            let verdict = self.validator.validate_company_match(company, found).await;
            if !verdict.is_match {
                return Some(format!(
                    "company '{}' does not match '{}' ({:.2}): {}",
                    found, company, verdict.confidence, verdict.reasoning
                ));
            }
        }

        None
    }

    fn exhaustion_message(&self, name: &str, company: &str, tried: usize) -> String {
        let finder = &self.pipeline.finder;
        let mut checks = Vec::new();
        if self.pipeline.name_check_active() {
            checks.push(format!(
                "name similarity >= {:.2}",
                finder.name_similarity_threshold
            ));
        }
        if self.pipeline.company_check_active(company) {
            checks.push(format!(
                "company similarity >= {:.2} against '{}'",
                finder.company_similarity_threshold, company
            ));
        }
        let checks = if checks.is_empty() {
            "none".to_string()
        } else {
            checks.join(", ")
        };

        format!(
            "No matching profile found for '{}' after {} search strategies (active validations: {}). \
             The profile may not exist or may not be indexed by the search engine, \
             its name or company may differ from the input, \
             or the similarity thresholds may be too strict.",
            name, tried, checks
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn default_finder() -> Option<ProfileFinder> {
    match config::load(None).and_then(|settings| ProfileFinder::from_settings(&settings)) {
        Ok(finder) => Some(finder),
        Err(e) => {
            warn!("Could not set up profile finder: {}", e);
            None
        }
    }
}

/// Profile URL for a person, using settings from the default locations
pub async fn find_profile(
    name: &str,
    company: Option<&str>,
    job_title: Option<&str>,
) -> Option<String> {
    let finder = default_finder()?;
    let request = SearchRequest {
        name: name.to_string(),
        company: company.map(str::to_string),
        job_title: job_title.map(str::to_string),
    };
    finder.search(&request).await.profile_url
}

/// Profile URL for a free-form "first last company" query
pub async fn find_profile_simple(query: &str) -> Option<String> {
    default_finder()?.search_simple(query).await.profile_url
}
