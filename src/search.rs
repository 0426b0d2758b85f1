//! Venue search orchestration
//!
//! Assembles fixed-size result pages from a provider that paginates raw,
//! unfiltered results. Local filtering drops an unpredictable share of each
//! upstream page, so a request may pull a bounded number of extra upstream
//! pages to fill its target. Continuation tokens are cached per upstream page
//! so an independent request for a later page resumes where the provider left
//! off instead of replaying earlier pages.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::keys::{details_key, page_key, token_key};
use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::data::{
    CachedValue, ContinuationToken, Language, PlacesError, PlacesProvider, ResultPage,
    SearchRequest, SearchResponse, TextSearch, UpstreamPage, Venue, VenueDetails,
};
use crate::filters;

/// Venues in an assembled result page
pub const DEFAULT_RESULTS_PER_PAGE: usize = 20;

/// Upstream pages a request may fetch beyond its first
pub const DEFAULT_MAX_EXTRA_PAGES: u32 = 2;

/// Errors surfaced by the search service
#[derive(Debug, Error)]
pub enum SearchError {
    /// The provider failed or could not be reached
    #[error("Upstream provider unavailable: {0}")]
    Upstream(#[from] PlacesError),

    /// Pages are numbered from 1
    #[error("Invalid page {0}: pages start at 1")]
    InvalidPage(u32),
}

/// Search service over a place provider and a shared cache
pub struct VenueSearch {
    provider: Arc<dyn PlacesProvider>,
    cache: Arc<dyn CacheStore<CachedValue>>,
    /// Page key -> lock held while that page is being assembled
    inflight: DashMap<String, Arc<Mutex<()>>>,
    results_per_page: usize,
    max_extra_pages: u32,
}

impl VenueSearch {
    pub fn new(provider: Arc<dyn PlacesProvider>, cache: Arc<dyn CacheStore<CachedValue>>) -> Self {
        Self {
            provider,
            cache,
            inflight: DashMap::new(),
            results_per_page: DEFAULT_RESULTS_PER_PAGE,
            max_extra_pages: DEFAULT_MAX_EXTRA_PAGES,
        }
    }

    /// Creates a service with page sizing taken from `config`
    pub fn from_config(
        config: &Config,
        provider: Arc<dyn PlacesProvider>,
        cache: Arc<dyn CacheStore<CachedValue>>,
    ) -> Self {
        Self::new(provider, cache)
            .with_results_per_page(config.results_per_page)
            .with_max_extra_pages(config.max_extra_pages)
    }

    pub fn with_results_per_page(mut self, results_per_page: usize) -> Self {
        self.results_per_page = results_per_page.max(1);
        self
    }

    pub fn with_max_extra_pages(mut self, max_extra_pages: u32) -> Self {
        self.max_extra_pages = max_extra_pages;
        self
    }

    /// Runs a search, serving from cache when the same logical request was
    /// answered within the cache TTL
    ///
    /// Concurrent misses on the same page are coalesced: one request fetches
    /// while the others wait and then read its cached result.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        if request.page == 0 {
            return Err(SearchError::InvalidPage(request.page));
        }

        let key = page_key(request);
        if let Some(page) = self.cached_page(&key) {
            debug!(%key, "result page served from cache");
            return Ok(page.into());
        }

        let slot = self
            .inflight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = slot.lock().await;

        // Another request may have filled the cache while we waited
        let result = match self.cached_page(&key) {
            Some(page) => {
                debug!(%key, "result page filled by concurrent request");
                Ok(page)
            }
            None => self.assemble_page(request, &key).await,
        };

        drop(guard);
        // Only forget the slot when no other request is holding or waiting on it
        self.inflight
            .remove_if(&key, |_, current| Arc::ptr_eq(current, &slot) && Arc::strong_count(current) <= 2);

        Ok(result?.into())
    }

    /// Looks up the full record for one venue
    pub async fn details(&self, place_id: &str, language: Language) -> Result<VenueDetails, SearchError> {
        let key = details_key(place_id, language);
        if let Some(CachedValue::Details(details)) = self.cache.get(&key) {
            debug!(place_id, "details served from cache");
            return Ok(details);
        }

        let details = self.provider.details(place_id, language).await?;
        self.cache.set(&key, CachedValue::Details(details.clone()));
        Ok(details)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn cached_page(&self, key: &str) -> Option<ResultPage> {
        match self.cache.get(key)? {
            CachedValue::Page(page) => Some(page),
            _ => None,
        }
    }

    fn cached_token(&self, request: &SearchRequest, upstream_page: u32) -> Option<ContinuationToken> {
        match self.cache.get(&token_key(request, upstream_page))? {
            CachedValue::Token(token) => Some(token),
            _ => None,
        }
    }

    fn resolve_photos(&self, venues: &mut [Venue]) {
        for venue in venues {
            venue.photo_urls = venue
                .photo_refs
                .iter()
                .map(|reference| self.provider.photo_url(reference))
                .collect();
        }
    }

    /// Fetches upstream pages until the target is met, the provider runs
    /// out, or the extra-page budget is spent
    ///
    /// Page N starts at upstream page N even if page N-1 consumed extra
    /// upstream pages, so consecutive pages can repeat venues.
    async fn assemble_page(&self, request: &SearchRequest, key: &str) -> Result<ResultPage, SearchError> {
        let target = self.results_per_page;
        let max_fetches = 1 + self.max_extra_pages;

        let mut accumulated: Vec<Venue> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut upstream_page = request.page;
        let mut upstream_has_more = true;
        let mut token_missing = false;
        let mut fetches = 0;

        while accumulated.len() < target && upstream_has_more && fetches < max_fetches {
            let fetched = if upstream_page == 1 {
                self.provider.search(&TextSearch::from_request(request)).await?
            } else {
                match self.cached_token(request, upstream_page - 1) {
                    Some(token) => self.provider.continue_page(&token).await?,
                    None => {
                        warn!(
                            upstream_page,
                            requested_page = request.page,
                            "continuation token missing or expired; returning partial page"
                        );
                        token_missing = true;
                        break;
                    }
                }
            };
            fetches += 1;

            let UpstreamPage {
                mut venues,
                next_page_token,
            } = fetched;
            let raw_count = venues.len();
            self.resolve_photos(&mut venues);
            let survivors = filters::apply(venues, &request.filters, request.language);
            debug!(upstream_page, raw_count, kept = survivors.len(), "filtered upstream page");

            accumulated.extend(
                survivors
                    .into_iter()
                    .filter(|venue| seen.insert(venue.place_id.clone())),
            );

            upstream_has_more = next_page_token.is_some();
            if let Some(token) = next_page_token {
                self.cache
                    .set(&token_key(request, upstream_page), CachedValue::Token(token));
            }

            upstream_page += 1;
        }

        let overflow = accumulated.len() > target;
        accumulated.truncate(target);
        let page = ResultPage {
            has_more: overflow || (upstream_has_more && !token_missing),
            venues: accumulated,
            requested_page: request.page,
        };

        info!(
            requested_page = request.page,
            upstream_fetches = fetches,
            results = page.venues.len(),
            has_more = page.has_more,
            "assembled result page"
        );

        // A page cut short by a lost token is not cached, so the request can
        // succeed once earlier pages have been fetched again
        if !token_missing {
            self.cache.set(key, CachedValue::Page(page.clone()));
        }

        Ok(page)
    }
}
