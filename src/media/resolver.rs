use super::{
    error::ResolveError,
    extract::{extract_media_url, is_empty_document},
    fetcher::{Fetcher, HttpFetcher},
    types::Extraction,
};
use serde_json::Value;
use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_QUERY_PARAM: &str = "url";

static DEFAULT_ENDPOINT: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://delirius-apiofc.vercel.app/download/tiktok").unwrap()
});

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Provider endpoint; the link is appended as a query pair.
    pub endpoint: Url,
    pub query_param: String,
    /// Budget for the whole round trip, body included.
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.clone(),
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Turns an admitted link into a media URL by way of the provider API.
///
/// Calls are independent of each other. Overlapping calls complete in no particular
/// order; callers that need one-at-a-time semantics should go through
/// [`Session`](super::Session).
pub struct Resolver {
    fetcher: Arc<dyn Fetcher>,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Result<Self, ResolveError> {
        Ok(Self::with_fetcher(config, Arc::new(HttpFetcher::new()?)))
    }

    pub fn with_fetcher(config: ResolverConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn endpoint_for(&self, url: &str) -> Url {
        let mut endpoint = self.config.endpoint.clone();
        endpoint
            .query_pairs_mut()
            .append_pair(&self.config.query_param, url);
        endpoint
    }

    /// Fetches the provider document for `url` and extracts the media URL from it.
    pub async fn resolve(&self, url: &str) -> Result<Extraction, ResolveError> {
        let doc = self.fetch(url).await?;
        self.extract(doc)
    }

    /// Performs the request and returns the parsed, non-empty provider document.
    pub async fn fetch(&self, url: &str) -> Result<Value, ResolveError> {
        let endpoint = self.endpoint_for(url);
        info!("Fetching from API: {}", endpoint);
        debug!(transport = self.fetcher.name(), timeout = ?self.config.timeout);

        // Dropping the in-flight future on expiry cancels the request.
        let reply = tokio::time::timeout(self.config.timeout, self.fetcher.get_json(&endpoint))
            .await
            .map_err(|_| {
                warn!("Request to provider timed out after {:?}", self.config.timeout);
                ResolveError::Timeout(self.config.timeout)
            })??;

        if !(200..300).contains(&reply.status) {
            warn!("Provider returned HTTP {}", reply.status);
            return Err(ResolveError::HttpStatus(reply.status));
        }

        if reply.body.iter().all(u8::is_ascii_whitespace) {
            return Err(ResolveError::EmptyResponse { detail: None });
        }

        let doc: Value =
            serde_json::from_slice(&reply.body).map_err(|e| ResolveError::EmptyResponse {
                detail: Some(e.to_string()),
            })?;

        if is_empty_document(&doc) {
            return Err(ResolveError::EmptyResponse { detail: None });
        }

        debug!("API Response: {}", doc);
        Ok(doc)
    }

    /// Runs the extraction cascade, keeping the document alongside the result.
    pub fn extract(&self, doc: Value) -> Result<Extraction, ResolveError> {
        let media_url = extract_media_url(&doc)?;
        info!("Resolved media URL: {}", media_url);
        Ok(Extraction {
            media_url,
            source: doc,
        })
    }
}
