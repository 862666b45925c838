use super::{error::ResolveError, types::Reply};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::debug;
use url::Url;

/// Transport seam between the resolver and the provider API.
///
/// Implementations must be cancel-safe: the resolver drops the returned future when the
/// timeout expires, and dropping it has to release the underlying connection.
/// Any HTTP status may be returned as `Ok`; the resolver decides what counts as success.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Human-readable name of the transport
    fn name(&self) -> &'static str;

    /// Issue one GET for a JSON document and return the status and raw body.
    async fn get_json(&self, endpoint: &Url) -> Result<Reply, ResolveError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ResolveError::network)?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "reqwest"
    }

    async fn get_json(&self, endpoint: &Url) -> Result<Reply, ResolveError> {
        let response = self
            .client
            .get(endpoint.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ResolveError::network)?;

        let status = response.status().as_u16();
        debug!(status, "Provider responded");

        // Non-success bodies are discarded.
        if !response.status().is_success() {
            return Ok(Reply {
                status,
                body: Vec::new(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(ResolveError::network)?
            .to_vec();

        Ok(Reply { status, body })
    }
}
