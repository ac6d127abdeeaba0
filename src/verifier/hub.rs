//! HTTP verifier against the social-graph cast lookup API.

use crate::config::VerifierConfig;
use crate::error::{Error, Result};
use crate::types::ContentId;
use crate::verifier::ContentVerifier;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CAST_LOOKUP_PATH: &str = "v2/farcaster/cast";

#[derive(Debug, Deserialize)]
struct CastLookupResponse {
    cast: CastSummary,
}

#[derive(Debug, Deserialize)]
struct CastSummary {
    hash: String,
}

/// Looks casts up by hash or URL; a cast that comes back is real.
#[derive(Clone)]
pub struct HubVerifier {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HubVerifier {
    /// Create a verifier for the API at `config.api_url`.
    ///
    /// Any path on `api_url` is kept as a prefix, so the API can sit behind
    /// a proxy mounted below the root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &VerifierConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.api_url)
            .map_err(|e| Error::Config(format!("Invalid verifier URL {}: {e}", config.api_url)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn lookup_url(&self, content_id: &ContentId) -> Result<Url> {
        let mut url = self
            .base_url
            .join(CAST_LOOKUP_PATH)
            .map_err(|e| Error::Verification(format!("Failed to build lookup URL: {e}")))?;
        let kind = if content_id.is_url() { "url" } else { "hash" };
        url.query_pairs_mut()
            .append_pair("identifier", content_id.as_str())
            .append_pair("type", kind);
        Ok(url)
    }
}

#[async_trait]
impl ContentVerifier for HubVerifier {
    async fn verify(&self, content_id: &ContentId) -> Result<()> {
        let url = self.lookup_url(content_id)?;
        let response = self
            .http
            .get(url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Verification(format!("Cast lookup failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Verification(format!(
                "Cast lookup for {content_id} returned {status}"
            )));
        }

        let body: CastLookupResponse = response
            .json()
            .await
            .map_err(|e| Error::Verification(format!("Malformed cast lookup response: {e}")))?;
        debug!("Content {} verified as cast {}", content_id, body.cast.hash);
        Ok(())
    }
}
