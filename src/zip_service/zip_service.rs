use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

/// Configuration for [`ZipService`].
///
/// The API key is injected explicitly; environment lookup happens at the
/// orchestration boundary, never in here. A missing key disables the primary
/// provider without error.
#[derive(Debug, Clone)]
pub struct ZipServiceConfig {
    pub api_key: Option<String>,
    pub primary_url: String,
    pub fallback_url: String,
    pub timeout_secs: u64,
}

impl Default for ZipServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            primary_url: "https://app.zipcodebase.com/api/v1/search".to_string(),
            fallback_url: "https://api.zippopotam.us".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Result of a postal-code lookup. A miss is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(String),
    NotFound,
}

/// Provider-level failure. Confined to this module: every variant is
/// downgraded to a miss before it can reach the caller.
#[derive(Debug, Error)]
enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// Resolves (city, state) to a U.S. postal code.
pub trait ZipLookup {
    fn lookup_zip(&self, city: &str, state: &str) -> LookupOutcome;
}

#[derive(Debug, Deserialize)]
struct PrimaryResponse {
    #[serde(default)]
    results: Vec<PrimaryPlace>,
}

#[derive(Debug, Deserialize)]
struct PrimaryPlace {
    postal_code: String,
}

#[derive(Debug, Deserialize)]
struct FallbackResponse {
    #[serde(default)]
    places: Vec<FallbackPlace>,
}

#[derive(Debug, Deserialize)]
struct FallbackPlace {
    #[serde(rename = "post code")]
    post_code: String,
}

/// Two-tier postal-code lookup: a keyed search API first, a keyless
/// path-addressed API as fallback. First success wins; a single pass through
/// both providers is the whole contract, with no retries.
pub struct ZipService {
    config: ZipServiceConfig,
    client: Client,
}

impl ZipService {
    pub fn new(config: ZipServiceConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn query_primary(
        &self,
        api_key: &str,
        city: &str,
        state: &str,
    ) -> Result<Option<String>, ProviderError> {
        let resp = self
            .client
            .get(&self.config.primary_url)
            .query(&[
                ("apikey", api_key),
                ("city", city),
                ("state", state),
                ("country", "US"),
            ])
            .send()?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status()));
        }

        let body: PrimaryResponse = resp.json()?;
        Ok(body.results.into_iter().next().map(|p| p.postal_code))
    }

    fn query_fallback(&self, city: &str, state: &str) -> Result<Option<String>, ProviderError> {
        let url = format!(
            "{}/us/{}/{}",
            self.config.fallback_url.trim_end_matches('/'),
            state,
            city
        );
        let resp = self.client.get(&url).send()?;

        if resp.status() != reqwest::StatusCode::OK {
            return Err(ProviderError::Status(resp.status()));
        }

        let body: FallbackResponse = resp.json()?;
        Ok(body.places.into_iter().next().map(|p| p.post_code))
    }
}

impl ZipLookup for ZipService {
    fn lookup_zip(&self, city: &str, state: &str) -> LookupOutcome {
        if let Some(api_key) = self.config.api_key.as_deref() {
            match self.query_primary(api_key, city, state) {
                Ok(Some(zip)) => return LookupOutcome::Found(zip),
                Ok(None) => debug!("primary provider miss for {}, {}", city, state),
                // Transport problems are a miss, not a failure of the run.
                Err(e) => warn!("primary provider error for {}, {}: {}", city, state, e),
            }
        }

        match self.query_fallback(city, state) {
            Ok(Some(zip)) => return LookupOutcome::Found(zip),
            Ok(None) => debug!("fallback provider miss for {}, {}", city, state),
            Err(e) => warn!("fallback provider error for {}, {}: {}", city, state, e),
        }

        LookupOutcome::NotFound
    }
}
