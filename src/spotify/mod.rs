// Spotify Web API - catalog search only
// Client credentials flow: no user login, so nothing that touches a user's library

use crate::config::SpotifyConfig;
use crate::error::SpoError;
use crate::results::{CatalogItem, ResultKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
// Refresh a little early so a token never expires mid-request
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Keyword search against a music catalog, results in relevance order
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search(&self, terms: &[String], kind: ResultKind, limit: u32) -> Result<Vec<CatalogItem>>;
}

pub struct SpotifyClient {
    http: reqwest::Client,
    config: SpotifyConfig,
    token: Mutex<Option<AccessToken>>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn from_response(response: TokenResponse, now: Instant) -> Self {
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
        Self {
            value: response.access_token,
            expires_at: now + lifetime,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building http client")?;

        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }

        let (client_id, client_secret) = self
            .config
            .credentials()
            .ok_or(SpoError::MissingCredentials)?;

        debug!("Requesting client credentials token");
        let response = self
            .http
            .post(format!("{}/api/token", self.config.accounts_base))
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let response = check_status(response).await?;
        let token = AccessToken::from_response(response.json().await?, Instant::now());
        let value = token.value.clone();
        *cached = Some(token);

        Ok(value)
    }
}

#[async_trait]
impl CatalogSearch for SpotifyClient {
    async fn search(&self, terms: &[String], kind: ResultKind, limit: u32) -> Result<Vec<CatalogItem>> {
        let query = terms.join(" ");
        let token = self.access_token().await?;

        let mut params = vec![
            ("q", query.clone()),
            ("type", kind.api_type().to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(market) = &self.config.market {
            params.push(("market", market.clone()));
        }

        let response = self
            .http
            .get(format!("{}/search", self.config.api_base))
            .bearer_auth(token)
            .query(&params)
            .send()
            .await?;

        let body: serde_json::Value = check_status(response).await?.json().await?;
        let items = parse_search_response(kind, &body)?;
        info!("Search '{}' ({}) returned {} items", query, kind.api_type(), items.len());

        Ok(items)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SpoError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    }
    .into())
}

/// Pull the human readable bit out of an error body, both shapes Spotify uses
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        match v.get("error")? {
            // Web API: {"error": {"status": 400, "message": "..."}}
            serde_json::Value::Object(obj) => obj.get("message")?.as_str().map(str::to_string),
            // Accounts: {"error": "invalid_client", "error_description": "..."}
            serde_json::Value::String(code) => Some(
                v.get("error_description")
                    .and_then(|d| d.as_str())
                    .map(|d| format!("{code}: {d}"))
                    .unwrap_or_else(|| code.clone()),
            ),
            _ => None,
        }
    });

    message.unwrap_or_else(|| body.trim().to_string())
}

/// Items of the paging object for `kind`; a missing collection means no results
pub fn parse_search_response(kind: ResultKind, body: &serde_json::Value) -> Result<Vec<CatalogItem>> {
    let Some(items) = body.get(kind.collection_key()).and_then(|c| c.get("items")) else {
        return Ok(Vec::new());
    };

    // Spotify pads some result pages with nulls
    let items: Vec<Option<CatalogItem>> =
        serde_json::from_value(items.clone()).context("unexpected search response shape")?;
    Ok(items.into_iter().flatten().collect())
}
