//! Remote rating sinks

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header, Client};
use serde_json::Value;

use super::models::{EnrichedRating, RatingSource};
use crate::config::SheetsConfig;
use crate::error::{Result, ServiceError};
use crate::services::common::read_json_success;

/// A remote destination for ratings
#[async_trait]
pub trait RatingSink: Send + Sync {
    /// Provenance tag reported when this sink accepts a rating
    fn source(&self) -> RatingSource;

    /// Deliver the rating; `Ok` only on a 2xx response with a JSON body
    async fn submit(&self, rating: &EnrichedRating) -> Result<Value>;
}

/// Google Apps Script endpoint writing to a spreadsheet
///
/// Submits with GET first, payload in the query string, because the script
/// host answers simple GETs reliably across origins. Any GET failure is
/// retried once as a JSON POST.
pub struct SheetsSink {
    http_client: Client,
    script_url: Option<String>,
}

impl SheetsSink {
    pub fn new(http_client: Client, config: &SheetsConfig) -> Self {
        Self {
            http_client,
            script_url: config.usable_url().map(str::to_string),
        }
    }

    async fn submit_via_get(&self, url: &str, data: &str) -> Result<Value> {
        debug!("Submitting rating to Google Sheets: GET {}", url);
        let response = self
            .http_client
            .get(url)
            .query(&[("action", "submitRating"), ("data", data)])
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        read_json_success(RatingSource::GoogleSheets.as_str(), response).await
    }

    async fn submit_via_post(&self, url: &str, rating: &EnrichedRating) -> Result<Value> {
        debug!("Submitting rating to Google Sheets: POST {}", url);
        let response = self.http_client.post(url).json(rating).send().await?;
        read_json_success(RatingSource::GoogleSheets.as_str(), response).await
    }
}

#[async_trait]
impl RatingSink for SheetsSink {
    fn source(&self) -> RatingSource {
        RatingSource::GoogleSheets
    }

    async fn submit(&self, rating: &EnrichedRating) -> Result<Value> {
        let url = self.script_url.as_deref().ok_or_else(|| {
            ServiceError::configuration_missing(
                "Google Sheets integration is disabled or its script URL is not configured",
            )
        })?;

        let data = serde_json::to_string(rating)?;

        let result = match self.submit_via_get(url, &data).await {
            Ok(result) => result,
            Err(get_error) => {
                warn!("GET method failed, trying POST: {}", get_error);
                self.submit_via_post(url, rating).await?
            }
        };

        // The script answers 200 even when it could not write the row
        if result.get("success").and_then(Value::as_bool) == Some(true) {
            Ok(result)
        } else {
            Err(ServiceError::rejected(format!(
                "Google Sheets did not acknowledge the rating: {}",
                result
            )))
        }
    }
}

/// Secondary n8n rating webhook
pub struct WebhookSink {
    http_client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(http_client: Client, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl RatingSink for WebhookSink {
    fn source(&self) -> RatingSource {
        RatingSource::N8n
    }

    async fn submit(&self, rating: &EnrichedRating) -> Result<Value> {
        debug!("Submitting rating to n8n: POST {}", self.url);
        let response = self.http_client.post(&self.url).json(rating).send().await?;
        read_json_success(RatingSource::N8n.as_str(), response).await
    }
}
