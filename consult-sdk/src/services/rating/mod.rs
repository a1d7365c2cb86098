//! Rating submission pipeline
//!
//! Delivers user feedback through an ordered chain of remote sinks and keeps
//! it in the local ring buffer when none of them accepts it. Submission never
//! fails from the caller's point of view.

mod models;
mod sinks;

pub use models::*;
pub use sinks::{RatingSink, SheetsSink, WebhookSink};

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use reqwest::Client;
use serde_json::Value;

use crate::config::ConsultConfig;
use crate::core::Environment;
use crate::error::{Result, ServiceError};
use crate::services::common::read_json_success;
use crate::storage::RatingStore;

/// Sentinel for an IP address that could not be determined
pub const UNKNOWN_IP: &str = "unknown";

const IP_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Ordered rating delivery: spreadsheet, then n8n, then local storage
pub struct RatingPipeline {
    http_client: Client,
    environment: Arc<dyn Environment>,
    ip_lookup_url: String,
    context: String,
    sinks: Vec<Box<dyn RatingSink>>,
    store: RatingStore,
}

impl RatingPipeline {
    pub fn new(
        http_client: Client,
        config: &ConsultConfig,
        environment: Arc<dyn Environment>,
        store: RatingStore,
    ) -> Self {
        let sinks: Vec<Box<dyn RatingSink>> = vec![
            Box::new(SheetsSink::new(http_client.clone(), &config.sheets)),
            Box::new(WebhookSink::new(http_client.clone(), config.rating_webhook_url.clone())),
        ];

        Self {
            http_client,
            environment,
            ip_lookup_url: config.ip_lookup_url.clone(),
            context: config.widget.context_tag().to_string(),
            sinks,
            store,
        }
    }

    /// Replace the remote sink chain
    pub fn with_sinks(mut self, sinks: Vec<Box<dyn RatingSink>>) -> Self {
        self.sinks = sinks;
        self
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    /// Best-effort public IP of the client; `UNKNOWN_IP` on any failure
    pub async fn client_ip(&self) -> String {
        match self.fetch_client_ip().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("Could not get client IP: {}", e);
                UNKNOWN_IP.to_string()
            }
        }
    }

    async fn fetch_client_ip(&self) -> Result<String> {
        let response = self
            .http_client
            .get(&self.ip_lookup_url)
            .timeout(IP_LOOKUP_TIMEOUT)
            .send()
            .await?;
        let body = read_json_success("ip-lookup", response).await?;

        body.get("ip")
            .and_then(Value::as_str)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ServiceError::invalid_response("IP lookup reply has no `ip` field"))
    }

    /// Submit a rating; always resolves to a successful outcome
    pub async fn submit(&self, record: &RatingRecord) -> RatingOutcome {
        if !self.environment.is_online() {
            info!("Offline mode: rating stored locally");
            let enriched =
                EnrichedRating::from_record(record, UNKNOWN_IP.to_string(), &self.context);
            return self.store_locally(enriched, None);
        }

        let ip_address = self.client_ip().await;
        let enriched = EnrichedRating::from_record(record, ip_address, &self.context);

        let mut failures = Vec::with_capacity(self.sinks.len());
        for sink in &self.sinks {
            match sink.submit(&enriched).await {
                Ok(data) => {
                    info!("Rating saved to {}", sink.source());
                    return RatingOutcome::delivered(sink.source(), data);
                }
                Err(e) => {
                    warn!("{} submission failed: {}", sink.source(), e);
                    failures.push(format!("{}: {}", sink.source(), e));
                }
            }
        }

        info!("All remote submissions failed, storing rating locally");
        self.store_locally(enriched, Some(failures.join("; ")))
    }

    fn store_locally(&self, enriched: EnrichedRating, error: Option<String>) -> RatingOutcome {
        if let Err(e) = self.store.append(enriched) {
            error!("Error storing rating locally: {}", e);
        }
        RatingOutcome::stored_locally(error)
    }
}
