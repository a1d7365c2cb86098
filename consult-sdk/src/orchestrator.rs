//! Query orchestration
//!
//! Validates a query, checks connectivity, makes a single webhook attempt
//! and, when allowed, answers from the local responder instead. No retries
//! happen at this layer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};
use serde::Serialize;

use crate::core::Environment;
use crate::error::{Result, ServiceError};
use crate::services::fallback::LocalResponder;
use crate::services::webhook::{Answer, Query, WebhookClient};
use crate::util::{loggable_query, measure_time_async, serialize_millis};

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AnswerSource {
    #[serde(rename = "n8n")]
    Webhook,
    #[serde(rename = "fallback")]
    Fallback,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Webhook => "n8n",
            AnswerSource::Fallback => "fallback",
        }
    }
}

/// Outcome of one submitted query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub success: bool,
    pub data: Answer,
    /// Wall-clock time from submission, including any failed remote attempt
    #[serde(serialize_with = "serialize_millis")]
    pub response_time: Duration,
    pub source: AnswerSource,
    /// Why the webhook was not used; only set for fallback answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_error: Option<String>,
}

/// Per-call options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOptions {
    pub fallback_enabled: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self { fallback_enabled: true }
    }
}

/// Validate, dispatch, and degrade to the local responder
pub struct QueryOrchestrator {
    client: WebhookClient,
    responder: LocalResponder,
    environment: Arc<dyn Environment>,
}

impl QueryOrchestrator {
    pub fn new(
        client: WebhookClient,
        responder: LocalResponder,
        environment: Arc<dyn Environment>,
    ) -> Self {
        Self {
            client,
            responder,
            environment,
        }
    }

    pub fn client(&self) -> &WebhookClient {
        &self.client
    }

    /// Answer a raw query
    ///
    /// Fails on validation, and on any remote failure when fallback is
    /// disabled. Offline environments count as a remote failure without a
    /// network attempt.
    pub async fn submit(&self, raw_query: &str, options: SubmitOptions) -> Result<QueryResult> {
        let start_time = Instant::now();

        let query = Query::parse(raw_query)?;

        let remote = if self.environment.is_online() {
            let (result, elapsed) = measure_time_async(|| self.client.send(&query)).await;
            if let Err(ref e) = result {
                warn!("n8n webhook failed after {}ms: {}", elapsed.as_millis(), e);
            }
            result
        } else {
            warn!("Environment reports offline, skipping the webhook");
            Err(ServiceError::network("the device is offline"))
        };

        match remote {
            Ok(data) => Ok(QueryResult {
                success: true,
                data,
                response_time: start_time.elapsed(),
                source: AnswerSource::Webhook,
                original_error: None,
            }),
            Err(e) if options.fallback_enabled => {
                info!(
                    "Using fallback response for \"{}\"",
                    loggable_query(query.as_str())
                );
                let data = self.responder.respond(query.as_str());
                Ok(QueryResult {
                    success: true,
                    data,
                    response_time: start_time.elapsed(),
                    source: AnswerSource::Fallback,
                    original_error: Some(e.to_string()),
                })
            }
            Err(e) => Err(e),
        }
    }
}
