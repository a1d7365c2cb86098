//! Query webhook client implementation
//!
//! This module provides the client for the n8n workflow webhook that answers
//! consultation queries.

mod models;
pub use models::*;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{header, Client};

use crate::config::ConsultConfig;
use crate::core::{Environment, ServiceClient};
use crate::error::{Result, ServiceError};
use crate::services::common::{create_error_context, parse_error_response};
use crate::util::{generate_request_id, loggable_query};

/// Service name used in logs and error context
pub const SERVICE_NAME: &str = "n8n";

/// Deadline for the health check
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the primary query webhook
pub struct WebhookClient {
    http_client: Client,
    url: String,
    health_url: String,
    timeout: Duration,
    context: String,
    environment: Arc<dyn Environment>,
}

impl WebhookClient {
    /// Create a client for a widget configuration
    pub fn new(
        http_client: Client,
        config: &ConsultConfig,
        environment: Arc<dyn Environment>,
    ) -> Self {
        Self {
            http_client,
            url: config.webhook_url.clone(),
            health_url: config.health_url.clone(),
            timeout: config.timeout,
            context: config.widget.context_tag().to_string(),
            environment,
        }
    }

    /// Override the query deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a validated query and normalize the reply
    ///
    /// Fails with `Timeout` when no complete reply arrives within the
    /// deadline (the in-flight request is dropped), `Network` on any
    /// transport failure, `Http` on a non-success status and
    /// `InvalidResponseShape` when the body is not an accepted shape.
    pub async fn send(&self, query: &Query) -> Result<Answer> {
        let request_id = generate_request_id();
        let payload = QueryRequest::new(query, &self.context, self.environment.as_ref());

        debug!(
            "Calling n8n webhook: POST {} (request {}, timeout {:?}, query \"{}\")",
            self.url,
            request_id,
            self.timeout,
            loggable_query(query.as_str())
        );

        let start_time = Instant::now();

        let response = self
            .http_client
            .post(&self.url)
            .header(header::ACCEPT, "application/json")
            .header("X-Request-Id", &request_id)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e, &request_id))?;

        if !response.status().is_success() {
            let error = parse_error_response(SERVICE_NAME, response).await;
            warn!("n8n webhook answered with an error status: {}", error);
            return Err(error);
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, &request_id))?;

        let reply = WebhookReply::decode(&body).map_err(|e| {
            warn!("Invalid response format from n8n (request {}): {}", request_id, e);
            e.with_context(
                create_error_context(SERVICE_NAME, &self.url, None).request_id(&request_id),
            )
        })?;

        let answer = reply.into_answer();
        info!(
            "n8n response received in {}ms (model {}, {} recommendations)",
            start_time.elapsed().as_millis(),
            answer.model,
            answer.recommendations.len()
        );

        Ok(answer)
    }

    /// Reclassify a reqwest failure; deadlines keep their own kind
    fn transport_error(&self, err: reqwest::Error, request_id: &str) -> ServiceError {
        let context = create_error_context(SERVICE_NAME, &self.url, None).request_id(request_id);

        if err.is_timeout() {
            ServiceError::timeout(format!("no reply from webhook within {:?}", self.timeout))
                .with_context(context)
        } else {
            match ServiceError::from(err) {
                ServiceError::WithContext { inner, .. } => inner.with_context(context),
                other => other.with_context(context),
            }
        }
    }
}

#[async_trait]
impl ServiceClient for WebhookClient {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    fn base_url(&self) -> &str {
        &self.url
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(&self.health_url)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("n8n health check failed: {}", e);
                false
            }
        }
    }
}
