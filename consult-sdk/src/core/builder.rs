//! Session builder implementation
//!
//! Provides a builder that assembles the HTTP client, environment, storage
//! and components of one widget's consultation session.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client as ReqwestClient;

use crate::config::{ConsultConfig, ServiceConfig, Widget};
use crate::core::{Environment, LocalEnvironment};
use crate::error::{Result, ServiceError};
use crate::orchestrator::QueryOrchestrator;
use crate::services::fallback::LocalResponder;
use crate::services::rating::RatingPipeline;
use crate::services::webhook::WebhookClient;
use crate::session::ConsultSession;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, RatingStore, DEFAULT_CAPACITY};

/// Transport deadline for calls without their own (rating sinks)
const DEFAULT_TRANSPORT_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder for a consultation session
pub struct ClientBuilder {
    config: ConsultConfig,

    environment: Option<Arc<dyn Environment>>,

    store: Option<Arc<dyn KeyValueStore>>,

    /// Ring buffer capacity for undelivered ratings
    store_capacity: usize,

    /// Custom headers to include with all requests
    custom_headers: HashMap<String, String>,

    /// Transport deadline for requests without their own
    transport_timeout: Duration,

    /// Enable response compression
    compression: bool,
}

impl ClientBuilder {
    /// Start from a widget's default configuration
    pub fn new(widget: Widget) -> Self {
        Self::with_config(ConsultConfig::for_widget(widget))
    }

    pub fn with_config(config: ConsultConfig) -> Self {
        Self {
            config,
            environment: None,
            store: None,
            store_capacity: DEFAULT_CAPACITY,
            custom_headers: HashMap::new(),
            transport_timeout: DEFAULT_TRANSPORT_TIMEOUT,
            compression: true,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ConsultConfig) -> Self {
        self.config = config;
        self
    }

    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.config.webhook_url = url.into();
        self
    }

    /// Deadline for the query webhook
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn fallback(mut self, enabled: bool) -> Self {
        self.config.enable_fallback = enabled;
        self
    }

    pub fn environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn store_capacity(mut self, capacity: usize) -> Self {
        self.store_capacity = capacity;
        self
    }

    /// Add a custom header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(key.into(), value.into());
        self
    }

    pub fn transport_timeout(mut self, timeout: Duration) -> Self {
        self.transport_timeout = timeout;
        self
    }

    /// Enable or disable compression
    pub fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Build an HTTP client with the configured settings
    pub fn build_http_client(&self, user_agent: &str) -> Result<ReqwestClient> {
        let mut headers = HeaderMap::new();
        for (key, value) in &self.custom_headers {
            let header_name = HeaderName::from_str(key)
                .map_err(|e| ServiceError::configuration(format!("Invalid header name: {}", e)))?;

            let header_value = HeaderValue::from_str(value)
                .map_err(|e| ServiceError::configuration(format!("Invalid header value: {}", e)))?;

            headers.insert(header_name, header_value);
        }

        ReqwestClient::builder()
            .user_agent(user_agent)
            .timeout(self.transport_timeout)
            .gzip(self.compression)
            .default_headers(headers)
            .build()
            .map_err(|e| ServiceError::configuration(format!("Failed to build HTTP client: {}", e)))
    }

    /// Validate the configuration and wire the session
    pub fn build(self) -> Result<ConsultSession> {
        self.config.validate()?;

        let environment: Arc<dyn Environment> = match self.environment.clone() {
            Some(environment) => environment,
            None => Arc::new(LocalEnvironment::detect()),
        };

        let storage_path = &self.config.storage_path;
        let backend: Arc<dyn KeyValueStore> = match (self.store.clone(), storage_path) {
            (Some(store), _) => store,
            (None, Some(path)) => Arc::new(FileStore::new(path.clone())),
            (None, None) => Arc::new(MemoryStore::new()),
        };

        let http_client = self.build_http_client(&environment.user_agent())?;
        let config = self.config;

        let client = WebhookClient::new(http_client.clone(), &config, Arc::clone(&environment));
        let orchestrator = QueryOrchestrator::new(
            client,
            LocalResponder::new(config.widget),
            Arc::clone(&environment),
        );

        let store =
            RatingStore::with_capacity(backend, config.storage_key.clone(), self.store_capacity);
        let ratings = RatingPipeline::new(http_client, &config, Arc::clone(&environment), store);

        Ok(ConsultSession::new(
            config.widget,
            orchestrator,
            ratings,
            environment,
            config.messages(),
            config.enable_fallback,
            config.max_response_time,
        ))
    }
}
