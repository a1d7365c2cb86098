//! Configuration management for the consultation widgets
//!
//! This module provides utilities for loading and validating the widget
//! configuration (endpoints, timeout, fallback and spreadsheet flags), with
//! support for environment variables.

mod messages;
pub use messages::ErrorMessages;

use std::env;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, ServiceError};
use crate::util::parse_duration;

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get an integer configuration value
    fn get_int(&self, key: &str) -> Result<i64> {
        let value = self.get_string(key)?;
        value.trim().parse::<i64>()
            .map_err(|e| ServiceError::configuration(format!("Invalid integer for key {}: {}", key, e)))
    }

    /// Get a boolean configuration value
    fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get_string(key)?;
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => Err(ServiceError::configuration(format!("Invalid boolean value for key {}: {}", key, value))),
        }
    }

    /// Get a duration value such as "30s" or "30000ms"
    fn get_duration(&self, key: &str) -> Result<Duration> {
        let value = self.get_string(key)?;
        parse_duration(&value)
            .ok_or_else(|| ServiceError::configuration(format!("Invalid duration for key {}: {}", key, value)))
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get an integer configuration value with a default
    fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    /// Get a boolean configuration value with a default
    fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,

    /// Optional namespace for variables (e.g., "EDUCATIONAL", "REAL_ESTATE")
    namespace: Option<String>,
}

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set a namespace for environment variables
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Format a configuration key as an environment variable
    pub(crate) fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        if let Some(ref namespace) = self.namespace {
            env_key.push_str(namespace);
            env_key.push('_');
        }

        env_key.push_str(&key.to_uppercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_"));

        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key)
            .map_err(|e| {
                match e {
                    env::VarError::NotPresent => {
                        ServiceError::configuration(format!("Environment variable not set: {}", env_key))
                    }
                    env::VarError::NotUnicode(_) => {
                        ServiceError::configuration(format!("Environment variable is not valid unicode: {}", env_key))
                    }
                }
            })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ServiceError::configuration(format!("Configuration key not found: {}", key)))
    }
}

/// A composite config provider that tries multiple providers in order
#[derive(Debug, Clone)]
pub struct CompositeConfigProvider<P: ConfigProvider> {
    providers: Vec<P>,
}

impl<P: ConfigProvider> Default for CompositeConfigProvider<P> {
    fn default() -> Self {
        Self { providers: Vec::new() }
    }
}

impl<P: ConfigProvider> CompositeConfigProvider<P> {
    /// Create a new composite config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new provider with an initial list
    pub fn with_providers(providers: Vec<P>) -> Self {
        Self { providers }
    }
}

impl<P: ConfigProvider> ConfigProvider for CompositeConfigProvider<P> {
    fn get_string(&self, key: &str) -> Result<String> {
        for provider in &self.providers {
            if let Ok(value) = provider.get_string(key) {
                return Ok(value);
            }
        }

        Err(ServiceError::configuration(format!("Configuration key not found in any provider: {}", key)))
    }
}

/// Environment variable prefix shared by both widgets
pub const ENV_PREFIX: &str = "CONSULT";

/// Global default configuration provider
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> = Lazy::new(|| {
    Arc::new(EnvConfigProvider::new().with_prefix(ENV_PREFIX))
});

/// Trait for service-specific configuration
pub trait ServiceConfig: Debug + Send + Sync {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;

    /// Service name
    fn service_name(&self) -> &str;
}

/// Placeholder left in unconfigured deployments of the spreadsheet script
pub const SHEETS_URL_PLACEHOLDER: &str = "YOUR_GOOGLE_APPS_SCRIPT_URL_HERE";

const N8N_BASE_URL: &str = "https://tectec.app.n8n.cloud/webhook";
const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

/// Data directory for file-backed rating storage when none is configured
///
/// `$XDG_DATA_HOME/consult`, else `$HOME/.local/share/consult`, else `./.consult`.
pub fn default_storage_dir() -> PathBuf {
    let non_empty = |key: &str| env::var_os(key).filter(|value| !value.is_empty());

    if let Some(data_home) = non_empty("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join("consult");
    }
    match non_empty("HOME") {
        Some(home) => PathBuf::from(home).join(".local").join("share").join("consult"),
        None => PathBuf::from(".consult"),
    }
}

/// The two consultation widgets; they differ in wording and endpoint paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Widget {
    Educational,
    RealEstate,
}

impl Widget {
    /// Context tag sent with queries and ratings
    pub fn context_tag(&self) -> &'static str {
        match self {
            Widget::Educational => "educational",
            Widget::RealEstate => "real-estate",
        }
    }

    /// Namespace used for widget-specific environment variables
    pub fn env_namespace(&self) -> &'static str {
        match self {
            Widget::Educational => "EDUCATIONAL",
            Widget::RealEstate => "REAL_ESTATE",
        }
    }

    /// Local storage key for ratings that could not be delivered
    pub fn storage_key(&self) -> &'static str {
        match self {
            Widget::Educational => "indlali_ratings",
            Widget::RealEstate => "moeen_ratings",
        }
    }

    fn default_webhook_url(&self) -> String {
        match self {
            Widget::Educational => format!("{}/educational/chat", N8N_BASE_URL),
            Widget::RealEstate => {
                format!("{}/de59295e-acda-4cfb-b178-3e8ba6dcc17f/chat", N8N_BASE_URL)
            }
        }
    }

    fn default_rating_url(&self) -> String {
        format!("{}/{}/rating", N8N_BASE_URL, self.context_tag())
    }

    fn default_health_url(&self) -> String {
        format!("{}/{}/health", N8N_BASE_URL, self.context_tag())
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.context_tag())
    }
}

impl FromStr for Widget {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "educational" | "education" => Ok(Widget::Educational),
            "real-estate" | "realestate" => Ok(Widget::RealEstate),
            other => Err(ServiceError::configuration(format!("Unknown widget: {}", other))),
        }
    }
}

/// Spreadsheet (Apps Script) rating sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub enabled: bool,
    pub script_url: Option<String>,
}

impl SheetsConfig {
    /// The script URL if the sink is enabled and actually configured
    pub fn usable_url(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.script_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && *url != SHEETS_URL_PLACEHOLDER)
    }
}

/// Complete configuration of one widget instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultConfig {
    pub widget: Widget,

    /// Primary query webhook
    pub webhook_url: String,

    /// Deadline for the query webhook call
    pub timeout: Duration,

    /// Answer from the local keyword table when the webhook fails
    pub enable_fallback: bool,

    /// Declared retry budget; the query path makes a single remote attempt
    pub max_retries: u32,

    /// Target average response time for session goals
    pub max_response_time: Duration,

    /// Secondary rating sink
    pub rating_webhook_url: String,

    pub health_url: String,

    pub ip_lookup_url: String,

    pub sheets: SheetsConfig,

    pub storage_key: String,

    /// Directory for file-backed rating storage; in-memory when unset
    pub storage_path: Option<PathBuf>,
}

impl ConsultConfig {
    /// Defaults for a widget
    pub fn for_widget(widget: Widget) -> Self {
        Self {
            widget,
            webhook_url: widget.default_webhook_url(),
            timeout: Duration::from_secs(30),
            enable_fallback: true,
            max_retries: 3,
            max_response_time: Duration::from_secs(3),
            rating_webhook_url: widget.default_rating_url(),
            health_url: widget.default_health_url(),
            ip_lookup_url: DEFAULT_IP_LOOKUP_URL.to_string(),
            sheets: SheetsConfig {
                enabled: true,
                script_url: None,
            },
            storage_key: widget.storage_key().to_string(),
            storage_path: None,
        }
    }

    /// Load configuration from a config provider, falling back to widget defaults
    pub fn from_provider<P: ConfigProvider + ?Sized>(widget: Widget, provider: &P) -> Result<Self> {
        let defaults = Self::for_widget(widget);

        let timeout = match provider.get_string("timeout") {
            Ok(raw) => parse_duration(&raw)
                .ok_or_else(|| ServiceError::configuration(format!("Invalid timeout: {}", raw)))?,
            Err(_) => defaults.timeout,
        };

        let max_response_time = provider
            .get_duration("max_response_time")
            .unwrap_or(defaults.max_response_time);

        let max_retries = u32::try_from(provider.get_int_or("max_retries", defaults.max_retries as i64))
            .map_err(|e| ServiceError::configuration(format!("Invalid max_retries: {}", e)))?;

        let config = Self {
            widget,
            webhook_url: provider.get_string_or("webhook_url", &defaults.webhook_url),
            timeout,
            enable_fallback: provider.get_bool_or("enable_fallback", defaults.enable_fallback),
            max_retries,
            max_response_time,
            rating_webhook_url: provider.get_string_or("rating_webhook_url", &defaults.rating_webhook_url),
            health_url: provider.get_string_or("health_url", &defaults.health_url),
            ip_lookup_url: provider.get_string_or("ip_lookup_url", &defaults.ip_lookup_url),
            sheets: SheetsConfig {
                enabled: provider.get_bool_or("sheets_enabled", defaults.sheets.enabled),
                script_url: provider.get_string("sheets_script_url").ok(),
            },
            storage_key: provider.get_string_or("storage_key", &defaults.storage_key),
            storage_path: provider.get_string("storage_path").ok().map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from `CONSULT_<WIDGET>_*` variables, then plain `CONSULT_*` ones
    pub fn from_env(widget: Widget) -> Result<Self> {
        let provider = CompositeConfigProvider::with_providers(vec![
            EnvConfigProvider::new()
                .with_prefix(ENV_PREFIX)
                .with_namespace(widget.env_namespace()),
            (**DEFAULT_PROVIDER).clone(),
        ]);
        Self::from_provider(widget, &provider)
    }

    /// Keep undelivered ratings on disk, under `default_storage_dir` unless a path is set
    pub fn with_default_storage(mut self) -> Self {
        if self.storage_path.is_none() {
            self.storage_path = Some(default_storage_dir());
        }
        self
    }

    /// Localized messages for this widget
    pub fn messages(&self) -> ErrorMessages {
        ErrorMessages::for_widget(self.widget)
    }
}

impl ServiceConfig for ConsultConfig {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("webhook_url", &self.webhook_url),
            ("rating_webhook_url", &self.rating_webhook_url),
            ("health_url", &self.health_url),
            ("ip_lookup_url", &self.ip_lookup_url),
        ] {
            if value.trim().is_empty() {
                return Err(ServiceError::configuration(format!("{} is required", name)));
            }
            Url::parse(value)
                .map_err(|e| ServiceError::configuration(format!("Invalid {}: {}", name, e)))?;
        }

        if self.timeout.is_zero() {
            return Err(ServiceError::configuration("timeout must be greater than zero"));
        }

        if self.storage_key.trim().is_empty() {
            return Err(ServiceError::configuration("storage_key is required"));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        self.widget.context_tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_provider_format_key() {
        let provider = EnvConfigProvider::new()
            .with_prefix("CONSULT")
            .with_namespace("REAL_ESTATE");

        assert_eq!(provider.format_key("webhook_url"), "CONSULT_REAL_ESTATE_WEBHOOK_URL");
        assert_eq!(provider.format_key("sheets-enabled"), "CONSULT_REAL_ESTATE_SHEETS_ENABLED");
    }

    #[test]
    fn test_sheets_usable_url() {
        let mut sheets = SheetsConfig { enabled: true, script_url: None };
        assert_eq!(sheets.usable_url(), None);

        sheets.script_url = Some(SHEETS_URL_PLACEHOLDER.to_string());
        assert_eq!(sheets.usable_url(), None);

        sheets.script_url = Some("https://script.google.com/macros/s/abc/exec".to_string());
        assert_eq!(sheets.usable_url(), Some("https://script.google.com/macros/s/abc/exec"));

        sheets.enabled = false;
        assert_eq!(sheets.usable_url(), None);
    }

    #[test]
    fn test_widget_from_str() {
        assert_eq!("educational".parse::<Widget>().unwrap(), Widget::Educational);
        assert_eq!("REAL_ESTATE".parse::<Widget>().unwrap(), Widget::RealEstate);
        assert!("legal".parse::<Widget>().is_err());
    }
}
