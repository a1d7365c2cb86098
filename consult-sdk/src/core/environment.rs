//! Process-level implementation of the `Environment` capability

use std::env;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::Environment;

/// Language used when nothing better is known
pub const DEFAULT_LANGUAGE: &str = "ar";

/// UserAgent structure for identifying the client to upstream services
#[derive(Debug, Clone)]
pub struct UserAgent {
    /// Application name
    pub app_name: String,

    /// Version string
    pub version: String,

    /// Optional extra info
    pub extra: Option<String>,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            app_name: "Consult-SDK".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            extra: None,
        }
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_name, self.version)?;

        if let Some(ref extra) = self.extra {
            write!(f, " ({})", extra)?;
        }

        Ok(())
    }
}

/// Environment with an explicit, shareable connectivity flag
///
/// The flag is an `Arc<AtomicBool>` so a connectivity watcher can flip it
/// while the session holds the environment.
#[derive(Debug, Clone)]
pub struct LocalEnvironment {
    online: Arc<AtomicBool>,
    language: String,
    user_agent: String,
}

impl Default for LocalEnvironment {
    fn default() -> Self {
        Self {
            online: Arc::new(AtomicBool::new(true)),
            language: DEFAULT_LANGUAGE.to_string(),
            user_agent: UserAgent::default().to_string(),
        }
    }
}

impl LocalEnvironment {
    /// Create an online environment with default language and user agent
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the process environment (`LC_ALL`, `LANG`)
    pub fn detect() -> Self {
        let language = ["LC_ALL", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find_map(|value| locale_to_language_tag(&value))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Self {
            language,
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_online(self, online: bool) -> Self {
        self.set_online(online);
        self
    }

    /// Update connectivity, as an online/offline event would
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Handle for a connectivity watcher
    pub fn connectivity(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.online)
    }
}

impl Environment for LocalEnvironment {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn language(&self) -> String {
        self.language.clone()
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }
}

/// "ar_SA.UTF-8" -> "ar-SA"; "C" and "POSIX" carry no language
fn locale_to_language_tag(locale: &str) -> Option<String> {
    let base = locale.split(|c| c == '.' || c == '@').next()?.trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_to_language_tag() {
        assert_eq!(locale_to_language_tag("ar_SA.UTF-8"), Some("ar-SA".to_string()));
        assert_eq!(locale_to_language_tag("en_US@euro"), Some("en-US".to_string()));
        assert_eq!(locale_to_language_tag("C.UTF-8"), None);
        assert_eq!(locale_to_language_tag(""), None);
    }

    #[test]
    fn test_connectivity_handle_is_shared() {
        let env = LocalEnvironment::new();
        let handle = env.connectivity();
        assert!(env.is_online());

        handle.store(false, Ordering::SeqCst);
        assert!(!env.is_online());

        env.set_online(true);
        assert!(handle.load(Ordering::SeqCst));
    }

    #[test]
    fn test_user_agent_display() {
        let ua = UserAgent {
            app_name: "Consult-CLI".to_string(),
            version: "0.1.0".to_string(),
            extra: Some("educational".to_string()),
        };
        assert_eq!(ua.to_string(), "Consult-CLI/0.1.0 (educational)");
    }
}
