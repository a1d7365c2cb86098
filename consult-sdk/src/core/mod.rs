//! Core abstractions for the consultation SDK
//!
//! This module provides the trait interfaces the components are wired with:
//!
//! - `ServiceClient`: Base trait for remote service clients
//! - `Environment`: Connectivity, locale and user-agent capability
//! - `ClientBuilder`: Builder that assembles a whole consultation session

pub mod builder;
pub mod environment;

pub use builder::ClientBuilder;
pub use environment::LocalEnvironment;

use async_trait::async_trait;

/// Base trait for remote service clients
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// The client name/identifier
    fn name(&self) -> &str;

    /// The URL the client talks to
    fn base_url(&self) -> &str;

    /// Whether the remote side currently answers; never fails
    async fn health_check(&self) -> bool;
}

/// Ambient facts about where the widget runs
///
/// Injected so tests can substitute a deterministic environment.
pub trait Environment: Send + Sync {
    /// Whether the device reports network connectivity
    fn is_online(&self) -> bool;

    /// BCP 47 language tag of the user
    fn language(&self) -> String;

    /// User-agent string reported with queries and ratings
    fn user_agent(&self) -> String;
}
