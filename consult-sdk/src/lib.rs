//! # Consult SDK
//!
//! Query dispatch and feedback collection for the educational and
//! real-estate consultation widgets.
//!
//! This crate provides:
//!
//! - A client for the n8n workflow webhook that answers queries
//! - A deterministic keyword responder used when the webhook fails
//! - An orchestrator tagging every answer with its provenance
//! - A rating pipeline with spreadsheet, webhook and local fallbacks
//! - Configuration, error and storage plumbing shared by both widgets
//!
//! ## Architecture
//!
//! - `ClientBuilder`: Wires one `ConsultSession` per widget
//! - `QueryOrchestrator`: Validate, dispatch once, fall back
//! - `WebhookClient`: Timeout-bounded POST and reply normalization
//! - `LocalResponder`: Ordered keyword table lookup
//! - `RatingPipeline`: Sequential sinks ending in a bounded local store
//! - `Environment` / `KeyValueStore`: Injected capabilities

pub mod core;
pub use self::core::{ClientBuilder, Environment, LocalEnvironment, ServiceClient};

pub mod services;
pub use services::fallback::LocalResponder;
pub use services::rating::{
    Rating, RatingDraft, RatingOutcome, RatingPipeline, RatingRecord, RatingSource,
};
pub use services::webhook::{Answer, Query, WebhookClient};

pub mod error;
pub use error::{ErrorKind, Result, ServiceError};

pub mod config;
pub use config::{ConsultConfig, ErrorMessages, Widget};

pub mod orchestrator;
pub use orchestrator::{AnswerSource, QueryOrchestrator, QueryResult, SubmitOptions};

pub mod session;
pub use session::{ConsultSession, SessionStats, SessionSummary};

pub mod storage;
pub use storage::{FileStore, KeyValueStore, MemoryStore, RatingStore};

mod util;

#[cfg(test)]
mod tests;

/// Create a session builder for a widget
pub fn client(widget: Widget) -> ClientBuilder {
    ClientBuilder::new(widget)
}
