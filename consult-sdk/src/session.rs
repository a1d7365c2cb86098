//! Consultation session
//!
//! A `ConsultSession` is the one instance a widget builds at start-up and
//! passes around: it owns the query orchestrator, the rating pipeline and
//! the running usage statistics.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::debug;
use serde::Serialize;

use crate::config::{ErrorMessages, Widget};
use crate::core::{Environment, ServiceClient};
use crate::error::{Result, ServiceError};
use crate::orchestrator::{AnswerSource, QueryOrchestrator, QueryResult, SubmitOptions};
use crate::services::rating::{Rating, RatingDraft, RatingOutcome, RatingPipeline};

/// Query count at which the session goal is reached
pub const QUERY_GOAL: u64 = 100;

/// Running usage statistics for one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub query_count: u64,
    pub webhook_usage: u64,
    pub fallback_usage: u64,
    pub total_response_time: Duration,
    pub positive_ratings: u64,
    pub negative_ratings: u64,
}

impl SessionStats {
    pub fn record_query(&mut self, source: AnswerSource, response_time: Duration) {
        self.query_count += 1;
        self.total_response_time += response_time;
        match source {
            AnswerSource::Webhook => self.webhook_usage += 1,
            AnswerSource::Fallback => self.fallback_usage += 1,
        }
    }

    pub fn record_rating(&mut self, rating: Rating) {
        match rating {
            Rating::Positive => self.positive_ratings += 1,
            Rating::Negative => self.negative_ratings += 1,
        }
    }

    pub fn average_response_time(&self) -> Duration {
        if self.query_count == 0 {
            return Duration::ZERO;
        }
        self.total_response_time.div_f64(self.query_count as f64)
    }

    pub fn total_ratings(&self) -> u64 {
        self.positive_ratings + self.negative_ratings
    }

    /// Share of positive ratings in percent; 0 without ratings
    pub fn satisfaction_rate(&self) -> f64 {
        let total = self.total_ratings();
        if total == 0 {
            return 0.0;
        }
        self.positive_ratings as f64 / total as f64 * 100.0
    }

    pub fn reached_query_goal(&self) -> bool {
        self.query_count >= QUERY_GOAL
    }

    /// Whether answered queries average within the target
    pub fn meets_response_target(&self, target: Duration) -> bool {
        self.query_count > 0 && self.average_response_time() <= target
    }

    pub fn summary(&self, target: Duration) -> SessionSummary {
        SessionSummary {
            total_queries: self.query_count,
            webhook_usage: self.webhook_usage,
            fallback_usage: self.fallback_usage,
            average_response_time_ms: self.average_response_time().as_millis() as u64,
            positive_ratings: self.positive_ratings,
            negative_ratings: self.negative_ratings,
            satisfaction_rate: self.satisfaction_rate(),
            reached_query_goal: self.reached_query_goal(),
            meets_response_target: self.meets_response_target(target),
        }
    }
}

/// Snapshot of a session's statistics for display or analytics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_queries: u64,
    pub webhook_usage: u64,
    pub fallback_usage: u64,
    pub average_response_time_ms: u64,
    pub positive_ratings: u64,
    pub negative_ratings: u64,
    pub satisfaction_rate: f64,
    pub reached_query_goal: bool,
    pub meets_response_target: bool,
}

/// One widget's consultation session
pub struct ConsultSession {
    widget: Widget,
    orchestrator: QueryOrchestrator,
    ratings: RatingPipeline,
    environment: Arc<dyn Environment>,
    messages: ErrorMessages,
    fallback_enabled: bool,
    response_target: Duration,
    stats: Mutex<SessionStats>,
}

impl ConsultSession {
    pub(crate) fn new(
        widget: Widget,
        orchestrator: QueryOrchestrator,
        ratings: RatingPipeline,
        environment: Arc<dyn Environment>,
        messages: ErrorMessages,
        fallback_enabled: bool,
        response_target: Duration,
    ) -> Self {
        Self {
            widget,
            orchestrator,
            ratings,
            environment,
            messages,
            fallback_enabled,
            response_target,
            stats: Mutex::new(SessionStats::default()),
        }
    }

    pub fn widget(&self) -> Widget {
        self.widget
    }

    pub fn messages(&self) -> &ErrorMessages {
        &self.messages
    }

    pub fn ratings(&self) -> &RatingPipeline {
        &self.ratings
    }

    /// Ask with the configured fallback setting
    pub async fn ask(&self, raw_query: &str) -> Result<QueryResult> {
        self.ask_with(
            raw_query,
            SubmitOptions {
                fallback_enabled: self.fallback_enabled,
            },
        )
        .await
    }

    pub async fn ask_with(&self, raw_query: &str, options: SubmitOptions) -> Result<QueryResult> {
        let result = self.orchestrator.submit(raw_query, options).await?;
        self.lock_stats()?.record_query(result.source, result.response_time);
        Ok(result)
    }

    /// Submit the rating form; only a missing selection is an error
    pub async fn rate(&self, draft: RatingDraft) -> Result<RatingOutcome> {
        let session_id = self.lock_stats()?.query_count;
        let record = draft.into_record(session_id, self.environment.as_ref())?;

        let outcome = self.ratings.submit(&record).await;
        self.lock_stats()?.record_rating(record.rating);
        debug!("Rating {} handled via {}", record.rating, outcome.source);
        Ok(outcome)
    }

    pub async fn health_check(&self) -> bool {
        self.orchestrator.client().health_check().await
    }

    pub fn stats(&self) -> Result<SessionStats> {
        Ok(self.lock_stats()?.clone())
    }

    pub fn summary(&self) -> Result<SessionSummary> {
        Ok(self.lock_stats()?.summary(self.response_target))
    }

    fn lock_stats(&self) -> Result<MutexGuard<'_, SessionStats>> {
        self.stats
            .lock()
            .map_err(|_| ServiceError::internal("session statistics lock poisoned"))
    }
}
