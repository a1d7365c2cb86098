//! Rating data models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::Environment;
use crate::error::{Result, ServiceError};

/// Thumbs up or down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Positive,
    Negative,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Positive => f.write_str("positive"),
            Rating::Negative => f.write_str("negative"),
        }
    }
}

/// What the user has entered so far in the rating form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingDraft {
    pub rating: Option<Rating>,
    pub comment: String,
}

impl RatingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Freeze the draft into a record; fails without a selected rating
    pub fn into_record(
        self,
        session_id: u64,
        environment: &dyn Environment,
    ) -> Result<RatingRecord> {
        let rating = self.rating.ok_or(ServiceError::RatingRequired)?;
        Ok(RatingRecord {
            rating,
            comment: self.comment.trim().to_string(),
            timestamp: Utc::now(),
            session_id,
            user_agent: environment.user_agent(),
            language: environment.language(),
        })
    }
}

/// User feedback as captured by the widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub rating: Rating,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
    pub session_id: u64,
    pub user_agent: String,
    pub language: String,
}

/// A rating record plus submission-channel metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRating {
    pub rating: Rating,
    pub comment: String,
    pub session_id: u64,
    pub user_agent: String,
    pub language: String,
    pub ip_address: String,
    pub source: String,
    /// Re-stamped at submission time
    pub timestamp: DateTime<Utc>,
    pub context: String,
}

impl EnrichedRating {
    pub fn from_record(record: &RatingRecord, ip_address: String, context: &str) -> Self {
        Self {
            rating: record.rating,
            comment: record.comment.clone(),
            session_id: record.session_id,
            user_agent: record.user_agent.clone(),
            language: record.language.clone(),
            ip_address,
            source: SUBMISSION_SOURCE.to_string(),
            timestamp: Utc::now(),
            context: context.to_string(),
        }
    }
}

/// Channel tag attached to every submitted rating
pub const SUBMISSION_SOURCE: &str = "web";

/// An enriched rating held in the local ring buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRating {
    #[serde(flatten)]
    pub rating: EnrichedRating,
    pub stored_at: DateTime<Utc>,
}

/// Where a rating ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingSource {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "google-sheets")]
    GoogleSheets,
    #[serde(rename = "n8n")]
    N8n,
}

impl RatingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingSource::Local => "local",
            RatingSource::GoogleSheets => "google-sheets",
            RatingSource::N8n => "n8n",
        }
    }
}

impl fmt::Display for RatingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a rating submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingOutcome {
    pub success: bool,
    pub source: RatingSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Why the remote sinks were not used, when they failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RatingOutcome {
    pub fn delivered(source: RatingSource, data: Value) -> Self {
        Self {
            success: true,
            source,
            data: Some(data),
            error: None,
        }
    }

    pub fn stored_locally(error: Option<String>) -> Self {
        Self {
            success: true,
            source: RatingSource::Local,
            data: None,
            error,
        }
    }
}
