//! Query webhook data models
//!
//! This module contains the validated query, the request sent to the n8n
//! webhook, the accepted reply shapes and the normalized answer.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::Environment;
use crate::error::{Result, ServiceError};

/// Minimum query length in characters, after trimming
pub const MIN_QUERY_CHARS: usize = 10;

/// Confidence reported for remote answers that carry none
pub const DEFAULT_REMOTE_CONFIDENCE: f64 = 0.8;

/// Model reported for remote answers that carry none
pub const DEFAULT_REMOTE_MODEL: &str = "gpt-4.1-mini";

/// A trimmed query of at least `MIN_QUERY_CHARS` characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Trim and validate raw user input
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::QueryEmpty);
        }

        let actual = trimmed.chars().count();
        if actual < MIN_QUERY_CHARS {
            return Err(ServiceError::QueryTooShort {
                min: MIN_QUERY_CHARS,
                actual,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized answer, whichever source produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub recommendations: Vec<String>,
    /// Always within [0, 1]
    pub confidence: f64,
    pub model: String,
}

impl Answer {
    pub fn new(
        answer: impl Into<String>,
        recommendations: Vec<String>,
        confidence: f64,
        model: impl Into<String>,
    ) -> Self {
        Self {
            answer: answer.into(),
            recommendations,
            confidence: confidence.clamp(0.0, 1.0),
            model: model.into(),
        }
    }
}

/// Body of the POST to the query webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub chat_input: String,
    pub timestamp: DateTime<Utc>,
    pub user_agent: String,
    pub language: String,
    pub context: String,
}

impl QueryRequest {
    pub fn new(query: &Query, context: &str, environment: &dyn Environment) -> Self {
        Self {
            chat_input: query.as_str().to_string(),
            timestamp: Utc::now(),
            user_agent: environment.user_agent(),
            language: environment.language(),
            context: context.to_string(),
        }
    }
}

/// Optional fields that may accompany a `text` or `answer` reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyMeta {
    pub recommendations: Vec<String>,
    pub confidence: Option<f64>,
    pub model: Option<String>,
}

impl ReplyMeta {
    fn from_object(map: &Map<String, Value>) -> Self {
        let recommendations = match map.get("recommendations") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            recommendations,
            confidence: map.get("confidence").and_then(Value::as_f64),
            model: map
                .get("model")
                .and_then(Value::as_str)
                .filter(|model| !model.is_empty())
                .map(str::to_string),
        }
    }
}

/// The reply shapes the webhook may answer with, in decode priority order
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookReply {
    /// `{"text": "...", ...}`
    Text { text: String, meta: ReplyMeta },
    /// `{"answer": "...", ...}`
    Answer { answer: String, meta: ReplyMeta },
    /// `"..."`
    Bare(String),
}

impl WebhookReply {
    /// Decode a raw response body
    pub fn decode(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Err(ServiceError::invalid_response("empty response body"));
        }

        let value: Value = serde_json::from_str(body)
            .map_err(|e| ServiceError::invalid_response(format!("body is not JSON: {}", e)))?;

        Self::from_value(value)
    }

    /// Classify a JSON value: `text` beats `answer` beats a bare string
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let meta = ReplyMeta::from_object(&map);

                if let Some(Value::String(text)) = map.get("text") {
                    return Ok(WebhookReply::Text { text: text.clone(), meta });
                }

                if let Some(Value::String(answer)) = map.get("answer") {
                    return Ok(WebhookReply::Answer { answer: answer.clone(), meta });
                }

                Err(ServiceError::invalid_response(
                    "object has neither a string `text` nor a string `answer` field",
                ))
            }
            Value::String(text) if !text.is_empty() => Ok(WebhookReply::Bare(text)),
            Value::String(_) => Err(ServiceError::invalid_response("empty string body")),
            Value::Null => Err(ServiceError::invalid_response("null body")),
            Value::Array(_) => Err(ServiceError::invalid_response("array body")),
            Value::Bool(_) | Value::Number(_) => {
                Err(ServiceError::invalid_response("scalar body"))
            }
        }
    }

    /// Normalize into an `Answer`, filling defaults for missing fields
    ///
    /// A confidence of exactly zero counts as missing, as upstream workflows
    /// emit 0 when they have no estimate.
    pub fn into_answer(self) -> Answer {
        let (answer, meta) = match self {
            WebhookReply::Text { text, meta } => (text, meta),
            WebhookReply::Answer { answer, meta } => (answer, meta),
            WebhookReply::Bare(text) => (text, ReplyMeta::default()),
        };

        let confidence = meta
            .confidence
            .filter(|c| *c != 0.0)
            .unwrap_or(DEFAULT_REMOTE_CONFIDENCE);

        Answer::new(
            answer,
            meta.recommendations,
            confidence,
            meta.model.unwrap_or_else(|| DEFAULT_REMOTE_MODEL.to_string()),
        )
    }
}
