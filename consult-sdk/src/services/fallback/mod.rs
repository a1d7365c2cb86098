//! Local fallback responder
//!
//! Answers from a fixed keyword table when the webhook is unavailable.
//! Matching is plain substring containment on the raw query: no case
//! folding, no diacritic normalization, no tokenization. The first table
//! entry whose keyword occurs anywhere in the query wins, so the table
//! order (not the position in the query) decides between keywords.

mod tables;
pub use tables::{CannedAnswer, FallbackTable};

use log::debug;

use crate::config::Widget;
use crate::services::webhook::Answer;

/// Confidence of a keyword match
pub const KEYWORD_MATCH_CONFIDENCE: f64 = 0.7;

/// Confidence of the generic default
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Model tag for every fallback answer
pub const FALLBACK_MODEL: &str = "fallback";

/// Deterministic keyword responder; never fails
#[derive(Debug, Clone, Copy)]
pub struct LocalResponder {
    table: &'static FallbackTable,
}

impl LocalResponder {
    pub fn new(widget: Widget) -> Self {
        Self::with_table(FallbackTable::for_widget(widget))
    }

    pub fn with_table(table: &'static FallbackTable) -> Self {
        Self { table }
    }

    /// The entry that would answer this query, if any
    pub fn matching_entry(&self, query: &str) -> Option<&'static CannedAnswer> {
        self.table
            .entries
            .iter()
            .find(|entry| query.contains(entry.keyword))
    }

    pub fn respond(&self, query: &str) -> Answer {
        match self.matching_entry(query) {
            Some(entry) => {
                debug!("Fallback matched keyword \"{}\"", entry.keyword);
                Answer::new(
                    entry.answer,
                    to_owned_list(entry.recommendations),
                    KEYWORD_MATCH_CONFIDENCE,
                    FALLBACK_MODEL,
                )
            }
            None => {
                debug!("Fallback found no keyword, using the generic answer");
                Answer::new(
                    self.table.default_answer,
                    to_owned_list(self.table.default_recommendations),
                    DEFAULT_CONFIDENCE,
                    FALLBACK_MODEL,
                )
            }
        }
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
