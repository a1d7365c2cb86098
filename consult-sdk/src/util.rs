//! Utility module for common functionality
//!
//! This module provides helpers used across the SDK: timing, log-safe text,
//! request identifiers and duration parsing.

use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serializer;

/// Async timing helper: runs the future and reports how long it took
pub async fn measure_time_async<F, T, Fut>(f: F) -> (T, Duration)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = T>,
{
    let start = Instant::now();
    let result = f().await;
    let duration = start.elapsed();
    (result, duration)
}

/// Truncate a string to a maximum number of characters, adding ellipsis if truncated
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

static SENSITIVE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}", "[EMAIL]"),
        (r"\+?\d[\d\s\-]{7,}\d", "[PHONE]"),
        (r"Bearer [A-Za-z0-9\-_\.]+", "Bearer [REDACTED]"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// Sanitize user text for logging (emails, phone numbers, tokens)
pub fn sanitize_for_logging(s: &str) -> String {
    let mut result = s.to_string();
    for (re, replacement) in SENSITIVE_PATTERNS.iter() {
        result = re.replace_all(&result, *replacement).to_string();
    }
    result
}

/// Log-safe excerpt of a user query
pub fn loggable_query(s: &str) -> String {
    truncate_string(&sanitize_for_logging(s), 80)
}

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Parse a duration from a string (e.g., "30s", "30000ms", "5m", "1h")
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    if let Some(ms) = s.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.trim().parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else if let Some(hours) = s.strip_suffix('h') {
        hours.trim().parse::<u64>().ok().map(|h| Duration::from_secs(h * 3600))
    } else {
        // Bare numbers are seconds
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

/// Serialize a duration as whole milliseconds
pub fn serialize_millis<S>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("الكتابة الأكاديمية", 7), "الكت...");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("5m"), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("1h"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_duration("30000ms"), Some(Duration::from_millis(30000)));
        assert_eq!(parse_duration("60"), Some(Duration::from_secs(60)));
        assert_eq!(parse_duration("soon"), None);
    }

    #[test]
    fn test_sanitize_for_logging() {
        let output = sanitize_for_logging("تواصل معي على ali@example.com أو 0551234567");
        assert!(output.contains("[EMAIL]"));
        assert!(output.contains("[PHONE]"));
        assert!(!output.contains("ali@example.com"));
        assert!(!output.contains("0551234567"));
    }
}
