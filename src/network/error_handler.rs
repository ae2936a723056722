//! Centralized response classification

use super::result::RequestResult;
use crate::logging::LogLevel;

/// How a region should treat a completed request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// 200: parse and render the body.
    Success,
    /// 204: the server has too little data to answer.
    NoData,
    /// Anything else, including transport failures.
    Failure,
}

/// Centralized classification for all site responses
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler;

impl ErrorHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn outcome(&self, result: &RequestResult) -> ResponseOutcome {
        match result.status {
            200 => ResponseOutcome::Success,
            204 => ResponseOutcome::NoData,
            _ => ResponseOutcome::Failure,
        }
    }

    /// Classify a response and determine the appropriate log level
    pub fn classify(&self, result: &RequestResult) -> LogLevel {
        match result.status {
            200 => LogLevel::Info,
            // Expected when filters are narrow
            204 => LogLevel::Debug,

            // Authentication errors - critical
            401 | 403 => LogLevel::Error,

            // Unknown chart or missing page
            404 => LogLevel::Warn,

            // Server errors - temporary issues
            500..=599 => LogLevel::Warn,

            // Network issues - usually temporary
            0 => LogLevel::Warn,

            // Other errors
            _ => LogLevel::Warn,
        }
    }

    /// Short human readable reason, shown next to failure placeholders.
    pub fn describe(&self, result: &RequestResult) -> String {
        if result.is_transport_failure() {
            return clean_transport_message(&result.body);
        }
        match result.status {
            204 => "no content".to_string(),
            404 => "not found (404)".to_string(),
            status @ 500..=599 => format!("server error ({})", status),
            status => format!("HTTP {}", status),
        }
    }
}

/// Replace verbose reqwest error patterns with cleaner messages
fn clean_transport_message(msg: &str) -> String {
    let lower = msg.to_lowercase();
    if lower.contains("timed out") || lower.contains("timeout") {
        return "request timed out".to_string();
    }
    if lower.contains("connect") {
        return "connection failed".to_string();
    }
    "network error".to_string()
}
