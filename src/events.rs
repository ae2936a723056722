//! Event System
//!
//! Activity events emitted by regions, the analyzer and telemetry,
//! shown in the activity log or printed in headless mode.

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A chart region, identified by its label.
    Chart(String),
    /// A recipe list region.
    Recipes,
    /// The analyzer's recipe counter.
    RecipeCount,
    /// The analyzer controller itself.
    Analyzer,
    /// Search boxes.
    Search,
    /// Telemetry delivery.
    Telemetry,
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Chart(label) => write!(f, "chart {}", label),
            Source::Recipes => write!(f, "recipes"),
            Source::RecipeCount => write!(f, "count"),
            Source::Analyzer => write!(f, "analyzer"),
            Source::Search => write!(f, "search"),
            Source::Telemetry => write!(f, "telemetry"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Empty,
    Error,
    Refresh,
    StateChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    pub fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn state_change(msg: String) -> Self {
        Self::new(
            Source::Analyzer,
            msg,
            EventType::StateChange,
            LogLevel::Debug,
        )
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.event_type, self.timestamp, self.source, self.msg
        )
    }
}

/// Non-blocking event sending shared by everything that reports activity.
///
/// Events are best-effort: when the queue is full or the UI is gone the
/// event is dropped rather than stalling the caller.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// A sender whose events go nowhere, for commands without an activity log.
    pub fn detached() -> Self {
        let (sender, _) = mpsc::channel(1);
        Self { sender }
    }

    /// Send a generic event
    pub fn send_event(&self, event: Event) {
        let _ = self.sender.try_send(event);
    }

    pub fn send(&self, source: Source, msg: String, event_type: EventType, log_level: LogLevel) {
        self.send_event(Event::new(source, msg, event_type, log_level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display_includes_source() {
        let event = Event::new(
            Source::Chart("popular-hops".to_string()),
            "Loaded".to_string(),
            EventType::Success,
            LogLevel::Info,
        );
        let rendered = event.to_string();
        assert!(rendered.starts_with("Success ["));
        assert!(rendered.ends_with("chart popular-hops: Loaded"));
    }

    #[test]
    fn test_sender_delivers_and_detached_drops() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender.send(
            Source::Search,
            "hop".to_string(),
            EventType::Refresh,
            LogLevel::Debug,
        );
        let event = rx.try_recv().unwrap();
        assert_eq!(event.source, Source::Search);

        // Must not panic even though the receiver is gone
        EventSender::detached().send_event(event);
    }

    #[test]
    fn test_success_is_always_displayed() {
        let event = Event::new(
            Source::Recipes,
            "ok".to_string(),
            EventType::Success,
            LogLevel::Trace,
        );
        assert!(event.should_display());
    }
}
