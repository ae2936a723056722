//! Usage telemetry
//!
//! Site searches and interactions are pushed onto a [`TelemetrySink`]. The
//! [`TrackingQueue`] buffers them in memory and a [`MatomoTracker`] delivers
//! the buffered events over the Matomo HTTP tracking API.

use crate::environment::Environment;
use chrono::Timelike;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Non-successful response: {status} - {body}")]
    FailedResponse {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingEvent {
    /// A search and the number of results it produced.
    SiteSearch {
        term: String,
        category: String,
        count: usize,
    },
    /// A user interaction such as selecting a chart or a tab.
    Interaction {
        category: String,
        action: String,
        name: String,
        value: String,
    },
}

impl TrackingEvent {
    pub fn site_search(term: &str, category: &str, count: usize) -> Self {
        Self::SiteSearch {
            term: term.to_string(),
            category: category.to_string(),
            count,
        }
    }

    pub fn interaction(category: &str, action: &str, name: &str) -> Self {
        Self::Interaction {
            category: category.to_string(),
            action: action.to_string(),
            name: name.to_string(),
            value: String::new(),
        }
    }

    /// Event specific tracking parameters.
    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            TrackingEvent::SiteSearch {
                term,
                category,
                count,
            } => vec![
                ("search", term.clone()),
                ("search_cat", category.clone()),
                ("search_count", count.to_string()),
            ],
            TrackingEvent::Interaction {
                category,
                action,
                name,
                value,
            } => {
                let mut params = vec![("e_c", category.clone()), ("e_a", action.clone())];
                if !name.is_empty() {
                    params.push(("e_n", name.clone()));
                }
                if !value.is_empty() {
                    params.push(("e_v", value.clone()));
                }
                params
            }
        }
    }
}

/// Receiver of tracking events. Pushing never blocks and never fails.
pub trait TelemetrySink: Send + Sync {
    fn push(&self, event: TrackingEvent);
}

/// In-memory event queue shared between the UI and the tracker.
#[derive(Debug, Clone, Default)]
pub struct TrackingQueue {
    events: Arc<Mutex<Vec<TrackingEvent>>>,
}

impl TrackingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<TrackingEvent> {
        let mut guard = match self.events.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *guard)
    }

    pub fn len(&self) -> usize {
        match self.events.lock() {
            Ok(g) => g.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TelemetrySink for TrackingQueue {
    fn push(&self, event: TrackingEvent) {
        let mut guard = match self.events.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(event);
    }
}

/// Sink used when telemetry is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTelemetry;

impl TelemetrySink for NoTelemetry {
    fn push(&self, _event: TrackingEvent) {}
}

/// A `category:action[:name]` binding attached to an interactive element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub category: String,
    pub action: String,
    pub name: String,
}

/// Placeholder name replaced by the element's label when the event fires.
const LABEL_PLACEHOLDER: &str = "$label";

impl Interaction {
    /// Returns `None` unless at least a category and an action are given.
    pub fn parse(binding: &str) -> Option<Self> {
        let mut parts = binding.split(':');
        let category = parts.next()?;
        let action = parts.next()?;
        Some(Self {
            category: category.to_string(),
            action: action.to_string(),
            name: parts.next().unwrap_or_default().to_string(),
        })
    }

    pub fn event(&self, label: &str) -> TrackingEvent {
        let name = if self.name == LABEL_PLACEHOLDER {
            label
        } else {
            &self.name
        };
        TrackingEvent::interaction(&self.category, &self.action, name)
    }
}

// User-Agent string with client version
const USER_AGENT: &str = concat!("beer-analytics-cli/", env!("CARGO_PKG_VERSION"));

/// Delivers events to a Matomo instance.
#[derive(Debug, Clone)]
pub struct MatomoTracker {
    client: reqwest::Client,
    endpoint: String,
    site_id: u32,
    visitor_id: String,
}

impl MatomoTracker {
    pub fn new(endpoint: impl Into<String>, site_id: u32) -> Self {
        // Matomo expects a 16 character hex visitor id
        let visitor_id = uuid::Uuid::new_v4().simple().to_string()[..16].to_string();
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            site_id,
            visitor_id,
        }
    }

    /// Tracker of the environment, or `None` where telemetry is disabled.
    pub fn for_environment(environment: &Environment) -> Option<Self> {
        let endpoint = environment.telemetry_url()?;
        Some(Self::new(endpoint, environment.telemetry_site_id()))
    }

    pub fn visitor_id(&self) -> &str {
        &self.visitor_id
    }

    /// Full query of a tracking request.
    pub fn params(&self, event: &TrackingEvent) -> Result<Vec<(String, String)>, TrackError> {
        let cache_buster = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
        let local_now = chrono::offset::Local::now();

        let mut params: Vec<(String, String)> = vec![
            ("idsite".to_string(), self.site_id.to_string()),
            ("rec".to_string(), "1".to_string()),
            ("apiv".to_string(), "1".to_string()),
            ("_id".to_string(), self.visitor_id.clone()),
            ("rand".to_string(), cache_buster.to_string()),
            ("h".to_string(), local_now.hour().to_string()),
            ("m".to_string(), local_now.minute().to_string()),
            ("s".to_string(), local_now.second().to_string()),
        ];
        params.extend(
            event
                .params()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value)),
        );
        Ok(params)
    }

    pub async fn send(&self, event: &TrackingEvent) -> Result<(), TrackError> {
        let params = self.params(event)?;
        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(TrackError::FailedResponse { status, body });
        }
        Ok(())
    }

    /// Sends everything queued so far. Failed events are logged and dropped.
    /// Returns the number of delivered events.
    pub async fn flush(&self, queue: &TrackingQueue) -> usize {
        let mut delivered = 0;
        for event in queue.drain() {
            match self.send(&event).await {
                Ok(()) => delivered += 1,
                Err(e) => log::debug!("Dropping telemetry event {:?}: {}", event, e),
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_collects_and_drains() {
        let queue = TrackingQueue::new();
        let sink: Arc<dyn TelemetrySink> = Arc::new(queue.clone());
        sink.push(TrackingEvent::site_search("citra", "hops", 3));
        sink.push(TrackingEvent::interaction("analyzer", "add-chart", "popular-hops"));
        assert_eq!(queue.len(), 2);
        let events = queue.drain();
        assert_eq!(events[0], TrackingEvent::site_search("citra", "hops", 3));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_interaction_binding() {
        let binding = Interaction::parse("chart:select-tab:$label").unwrap();
        assert_eq!(
            binding.event("Last year"),
            TrackingEvent::interaction("chart", "select-tab", "Last year")
        );

        let unnamed = Interaction::parse("nav:open").unwrap();
        assert_eq!(unnamed.name, "");
        assert_eq!(
            unnamed.event("ignored"),
            TrackingEvent::interaction("nav", "open", "")
        );

        assert_eq!(Interaction::parse("lonely"), None);
    }

    #[test]
    fn test_tracking_params() {
        let tracker = MatomoTracker::new("http://stats.invalid/matomo.php", 1);
        assert_eq!(tracker.visitor_id().len(), 16);

        let params = tracker
            .params(&TrackingEvent::site_search("ipa", "styles", 12))
            .unwrap();
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("idsite"), Some("1"));
        assert_eq!(get("rec"), Some("1"));
        assert_eq!(get("search"), Some("ipa"));
        assert_eq!(get("search_cat"), Some("styles"));
        assert_eq!(get("search_count"), Some("12"));
        assert_eq!(get("e_c"), None);

        let params = tracker
            .params(&TrackingEvent::interaction("analyzer", "remove-chart", ""))
            .unwrap();
        assert!(params.iter().any(|(k, v)| k == "e_a" && v == "remove-chart"));
        assert!(!params.iter().any(|(k, _)| k == "e_n"));
    }

    #[test]
    fn test_disabled_outside_production() {
        assert!(MatomoTracker::for_environment(&Environment::Local).is_none());
        assert!(MatomoTracker::for_environment(&Environment::Production).is_some());
    }

    #[tokio::test]
    /// Undeliverable events are dropped rather than retried forever.
    async fn test_flush_to_unreachable_endpoint() {
        let queue = TrackingQueue::new();
        queue.push(TrackingEvent::interaction("a", "b", ""));
        let tracker = MatomoTracker::new("http://127.0.0.1:9/matomo.php", 1);
        assert_eq!(tracker.flush(&queue).await, 0);
        assert!(queue.is_empty());
    }
}
