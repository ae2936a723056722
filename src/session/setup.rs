//! Session setup and initialization

use crate::analytics::{MatomoTracker, NoTelemetry, TelemetrySink, TrackingQueue};
use crate::config::Config;
use crate::consts::cli_consts::{EVENT_QUEUE_SIZE, session};
use crate::environment::Environment;
use crate::events::{Event, EventSender};
use crate::network::{ApiError, HttpTransport, RequestClient};
use crate::region::{Completion, CompletionSender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] ApiError),

    #[error("Base URL \"{0}\" must start with http:// or https://")]
    InvalidBaseUrl(String),
}

/// Everything a command needs to load regions and report activity
pub struct SessionData {
    /// Environment the session was started for
    pub environment: Environment,
    /// Location of the config file
    pub config_path: PathBuf,
    /// Client bound to the resolved site URL
    pub client: RequestClient,
    /// Sender handed to regions and the analyzer
    pub events: EventSender,
    /// Activity events for the UI or the console
    pub event_receiver: mpsc::Receiver<Event>,
    /// Sender handed to regions
    pub completions: CompletionSender,
    /// Finished requests of every region
    pub completion_receiver: mpsc::UnboundedReceiver<Completion>,
    /// Where interactions and searches are tracked
    pub telemetry: Arc<dyn TelemetrySink>,
    /// Work running next to the command
    pub background: BackgroundTasks,
}

impl SessionData {
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

/// Background work of a session, stopped together on shutdown.
pub struct BackgroundTasks {
    telemetry_task: Option<JoinHandle<()>>,
    shutdown_sender: broadcast::Sender<()>,
}

impl BackgroundTasks {
    /// Stops background work. Queued telemetry is delivered one last time.
    pub async fn shutdown(self) {
        let _ = self.shutdown_sender.send(());
        if let Some(handle) = self.telemetry_task {
            let _ = handle.await;
        }
    }
}

/// Site URL by precedence: command line, config file, environment.
pub fn resolve_base_url(
    cli_override: Option<String>,
    config: &Config,
    environment: &Environment,
) -> Result<String, SessionError> {
    let url = cli_override
        .or_else(|| config.base_url.clone())
        .unwrap_or_else(|| environment.base_url());
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(SessionError::InvalidBaseUrl(url));
    }
    Ok(url.trim_end_matches('/').to_string())
}

/// Sets up a session
///
/// This function handles all the common setup required for both TUI and headless modes:
/// 1. Resolves the site URL and creates the HTTP client
/// 2. Creates the event and completion channels
/// 3. Starts telemetry delivery when it is enabled
pub fn setup_session(
    environment: Environment,
    config_path: &Path,
    base_url: Option<String>,
) -> Result<SessionData, SessionError> {
    let config = Config::load_or_default(config_path);
    let base_url = resolve_base_url(base_url, &config, &environment)?;
    let client = RequestClient::new(Arc::new(HttpTransport::new()?), base_url);

    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let (completions, completion_receiver) = mpsc::unbounded_channel();
    let (shutdown_sender, _) = broadcast::channel(1);

    let tracker = if config.telemetry {
        MatomoTracker::for_environment(&environment)
    } else {
        None
    };
    let mut telemetry_task = None;
    let telemetry: Arc<dyn TelemetrySink> = match tracker {
        Some(tracker) => {
            let queue = TrackingQueue::new();
            telemetry_task = Some(start_telemetry_flush(
                tracker,
                queue.clone(),
                shutdown_sender.subscribe(),
            ));
            Arc::new(queue)
        }
        None => Arc::new(NoTelemetry),
    };

    Ok(SessionData {
        environment,
        config_path: config_path.to_path_buf(),
        client,
        events: EventSender::new(event_sender),
        event_receiver,
        completions,
        completion_receiver,
        telemetry,
        background: BackgroundTasks {
            telemetry_task,
            shutdown_sender,
        },
    })
}

fn start_telemetry_flush(
    tracker: MatomoTracker,
    queue: TrackingQueue,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(session::telemetry_flush_interval());
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let delivered = tracker.flush(&queue).await;
                    if delivered > 0 {
                        log::debug!("Delivered {} telemetry events", delivered);
                    }
                }
                _ = shutdown.recv() => {
                    tracker.flush(&queue).await;
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_precedence() {
        let config = Config {
            base_url: Some("http://localhost:8000/".to_string()),
            ..Config::default()
        };
        let env = Environment::Production;

        assert_eq!(
            resolve_base_url(Some("https://mirror.example".to_string()), &config, &env).unwrap(),
            "https://mirror.example"
        );
        assert_eq!(
            resolve_base_url(None, &config, &env).unwrap(),
            "http://localhost:8000"
        );
        assert_eq!(
            resolve_base_url(None, &Config::default(), &env).unwrap(),
            env.base_url()
        );
        assert!(matches!(
            resolve_base_url(Some("ftp://x".to_string()), &config, &env),
            Err(SessionError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_session_without_telemetry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        Config {
            telemetry: false,
            ..Config::default()
        }
        .save(&path)
        .unwrap();

        let session = setup_session(Environment::Production, &path, None).unwrap();
        assert_eq!(session.base_url(), "https://www.beer-analytics.com");
        assert!(session.background.telemetry_task.is_none());
        session.background.shutdown().await;
    }
}
