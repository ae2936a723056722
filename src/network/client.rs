//! Cancellable request client
//!
//! Every `get` runs on its own tokio task and hands its result to a delivery
//! callback. Cancelling the returned handle guarantees the callback never runs.

use super::query::QueryParams;
use super::result::RequestResult;
use super::transport::Transport;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct RequestClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl RequestClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a site path against the base URL. Absolute URLs pass through.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Issues a GET in the background and delivers its result exactly once,
    /// unless the returned handle is cancelled first.
    ///
    /// Empty query values are not sent.
    pub fn get<F>(&self, path: &str, query: &QueryParams, deliver: F) -> RequestHandle
    where
        F: FnOnce(RequestResult) + Send + 'static,
    {
        let url = self.build_url(path);
        let pairs = query.non_empty_pairs();
        let transport = Arc::clone(&self.transport);
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {}
                result = transport.fetch(&url, &pairs) => {
                    // The token may have flipped while the response was being read
                    if !cancelled.is_cancelled() {
                        deliver(result);
                    }
                }
            }
        });

        RequestHandle { token, task }
    }

    /// Awaits a GET directly. Used for one-off bootstrap requests that no
    /// region owns.
    pub async fn fetch(&self, path: &str, query: &QueryParams) -> RequestResult {
        let url = self.build_url(path);
        self.transport.fetch(&url, &query.non_empty_pairs()).await
    }
}

/// Handle on one in-flight request.
#[derive(Debug)]
pub struct RequestHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl RequestHandle {
    /// Suppresses delivery of the result and stops the request.
    pub fn cancel(self) {
        self.token.cancel();
        self.task.abort();
    }
}
