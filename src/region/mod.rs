//! Loadable regions
//!
//! A region owns one endpoint and one panel. Loading it cancels whatever it
//! still had in flight, shows the loading indicator and issues a new request.
//! Completions travel back over a channel and are matched against the
//! region's current generation, so only the most recent load ever renders.

pub mod content;
pub mod view;

pub use content::{ChartOptions, PlotSpec, RecipeLink, RegionContent, RegionKind};
pub use view::{Panel, PanelDisplay, PanelHandle, RegionView};

use crate::consts::cli_consts::region::MAX_RETRIES;
use crate::events::{EventSender, EventType, Source};
use crate::logging::LogLevel;
use crate::network::{
    ErrorHandler, QueryParams, RequestClient, RequestHandle, RequestResult, ResponseOutcome,
};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

static NEXT_REGION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RegionId(u64);

impl RegionId {
    fn next() -> Self {
        Self(NEXT_REGION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A finished request, tagged with the load it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub region: RegionId,
    pub generation: u64,
    pub result: RequestResult,
}

pub type CompletionSender = mpsc::UnboundedSender<Completion>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegionState {
    Idle,
    Loading,
    Loaded,
    Empty,
    /// `retries` counts the manual retries spent on the current query.
    Failed { retries: u32 },
}

pub struct LoadableRegion {
    id: RegionId,
    source: Source,
    path: String,
    kind: RegionKind,
    client: RequestClient,
    view: Box<dyn RegionView>,
    completions: CompletionSender,
    events: EventSender,
    error_handler: ErrorHandler,
    state: RegionState,
    generation: u64,
    in_flight: Option<RequestHandle>,
    query: QueryParams,
    retries: u32,
}

impl LoadableRegion {
    pub fn new(
        source: Source,
        path: impl Into<String>,
        kind: RegionKind,
        client: RequestClient,
        view: Box<dyn RegionView>,
        completions: CompletionSender,
        events: EventSender,
    ) -> Self {
        Self {
            id: RegionId::next(),
            source,
            path: path.into(),
            kind,
            client,
            view,
            completions,
            events,
            error_handler: ErrorHandler::new(),
            state: RegionState::Idle,
            generation: 0,
            in_flight: None,
            query: QueryParams::new(),
            retries: 0,
        }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn state(&self) -> RegionState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Starts a fresh load with the given query, superseding any request in flight.
    pub fn load(&mut self, query: QueryParams) {
        self.query = query;
        self.retries = 0;
        self.issue();
    }

    /// True when the last load failed and retries are left for it.
    pub fn can_retry(&self) -> bool {
        matches!(self.state, RegionState::Failed { retries } if retries < MAX_RETRIES)
    }

    /// Repeats the last query after a failure. Returns false when no retry is available.
    pub fn retry(&mut self) -> bool {
        let RegionState::Failed { retries } = self.state else {
            return false;
        };
        if retries >= MAX_RETRIES {
            return false;
        }
        self.retries = retries + 1;
        self.events.send(
            self.source.clone(),
            format!("Retry {} of {}", self.retries, MAX_RETRIES),
            EventType::Refresh,
            LogLevel::Info,
        );
        self.issue();
        true
    }

    fn issue(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        self.state = RegionState::Loading;
        self.view.show_loading();

        let completions = self.completions.clone();
        let region = self.id;
        let generation = self.generation;
        self.in_flight = Some(self.client.get(&self.path, &self.query, move |result| {
            let _ = completions.send(Completion {
                region,
                generation,
                result,
            });
        }));

        self.events.send(
            self.source.clone(),
            format!("Loading {}?{}", self.path, self.query),
            EventType::Refresh,
            LogLevel::Debug,
        );
    }

    /// Cancels the request in flight, if any. Its completion will never arrive.
    pub fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.cancel();
        }
    }

    /// Applies a completion. Returns false when it belongs to another region
    /// or to a superseded load, in which case nothing is rendered.
    pub fn handle_completion(&mut self, completion: Completion) -> bool {
        if completion.region != self.id
            || completion.generation != self.generation
            || self.in_flight.is_none()
        {
            return false;
        }
        self.in_flight = None;

        let result = completion.result;
        match self.error_handler.outcome(&result) {
            ResponseOutcome::Success => match self.kind.parse(&result.body) {
                Ok(content) => {
                    self.state = RegionState::Loaded;
                    self.view.show_content(&content);
                    self.events.send(
                        self.source.clone(),
                        "Loaded".to_string(),
                        EventType::Success,
                        LogLevel::Info,
                    );
                }
                Err(e) => self.fail(format!("Malformed response: {}", e), LogLevel::Error),
            },
            ResponseOutcome::NoData => {
                self.state = RegionState::Empty;
                self.view.show_no_data(self.kind.no_data_text());
                self.events.send(
                    self.source.clone(),
                    "Not enough data".to_string(),
                    EventType::Empty,
                    self.error_handler.classify(&result),
                );
            }
            ResponseOutcome::Failure => {
                let reason = self.error_handler.describe(&result);
                let level = self.error_handler.classify(&result);
                self.fail(reason, level);
            }
        }
        true
    }

    fn fail(&mut self, reason: String, level: LogLevel) {
        self.state = RegionState::Failed {
            retries: self.retries,
        };
        let retry_available = self.retries < MAX_RETRIES;
        self.view
            .show_failed(self.kind.failed_text(), retry_available);
        self.events
            .send(self.source.clone(), reason, EventType::Error, level);
    }
}

impl Drop for LoadableRegion {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

#[cfg(test)]
mod tests {
    use super::view::MockRegionView;
    use super::*;
    use crate::network::Transport;
    use crate::network::transport::MockTransport;
    use mockall::Sequence;
    use std::sync::Arc;

    /// Never answers, so completions can be injected by hand.
    struct PendingTransport;

    #[async_trait::async_trait]
    impl Transport for PendingTransport {
        async fn fetch(&self, _url: &str, _query: &[(String, String)]) -> RequestResult {
            std::future::pending().await
        }
    }

    fn pending_client() -> RequestClient {
        RequestClient::new(Arc::new(PendingTransport), "http://site")
    }

    fn chart_region(
        client: RequestClient,
        view: Box<dyn RegionView>,
    ) -> (LoadableRegion, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let region = LoadableRegion::new(
            Source::Chart("hops".to_string()),
            "/analyze/charts/hops.json",
            RegionKind::Chart(ChartOptions::default()),
            client,
            view,
            tx,
            EventSender::detached(),
        );
        (region, rx)
    }

    fn completion(region: &LoadableRegion, generation: u64, status: u16, body: &str) -> Completion {
        Completion {
            region: region.id(),
            generation,
            result: RequestResult::new(status, body),
        }
    }

    #[tokio::test]
    /// Two loads in a row: only the second one may render.
    async fn test_last_load_wins() {
        let panel = PanelHandle::new("hops");
        let (mut region, _rx) = chart_region(pending_client(), Box::new(panel.clone()));

        region.load(QueryParams::new().with("hops", "citra"));
        let first = region.generation();
        region.load(QueryParams::new().with("hops", "mosaic"));
        let second = region.generation();
        assert_ne!(first, second);

        let stale = completion(&region, first, 200, r#"{"data": [], "layout": {}}"#);
        assert!(!region.handle_completion(stale));
        assert!(panel.is_loading());
        assert_eq!(region.state(), RegionState::Loading);

        let current = completion(&region, second, 200, r#"{"data": [], "layout": {}}"#);
        assert!(region.handle_completion(current.clone()));
        assert_eq!(region.state(), RegionState::Loaded);
        assert!(!panel.is_loading());

        // A duplicate delivery is ignored
        assert!(!region.handle_completion(current));
    }

    #[tokio::test]
    /// Each load renders loading first and exactly one outcome.
    async fn test_single_render_per_load() {
        let mut view = MockRegionView::new();
        let mut seq = Sequence::new();
        view.expect_show_loading()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        view.expect_show_no_data()
            .withf(|text| text == "Not enough data")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        view.expect_show_content().never();
        view.expect_show_failed().never();

        let (mut region, _rx) = chart_region(pending_client(), Box::new(view));
        region.load(QueryParams::new());
        let generation = region.generation();
        assert!(region.handle_completion(completion(&region, generation, 204, "")));
        assert_eq!(region.state(), RegionState::Empty);
    }

    #[tokio::test]
    async fn test_completion_for_other_region_is_ignored() {
        let (mut a, _rx_a) = chart_region(pending_client(), Box::new(PanelHandle::new("a")));
        let (mut b, _rx_b) = chart_region(pending_client(), Box::new(PanelHandle::new("b")));
        a.load(QueryParams::new());
        b.load(QueryParams::new());
        let for_b = completion(&b, b.generation(), 200, r#"{"data": []}"#);
        assert!(!a.handle_completion(for_b));
        assert_eq!(a.state(), RegionState::Loading);
    }

    #[tokio::test]
    /// Failures offer retries until the budget is spent, and a new load resets it.
    async fn test_retry_budget() {
        let panel = PanelHandle::new("hops");
        let (mut region, _rx) = chart_region(pending_client(), Box::new(panel.clone()));
        region.load(QueryParams::new().with("abv", "5,8"));

        for attempt in 0..=MAX_RETRIES {
            let generation = region.generation();
            assert!(region.handle_completion(completion(&region, generation, 500, "")));
            let expect_retry = attempt < MAX_RETRIES;
            assert_eq!(
                panel.snapshot().display,
                PanelDisplay::Failed {
                    text: "Failed loading data".to_string(),
                    retry_available: expect_retry,
                }
            );
            assert_eq!(region.retry(), expect_retry);
        }
        assert_eq!(region.state(), RegionState::Failed { retries: MAX_RETRIES });
        assert!(!region.can_retry());

        region.load(QueryParams::new().with("abv", "4,6"));
        let generation = region.generation();
        region.handle_completion(completion(&region, generation, 0, "connection refused"));
        assert!(region.can_retry());
    }

    #[tokio::test]
    /// A retry reissues the same query.
    async fn test_retry_keeps_query() {
        let (mut region, _rx) = chart_region(pending_client(), Box::new(PanelHandle::new("x")));
        let query = QueryParams::new().with("styles", "ipa");
        region.load(query.clone());
        let generation = region.generation();
        region.handle_completion(completion(&region, generation, 503, ""));
        assert!(region.retry());
        assert_eq!(region.query(), &query);
        assert_eq!(region.state(), RegionState::Loading);
    }

    #[tokio::test]
    async fn test_malformed_body_fails() {
        let panel = PanelHandle::new("hops");
        let (mut region, _rx) = chart_region(pending_client(), Box::new(panel.clone()));
        region.load(QueryParams::new());
        let generation = region.generation();
        assert!(region.handle_completion(completion(&region, generation, 200, "<html>")));
        assert_eq!(region.state(), RegionState::Failed { retries: 0 });
    }

    #[tokio::test]
    /// Full round trip through the client and the completion channel.
    async fn test_completion_arrives_over_channel() {
        let mut transport = MockTransport::new();
        transport
            .expect_fetch()
            .returning(|_, _| RequestResult::new(200, r#"{"count": 1234}"#));
        let client = RequestClient::new(Arc::new(transport), "http://site");
        let panel = PanelHandle::new("count");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut region = LoadableRegion::new(
            Source::RecipeCount,
            "/analyze/count.json",
            RegionKind::RecipeCount,
            client,
            Box::new(panel.clone()),
            tx,
            EventSender::detached(),
        );

        region.load(QueryParams::new().with("styles", "ipa"));
        let completion = rx.recv().await.unwrap();
        assert!(region.handle_completion(completion));
        assert_eq!(
            panel.snapshot().display,
            PanelDisplay::Content(RegionContent::Count(1234))
        );
    }

    #[tokio::test]
    /// A served plot is shown exactly as received.
    async fn test_plot_body_is_rendered_verbatim() {
        let mut transport = MockTransport::new();
        transport
            .expect_fetch()
            .withf(|url, query| {
                url == "http://site/analyze/charts/hops.json"
                    && query.len() == 1
                    && query[0].0 == "filter"
                    && query[0].1 == "ipa"
            })
            .times(1)
            .returning(|_, _| {
                RequestResult::new(
                    200,
                    r#"{"data": [{"x": [1], "y": [2]}], "layout": {"title": "T"}}"#,
                )
            });
        let client = RequestClient::new(Arc::new(transport), "http://site");
        let panel = PanelHandle::new("hops");
        let (mut region, mut rx) = chart_region(client, Box::new(panel.clone()));

        region.load(QueryParams::new().with("filter", "ipa"));
        let completion = rx.recv().await.unwrap();
        assert!(region.handle_completion(completion));

        assert_eq!(region.state(), RegionState::Loaded);
        assert!(!panel.is_loading());
        let expected = PlotSpec {
            data: vec![serde_json::json!({"x": [1], "y": [2]})],
            layout: serde_json::json!({"title": "T"}),
        };
        assert_eq!(
            panel.snapshot().display,
            PanelDisplay::Content(RegionContent::Plot(expected))
        );
    }

    #[tokio::test]
    async fn test_count_failure_shows_unknown() {
        let panel = PanelHandle::new("count");
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut region = LoadableRegion::new(
            Source::RecipeCount,
            "/analyze/count.json",
            RegionKind::RecipeCount,
            pending_client(),
            Box::new(panel.clone()),
            tx,
            EventSender::detached(),
        );
        region.load(QueryParams::new());
        let generation = region.generation();
        region.handle_completion(completion(&region, generation, 404, ""));
        assert!(matches!(
            panel.snapshot().display,
            PanelDisplay::Failed { ref text, .. } if text == "?"
        ));
    }
}
