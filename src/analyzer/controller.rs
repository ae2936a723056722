//! Analyzer controller
//!
//! Owns the analyzer state and the results area. After every mutation the
//! pending state changes are drained: the complete state is written to the
//! history, the results area is created if it does not exist yet, and every
//! region is refreshed when a filter changed.

use super::catalog::{Entities, find_chart};
use super::history::{History, analysis_url};
use super::results::ResultsArea;
use super::state::AnalyzerState;
use crate::analytics::{Interaction, TelemetrySink};
use crate::consts::cli_consts::analyzer::PAGE_TITLE;
use crate::events::{Event, EventSender, EventType, Source};
use crate::filters::{FilterError, StateChange};
use crate::logging::LogLevel;
use crate::network::{QueryParams, RequestClient};
use crate::region::{Completion, CompletionSender};
use std::sync::Arc;
use tokio::sync::mpsc;

const ADD_CHART_INTERACTION: &str = "analyzer:add-chart:$label";
const REMOVE_CHART_INTERACTION: &str = "analyzer:remove-chart:$label";

pub struct AnalyzerController {
    state: AnalyzerState,
    changes: mpsc::UnboundedReceiver<StateChange>,
    history: Box<dyn History>,
    client: RequestClient,
    completions: CompletionSender,
    events: EventSender,
    telemetry: Arc<dyn TelemetrySink>,
    results: Option<ResultsArea>,
}

impl AnalyzerController {
    pub fn new(
        entities: &Entities,
        client: RequestClient,
        completions: CompletionSender,
        events: EventSender,
        history: Box<dyn History>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        let mut state = AnalyzerState::new(entities);
        let changes = state.subscribe();
        Self {
            state,
            changes,
            history,
            client,
            completions,
            events,
            telemetry,
            results: None,
        }
    }

    /// Restores the initial state without treating it as a change. A non-empty
    /// query brings up the results right away.
    pub fn start(&mut self, initial: &QueryParams) {
        self.state.load_from_query(initial);
        while self.changes.try_recv().is_ok() {}
        if !initial.is_empty() {
            self.ensure_initialized();
        }
    }

    pub fn state(&self) -> &AnalyzerState {
        &self.state
    }

    pub fn results(&self) -> Option<&ResultsArea> {
        self.results.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.results.is_some()
    }

    /// Current history URL of the complete state.
    pub fn current_url(&self) -> String {
        analysis_url(&self.state.full_query())
    }

    pub fn set_range(&mut self, name: &str, low: i64, high: i64) -> Result<bool, FilterError> {
        let changed = self.state.set_range(name, low, high)?;
        self.process_changes();
        Ok(changed)
    }

    pub fn set_selection<I, S>(&mut self, name: &str, values: I) -> Result<bool, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let changed = self.state.set_selection(name, values)?;
        self.process_changes();
        Ok(changed)
    }

    pub fn toggle_selection(&mut self, name: &str, value: &str) -> Result<bool, FilterError> {
        let changed = self.state.toggle_selection(name, value)?;
        self.process_changes();
        Ok(changed)
    }

    /// Replaces the whole state from a query, as when an analysis is pasted in.
    pub fn load_query(&mut self, params: &QueryParams) -> bool {
        let changed = self.state.load_from_query(params);
        self.sync_chart_slots();
        self.process_changes();
        changed
    }

    pub fn add_chart(&mut self, id: &str) -> bool {
        let Some(definition) = find_chart(id) else {
            return false;
        };
        if !self.state.add_chart(id) {
            return false;
        }
        if let Some(results) = &mut self.results {
            results.add_chart(definition, self.state.filter_query());
        }
        self.track(ADD_CHART_INTERACTION, &definition.full_title());
        self.process_changes();
        true
    }

    pub fn remove_chart(&mut self, id: &str) -> bool {
        if !self.state.remove_chart(id) {
            return false;
        }
        if let Some(results) = &mut self.results {
            results.remove_chart(id);
        }
        if let Some(definition) = find_chart(id) {
            self.track(REMOVE_CHART_INTERACTION, &definition.full_title());
        }
        self.process_changes();
        true
    }

    pub fn handle_completion(&mut self, completion: Completion) -> bool {
        match &mut self.results {
            Some(results) => results.handle_completion(completion),
            None => false,
        }
    }

    pub fn retry_failed(&mut self) -> usize {
        match &mut self.results {
            Some(results) => results.retry_failed(),
            None => 0,
        }
    }

    /// Applies every pending state change at once. Returns false when there
    /// was nothing to apply.
    pub fn process_changes(&mut self) -> bool {
        let mut any = false;
        let mut filters_changed = false;
        while let Ok(change) = self.changes.try_recv() {
            any = true;
            filters_changed |= change == StateChange::Filters;
        }
        if !any {
            return false;
        }

        let url = self.current_url();
        self.history.push_state(&url, PAGE_TITLE);
        self.events.send_event(Event::state_change(url));

        let created = self.ensure_initialized();
        if !created && filters_changed {
            self.refresh();
        }
        true
    }

    /// Creates and loads the results area on first use. Returns whether it was created.
    fn ensure_initialized(&mut self) -> bool {
        if self.results.is_some() {
            return false;
        }
        let mut results = ResultsArea::new(
            self.client.clone(),
            self.completions.clone(),
            self.events.clone(),
        );
        results.refresh_count(self.state.full_query());
        let query = self.state.filter_query();
        for id in self.state.charts().selected() {
            if let Some(definition) = find_chart(id) {
                results.add_chart(definition, query.clone());
            }
        }
        self.results = Some(results);
        self.events.send(
            Source::Analyzer,
            "Analysis started".to_string(),
            EventType::Refresh,
            LogLevel::Info,
        );
        true
    }

    fn refresh(&mut self) {
        if let Some(results) = &mut self.results {
            results.refresh_count(self.state.full_query());
            results.refresh_charts(&self.state.filter_query());
        }
    }

    /// Brings displayed chart regions in line with the chart selection.
    fn sync_chart_slots(&mut self) {
        let Some(results) = &mut self.results else {
            return;
        };
        let selected = self.state.charts().selected().to_vec();
        let stale: Vec<&'static str> = results
            .charts()
            .iter()
            .map(|slot| slot.definition.id)
            .filter(|id| !selected.iter().any(|s| s == id))
            .collect();
        for id in stale {
            results.remove_chart(id);
        }
        let query = self.state.filter_query();
        for id in &selected {
            if let Some(definition) = find_chart(id) {
                results.add_chart(definition, query.clone());
            }
        }
    }

    fn track(&self, binding: &str, label: &str) {
        if let Some(interaction) = Interaction::parse(binding) {
            self.telemetry.push(interaction.event(label));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{TrackingEvent, TrackingQueue};
    use crate::analyzer::catalog::tests::sample_entities;
    use crate::analyzer::history::MockHistory;
    use crate::network::{RequestResult, Transport};
    use crate::region::RegionState;

    struct PendingTransport;

    #[async_trait::async_trait]
    impl Transport for PendingTransport {
        async fn fetch(&self, _url: &str, _query: &[(String, String)]) -> RequestResult {
            std::future::pending().await
        }
    }

    fn controller(history: MockHistory) -> (AnalyzerController, TrackingQueue) {
        let client = RequestClient::new(Arc::new(PendingTransport), "http://site");
        let (tx, _rx) = mpsc::unbounded_channel();
        let queue = TrackingQueue::new();
        let controller = AnalyzerController::new(
            &sample_entities(),
            client,
            tx,
            EventSender::detached(),
            Box::new(history),
            Arc::new(queue.clone()),
        );
        (controller, queue)
    }

    #[tokio::test]
    /// An empty start shows nothing until the first change.
    async fn test_results_created_lazily() {
        let mut history = MockHistory::new();
        history
            .expect_push_state()
            .withf(|url, title| {
                url.starts_with("/analyze/?") && url.contains("ibu=10%2C50") && title == PAGE_TITLE
            })
            .times(1)
            .return_const(());
        let (mut controller, _) = controller(history);

        controller.start(&QueryParams::new());
        assert!(!controller.is_initialized());

        assert!(controller.set_range("ibu", 10, 50).unwrap());
        let results = controller.results().unwrap();
        // Created and loaded once, not refreshed on top
        assert_eq!(results.count_region().generation(), 1);
        assert_eq!(results.count_region().state(), RegionState::Loading);
        assert_eq!(
            results.count_region().query().get("ibu"),
            Some("10,50")
        );
    }

    #[tokio::test]
    /// A saved analysis comes back with its charts and without a history write.
    async fn test_start_with_query() {
        let mut history = MockHistory::new();
        history.expect_push_state().never();
        let (mut controller, _) = controller(history);

        controller.start(&QueryParams::parse("charts=popular-hops,hop-pairings&abv=4,7"));
        let results = controller.results().unwrap();
        assert_eq!(results.charts().len(), 2);
        let chart_query = results.charts()[0].region().query();
        assert_eq!(chart_query.get("abv"), Some("4,7"));
        assert_eq!(chart_query.get("charts"), None);
        assert_eq!(
            results.count_region().query().get("charts"),
            Some("popular-hops,hop-pairings")
        );
    }

    #[tokio::test]
    /// Filter changes refresh every region; no-op changes do nothing.
    async fn test_filter_change_refreshes_everything() {
        let mut history = MockHistory::new();
        history.expect_push_state().times(1).return_const(());
        let (mut controller, _) = controller(history);
        controller.start(&QueryParams::parse("charts=popular-hops"));

        assert!(controller.set_selection("hops", ["citra"]).unwrap());
        assert!(!controller.set_selection("hops", ["citra"]).unwrap());
        let results = controller.results().unwrap();
        assert_eq!(results.count_region().generation(), 2);
        assert_eq!(results.charts()[0].region().generation(), 2);
        assert_eq!(results.charts()[0].region().query().get("hops"), Some("citra"));
    }

    #[tokio::test]
    /// Chart changes only touch the chart itself and the history.
    async fn test_chart_changes_do_not_refresh_others() {
        let mut history = MockHistory::new();
        history.expect_push_state().times(2).return_const(());
        let (mut controller, queue) = controller(history);
        controller.start(&QueryParams::parse("charts=popular-hops"));

        assert!(controller.add_chart("trending-hops"));
        assert!(!controller.add_chart("trending-hops"));
        assert!(!controller.add_chart("unknown-chart"));
        let results = controller.results().unwrap();
        assert_eq!(results.charts().len(), 2);
        assert_eq!(results.count_region().generation(), 1);
        assert_eq!(results.charts()[0].region().generation(), 1);

        assert!(controller.remove_chart("popular-hops"));
        assert_eq!(controller.results().unwrap().charts().len(), 1);
        assert!(controller.current_url().contains("charts=trending-hops"));

        assert_eq!(
            queue.drain(),
            vec![
                TrackingEvent::interaction("analyzer", "add-chart", "Trending Hops"),
                TrackingEvent::interaction("analyzer", "remove-chart", "Most Used Hops"),
            ]
        );
    }

    #[tokio::test]
    /// Adding the first chart before any filter change brings up the results.
    async fn test_first_chart_initializes_results() {
        let mut history = MockHistory::new();
        history.expect_push_state().times(1).return_const(());
        let (mut controller, _) = controller(history);
        controller.start(&QueryParams::new());

        assert!(controller.add_chart("popular-yeasts"));
        let results = controller.results().unwrap();
        assert_eq!(results.charts().len(), 1);
        assert_eq!(results.charts()[0].region().generation(), 1);
    }

    #[tokio::test]
    async fn test_load_query_syncs_charts() {
        let mut history = MockHistory::new();
        history.expect_push_state().times(1).return_const(());
        let (mut controller, _) = controller(history);
        controller.start(&QueryParams::parse("charts=popular-hops"));

        assert!(controller.load_query(&QueryParams::parse("charts=popular-yeasts&srm=2,9")));
        let ids: Vec<&str> = controller
            .results()
            .unwrap()
            .charts()
            .iter()
            .map(|slot| slot.definition.id)
            .collect();
        assert_eq!(ids, vec!["popular-yeasts"]);
    }

    #[test]
    fn test_unknown_filter_is_an_error() {
        let mut history = MockHistory::new();
        history.expect_push_state().never();
        let (mut controller, _) = controller(history);
        assert!(controller.set_range("color", 1, 2).is_err());
    }
}
