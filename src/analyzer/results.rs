//! Analyzer results area: the recipe counter and one region per chart.

use super::catalog::ChartDefinition;
use crate::consts::cli_consts::analyzer::{COUNT_PATH, chart_path};
use crate::events::{EventSender, Source};
use crate::network::{QueryParams, RequestClient};
use crate::region::{
    ChartOptions, Completion, CompletionSender, LoadableRegion, PanelHandle, RegionKind,
};

/// One displayed chart.
pub struct ChartSlot {
    pub definition: &'static ChartDefinition,
    pub panel: PanelHandle,
    region: LoadableRegion,
}

impl ChartSlot {
    pub fn region(&self) -> &LoadableRegion {
        &self.region
    }
}

pub struct ResultsArea {
    client: RequestClient,
    completions: CompletionSender,
    events: EventSender,
    count_panel: PanelHandle,
    count: LoadableRegion,
    charts: Vec<ChartSlot>,
}

impl ResultsArea {
    pub fn new(client: RequestClient, completions: CompletionSender, events: EventSender) -> Self {
        let count_panel = PanelHandle::new("Matching recipes");
        let count = LoadableRegion::new(
            Source::RecipeCount,
            COUNT_PATH,
            RegionKind::RecipeCount,
            client.clone(),
            Box::new(count_panel.clone()),
            completions.clone(),
            events.clone(),
        );
        Self {
            client,
            completions,
            events,
            count_panel,
            count,
            charts: Vec::new(),
        }
    }

    pub fn count_panel(&self) -> &PanelHandle {
        &self.count_panel
    }

    pub fn count_region(&self) -> &LoadableRegion {
        &self.count
    }

    pub fn charts(&self) -> &[ChartSlot] {
        &self.charts
    }

    pub fn has_chart(&self, id: &str) -> bool {
        self.charts.iter().any(|slot| slot.definition.id == id)
    }

    /// Creates a chart region and loads it. Does nothing if the chart is shown already.
    pub fn add_chart(&mut self, definition: &'static ChartDefinition, query: QueryParams) -> bool {
        if self.has_chart(definition.id) {
            return false;
        }
        let panel = PanelHandle::new(definition.full_title());
        let mut region = LoadableRegion::new(
            Source::Chart(definition.id.to_string()),
            chart_path(definition.id),
            RegionKind::Chart(ChartOptions::default()),
            self.client.clone(),
            Box::new(panel.clone()),
            self.completions.clone(),
            self.events.clone(),
        );
        region.load(query);
        self.charts.push(ChartSlot {
            definition,
            panel,
            region,
        });
        true
    }

    /// Drops a chart region, cancelling its request.
    pub fn remove_chart(&mut self, id: &str) -> bool {
        match self.charts.iter().position(|slot| slot.definition.id == id) {
            Some(index) => {
                self.charts.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn refresh_count(&mut self, query: QueryParams) {
        self.count.load(query);
    }

    pub fn refresh_charts(&mut self, query: &QueryParams) {
        for slot in &mut self.charts {
            slot.region.load(query.clone());
        }
    }

    pub fn handle_completion(&mut self, completion: Completion) -> bool {
        if completion.region == self.count.id() {
            return self.count.handle_completion(completion);
        }
        match self
            .charts
            .iter_mut()
            .find(|slot| slot.region.id() == completion.region)
        {
            Some(slot) => slot.region.handle_completion(completion),
            None => false,
        }
    }

    /// Retries every failed region that still has retries left.
    pub fn retry_failed(&mut self) -> usize {
        let mut retried = usize::from(self.count.retry());
        for slot in &mut self.charts {
            retried += usize::from(slot.region.retry());
        }
        retried
    }

    /// True while any region waits for a response.
    pub fn is_loading(&self) -> bool {
        self.count_panel.is_loading() || self.charts.iter().any(|slot| slot.panel.is_loading())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::catalog::find_chart;
    use crate::network::{RequestResult, Transport};
    use crate::region::{PanelDisplay, RegionContent, RegionState};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    /// Answers counts with 200 and every chart with 204.
    struct SiteStub;

    #[async_trait::async_trait]
    impl Transport for SiteStub {
        async fn fetch(&self, url: &str, _query: &[(String, String)]) -> RequestResult {
            if url.ends_with("count.json") {
                RequestResult::new(200, r#"{"count": 5120}"#)
            } else {
                RequestResult::new(204, "")
            }
        }
    }

    #[tokio::test]
    async fn test_completions_are_routed_to_their_region() {
        let client = RequestClient::new(Arc::new(SiteStub), "http://site");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut results = ResultsArea::new(client, tx, EventSender::detached());

        results.refresh_count(QueryParams::new());
        let hops = find_chart("popular-hops").unwrap();
        assert!(results.add_chart(hops, QueryParams::new()));
        assert!(!results.add_chart(hops, QueryParams::new()));
        assert!(results.is_loading());

        for _ in 0..2 {
            let completion = rx.recv().await.unwrap();
            assert!(results.handle_completion(completion));
        }
        assert!(!results.is_loading());
        assert_eq!(
            results.count_panel().snapshot().display,
            PanelDisplay::Content(RegionContent::Count(5120))
        );
        assert_eq!(results.charts()[0].region().state(), RegionState::Empty);
        assert_eq!(
            results.charts()[0].panel.snapshot().display,
            PanelDisplay::NoData("Not enough data".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_chart() {
        let client = RequestClient::new(Arc::new(SiteStub), "http://site");
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut results = ResultsArea::new(client, tx, EventSender::detached());
        results.add_chart(find_chart("hop-pairings").unwrap(), QueryParams::new());
        assert!(results.remove_chart("hop-pairings"));
        assert!(!results.remove_chart("hop-pairings"));
        assert!(results.charts().is_empty());
    }
}
