//! Standalone chart with optional navigation tabs.

use crate::analytics::{Interaction, TelemetrySink};
use crate::events::{EventSender, Source};
use crate::network::{QueryParams, RequestClient};
use crate::region::{
    ChartOptions, Completion, CompletionSender, LoadableRegion, PanelHandle, RegionKind,
};
use std::str::FromStr;
use std::sync::Arc;

const SELECT_TAB_INTERACTION: &str = "chart:select-tab:$label";

/// A tab re-loading the chart with its `filter`. An empty filter shows the
/// unfiltered chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTab {
    pub label: String,
    pub filter: String,
}

impl ChartTab {
    pub fn new(label: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            filter: filter.into(),
        }
    }

    pub fn query(&self) -> QueryParams {
        if self.filter.is_empty() {
            QueryParams::new()
        } else {
            QueryParams::new().with("filter", self.filter.as_str())
        }
    }
}

impl FromStr for ChartTab {
    type Err = String;

    /// Parses `LABEL=FILTER`; a bare label gets an empty filter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, filter) = s.split_once('=').unwrap_or((s, ""));
        let label = label.trim();
        if label.is_empty() {
            return Err(format!("Tab \"{}\" has no label", s));
        }
        Ok(Self::new(label, filter.trim()))
    }
}

pub struct ChartPage {
    region: LoadableRegion,
    panel: PanelHandle,
    options: ChartOptions,
    tabs: Vec<ChartTab>,
    selected: usize,
    telemetry: Arc<dyn TelemetrySink>,
}

impl ChartPage {
    pub fn new(
        path: &str,
        options: ChartOptions,
        tabs: Vec<ChartTab>,
        client: RequestClient,
        completions: CompletionSender,
        events: EventSender,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        let panel = PanelHandle::new(path);
        let region = LoadableRegion::new(
            Source::Chart(path.to_string()),
            path,
            RegionKind::Chart(options.clone()),
            client,
            Box::new(panel.clone()),
            completions,
            events,
        );
        Self {
            region,
            panel,
            options,
            tabs,
            selected: 0,
            telemetry,
        }
    }

    pub fn panel(&self) -> &PanelHandle {
        &self.panel
    }

    pub fn region(&self) -> &LoadableRegion {
        &self.region
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn tabs(&self) -> &[ChartTab] {
        &self.tabs
    }

    pub fn selected_tab(&self) -> Option<&ChartTab> {
        self.tabs.get(self.selected)
    }

    /// First load: the chart without any filter.
    pub fn load(&mut self) {
        self.region.load(QueryParams::new());
    }

    pub fn select_tab(&mut self, index: usize) -> bool {
        let Some(tab) = self.tabs.get(index) else {
            return false;
        };
        self.selected = index;
        let query = tab.query();
        if let Some(interaction) = Interaction::parse(SELECT_TAB_INTERACTION) {
            self.telemetry.push(interaction.event(&tab.label));
        }
        self.region.load(query);
        true
    }

    pub fn next_tab(&mut self) -> bool {
        if self.tabs.is_empty() {
            return false;
        }
        self.select_tab((self.selected + 1) % self.tabs.len())
    }

    pub fn previous_tab(&mut self) -> bool {
        if self.tabs.is_empty() {
            return false;
        }
        self.select_tab((self.selected + self.tabs.len() - 1) % self.tabs.len())
    }

    pub fn retry(&mut self) -> bool {
        self.region.retry()
    }

    pub fn handle_completion(&mut self, completion: Completion) -> bool {
        self.region.handle_completion(completion)
    }
}
