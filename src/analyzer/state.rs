//! Analyzer state: the filters plus the set of displayed charts.

use super::catalog::{self, Entities};
use crate::filters::{FilterError, FilterState, SetFilter, StateChange};
use crate::network::QueryParams;
use tokio::sync::mpsc;

/// Query key of the chart selection.
pub const CHARTS_KEY: &str = "charts";

#[derive(Debug)]
pub struct AnalyzerState {
    filters: FilterState,
    charts: SetFilter,
}

impl AnalyzerState {
    pub fn new(entities: &Entities) -> Self {
        let mut filters = FilterState::new();
        for name in catalog::SET_FILTERS {
            filters = filters.with_set(name, entities.ids(name));
        }
        for range in catalog::RANGES {
            filters = filters.with_range(range.name, range.min, range.max, range.step);
        }
        Self {
            filters,
            charts: SetFilter::new(catalog::chart_ids()),
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn charts(&self) -> &SetFilter {
        &self.charts
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StateChange> {
        self.filters.subscribe()
    }

    pub fn set_range(&mut self, name: &str, low: i64, high: i64) -> Result<bool, FilterError> {
        self.filters.set_range(name, low, high)
    }

    pub fn set_selection<I, S>(&mut self, name: &str, values: I) -> Result<bool, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filters.set_selection(name, values)
    }

    pub fn toggle_selection(&mut self, name: &str, value: &str) -> Result<bool, FilterError> {
        self.filters.toggle_selection(name, value)
    }

    pub fn add_chart(&mut self, id: &str) -> bool {
        let changed = self.charts.add(id);
        self.notify_charts(changed);
        changed
    }

    pub fn remove_chart(&mut self, id: &str) -> bool {
        let changed = self.charts.remove(id);
        self.notify_charts(changed);
        changed
    }

    /// Restores filters and charts from a query.
    pub fn load_from_query(&mut self, params: &QueryParams) -> bool {
        let filters_changed = self.filters.load_from_query(params);
        let charts_changed = self.charts.set_from_query(params.get(CHARTS_KEY));
        self.notify_charts(charts_changed);
        filters_changed || charts_changed
    }

    /// Query sent to chart endpoints.
    pub fn filter_query(&self) -> QueryParams {
        self.filters.to_query()
    }

    /// Query of the complete state, as persisted and sent to the counter.
    pub fn full_query(&self) -> QueryParams {
        let mut params = self.filters.to_query();
        params.set(CHARTS_KEY, self.charts.to_query_value());
        params
    }

    fn notify_charts(&mut self, changed: bool) {
        if changed {
            self.filters.notify(StateChange::Charts);
        }
    }
}
