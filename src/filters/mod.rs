//! Filter state
//!
//! An ordered set of named range and multi-select filters. Every effective
//! mutation is broadcast once to all subscribers as a [`StateChange`].

pub mod range;
pub mod set;

pub use range::RangeFilter;
pub use set::SetFilter;

use crate::network::QueryParams;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Filter {name} is not a {expected} filter")]
    KindMismatch { name: String, expected: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Range(RangeFilter),
    Set(SetFilter),
}

impl FilterValue {
    fn set_from_query(&mut self, value: Option<&str>) -> bool {
        match self {
            FilterValue::Range(range) => range.set_from_query(value),
            FilterValue::Set(set) => set.set_from_query(value),
        }
    }

    fn to_query_value(&self) -> String {
        match self {
            FilterValue::Range(range) => range.to_query_value(),
            FilterValue::Set(set) => set.to_query_value(),
        }
    }
}

/// What kind of state changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// A filter changed; every displayed region has to refresh.
    Filters,
    /// Only the displayed chart selection changed.
    Charts,
}

/// Fan-out of state changes to any number of listeners.
#[derive(Debug, Default)]
pub struct Notifier {
    subscribers: Vec<mpsc::UnboundedSender<StateChange>>,
}

impl Notifier {
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StateChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn notify(&mut self, change: StateChange) {
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }
}

#[derive(Debug, Default)]
pub struct FilterState {
    filters: Vec<(String, FilterValue)>,
    notifier: Notifier,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, name: &str, min: i64, max: i64, step: i64) -> Self {
        self.insert(name, FilterValue::Range(RangeFilter::new(min, max, step)));
        self
    }

    pub fn with_set<I, S>(mut self, name: &str, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, FilterValue::Set(SetFilter::new(allowed)));
        self
    }

    fn insert(&mut self, name: &str, value: FilterValue) {
        match self.filters.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.filters.push((name.to_string(), value)),
        }
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StateChange> {
        self.notifier.subscribe()
    }

    /// Broadcasts a change on behalf of state layered on top of the filters.
    pub fn notify(&mut self, change: StateChange) {
        self.notifier.notify(change);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.filters.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.filters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut FilterValue, FilterError> {
        self.filters
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
            .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))
    }

    pub fn range(&self, name: &str) -> Result<&RangeFilter, FilterError> {
        match self.get(name) {
            Some(FilterValue::Range(range)) => Ok(range),
            Some(_) => Err(kind_mismatch(name, "range")),
            None => Err(FilterError::UnknownFilter(name.to_string())),
        }
    }

    pub fn set(&self, name: &str) -> Result<&SetFilter, FilterError> {
        match self.get(name) {
            Some(FilterValue::Set(set)) => Ok(set),
            Some(_) => Err(kind_mismatch(name, "set")),
            None => Err(FilterError::UnknownFilter(name.to_string())),
        }
    }

    fn range_mut(&mut self, name: &str) -> Result<&mut RangeFilter, FilterError> {
        match self.get_mut(name)? {
            FilterValue::Range(range) => Ok(range),
            FilterValue::Set(_) => Err(kind_mismatch(name, "range")),
        }
    }

    fn set_mut(&mut self, name: &str) -> Result<&mut SetFilter, FilterError> {
        match self.get_mut(name)? {
            FilterValue::Set(set) => Ok(set),
            FilterValue::Range(_) => Err(kind_mismatch(name, "set")),
        }
    }

    /// Clamps and stores a range; notifies when the stored pair changed.
    pub fn set_range(&mut self, name: &str, low: i64, high: i64) -> Result<bool, FilterError> {
        let changed = self.range_mut(name)?.set(low, high);
        self.notify_if(changed);
        Ok(changed)
    }

    /// Replaces a selection; notifies when the selected set changed.
    pub fn set_selection<I, S>(&mut self, name: &str, values: I) -> Result<bool, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let changed = self.set_mut(name)?.set_selection(values);
        self.notify_if(changed);
        Ok(changed)
    }

    pub fn toggle_selection(&mut self, name: &str, value: &str) -> Result<bool, FilterError> {
        let changed = self.set_mut(name)?.toggle(value);
        self.notify_if(changed);
        Ok(changed)
    }

    /// Loads every filter from a query. Filters absent from it return to
    /// their defaults. Listeners hear about it once, if anything changed.
    pub fn load_from_query(&mut self, params: &QueryParams) -> bool {
        let mut changed = false;
        for (name, value) in self.filters.iter_mut() {
            changed |= value.set_from_query(params.get(name));
        }
        self.notify_if(changed);
        changed
    }

    /// Writes every filter, default or not.
    pub fn write_query(&self, params: &mut QueryParams) {
        for (name, value) in &self.filters {
            params.set(name, value.to_query_value());
        }
    }

    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.write_query(&mut params);
        params
    }

    fn notify_if(&mut self, changed: bool) {
        if changed {
            self.notifier.notify(StateChange::Filters);
        }
    }
}

fn kind_mismatch(name: &str, expected: &'static str) -> FilterError {
    FilterError::KindMismatch {
        name: name.to_string(),
        expected,
    }
}
