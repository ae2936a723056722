//! Multi-select filter over a fixed set of keys

use std::collections::HashSet;

/// Selected keys, always a deduplicated subset of `allowed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetFilter {
    allowed: Vec<String>,
    selected: Vec<String>,
}

impl SetFilter {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            selected: Vec::new(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_allowed(&self, value: &str) -> bool {
        self.allowed.iter().any(|a| a == value)
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|s| s == value)
    }

    /// Replaces the selection with `values ∩ allowed`, keeping first
    /// occurrences in input order. Returns whether the selected set changed;
    /// an equal set keeps its stored order.
    pub fn set_selection<I, S>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut next: Vec<String> = Vec::new();
        for value in values {
            let value = value.as_ref();
            if self.is_allowed(value) && !next.iter().any(|n| n == value) {
                next.push(value.to_string());
            }
        }

        let before: HashSet<&str> = self.selected.iter().map(String::as_str).collect();
        let after: HashSet<&str> = next.iter().map(String::as_str).collect();
        let changed = before != after;
        if changed {
            self.selected = next;
        }
        changed
    }

    /// Appends one allowed key. Returns false if it was already selected or unknown.
    pub fn add(&mut self, value: &str) -> bool {
        if !self.is_allowed(value) || self.is_selected(value) {
            return false;
        }
        self.selected.push(value.to_string());
        true
    }

    pub fn remove(&mut self, value: &str) -> bool {
        match self.selected.iter().position(|s| s == value) {
            Some(index) => {
                self.selected.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, value: &str) -> bool {
        if self.is_selected(value) {
            self.remove(value)
        } else {
            self.add(value)
        }
    }

    /// Applies a comma-joined query value; a missing value clears the selection.
    pub fn set_from_query(&mut self, value: Option<&str>) -> bool {
        match value {
            Some(value) => self.set_selection(value.split(',').map(str::trim)),
            None => self.set_selection(std::iter::empty::<&str>()),
        }
    }

    pub fn to_query_value(&self) -> String {
        self.selected.join(",")
    }
}
