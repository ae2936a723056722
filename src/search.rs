//! Search boxes over grouped item lists (chart catalogue, entity pickers).

use crate::consts::cli_consts::debounce;
use crate::debounce::Debouncer;
use std::time::Instant;

/// A searchable entry. The term is stored trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchItem {
    pub key: String,
    pub label: String,
    term: String,
    matching: bool,
}

impl SearchItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>, term: &str) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            term: term.trim().to_lowercase(),
            matching: true,
        }
    }

    pub fn is_matching(&self) -> bool {
        self.matching
    }

    fn apply(&mut self, term: &str) {
        self.matching = self.term.contains(term);
    }
}

/// Items under a common heading. A group matches when any of its items does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchGroup {
    pub title: String,
    pub items: Vec<SearchItem>,
}

impl SearchGroup {
    pub fn new(title: impl Into<String>, items: Vec<SearchItem>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    pub fn is_matching(&self) -> bool {
        self.items.iter().any(SearchItem::is_matching)
    }

    pub fn matching_items(&self) -> impl Iterator<Item = &SearchItem> {
        self.items.iter().filter(|item| item.is_matching())
    }
}

#[derive(Debug, Clone)]
pub struct SearchBox {
    groups: Vec<SearchGroup>,
    input: String,
    term: String,
    debouncer: Debouncer<String>,
}

impl SearchBox {
    pub fn new(groups: Vec<SearchGroup>) -> Self {
        let mut search = Self {
            groups,
            input: String::new(),
            term: String::new(),
            debouncer: Debouncer::new(debounce::search_quiet()),
        };
        search.search("");
        search
    }

    /// Raw text in the input field, before debouncing.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Term currently applied to the items.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn groups(&self) -> &[SearchGroup] {
        &self.groups
    }

    pub fn push_char(&mut self, ch: char) {
        self.input.push(ch);
        self.debouncer.push(self.input.clone());
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
        self.debouncer.push(self.input.clone());
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.debouncer.cancel();
        self.search("");
    }

    /// Applies debounced input once it has been quiet long enough.
    /// Returns the applied term when a search ran.
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        let input = self.debouncer.take_ready(now)?;
        self.search(&input);
        Some(self.term.clone())
    }

    /// Applies a search term immediately.
    pub fn search(&mut self, input: &str) {
        self.term = input.trim().to_lowercase();
        for group in &mut self.groups {
            for item in &mut group.items {
                item.apply(&self.term);
            }
        }
    }

    /// A non-empty term narrows the list.
    pub fn is_filtered(&self) -> bool {
        !self.term.is_empty()
    }

    pub fn has_no_result(&self) -> bool {
        !self.groups.iter().any(SearchGroup::is_matching)
    }

    pub fn match_count(&self) -> usize {
        self.groups.iter().map(|g| g.matching_items().count()).sum()
    }

    /// Matching items in display order.
    pub fn visible_items(&self) -> Vec<&SearchItem> {
        self.groups
            .iter()
            .flat_map(SearchGroup::matching_items)
            .collect()
    }
}
