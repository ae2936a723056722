//! Analyzer screen state
//!
//! Translates key presses into controller calls. Slider moves are debounced
//! so dragging a handle across the domain loads the results only once.

use crate::analytics::{TelemetrySink, TrackingEvent};
use crate::analyzer::catalog::{RangeSpec, chart_search_box};
use crate::analyzer::{AnalyzerController, Entities, RANGES, SET_FILTERS};
use crate::consts::cli_consts::debounce;
use crate::debounce::Debouncer;
use crate::events::{EventSender, EventType, Source};
use crate::filters::FilterError;
use crate::logging::LogLevel;
use crate::region::Completion;
use crate::ui::components::picker::Picker;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Instant;

const CHARTS_CATEGORY: &str = "charts";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Focus {
    Filters,
    Charts,
}

/// One line of the filter sidebar.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FilterRow {
    Range(&'static RangeSpec),
    Set(&'static str),
}

impl FilterRow {
    pub fn all() -> Vec<FilterRow> {
        RANGES
            .iter()
            .map(FilterRow::Range)
            .chain(SET_FILTERS.iter().map(|name| FilterRow::Set(*name)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PickerTarget {
    Filter(&'static str),
    Charts,
}

/// Slider position waiting for the quiet interval.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct SliderDraft {
    name: &'static str,
    low: i64,
    high: i64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Handle {
    Low,
    High,
}

pub struct AnalyzerScreen {
    controller: AnalyzerController,
    entities: Entities,
    telemetry: Arc<dyn TelemetrySink>,
    events: EventSender,
    rows: Vec<FilterRow>,
    pub focus: Focus,
    pub filter_row: usize,
    pub chart_row: usize,
    slider: Debouncer<SliderDraft>,
    picker: Option<(PickerTarget, Picker)>,
    pub tick: usize,
}

impl AnalyzerScreen {
    pub fn new(
        controller: AnalyzerController,
        entities: Entities,
        telemetry: Arc<dyn TelemetrySink>,
        events: EventSender,
    ) -> Self {
        Self {
            controller,
            entities,
            telemetry,
            events,
            rows: FilterRow::all(),
            focus: Focus::Filters,
            filter_row: 0,
            chart_row: 0,
            slider: Debouncer::new(debounce::slider_quiet()),
            picker: None,
            tick: 0,
        }
    }

    pub fn controller(&self) -> &AnalyzerController {
        &self.controller
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn rows(&self) -> &[FilterRow] {
        &self.rows
    }

    pub fn picker(&self) -> Option<&Picker> {
        self.picker.as_ref().map(|(_, picker)| picker)
    }

    /// Whether keys go to a text input rather than to the screen.
    pub fn is_capturing_input(&self) -> bool {
        self.picker.is_some()
    }

    pub fn is_picker_selected(&self, key: &str) -> bool {
        match self.picker.as_ref().map(|(target, _)| target) {
            Some(PickerTarget::Filter(name)) => self
                .controller
                .state()
                .filters()
                .set(name)
                .is_ok_and(|set| set.is_selected(key)),
            Some(PickerTarget::Charts) => self.controller.state().charts().is_selected(key),
            None => false,
        }
    }

    /// Values a range row shows: the pending slider position, if any.
    pub fn range_values(&self, name: &str) -> Option<(i64, i64)> {
        if let Some(draft) = self.slider.pending().filter(|d| d.name == name) {
            return Some((draft.low, draft.high));
        }
        self.controller
            .state()
            .filters()
            .range(name)
            .ok()
            .map(|range| range.values())
    }

    pub fn handle_completion(&mut self, completion: Completion) -> bool {
        self.controller.handle_completion(completion)
    }

    pub fn is_loading(&self) -> bool {
        self.controller.results().is_some_and(|r| r.is_loading())
    }

    /// Advances animations and applies debounced input.
    pub fn update(&mut self, now: Instant) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(draft) = self.slider.take_ready(now) {
            self.apply_slider(draft);
        }
        if let Some((_, picker)) = &mut self.picker {
            if let Some(term) = picker.tick(now) {
                if !term.is_empty() {
                    self.telemetry.push(TrackingEvent::site_search(
                        &term,
                        &picker.category,
                        picker.search.match_count(),
                    ));
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.picker.is_some() {
            self.handle_picker_key(key);
            return;
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Filters => Focus::Charts,
                    Focus::Charts => Focus::Filters,
                };
            }
            KeyCode::Char('a') => self.open_chart_picker(),
            KeyCode::Char('r') => {
                self.controller.retry_failed();
            }
            _ => match self.focus {
                Focus::Filters => self.handle_filter_key(key),
                Focus::Charts => self.handle_chart_key(key),
            },
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        let Some(row) = self.rows.get(self.filter_row).copied() else {
            return;
        };
        let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
        match (key.code, row) {
            (KeyCode::Up, _) => self.filter_row = self.filter_row.saturating_sub(1),
            (KeyCode::Down, _) => {
                self.filter_row = (self.filter_row + 1).min(self.rows.len().saturating_sub(1))
            }
            (KeyCode::Left, FilterRow::Range(spec)) => {
                let handle = if shifted { Handle::High } else { Handle::Low };
                self.move_slider(spec, handle, -1);
            }
            (KeyCode::Right, FilterRow::Range(spec)) => {
                let handle = if shifted { Handle::High } else { Handle::Low };
                self.move_slider(spec, handle, 1);
            }
            (KeyCode::Backspace | KeyCode::Delete, FilterRow::Range(spec)) => {
                self.slider.cancel();
                let result = self.controller.set_range(spec.name, spec.min, spec.max);
                self.report(result);
            }
            (KeyCode::Backspace | KeyCode::Delete, FilterRow::Set(name)) => {
                let result = self.controller.set_selection(name, Vec::<String>::new());
                self.report(result);
            }
            (KeyCode::Enter, FilterRow::Set(name)) => {
                let search = self.entities.search_box(name);
                self.picker = Some((PickerTarget::Filter(name), Picker::new(name, name, search)));
            }
            _ => {}
        }
    }

    fn handle_chart_key(&mut self, key: KeyEvent) {
        let count = self.controller.state().charts().selected().len();
        match key.code {
            KeyCode::Up => self.chart_row = self.chart_row.saturating_sub(1),
            KeyCode::Down => self.chart_row = (self.chart_row + 1).min(count.saturating_sub(1)),
            KeyCode::Char('d') | KeyCode::Delete => {
                let id = self
                    .controller
                    .state()
                    .charts()
                    .selected()
                    .get(self.chart_row)
                    .cloned();
                if let Some(id) = id {
                    self.controller.remove_chart(&id);
                    self.chart_row = self.chart_row.min(count.saturating_sub(2));
                }
            }
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Some((target, picker)) = &mut self.picker else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.picker = None,
            KeyCode::Up => picker.move_up(),
            KeyCode::Down => picker.move_down(),
            KeyCode::Backspace => picker.pop_char(),
            KeyCode::Char(ch) => picker.push_char(ch),
            KeyCode::Enter => {
                let Some(item) = picker.current().map(|item| item.key.clone()) else {
                    return;
                };
                match target.clone() {
                    PickerTarget::Filter(name) => {
                        let result = self.controller.toggle_selection(name, &item);
                        self.report(result);
                    }
                    PickerTarget::Charts => {
                        if self.controller.state().charts().is_selected(&item) {
                            self.controller.remove_chart(&item);
                        } else {
                            self.controller.add_chart(&item);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn open_chart_picker(&mut self) {
        self.picker = Some((
            PickerTarget::Charts,
            Picker::new("Add charts", CHARTS_CATEGORY, chart_search_box()),
        ));
    }

    fn move_slider(&mut self, spec: &'static RangeSpec, handle: Handle, direction: i64) {
        // A draft of another slider is committed before this one starts
        if let Some(other) = self.slider.pending().copied().filter(|d| d.name != spec.name) {
            self.slider.cancel();
            self.apply_slider(other);
        }
        let Ok(range) = self.controller.state().filters().range(spec.name) else {
            return;
        };
        let (step, min, max) = (range.step(), range.min(), range.max());
        let Some((low, high)) = self.range_values(spec.name) else {
            return;
        };
        let delta = step * direction;
        let (low, high) = match handle {
            Handle::Low => ((low + delta).clamp(min, high), high),
            Handle::High => (low, (high + delta).clamp(low, max)),
        };
        self.slider.push(SliderDraft {
            name: spec.name,
            low,
            high,
        });
    }

    fn apply_slider(&mut self, draft: SliderDraft) {
        let result = self.controller.set_range(draft.name, draft.low, draft.high);
        self.report(result);
    }

    fn report(&self, result: Result<bool, FilterError>) {
        if let Err(e) = result {
            self.events.send(
                Source::Analyzer,
                e.to_string(),
                EventType::Error,
                LogLevel::Warn,
            );
        }
    }
}
