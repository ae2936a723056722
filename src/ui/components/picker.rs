//! Picker popup
//!
//! A search box over grouped items with a cursor on the visible matches

use crate::search::{SearchBox, SearchItem};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Picker {
    pub title: String,
    /// Search category reported with site searches.
    pub category: String,
    pub search: SearchBox,
    cursor: usize,
}

impl Picker {
    pub fn new(title: impl Into<String>, category: impl Into<String>, search: SearchBox) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            search,
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let count = self.search.match_count();
        if count > 0 {
            self.cursor = (self.cursor + 1).min(count - 1);
        }
    }

    /// Item under the cursor.
    pub fn current(&self) -> Option<&SearchItem> {
        self.search.visible_items().get(self.cursor).copied()
    }

    pub fn push_char(&mut self, ch: char) {
        self.search.push_char(ch);
    }

    pub fn pop_char(&mut self) {
        self.search.pop_char();
    }

    /// Runs a debounced search. The cursor goes back to the first match.
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        let term = self.search.tick(now)?;
        self.cursor = 0;
        Some(term)
    }
}

/// Popup rectangle centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn render_picker<F>(f: &mut Frame, area: Rect, picker: &Picker, is_selected: F)
where
    F: Fn(&str) -> bool,
{
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}_", picker.search.input()),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(""),
    ];

    if picker.search.has_no_result() {
        lines.push(Line::from(Span::styled(
            "No matches",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let mut index = 0;
    let mut cursor_line = 0;
    for group in picker.search.groups().iter().filter(|g| g.is_matching()) {
        lines.push(Line::from(Span::styled(
            group.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for item in group.matching_items() {
            let mark = if is_selected(&item.key) { "[x]" } else { "[ ]" };
            let style = if index == picker.cursor {
                cursor_line = lines.len();
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("  {} {}", mark, item.label),
                style,
            )));
            index += 1;
        }
    }

    // Keep the cursor line in view
    let visible = popup.height.saturating_sub(2) as usize;
    let offset = cursor_line.saturating_sub(visible.saturating_sub(1));

    let block = Block::default()
        .title(format!("{} | [Enter] Toggle [Esc] Close", picker.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .scroll((offset as u16, 0)),
        popup,
    );
}
