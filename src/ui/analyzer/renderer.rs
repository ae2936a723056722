//! Analyzer screen renderer

use super::state::{AnalyzerScreen, FilterRow, Focus};
use crate::events::Event;
use crate::ui::components::{footer, header, logs, panel, picker};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use std::collections::VecDeque;

const FOOTER_HINTS: &str =
    "[Tab] Focus [←/→] Min [Shift+←/→] Max [Enter] Pick [⌫] Clear [A] Add chart [D] Remove [R] Retry";

pub fn render_analyzer(
    f: &mut Frame,
    screen: &AnalyzerScreen,
    activity_logs: &VecDeque<Event>,
    with_background_color: bool,
) {
    if with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(24, 18, 10))),
            f.area(),
        );
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(
        f,
        main_chunks[0],
        "CUSTOM ANALYSIS",
        screen.is_loading(),
        screen.tick,
    );

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[1]);

    render_filters(f, content_chunks[0], screen);
    render_results(f, content_chunks[1], screen);
    logs::render_logs_panel(f, main_chunks[2], activity_logs);
    footer::render_footer(f, main_chunks[3], FOOTER_HINTS);

    if let Some(open) = screen.picker() {
        let area = f.area();
        picker::render_picker(f, area, open, |key| screen.is_picker_selected(key));
    }
}

/// Text of one sidebar row.
fn filter_row_text(screen: &AnalyzerScreen, row: &FilterRow) -> (String, String) {
    let filters = screen.controller().state().filters();
    match row {
        FilterRow::Range(spec) => {
            let value = match (filters.range(spec.name), screen.range_values(spec.name)) {
                (Ok(range), Some((low, high))) => format!(
                    "{} - {}",
                    range.label(low, spec.factor),
                    range.label(high, spec.factor)
                ),
                _ => String::new(),
            };
            (spec.label.to_string(), value)
        }
        FilterRow::Set(name) => {
            let selected = filters.set(name).map(|set| set.selected()).unwrap_or(&[]);
            let value = if selected.is_empty() {
                "Any".to_string()
            } else {
                selected
                    .iter()
                    .map(|id| screen.entities().name_of(name, id).unwrap_or(id))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            (capitalize(name), value)
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_filters(f: &mut Frame, area: Rect, screen: &AnalyzerScreen) {
    let focused = screen.focus == Focus::Filters;
    let mut lines = Vec::new();
    for (index, row) in screen.rows().iter().enumerate() {
        let (label, value) = filter_row_text(screen, row);
        let marker = if focused && index == screen.filter_row {
            "▶ "
        } else {
            "  "
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Yellow)),
            Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", value),
            Style::default().fg(Color::White),
        )));
    }

    let border_color = if focused { Color::Yellow } else { Color::Cyan };
    let block = Block::default()
        .title("FILTERS")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_results(f: &mut Frame, area: Rect, screen: &AnalyzerScreen) {
    let Some(results) = screen.controller().results() else {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from("Set a filter or press [A] to add a chart."),
            Line::from("The analysis starts with your first choice."),
        ])
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .title("RESULTS")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
        f.render_widget(hint, area);
        return;
    };

    let charts = results.charts();
    let mut constraints = vec![Constraint::Length(3)];
    if charts.is_empty() {
        constraints.push(Constraint::Fill(1));
    } else {
        constraints.extend(charts.iter().map(|_| Constraint::Fill(1)));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    panel::render_panel(
        f,
        chunks[0],
        &results.count_panel().snapshot(),
        screen.tick,
        false,
    );

    if charts.is_empty() {
        let hint = Paragraph::new("No charts yet. Press [A] to add one.")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, chunks[1]);
        return;
    }

    let focused = screen.focus == Focus::Charts;
    for (index, slot) in charts.iter().enumerate() {
        panel::render_panel(
            f,
            chunks[index + 1],
            &slot.panel.snapshot(),
            screen.tick,
            focused && index == screen.chart_row,
        );
    }
}
