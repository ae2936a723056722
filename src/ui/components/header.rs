//! Header component
//!
//! Renders the title and the loading gauge

use crate::ui::utils::spinner;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

/// Render header with title and an animated gauge while anything loads.
pub fn render_header(f: &mut Frame, area: Rect, title: &str, loading: bool, tick: usize) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let title = Paragraph::new(format!(
        "BEER ANALYTICS v{} | {}",
        env!("CARGO_PKG_VERSION"),
        title
    ))
    .alignment(Alignment::Center)
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Thick),
    );
    f.render_widget(title, header_chunks[0]);

    let (label, color, percent) = if loading {
        // Loops every 20 ticks
        let progress = ((tick % 20) as f64 / 20.0 * 100.0) as u16;
        (format!("LOADING {}", spinner(tick)), Color::LightYellow, progress)
    } else {
        ("READY".to_string(), Color::LightGreen, 100)
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .percent(percent)
        .label(label);
    f.render_widget(gauge, header_chunks[1]);
}
