//! Region panel component
//!
//! Draws whatever a region's panel currently displays

use crate::region::content::{fragment_text, format_count};
use crate::region::{Panel, PanelDisplay, RegionContent};
use crate::ui::utils::{bar_lines, spinner};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

const LABEL_WIDTH: usize = 24;

/// Text lines of a panel for the given inner width.
pub fn panel_lines(panel: &Panel, width: usize, tick: usize) -> Vec<String> {
    if panel.loading {
        return vec![format!("{} Loading...", spinner(tick))];
    }
    match &panel.display {
        PanelDisplay::Blank => Vec::new(),
        PanelDisplay::NoData(text) => vec![text.clone()],
        PanelDisplay::Failed {
            text,
            retry_available,
        } => {
            let mut lines = vec![text.clone()];
            if *retry_available {
                lines.push("[R] Retry".to_string());
            }
            lines
        }
        PanelDisplay::Content(content) => content_lines(content, width),
    }
}

fn content_lines(content: &RegionContent, width: usize) -> Vec<String> {
    match content {
        RegionContent::Count(count) => vec![format_count(*count)],
        RegionContent::Fragment(html) => fragment_text(html),
        RegionContent::Recipes(recipes) => recipes.iter().map(|r| r.display_line()).collect(),
        RegionContent::Plot(spec) => {
            let series = spec.series();
            let mut lines = Vec::new();
            if let Some(title) = spec.title() {
                lines.push(title);
            }
            let named = series.len() > 1;
            for s in &series {
                if named {
                    lines.push(format!("{}:", s.name));
                }
                lines.extend(bar_lines(s, width, LABEL_WIDTH));
            }
            lines
        }
    }
}

/// Render a bordered panel. The highlighted panel gets a yellow border.
pub fn render_panel(f: &mut Frame, area: Rect, panel: &Panel, tick: usize, highlighted: bool) {
    let width = area.width.saturating_sub(2) as usize;
    let color = match panel.display {
        PanelDisplay::Failed { .. } if !panel.loading => Color::LightRed,
        _ => Color::White,
    };
    let lines: Vec<Line> = panel_lines(panel, width, tick)
        .into_iter()
        .map(Line::from)
        .collect();

    let border_color = if highlighted {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .title(panel.title.clone())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title_style(Style::default().add_modifier(Modifier::BOLD));

    f.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(color))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}
