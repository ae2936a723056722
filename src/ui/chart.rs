//! Chart screen
//!
//! A single chart with its navigation tabs

use crate::chart::ChartPage;
use crate::events::Event;
use crate::region::Completion;
use crate::ui::components::{footer, header, logs, panel};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Tabs};
use std::collections::VecDeque;

pub struct ChartScreen {
    page: ChartPage,
    pub tick: usize,
}

impl ChartScreen {
    pub fn new(page: ChartPage) -> Self {
        Self { page, tick: 0 }
    }

    pub fn page(&self) -> &ChartPage {
        &self.page
    }

    pub fn update(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn handle_completion(&mut self, completion: Completion) -> bool {
        self.page.handle_completion(completion)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Right | KeyCode::Tab => {
                self.page.next_tab();
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.page.previous_tab();
            }
            KeyCode::Char('r') => {
                self.page.retry();
            }
            KeyCode::Char(ch) => {
                if let Some(index) = ch.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                    self.page.select_tab(index);
                }
            }
            _ => {}
        }
    }
}

pub fn render_chart(
    f: &mut Frame,
    screen: &ChartScreen,
    activity_logs: &VecDeque<Event>,
    with_background_color: bool,
) {
    if with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(24, 18, 10))),
            f.area(),
        );
    }

    let tabs = screen.page.tabs();
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(if tabs.is_empty() { 0 } else { 3 }),
            Constraint::Fill(1),
            Constraint::Length(6),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    let chart_panel = screen.page.panel().snapshot();
    header::render_header(
        f,
        main_chunks[0],
        &chart_panel.title,
        chart_panel.loading,
        screen.tick,
    );

    if !tabs.is_empty() {
        let selected = screen
            .page
            .selected_tab()
            .and_then(|current| tabs.iter().position(|tab| tab == current))
            .unwrap_or(0);
        let widget = Tabs::new(tabs.iter().map(|tab| tab.label.clone()))
            .select(selected)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(widget, main_chunks[1]);
    }

    panel::render_panel(f, main_chunks[2], &chart_panel, screen.tick, false);
    logs::render_logs_panel(f, main_chunks[3], activity_logs);
    footer::render_footer(f, main_chunks[4], "[←/→] Tab [1-9] Jump [R] Retry");
}
