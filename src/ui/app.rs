//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::events::Event as ActivityEvent;
use crate::region::Completion;
use crate::ui::analyzer::{AnalyzerScreen, render_analyzer};
use crate::ui::chart::{ChartScreen, render_chart};
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Frame, Terminal, backend::Backend};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// The different screens in the application.
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Faceted analysis with filters and charts.
    Analyzer(Box<AnalyzerScreen>),
    /// A single chart with tabs.
    Chart(Box<ChartScreen>),
}

impl Screen {
    fn handle_completion(&mut self, completion: Completion) {
        match self {
            Screen::Splash => {}
            Screen::Analyzer(screen) => {
                screen.handle_completion(completion);
            }
            Screen::Chart(screen) => {
                screen.handle_completion(completion);
            }
        }
    }

    fn update(&mut self, now: Instant) {
        match self {
            Screen::Splash => {}
            Screen::Analyzer(screen) => screen.update(now),
            Screen::Chart(screen) => screen.update(),
        }
    }

    fn is_capturing_input(&self) -> bool {
        match self {
            Screen::Analyzer(screen) => screen.is_capturing_input(),
            Screen::Splash | Screen::Chart(_) => false,
        }
    }
}

/// Application state
pub struct App {
    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Screen shown once the splash screen is done.
    main_screen: Option<Screen>,

    /// Receives activity events from regions and the analyzer.
    event_receiver: mpsc::Receiver<ActivityEvent>,

    /// Receives finished requests of every region.
    completion_receiver: mpsc::UnboundedReceiver<Completion>,

    /// Last events, oldest first.
    activity_logs: VecDeque<ActivityEvent>,

    /// Whether to paint the background
    with_background_color: bool,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        main_screen: Screen,
        event_receiver: mpsc::Receiver<ActivityEvent>,
        completion_receiver: mpsc::UnboundedReceiver<Completion>,
        with_background_color: bool,
    ) -> Self {
        Self {
            current_screen: Screen::Splash,
            main_screen: Some(main_screen),
            event_receiver,
            completion_receiver,
            activity_logs: VecDeque::with_capacity(MAX_ACTIVITY_LOGS),
            with_background_color,
        }
    }

    fn add_event(&mut self, event: ActivityEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    fn leave_splash(&mut self) {
        if let Some(screen) = self.main_screen.take() {
            self.current_screen = screen;
        }
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    // UI event loop
    loop {
        while let Ok(event) = app.event_receiver.try_recv() {
            app.add_event(event);
        }

        // Completions of the splash period are applied as soon as the main screen shows
        if !matches!(app.current_screen, Screen::Splash) {
            while let Ok(completion) = app.completion_receiver.try_recv() {
                app.current_screen.handle_completion(completion);
            }
        }

        app.current_screen.update(Instant::now());
        terminal.draw(|f| render(f, &app))?;

        if let Screen::Splash = app.current_screen {
            if splash_start.elapsed() >= splash_duration {
                app.leave_splash();
                continue;
            }
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                let capturing = app.current_screen.is_capturing_input();
                if !capturing && matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    return Ok(());
                }

                // Any key press skips the splash screen
                if let Screen::Splash = app.current_screen {
                    app.leave_splash();
                    continue;
                }

                match &mut app.current_screen {
                    Screen::Splash => {}
                    Screen::Analyzer(screen) => screen.handle_key(key),
                    Screen::Chart(screen) => screen.handle_key(key),
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, app: &App) {
    match &app.current_screen {
        Screen::Splash => render_splash(f),
        Screen::Analyzer(screen) => {
            render_analyzer(f, screen, &app.activity_logs, app.with_background_color)
        }
        Screen::Chart(screen) => {
            render_chart(f, screen, &app.activity_logs, app.with_background_color)
        }
    }
}
