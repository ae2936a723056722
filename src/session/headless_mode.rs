//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown},
};
use crate::analyzer::AnalyzerController;
use crate::chart::ChartPage;
use crate::consts::cli_consts::session::{HEADLESS_WIDTH, headless_timeout};
use crate::print_cmd_warn;
use crate::recipes::RecipeListPage;
use crate::region::{Completion, Panel};
use crate::ui::panel_lines;
use std::error::Error;

/// What a headless command drives until everything has loaded.
pub trait HeadlessView {
    fn handle_completion(&mut self, completion: Completion) -> bool;
    fn is_loading(&self) -> bool;
    /// Retries failed regions with retries left. Returns how many were retried.
    fn retry_failed(&mut self) -> usize;
    fn panels(&self) -> Vec<Panel>;
}

impl HeadlessView for AnalyzerController {
    fn handle_completion(&mut self, completion: Completion) -> bool {
        AnalyzerController::handle_completion(self, completion)
    }

    fn is_loading(&self) -> bool {
        self.results().is_some_and(|results| results.is_loading())
    }

    fn retry_failed(&mut self) -> usize {
        AnalyzerController::retry_failed(self)
    }

    fn panels(&self) -> Vec<Panel> {
        let Some(results) = self.results() else {
            return Vec::new();
        };
        std::iter::once(results.count_panel().snapshot())
            .chain(results.charts().iter().map(|slot| slot.panel.snapshot()))
            .collect()
    }
}

impl HeadlessView for ChartPage {
    fn handle_completion(&mut self, completion: Completion) -> bool {
        ChartPage::handle_completion(self, completion)
    }

    fn is_loading(&self) -> bool {
        self.panel().is_loading()
    }

    fn retry_failed(&mut self) -> usize {
        usize::from(self.retry())
    }

    fn panels(&self) -> Vec<Panel> {
        vec![self.panel().snapshot()]
    }
}

impl HeadlessView for RecipeListPage {
    fn handle_completion(&mut self, completion: Completion) -> bool {
        RecipeListPage::handle_completion(self, completion)
    }

    fn is_loading(&self) -> bool {
        self.panel().is_loading()
    }

    fn retry_failed(&mut self) -> usize {
        usize::from(self.retry())
    }

    fn panels(&self) -> Vec<Panel> {
        vec![self.panel().snapshot()]
    }
}

/// Console rendition of a panel.
pub fn format_panel(panel: &Panel) -> String {
    let mut out = format!("== {} ==", panel.title);
    for line in panel_lines(panel, HEADLESS_WIDTH, 0) {
        out.push_str("\n  ");
        out.push_str(&line);
    }
    out
}

/// Runs the application in headless mode
///
/// This function handles:
/// 1. Console event logging
/// 2. Ctrl+C shutdown handling
/// 3. Retrying failed regions while retries are left
/// 4. Printing every panel once loading has settled
pub async fn run_headless_mode<V: HeadlessView>(
    mut session: SessionData,
    mut view: V,
) -> Result<(), Box<dyn Error>> {
    let deadline = tokio::time::sleep(headless_timeout());
    tokio::pin!(deadline);

    // Event loop: log events to console until every region settled
    loop {
        if !view.is_loading() && view.retry_failed() == 0 {
            break;
        }
        tokio::select! {
            Some(completion) = session.completion_receiver.recv() => {
                view.handle_completion(completion);
            }
            Some(event) = session.event_receiver.recv() => {
                if event.should_display() {
                    println!("{}", event);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                print_session_shutdown();
                break;
            }
            _ = &mut deadline => {
                print_cmd_warn!(
                    "Timeout",
                    "Gave up waiting after {}s",
                    headless_timeout().as_secs()
                );
                break;
            }
        }
    }

    while let Ok(event) = session.event_receiver.try_recv() {
        if event.should_display() {
            println!("{}", event);
        }
    }
    for panel in view.panels() {
        println!("{}", format_panel(&panel));
    }

    session.background.shutdown().await;
    print_session_exit_success();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{PanelDisplay, RegionContent};

    #[test]
    fn test_format_panel() {
        let panel = Panel {
            title: "Matching recipes".to_string(),
            loading: false,
            display: PanelDisplay::Content(RegionContent::Count(48213)),
        };
        assert_eq!(format_panel(&panel), "== Matching recipes ==\n  48,213");
    }
}
