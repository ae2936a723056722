//! Rendering hooks of a region, and the shared panel the terminal UI draws.

use super::content::RegionContent;
use std::sync::{Arc, Mutex, MutexGuard};

#[cfg(test)]
use mockall::automock;

/// Callbacks a region drives. Each load shows the loading indicator first and
/// then exactly one of the other three.
#[cfg_attr(test, automock)]
pub trait RegionView: Send {
    fn show_loading(&mut self);
    fn show_content(&mut self, content: &RegionContent);
    fn show_no_data(&mut self, text: &str);
    fn show_failed(&mut self, text: &str, retry_available: bool);
}

/// What a panel currently displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PanelDisplay {
    #[default]
    Blank,
    Content(RegionContent),
    NoData(String),
    Failed {
        text: String,
        retry_available: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panel {
    pub title: String,
    pub loading: bool,
    pub display: PanelDisplay,
}

/// Cloneable handle on a [`Panel`]. Regions write through it, the renderer
/// reads snapshots.
#[derive(Debug, Clone, Default)]
pub struct PanelHandle(Arc<Mutex<Panel>>);

impl PanelHandle {
    pub fn new(title: impl Into<String>) -> Self {
        Self(Arc::new(Mutex::new(Panel {
            title: title.into(),
            ..Panel::default()
        })))
    }

    fn lock(&self) -> MutexGuard<'_, Panel> {
        // A panic mid-write leaves a panel that is still safe to draw
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> Panel {
        self.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }
}

impl RegionView for PanelHandle {
    fn show_loading(&mut self) {
        let mut panel = self.lock();
        panel.loading = true;
        panel.display = PanelDisplay::Blank;
    }

    fn show_content(&mut self, content: &RegionContent) {
        let mut panel = self.lock();
        panel.loading = false;
        panel.display = PanelDisplay::Content(content.clone());
    }

    fn show_no_data(&mut self, text: &str) {
        let mut panel = self.lock();
        panel.loading = false;
        panel.display = PanelDisplay::NoData(text.to_string());
    }

    fn show_failed(&mut self, text: &str, retry_available: bool) {
        let mut panel = self.lock();
        panel.loading = false;
        panel.display = PanelDisplay::Failed {
            text: text.to_string(),
            retry_available,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_transitions() {
        let handle = PanelHandle::new("Hops");
        let mut view = handle.clone();

        view.show_loading();
        assert!(handle.is_loading());
        assert_eq!(handle.snapshot().display, PanelDisplay::Blank);

        view.show_content(&RegionContent::Count(7));
        let panel = handle.snapshot();
        assert!(!panel.loading);
        assert_eq!(panel.title, "Hops");
        assert_eq!(panel.display, PanelDisplay::Content(RegionContent::Count(7)));

        view.show_loading();
        view.show_failed("Failed loading data", true);
        assert_eq!(
            handle.snapshot().display,
            PanelDisplay::Failed {
                text: "Failed loading data".to_string(),
                retry_available: true
            }
        );
    }
}
