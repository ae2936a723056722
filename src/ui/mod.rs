// Module declarations
mod analyzer;
mod app;
mod chart;
mod components;
pub mod splash;
mod utils;
// Re-exports for external use
pub use analyzer::AnalyzerScreen;
pub use app::{App, Screen, run};
pub use chart::ChartScreen;
pub use components::panel::panel_lines;
