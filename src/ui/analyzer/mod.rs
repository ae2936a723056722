//! Analyzer screen
//!
//! Filter sidebar, recipe counter and chart panels

mod renderer;
mod state;

pub use renderer::render_analyzer;
pub use state::{AnalyzerScreen, FilterRow, Focus};
