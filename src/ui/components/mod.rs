//! UI component modules
//!
//! Rendering pieces shared by the analyzer and chart screens

pub mod footer;
pub mod header;
pub mod logs;
pub mod panel;
pub mod picker;
