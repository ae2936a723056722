//! UI utility functions
//!
//! Helpers shared by the analyzer and chart screens

use crate::events::Source;
use crate::region::content::Series;
use ratatui::prelude::Color;

/// Get a ratatui color for an event source
pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::Chart(_) => Color::Cyan,
        Source::Recipes => Color::LightMagenta,
        Source::RecipeCount => Color::Yellow,
        Source::Analyzer => Color::Green,
        Source::Search => Color::LightBlue,
        Source::Telemetry => Color::DarkGray,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    if let Some((date_part, time_part)) = timestamp.split_once(' ') {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

/// Horizontal bar rows for one series, scaled to the largest value.
/// Labels are padded to a common width and truncated to `label_width`.
pub fn bar_lines(series: &Series, width: usize, label_width: usize) -> Vec<String> {
    let longest = series
        .points
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
        .min(label_width);
    let max_value = series
        .points
        .iter()
        .map(|(_, value)| *value)
        .fold(0.0_f64, f64::max);
    let bar_width = width.saturating_sub(longest + 12).max(1);

    series
        .points
        .iter()
        .map(|(label, value)| {
            let label: String = label.chars().take(longest).collect();
            let filled = if max_value > 0.0 {
                ((value.max(0.0) / max_value) * bar_width as f64).round() as usize
            } else {
                0
            };
            format!(
                "{:<width$} {} {}",
                label,
                "█".repeat(filled),
                format_value(*value),
                width = longest
            )
        })
        .collect()
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Spinner frame for loading placeholders.
pub fn spinner(tick: usize) -> &'static str {
    const FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
    FRAMES[tick % FRAMES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_timestamp() {
        assert_eq!(format_compact_timestamp("2024-06-01 13:45:10"), "06-01 13:45");
        assert_eq!(format_compact_timestamp("garbage"), "garbage");
    }

    #[test]
    fn test_bar_lines_scale_to_max() {
        let series = Series {
            name: "hops".to_string(),
            points: vec![("Citra".to_string(), 10.0), ("Saaz".to_string(), 5.0)],
        };
        let lines = bar_lines(&series, 32, 20);
        // 32 - (5 + 12) = 15 cells for the largest value
        assert_eq!(lines[0], format!("Citra {} 10", "█".repeat(15)));
        assert_eq!(lines[1], format!("Saaz  {} 5", "█".repeat(8)));
    }

    #[test]
    fn test_bar_lines_without_values() {
        let series = Series {
            name: "empty".to_string(),
            points: vec![("A".to_string(), 0.0)],
        };
        assert_eq!(bar_lines(&series, 20, 10), vec!["A  0".to_string()]);
    }
}
