//! What a region shows once its request succeeded, and how bodies are parsed.

use crate::consts::cli_consts::region::{FAILED_TEXT, NO_DATA_TEXT, UNKNOWN_COUNT_TEXT};
use crate::network::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display options of a chart, as given by an embedding page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOptions {
    pub display_mode_bar: bool,
    pub no_data_text: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            display_mode_bar: true,
            no_data_text: NO_DATA_TEXT.to_string(),
        }
    }
}

impl ChartOptions {
    /// Reads `{"displayModeBar": .., "noDataText": ..}`. Malformed input is
    /// logged and leaves the defaults untouched.
    pub fn from_json(raw: &str) -> Self {
        let mut options = Self::default();
        let parsed: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring chart options {}: {}", raw, e);
                return options;
            }
        };
        if let Some(display) = parsed.get("displayModeBar") {
            options.display_mode_bar = is_truthy(display);
        }
        if let Some(text) = parsed.get("noDataText").and_then(Value::as_str) {
            options.no_data_text = text.to_string();
        }
        options
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Plot specification as served by the chart endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSpec {
    pub data: Vec<Value>,
    #[serde(default)]
    pub layout: Value,
}

/// One labelled series extracted from a plot trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(String, f64)>,
}

impl PlotSpec {
    /// Layout title, whether given as a plain string or as `{text: ..}`.
    pub fn title(&self) -> Option<String> {
        match self.layout.get("title")? {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map.get("text").and_then(Value::as_str).map(String::from),
            _ => None,
        }
    }

    /// Label/value pairs of every trace that has both axes.
    /// Horizontal traces carry their labels on the y axis.
    pub fn series(&self) -> Vec<Series> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(index, trace)| {
                let horizontal = trace.get("orientation").and_then(Value::as_str) == Some("h");
                let (labels, values) = if horizontal {
                    (trace.get("y")?, trace.get("x")?)
                } else {
                    (trace.get("x")?, trace.get("y")?)
                };
                let points = labels
                    .as_array()?
                    .iter()
                    .zip(values.as_array()?.iter())
                    .filter_map(|(label, value)| Some((axis_label(label), value.as_f64()?)))
                    .collect::<Vec<_>>();
                let name = trace
                    .get("name")
                    .and_then(Value::as_str)
                    .map(String::from)
                    .unwrap_or_else(|| format!("trace {}", index + 1));
                Some(Series { name, points })
            })
            .collect()
    }
}

fn axis_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A recipe reference from a JSON recipe list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecipeLink {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub url: String,
}

impl RecipeLink {
    pub fn display_line(&self) -> String {
        let name = self.name.as_deref().unwrap_or("Unknown");
        match &self.author {
            Some(author) => format!("{} by {}", name, author),
            None => name.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountData {
    count: u64,
}

/// Parsed body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionContent {
    Plot(PlotSpec),
    /// HTML fragment, kept verbatim.
    Fragment(String),
    Recipes(Vec<RecipeLink>),
    Count(u64),
}

/// What a region loads, which decides how bodies are parsed and which
/// placeholders are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionKind {
    Chart(ChartOptions),
    /// Server-rendered HTML list.
    RecipeList,
    /// JSON list of `{name, author, url}`.
    RecipeLinks,
    RecipeCount,
}

impl RegionKind {
    pub fn parse(&self, body: &str) -> Result<RegionContent, ApiError> {
        Ok(match self {
            RegionKind::Chart(_) => RegionContent::Plot(serde_json::from_str(body)?),
            RegionKind::RecipeList => RegionContent::Fragment(body.to_string()),
            RegionKind::RecipeLinks => RegionContent::Recipes(serde_json::from_str(body)?),
            RegionKind::RecipeCount => {
                let data: CountData = serde_json::from_str(body)?;
                RegionContent::Count(data.count)
            }
        })
    }

    pub fn no_data_text(&self) -> &str {
        match self {
            RegionKind::Chart(options) => &options.no_data_text,
            RegionKind::RecipeCount => UNKNOWN_COUNT_TEXT,
            RegionKind::RecipeList | RegionKind::RecipeLinks => NO_DATA_TEXT,
        }
    }

    pub fn failed_text(&self) -> &str {
        match self {
            RegionKind::RecipeCount => UNKNOWN_COUNT_TEXT,
            _ => FAILED_TEXT,
        }
    }
}

/// Formats a count with thousands separators (`1234567` → `1,234,567`).
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Reduces an HTML fragment to its text lines for terminal display.
pub fn fragment_text(fragment: &str) -> Vec<String> {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    let mut tag = String::new();
    for ch in fragment.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag
                    .trim_start_matches('/')
                    .split_whitespace()
                    .next()
                    .unwrap_or("")
                    .to_lowercase();
                if matches!(
                    name.as_str(),
                    "li" | "p" | "br" | "div" | "tr" | "h1" | "h2" | "h3" | "dt" | "dd"
                ) {
                    text.push('\n');
                }
            }
            _ if in_tag => tag.push(ch),
            _ => text.push(ch),
        }
    }
    // `&amp;` goes last so an escaped entity stays literal
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}
