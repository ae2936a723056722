//! Persisted analysis location
//!
//! Every state change replaces the current analyzer URL without reloading
//! anything. The URL is kept in the config file so the next `analyze` run
//! resumes where the last one stopped.

use crate::config::Config;
use crate::consts::cli_consts::analyzer::PAGE_PATH;
use crate::network::QueryParams;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait History: Send {
    fn push_state(&mut self, url: &str, title: &str);
}

/// `/analyze/?{query}`
pub fn analysis_url(query: &QueryParams) -> String {
    format!("{}?{}", PAGE_PATH, query)
}

/// Query part of an analyzer URL. A bare query string is accepted as well.
pub fn query_of(url: &str) -> QueryParams {
    match url.split_once('?') {
        Some((_, query)) => QueryParams::parse(query),
        None if url.starts_with('/') => QueryParams::new(),
        None => QueryParams::parse(url),
    }
}

/// History backed by the `last_analysis` entry of the config file.
#[derive(Debug, Clone)]
pub struct ConfigHistory {
    path: PathBuf,
}

impl ConfigHistory {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Query of the last saved analysis, empty when there is none.
    pub fn restore(&self) -> QueryParams {
        Config::load_or_default(&self.path)
            .last_analysis
            .map(|query| QueryParams::parse(&query))
            .unwrap_or_default()
    }
}

impl History for ConfigHistory {
    fn push_state(&mut self, url: &str, title: &str) {
        let mut config = Config::load_or_default(&self.path);
        config.last_analysis = Some(query_of(url).to_string());
        match config.save(&self.path) {
            Ok(()) => log::debug!("Saved analysis \"{}\": {}", title, url),
            Err(e) => log::warn!("Failed to save analysis to {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_analysis_url() {
        let query = QueryParams::new().with("ibu", "10,50").with("charts", "");
        assert_eq!(analysis_url(&query), "/analyze/?ibu=10%2C50&charts=");
        assert_eq!(query_of(&analysis_url(&query)), query);
        assert!(query_of("/analyze/").is_empty());
        assert_eq!(query_of("ibu=1,2").get("ibu"), Some("1,2"));
    }

    #[test]
    fn test_config_history_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut history = ConfigHistory::new(path.clone());
        assert!(history.restore().is_empty());

        let query = QueryParams::new().with("hops", "citra").with("abv", "4,6");
        history.push_state(&analysis_url(&query), "Custom Analysis");
        assert_eq!(history.restore(), query);

        // Other settings survive
        let config = Config::load_from_file(&path).unwrap();
        assert!(config.telemetry);

        Config::clear_last_analysis(&path).unwrap();
        assert!(history.restore().is_empty());
    }
}
