//! Flat query parameters, as carried in request URLs and the persisted history URL.

use std::fmt::{Display, Formatter};

/// Ordered string-to-string query parameters.
///
/// Keys are unique; `set` replaces an existing value in place so the
/// serialized order stays stable across updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string (with or without a leading `?`).
    ///
    /// Undecodable components are kept as-is; a later key wins over an earlier duplicate.
    pub fn parse(query: &str) -> Self {
        let mut params = Self::new();
        let query = query.trim().trim_start_matches('?');
        for part in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            let key = decode_component(key);
            if key.is_empty() {
                continue;
            }
            params.set(&key, decode_component(value));
        }
        params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    /// Builder-style `set`.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs with a non-empty value, as sent over the wire.
    pub fn non_empty_pairs(&self) -> Vec<(String, String)> {
        self.pairs
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .cloned()
            .collect()
    }
}

impl Display for QueryParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let encoded: Vec<String> = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        write!(f, "{}", encoded.join("&"))
    }
}

fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decodes_components() {
        let params = QueryParams::parse("?styles=1%2C2&ibu=10,50&q=pale+ale");
        assert_eq!(params.get("styles"), Some("1,2"));
        assert_eq!(params.get("ibu"), Some("10,50"));
        assert_eq!(params.get("q"), Some("pale ale"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = QueryParams::new().with("a", "1").with("b", "2");
        params.set("a", "3");
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(params.get("a"), Some("3"));
    }

    #[test]
    fn test_non_empty_pairs_skip_blank_values() {
        let params = QueryParams::new().with("styles", "").with("ibu", "0,301");
        assert_eq!(
            params.non_empty_pairs(),
            vec![("ibu".to_string(), "0,301".to_string())]
        );
    }

    #[test]
    fn test_display_keeps_empty_values() {
        let params = QueryParams::new().with("hops", "").with("ibu", "10,50");
        assert_eq!(params.to_string(), "hops=&ibu=10%2C50");
        assert_eq!(QueryParams::parse(&params.to_string()), params);
    }

    #[test]
    fn test_parse_ignores_keyless_parts() {
        let params = QueryParams::parse("=x&&flag");
        assert_eq!(params.get("flag"), Some(""));
        assert_eq!(params.iter().count(), 1);
    }
}
