//! Ordered header collection
//!
//! Headers are kept as an ordered sequence of structured name/value pairs,
//! not a map: duplicate names are allowed and insertion order is execution
//! order. Removal matches names case-insensitively and, when a value is
//! given, on the exact trimmed value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single header entry as a structured name/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse a preformatted `"Name: value"` entry, splitting on the first
    /// colon. An entry with no colon becomes a name with an empty value.
    pub fn parse(entry: &str) -> Self {
        match entry.split_once(':') {
            Some((name, value)) => Self::new(name.trim(), value.trim()),
            None => Self::new(entry.trim(), ""),
        }
    }

    /// Case-insensitive name comparison, ignoring surrounding whitespace.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Ordered, duplicate-permitting header sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSet {
    entries: Vec<Header>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from preformatted `"Name: value"` lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: lines.into_iter().map(|l| Header::parse(l.as_ref())).collect(),
        }
    }

    /// Append a structured entry.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Header::new(name, value));
    }

    /// Append a preformatted `"Name: value"` entry.
    pub fn add_line(&mut self, entry: &str) {
        self.entries.push(Header::parse(entry));
    }

    pub fn push(&mut self, header: Header) {
        self.entries.push(header);
    }

    /// Remove every entry whose name matches case-insensitively and, when
    /// `value` is given, whose trimmed value matches exactly. Returns the
    /// number of entries removed.
    pub fn remove(&mut self, name: &str, value: Option<&str>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|h| {
            !(h.matches_name(name)
                && value.map_or(true, |wanted| h.value.trim() == wanted.trim()))
        });
        before - self.entries.len()
    }

    /// Whether any entry has the given name (case-insensitive).
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|h| h.matches_name(name))
    }

    /// Append every entry of `other`, preserving its order.
    pub fn extend(&mut self, other: HeaderSet) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a HeaderSet {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preformatted_entry() {
        let header = Header::parse("Content-Type: application/json");
        assert_eq!(header.name, "Content-Type");
        assert_eq!(header.value, "application/json");
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        let header = Header::parse("X-Token: abc:def");
        assert_eq!(header.name, "X-Token");
        assert_eq!(header.value, "abc:def");
    }

    #[test]
    fn test_parse_without_colon_yields_empty_value() {
        let header = Header::parse("X-Flag");
        assert_eq!(header.name, "X-Flag");
        assert_eq!(header.value, "");
    }

    #[test]
    fn test_duplicates_and_order_are_preserved() {
        let mut headers = HeaderSet::new();
        headers.add("Accept", "text/html");
        headers.add("X-Custom", "1");
        headers.add("Accept", "application/json");

        let entries: Vec<_> = headers.iter().map(|h| h.to_string()).collect();
        assert_eq!(
            entries,
            vec![
                "Accept: text/html",
                "X-Custom: 1",
                "Accept: application/json"
            ]
        );
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let mut headers = HeaderSet::new();
        headers.add("Content-Type", "application/json");
        headers.add("Accept", "application/json");

        assert_eq!(headers.remove("content-type", None), 1);
        assert_eq!(headers.len(), 1);
        assert!(headers.contains("Accept"));
    }

    #[test]
    fn test_remove_with_value_match() {
        let mut headers = HeaderSet::new();
        headers.add("Accept", "text/html");
        headers.add("Accept", "application/json");

        assert_eq!(headers.remove("Accept", Some("application/json")), 1);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.iter().next().unwrap().value, "text/html");
    }

    #[test]
    fn test_remove_with_value_trims_before_comparing() {
        let mut headers = HeaderSet::new();
        headers.add("Accept", " application/json ");

        assert_eq!(headers.remove("accept", Some("application/json")), 1);
        assert!(headers.is_empty());
    }

    #[test]
    fn test_remove_all_matching_names() {
        let mut headers = HeaderSet::new();
        headers.add("X-Trace", "1");
        headers.add("x-trace", "2");
        headers.add("Other", "3");

        assert_eq!(headers.remove("X-TRACE", None), 2);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_from_lines() {
        let headers = HeaderSet::from_lines(["Accept: */*", "X-Key: v"]);
        assert_eq!(headers.len(), 2);
        assert!(headers.contains("x-key"));
    }
}
