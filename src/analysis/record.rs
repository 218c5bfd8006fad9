// src/analysis/record.rs
// The per-website result handed to the report writers.

use crate::checker::CheckerResult;
use crate::error::FetchError;

use super::Website;

/// Results of one website.
///
/// `error` is empty when the page was downloaded. When it was not, it holds
/// the reason and every checker value is the failure marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub label: String,
    pub url: String,
    pub error: String,
    results: Vec<(String, CheckerResult)>,
}

impl RunRecord {
    pub fn new(website: &Website) -> Self {
        Self {
            label: website.label.clone(),
            url: website.url.clone(),
            error: String::new(),
            results: Vec::new(),
        }
    }

    /// Record of a website whose page could not be downloaded.
    pub fn failed<S: AsRef<str>>(website: &Website, error: &FetchError, keys: &[S]) -> Self {
        let mut record = Self::new(website);
        record.error = error.to_string();
        record.merge(keys.iter().map(|key| (key.as_ref().to_string(), CheckerResult::Failure)));
        record
    }

    /// Adds checker outputs. A key already present is overwritten in place,
    /// so the column order stays the configured one.
    pub fn merge(&mut self, results: impl IntoIterator<Item = (String, CheckerResult)>) {
        for (key, result) in results {
            match self.results.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, slot)) => *slot = result,
                None => self.results.push((key, result)),
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&CheckerResult> {
        self.results
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, result)| result)
    }

    /// Checker outputs in insertion order
    pub fn results(&self) -> &[(String, CheckerResult)] {
        &self.results
    }

    pub fn is_fetched(&self) -> bool {
        self.error.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn website() -> Website {
        Website {
            label: "Exemple".to_string(),
            url: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_failed_record_marks_every_key() {
        let record = RunRecord::failed(&website(), &FetchError::Timeout, &["LangChecker", "AccessChecker"]);
        assert_eq!(record.error, "request timed out");
        assert!(!record.is_fetched());
        assert_eq!(record.get("LangChecker"), Some(&CheckerResult::Failure));
        assert_eq!(record.get("AccessChecker"), Some(&CheckerResult::Failure));
    }

    #[test]
    fn test_merge_overwrites_in_place() {
        let mut record = RunRecord::new(&website());
        record.merge(vec![
            ("A".to_string(), CheckerResult::Failure),
            ("B".to_string(), CheckerResult::success("b")),
        ]);
        record.merge(vec![("A".to_string(), CheckerResult::success("a"))]);
        let keys: Vec<_> = record.results().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(record.get("A"), Some(&CheckerResult::success("a")));
        assert!(record.is_fetched());
    }
}
