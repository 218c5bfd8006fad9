// src/analysis/mod.rs
// =============================================================================
// The analysis orchestrator.
//
// For each website:
// 1. download the home page once
// 2. if that fails: record the error, every checker value is "échec", no
//    checker runs
// 3. otherwise: run every criterion chain on the page and merge all checker
//    outputs into one RunRecord
//
// Websites are independent: they are processed concurrently, at most `jobs`
// at a time. Inside one website everything is sequential, because a checker
// may need the result of the previous one.
//
// Submodules:
// - chain: Criterion and the chain runner
// - record: RunRecord, the per-website result
// =============================================================================

mod chain;
mod record;

use futures::stream::{self, StreamExt};
use url::Url;

use crate::error::{ConfigError, FetchError};
use crate::fetch::{fetch_document, Fetcher};
use crate::progress::Progress;

pub use chain::{ChainOutcome, ChainState, Criterion};
pub use record::RunRecord;

/// A website to analyse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Website {
    /// Free text shown in reports (organisation name)
    pub label: String,
    pub url: String,
}

/// Criteria plus run settings, shared read-only by every website task.
#[derive(Debug, Clone)]
pub struct Analysis {
    criteria: Vec<Criterion>,
    jobs: usize,
}

impl Analysis {
    /// `jobs` is the number of websites processed at the same time.
    pub fn new(criteria: Vec<Criterion>, jobs: usize) -> Result<Self, ConfigError> {
        if criteria.is_empty() {
            return Err(ConfigError::NoCriteria);
        }
        Ok(Self {
            criteria,
            jobs: jobs.max(1),
        })
    }

    /// Keys of every record, in configuration order, without duplicates
    pub fn output_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for checker in self.criteria.iter().flat_map(Criterion::checkers) {
            let key = checker.output_key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Analyses every website. Records come back in input order.
    ///
    /// `progress` is advanced each time a website record is ready.
    pub async fn run<F: Fetcher + ?Sized>(
        &self,
        websites: &[Website],
        fetcher: &F,
        progress: &Progress,
    ) -> Vec<RunRecord> {
        tracing::info!(websites = websites.len(), jobs = self.jobs, "starting analysis");

        // .buffered(N) runs up to N websites at once and yields the records
        // in the original order
        let records: Vec<RunRecord> = stream::iter(websites)
            .map(|website| self.analyze_website(website, fetcher))
            .buffered(self.jobs)
            .inspect(|record| progress.advance(record))
            .collect()
            .await;

        progress.finish();
        records
    }

    /// Analyses one website. Never fails: problems end up in the record.
    pub async fn analyze_website<F: Fetcher + ?Sized>(&self, website: &Website, fetcher: &F) -> RunRecord {
        let keys = self.output_keys();

        let url = match Url::parse(website.url.trim()) {
            Ok(url) => url,
            Err(_) => {
                let error = FetchError::InvalidUrl(website.url.clone());
                tracing::warn!(label = %website.label, error = %error, "skipping website");
                return RunRecord::failed(website, &error, &keys);
            }
        };

        let document = match fetch_document(fetcher, &url).await {
            Ok(document) => document,
            Err(error) => {
                tracing::warn!(label = %website.label, url = %url, error = %error, "download failed");
                return RunRecord::failed(website, &error, &keys);
            }
        };

        let mut record = RunRecord::new(website);
        for criterion in &self.criteria {
            let outcome = criterion.run(&document, document.url(), fetcher).await;
            tracing::debug!(
                label = %website.label,
                criterion = criterion.name(),
                state = ?outcome.state,
                secondary_fetches = outcome.secondary_fetches,
                "criterion done"
            );
            record.merge(outcome.results);
        }

        tracing::info!(
            label = %website.label,
            url = %url,
            succeeded = record.results().iter().filter(|(_, r)| r.is_success()).count(),
            checkers = record.results().len(),
            "website analysed"
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{Checker, CheckerResult};
    use crate::fetch::fake::FakeFetcher;

    const SITE: &str = "https://www.example.com/";

    fn website(url: &str) -> Website {
        Website {
            label: "Exemple".to_string(),
            url: url.to_string(),
        }
    }

    fn analysis() -> Analysis {
        let criteria = vec![
            Criterion::new("doctype", vec![Checker::Doctype]).unwrap(),
            Criterion::new("lang", vec![Checker::Lang]).unwrap(),
            Criterion::new(
                "accessibility",
                vec![Checker::Access, Checker::AccessLink, Checker::AccessRate],
            )
            .unwrap(),
            Criterion::new("legal", vec![Checker::Legal]).unwrap(),
        ];
        Analysis::new(criteria, 4).unwrap()
    }

    const COMPLIANT_PAGE: &str = r#"<!DOCTYPE html>
        <html lang="fr">
          <body>
            <p>Bienvenue. <a href="/legal">Mentions légales</a></p>
            <footer><a href="/a11y">Accessibilité : totalement conforme</a></footer>
          </body>
        </html>"#;

    #[test]
    fn test_no_criteria_is_rejected() {
        assert_eq!(Analysis::new(vec![], 1).unwrap_err(), ConfigError::NoCriteria);
    }

    #[test]
    fn test_output_keys_are_deduplicated() {
        let criteria = vec![
            Criterion::new("a", vec![Checker::Lang, Checker::Access]).unwrap(),
            Criterion::new("b", vec![Checker::Access, Checker::AccessLink]).unwrap(),
        ];
        let analysis = Analysis::new(criteria, 1).unwrap();
        assert_eq!(
            analysis.output_keys(),
            vec!["LangChecker", "AccessChecker", "AccessLinkChecker"]
        );
    }

    #[tokio::test]
    async fn test_compliant_page_end_to_end() {
        let fetcher = FakeFetcher::new().page(SITE, COMPLIANT_PAGE);

        let record = analysis().analyze_website(&website(SITE), &fetcher).await;

        assert_eq!(record.error, "");
        assert_eq!(record.get("DoctypeChecker"), Some(&CheckerResult::success("html")));
        assert_eq!(record.get("LangChecker"), Some(&CheckerResult::success("fr")));
        assert_eq!(
            record.get("AccessChecker"),
            Some(&CheckerResult::success("totalement conforme"))
        );
        assert_eq!(
            record.get("AccessLinkChecker"),
            Some(&CheckerResult::success("https://www.example.com/a11y"))
        );
        assert_eq!(
            record.get("LegalChecker"),
            Some(&CheckerResult::success("https://www.example.com/legal"))
        );
        // The statement page is not served by the fake: only the rate fails
        assert_eq!(record.get("AccessRateChecker"), Some(&CheckerResult::Failure));
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_page_without_patterns_fails_every_checker() {
        let fetcher = FakeFetcher::new().page(SITE, "<p>Rien ici</p>");

        let record = analysis().analyze_website(&website(SITE), &fetcher).await;

        assert!(record.is_fetched());
        assert_eq!(record.results().len(), 6);
        assert!(record.results().iter().all(|(_, r)| *r == CheckerResult::Failure));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_timeout_fails_the_website_without_running_checkers() {
        let fetcher = FakeFetcher::new().failing(SITE, FetchError::Timeout);

        let record = analysis().analyze_website(&website(SITE), &fetcher).await;

        assert_eq!(record.error, "request timed out");
        assert_eq!(record.results().len(), 6);
        assert!(record.results().iter().all(|(_, r)| *r == CheckerResult::Failure));
        // Only the home page was requested: no chain ran
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_url_is_recorded() {
        let fetcher = FakeFetcher::new();
        let record = analysis().analyze_website(&website("pas une url"), &fetcher).await;
        assert!(record.error.contains("pas une url"));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_run_keeps_input_order_and_isolates_failures() {
        let fetcher = FakeFetcher::new()
            .page("https://a.example.com/", COMPLIANT_PAGE)
            .failing("https://b.example.com/", FetchError::Status(500))
            .page("https://c.example.com/", "<p>Rien</p>");
        let websites = vec![
            website("https://a.example.com/"),
            website("https://b.example.com/"),
            website("https://c.example.com/"),
        ];

        let progress = Progress::hidden(websites.len());

        let records = analysis().run(&websites, &fetcher, &progress).await;

        let urls: Vec<_> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://a.example.com/", "https://b.example.com/", "https://c.example.com/"]
        );
        assert!(records[0].is_fetched());
        assert_eq!(records[1].error, "HTTP error status 500");
        assert!(records[2].is_fetched());
        assert_eq!(progress.position(), 3);
    }
}
