// src/analysis/chain.rs
// =============================================================================
// Criteria and the chain runner.
//
// A criterion is a named, ordered list of checkers. Running it on a page:
//
//   prior = Failure
//   for each checker, in order:
//       result = checker.evaluate(page, base_url, prior)
//       record result
//       prior = result
//
// There is no early exit: a checker that fails does not stop the next ones,
// which run their own fallback searches.
//
// The one exception to "run on the current page" is AccessRateChecker. It
// reads the page whose URL is `prior`, so the runner downloads that page
// first. The downloaded page is used for that single step only. If `prior`
// is not a page URL, nothing is downloaded and the checker fails.
// =============================================================================

use url::Url;

use crate::checker::{Checker, CheckerResult};
use crate::document::Document;
use crate::error::ConfigError;
use crate::fetch::{fetch_document, Fetcher};

/// A named chain of checkers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    name: String,
    checkers: Vec<Checker>,
}

/// Where a chain execution stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Pending,
    /// Index of the checker being evaluated
    Running(usize),
    Completed,
}

/// Everything a chain execution produced, in checker order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome {
    pub state: ChainState,
    pub results: Vec<(String, CheckerResult)>,
    /// Number of pages downloaded by the chain itself
    pub secondary_fetches: usize,
}

impl Criterion {
    /// A criterion must have at least one checker.
    pub fn new(name: impl Into<String>, checkers: Vec<Checker>) -> Result<Self, ConfigError> {
        let name = name.into();
        if checkers.is_empty() {
            return Err(ConfigError::EmptyCriterion(name));
        }
        Ok(Self { name, checkers })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn checkers(&self) -> &[Checker] {
        &self.checkers
    }

    /// Runs every checker of the criterion against `document`.
    ///
    /// `base` is the website URL. `fetcher` is only used when a checker must
    /// follow the link produced by the previous one.
    pub async fn run<F: Fetcher + ?Sized>(&self, document: &Document, base: &Url, fetcher: &F) -> ChainOutcome {
        let mut state = ChainState::Pending;
        let mut prior = CheckerResult::Failure;
        let mut results = Vec::with_capacity(self.checkers.len());
        let mut secondary_fetches = 0;

        tracing::debug!(criterion = %self.name, state = ?state, "chain started");

        for (index, checker) in self.checkers.iter().enumerate() {
            state = ChainState::Running(index);

            let result = if checker.follows_link() {
                match prior.page_url() {
                    Some(url) => {
                        secondary_fetches += 1;
                        evaluate_linked_page(checker, &url, &prior, fetcher).await
                    }
                    None => {
                        tracing::debug!(
                            criterion = %self.name,
                            checker = checker.name(),
                            "no link to follow, skipping download"
                        );
                        CheckerResult::Failure
                    }
                }
            } else {
                checker.evaluate(document, base, &prior)
            };

            tracing::debug!(
                criterion = %self.name,
                checker = checker.name(),
                state = ?state,
                result = %result,
                "checker evaluated"
            );

            results.push((checker.output_key(), result.clone()));
            prior = result;
        }

        state = ChainState::Completed;
        ChainOutcome {
            state,
            results,
            secondary_fetches,
        }
    }
}

// Downloads `url` and evaluates `checker` on it. A download failure is a
// Failure of this checker only.
async fn evaluate_linked_page<F: Fetcher + ?Sized>(
    checker: &Checker,
    url: &Url,
    prior: &CheckerResult,
    fetcher: &F,
) -> CheckerResult {
    match fetch_document(fetcher, url).await {
        Ok(page) => checker.evaluate(&page, page.url(), prior),
        Err(e) => {
            tracing::warn!(url = %url, checker = checker.name(), error = %e, "linked page download failed");
            CheckerResult::Failure
        }
    }
}
