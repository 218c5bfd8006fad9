// src/error.rs
// =============================================================================
// Error types shared by the whole tool.
//
// There are only two kinds of real errors:
// - ConfigError: the configuration is wrong (unknown checker, empty criterion,
//   malformed file). These are fatal and reported before any website is fetched.
// - FetchError: a page could not be downloaded. These are recovered locally:
//   the website (or the single checker that needed the page) is marked failed.
//
// A checker that does not find its pattern is NOT an error. It simply returns
// CheckerResult::Failure (see checker/mod.rs).
// =============================================================================

use thiserror::Error;

/// Fatal configuration problems, detected before the analysis starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A checker name in the configuration is not in the registry
    #[error("unknown checker '{name}' (available: {available})")]
    UnknownChecker { name: String, available: String },

    /// A criterion was declared without any checker
    #[error("criterion '{0}' has no checker")]
    EmptyCriterion(String),

    /// No criterion at all
    #[error("no criterion configured")]
    NoCriteria,

    /// `Name:tag` was used on a checker that takes no tag
    #[error("checker '{0}' does not take a tag argument")]
    UnexpectedArgument(String),

    /// The tag given to a tag-targeted checker is not a plain element name
    #[error("invalid tag '{tag}' for checker '{checker}'")]
    InvalidTag { checker: String, tag: String },
}

/// Why a page could not be fetched.
///
/// The Display text ends up in the `error` column of the report, so it is
/// written for humans.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP error status {0}")]
    Status(u16),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("download failed: {0}")]
    Other(String),
}
