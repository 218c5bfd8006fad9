// src/checker/mod.rs
// =============================================================================
// This module contains the checkers: the smallest possible tests run on a page.
//
// Submodules:
// - structure: page structure checks (doctype, lang, footer/header, tag depth/count)
// - access: accessibility statement checks (mention, link, compliance rate)
// - links: link checks (legal notice, contact page)
// - registry: name -> checker lookup used by configuration files
//
// Every checker has the same shape:
//
//   evaluate(document, base_url, prior) -> CheckerResult
//
// `prior` is the result of the checker that ran just before in the same
// criterion chain. It is only a hint: a checker that can use it (for example
// AccessLinkChecker after AccessChecker) must still run its own fallback
// search when `prior` is a Failure.
// =============================================================================

mod access;
mod links;
mod registry;
mod structure;

use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

use crate::document::{is_fetchable, Document};

pub use registry::CheckerRegistry;

/// Printed in reports wherever a check could not succeed.
pub const FAILURE_MARKER: &str = "échec";

/// Success value of the presence checkers (footer, header).
pub const PRESENT: &str = "présent";

/// Tag targeted by HeadLvlChecker and HeaderNbChecker when none is configured.
pub const DEFAULT_TAG: &str = "head";

/// The outcome of one checker.
///
/// Results are plain strings so that any checker can consume the result of
/// any other one. `Levels` is the only structured value (HeadLvlChecker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    Success(String),
    Levels(Vec<usize>),
    Failure,
}

impl CheckerResult {
    pub fn success(value: impl Into<String>) -> Self {
        CheckerResult::Success(value.into())
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, CheckerResult::Failure)
    }

    /// The string carried by a `Success`
    pub fn value(&self) -> Option<&str> {
        match self {
            CheckerResult::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The success value read as a page URL that can be fetched.
    pub fn page_url(&self) -> Option<Url> {
        self.value()
            .and_then(|value| Url::parse(value).ok())
            .filter(is_fetchable)
    }
}

impl From<Option<String>> for CheckerResult {
    fn from(value: Option<String>) -> Self {
        value.map_or(CheckerResult::Failure, CheckerResult::Success)
    }
}

impl fmt::Display for CheckerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckerResult::Success(value) => f.write_str(value),
            CheckerResult::Levels(levels) => write!(f, "{levels:?}"),
            CheckerResult::Failure => f.write_str(FAILURE_MARKER),
        }
    }
}

// Reports only ever see strings (or the list of depths), never the enum tag
impl Serialize for CheckerResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CheckerResult::Success(value) => serializer.serialize_str(value),
            CheckerResult::Levels(levels) => levels.serialize(serializer),
            CheckerResult::Failure => serializer.serialize_str(FAILURE_MARKER),
        }
    }
}

/// The closed set of checkers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checker {
    Doctype,
    Lang,
    Legal,
    Footer,
    Header,
    HeadLvl { tag: String },
    HeaderNb { tag: String },
    Access,
    AccessLink,
    AccessRate,
    ContactLink,
}

impl Checker {
    /// Every checker, with default arguments, in catalogue order
    pub fn catalogue() -> Vec<Checker> {
        vec![
            Checker::Doctype,
            Checker::Lang,
            Checker::Legal,
            Checker::Footer,
            Checker::Header,
            Checker::HeadLvl {
                tag: DEFAULT_TAG.to_string(),
            },
            Checker::HeaderNb {
                tag: DEFAULT_TAG.to_string(),
            },
            Checker::Access,
            Checker::AccessLink,
            Checker::AccessRate,
            Checker::ContactLink,
        ]
    }

    /// The name used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            Checker::Doctype => "DoctypeChecker",
            Checker::Lang => "LangChecker",
            Checker::Legal => "LegalChecker",
            Checker::Footer => "FooterChecker",
            Checker::Header => "HeaderChecker",
            Checker::HeadLvl { .. } => "HeadLvlChecker",
            Checker::HeaderNb { .. } => "HeaderNbChecker",
            Checker::Access => "AccessChecker",
            Checker::AccessLink => "AccessLinkChecker",
            Checker::AccessRate => "AccessRateChecker",
            Checker::ContactLink => "ContactLinkChecker",
        }
    }

    /// Human description, shown by `--list-checkers`
    pub fn description(&self) -> &'static str {
        match self {
            Checker::Doctype => "Doctype",
            Checker::Lang => "Lang",
            Checker::Legal => "Mentions légales",
            Checker::Footer => "Présence d'un <footer>",
            Checker::Header => "Présence d'un <header>",
            Checker::HeadLvl { .. } => "Profondeurs des balises ciblées",
            Checker::HeaderNb { .. } => "Nombre de balises ciblées",
            Checker::Access => "Mention accessibilité",
            Checker::AccessLink => "Lien accessibilité",
            Checker::AccessRate => "Taux d'accessibilité",
            Checker::ContactLink => "Lien contact",
        }
    }

    /// The targeted tag of the tag-driven checkers
    pub fn tag(&self) -> Option<&str> {
        match self {
            Checker::HeadLvl { tag } | Checker::HeaderNb { tag } => Some(tag),
            _ => None,
        }
    }

    /// Key of this checker's value in a run record.
    ///
    /// Tag-driven checkers configured with a non-default tag get `Name:tag`
    /// so that several of them can live in the same report.
    pub fn output_key(&self) -> String {
        match self.tag() {
            Some(tag) if tag != DEFAULT_TAG => format!("{}:{}", self.name(), tag),
            _ => self.name().to_string(),
        }
    }

    /// True when the checker must run on the page whose URL is the prior
    /// result, instead of the current page. The chain runner does the fetch.
    pub fn follows_link(&self) -> bool {
        matches!(self, Checker::AccessRate)
    }

    /// Runs the checker.
    ///
    /// `base` is the URL relative hrefs are resolved against. `prior` is the
    /// result of the previous checker of the chain (Failure for the first).
    pub fn evaluate(&self, document: &Document, base: &Url, prior: &CheckerResult) -> CheckerResult {
        match self {
            Checker::Doctype => structure::doctype(document),
            Checker::Lang => structure::lang(document),
            Checker::Legal => links::legal(document, base),
            Checker::Footer => structure::presence(document, "footer"),
            Checker::Header => structure::presence(document, "header"),
            Checker::HeadLvl { tag } => structure::tag_depths(document, tag),
            Checker::HeaderNb { tag } => structure::tag_count(document, tag),
            Checker::Access => access::mention(document),
            Checker::AccessLink => access::statement_link(document, base, prior),
            Checker::AccessRate => access::compliance_rate(document),
            Checker::ContactLink => links::contact(document),
        }
    }
}
