// src/checker/access.rs
// =============================================================================
// Accessibility statement checks.
//
// French public websites must display their compliance level, usually in the
// footer, as "Accessibilité : partiellement conforme", and link it to an
// accessibility statement page that gives a compliance rate ("Taux de
// conformité : 75,5 %").
//
// The three checkers are meant to be chained in this order:
//   AccessChecker -> AccessLinkChecker -> AccessRateChecker
// Each one still works alone, the chain only gives them hints.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use url::Url;

use super::CheckerResult;
use crate::document::{
    collapse_whitespace, contains_folded, is_fetchable, resolve_href, Document, LinkTarget,
    TextMatch,
};

// "Accessibilité : non|partiellement|totalement conforme", the spaces may be
// no-break spaces
static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)accessibilité[ \u{a0}]:[ \u{a0}](non|partiellement|totalement)[ \u{a0}]conforme")
        .expect("constant regex is valid")
});

// A number, with optional decimals, followed by "%" (one space allowed before it)
static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:[.,]\d+)?) ?%").expect("constant regex is valid"));

const STEM: &str = "accessibilit";
const RATE_KEYWORD: &str = "conformite";

// How many elements above a "conformité" text node we look for the rate
const RATE_SPAN_LEVELS: usize = 3;

/// First accessibility mention (footer, then `#footer`, then whole page) and
/// its normalized value, e.g. "partiellement conforme".
fn find_mention(document: &Document) -> Option<(TextMatch<'_>, String)> {
    let found = document.find_text(&MENTION)?;
    let level = MENTION.captures(found.matched())?.get(1)?.as_str().to_lowercase();
    Some((found, format!("{level} conforme")))
}

/// AccessChecker: the compliance level displayed on the page.
pub fn mention(document: &Document) -> CheckerResult {
    find_mention(document).map(|(_, value)| value).into()
}

/// AccessLinkChecker: URL of the accessibility statement.
///
/// Tried in order, first hit wins:
/// 1. the prior result is the page's accessibility mention and that mention
///    is the text of a link
/// 2. a link whose text contains "accessibilit" (case and accents ignored)
/// 3. a link whose href contains "accessibilit"
pub fn statement_link(document: &Document, base: &Url, prior: &CheckerResult) -> CheckerResult {
    if let Some(url) = prior.value().and_then(|value| mention_link(document, base, value)) {
        return CheckerResult::success(url);
    }

    let statement_links = || {
        document
            .links()
            .iter()
            .filter(|link| link.absolute().is_some_and(is_fetchable))
    };

    statement_links()
        .find(|link| contains_folded(&link.text, STEM))
        .or_else(|| statement_links().find(|link| contains_folded(&link.href_raw, STEM)))
        .and_then(|link| link.href_absolute())
        .into()
}

// The href around the accessibility mention, when the mention is `value`
fn mention_link(document: &Document, base: &Url, value: &str) -> Option<String> {
    let (found, mention) = find_mention(document)?;
    if mention != value {
        return None;
    }
    match resolve_href(base, found.node.anchor_href()?) {
        LinkTarget::Absolute(url) if is_fetchable(&url) => Some(url.to_string()),
        _ => None,
    }
}

/// AccessRateChecker: the compliance rate written on the statement page.
///
/// `document` is the statement page itself (the chain runner fetched it from
/// the AccessLinkChecker result). A text node containing "conformité" is
/// looked up, then the text of its parent elements (up to a few levels) is
/// searched for a percentage.
pub fn compliance_rate(document: &Document) -> CheckerResult {
    if !contains_folded(document.plain_text(), RATE_KEYWORD) {
        return CheckerResult::Failure;
    }

    document
        .text_nodes()
        .filter(|node| contains_folded(node.text, RATE_KEYWORD))
        .find_map(|node| {
            let own = std::iter::once(node.text.to_string());
            let spans = node
                .parent
                .into_iter()
                .flat_map(|parent| {
                    std::iter::once(parent).chain(parent.ancestors().filter_map(ElementRef::wrap))
                })
                .take(RATE_SPAN_LEVELS)
                .map(|element| element.text().collect::<Vec<_>>().join(" "));

            own.chain(spans).find_map(|span| percentage(&collapse_whitespace(&span)))
        })
        .into()
}

// "75,5 %" -> "75,5%"
fn percentage(span: &str) -> Option<String> {
    if !contains_folded(span, RATE_KEYWORD) {
        return None;
    }
    PERCENT.captures(span).map(|caps| format!("{}%", &caps[1]))
}
