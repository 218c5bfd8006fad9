// src/document/links.rs
// =============================================================================
// Link extraction and relative URL resolution.
//
// Every <a href> of a page becomes a Link. The href is resolved against the
// page URL with the `url` crate, which follows RFC 3986 (the same rules a
// browser uses):
//
//   base = "https://example.com/a/b/page"
//   "/docs"            -> "https://example.com/docs"
//   "../other"         -> "https://example.com/a/other"
//   "//cdn.example.org/x" -> "https://cdn.example.org/x"
//   "#top"             -> "https://example.com/a/b/page#top"
//
// A href that cannot be resolved does not stop extraction: the link is kept
// as LinkTarget::Unresolved and checkers that need an absolute URL skip it.
// =============================================================================

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::text::collapse_whitespace;

// "a[href]" means "all <a> tags that have an href attribute"
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("constant selector is valid"));

/// Where a link points to once resolved against its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Absolute(Url),
    /// The href could not be turned into a URL; holds the parser's reason
    Unresolved(String),
}

/// One anchor of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Visible text of the anchor, whitespace collapsed
    pub text: String,
    /// The href exactly as written in the page
    pub href_raw: String,
    pub target: LinkTarget,
}

impl Link {
    /// The absolute URL, if resolution succeeded
    pub fn absolute(&self) -> Option<&Url> {
        match &self.target {
            LinkTarget::Absolute(url) => Some(url),
            LinkTarget::Unresolved(_) => None,
        }
    }

    /// The absolute URL as a string, for checker outputs
    pub fn href_absolute(&self) -> Option<String> {
        self.absolute().map(Url::to_string)
    }
}

/// Collects every `a[href]` of a parsed page, in document order.
pub fn extract_links(document: &Html, base: &Url) -> Vec<Link> {
    document
        .select(&ANCHOR)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
            Some(Link {
                text,
                href_raw: href.to_string(),
                target: resolve_href(base, href),
            })
        })
        .collect()
}

/// Resolves a possibly-relative href to an absolute URL.
///
/// An href that is already absolute is returned as parsed, so resolving an
/// absolute URL twice gives the same result.
pub fn resolve_href(base: &Url, href: &str) -> LinkTarget {
    // Browsers ignore leading/trailing spaces in href values
    let href = href.trim();

    // If it's already absolute (has a scheme), parsing alone works.
    // If it's relative, parsing fails and we join it with the base.
    match Url::parse(href) {
        Ok(url) => LinkTarget::Absolute(url),
        Err(_) => match base.join(href) {
            Ok(url) => LinkTarget::Absolute(url),
            Err(e) => LinkTarget::Unresolved(e.to_string()),
        },
    }
}

/// Checks if a URL can be downloaded by the fetcher.
///
/// mailto:, tel:, javascript: and data: links resolve fine but are not pages.
pub fn is_fetchable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
