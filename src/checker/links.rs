// src/checker/links.rs
// =============================================================================
// Checks that look for a specific link on the page: the legal notice
// ("Mentions légales") and a contact page.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::CheckerResult;
use crate::document::{contains_folded, resolve_href, Document, LinkTarget};

// "Mentions légales", "mention legale", ... in any case
static LEGAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)mentions?[ \u{a0}]l[eé]gales?").expect("constant regex is valid")
});

const CONTACT_KEYWORDS: [&str; 2] = ["contact", "ecrire"];

/// LegalChecker: URL of the legal notice.
///
/// The phrase must be the text of a link; the first occurrence in document
/// order whose enclosing `<a href>` resolves wins.
pub fn legal(document: &Document, base: &Url) -> CheckerResult {
    if !LEGAL.is_match(document.plain_text()) {
        return CheckerResult::Failure;
    }

    document
        .text_matches(&LEGAL)
        .filter_map(|found| found.node.anchor_href())
        .find_map(|href| match resolve_href(base, href) {
            LinkTarget::Absolute(url) => Some(url.to_string()),
            LinkTarget::Unresolved(_) => None,
        })
        .into()
}

/// ContactLinkChecker: first link whose text or href mentions "contact" or
/// "écrire". `mailto:` links count: writing to the site is a way to contact it.
pub fn contact(document: &Document) -> CheckerResult {
    document
        .links()
        .iter()
        .filter(|link| {
            CONTACT_KEYWORDS
                .iter()
                .any(|keyword| contains_folded(&link.text, keyword) || contains_folded(&link.href_raw, keyword))
        })
        .find_map(|link| link.href_absolute())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "https://www.example.com";

    fn page(body: &str) -> Document {
        let html = format!("<!DOCTYPE html><html><body><div>{body}</div></body></html>");
        Document::parse(html, Url::parse(ROOT).unwrap())
    }

    fn base() -> Url {
        Url::parse(ROOT).unwrap()
    }

    #[test]
    fn test_legal_link() {
        let doc = page(r#"<a href="/misc/mentions-legales/">Mentions légales</a>"#);
        assert_eq!(
            legal(&doc, &base()),
            CheckerResult::success(format!("{ROOT}/misc/mentions-legales/"))
        );
    }

    #[test]
    fn test_legal_link_singular_without_accent() {
        let doc = page(r#"<a href="/legal">mention legale</a>"#);
        assert_eq!(legal(&doc, &base()), CheckerResult::success(format!("{ROOT}/legal")));
    }

    #[test]
    fn test_legal_nested_in_anchor() {
        let doc = page(r#"<a href="/legal"><span>Mentions légales</span></a>"#);
        assert_eq!(legal(&doc, &base()), CheckerResult::success(format!("{ROOT}/legal")));
    }

    #[test]
    fn test_legal_text_without_link() {
        let doc = page("Mentions légales");
        assert_eq!(legal(&doc, &base()), CheckerResult::Failure);
    }

    #[test]
    fn test_legal_skips_plain_text_before_link() {
        let doc = page(r#"<p>Voir les mentions légales</p><a href="legal.html">Mentions légales</a>"#);
        assert_eq!(legal(&doc, &base()), CheckerResult::success(format!("{ROOT}/legal.html")));
    }

    #[test]
    fn test_legal_absent() {
        let doc = page(r#"<a href="/cgu">Conditions</a>"#);
        assert_eq!(legal(&doc, &base()), CheckerResult::Failure);
    }

    #[test]
    fn test_contact_by_text() {
        let doc = page(r#"<a href="/nous-joindre">Contactez-nous</a>"#);
        assert_eq!(contact(&doc), CheckerResult::success(format!("{ROOT}/nous-joindre")));
    }

    #[test]
    fn test_contact_by_href_and_accent() {
        let doc = page(r#"<a href="/plan">Plan</a><a href="/nous-ecrire">Nous écrire</a>"#);
        assert_eq!(contact(&doc), CheckerResult::success(format!("{ROOT}/nous-ecrire")));
    }

    #[test]
    fn test_contact_mailto() {
        let doc = page(r#"<a href="mailto:contact@example.com">Email</a>"#);
        assert_eq!(contact(&doc), CheckerResult::success("mailto:contact@example.com"));
    }

    #[test]
    fn test_contact_absent() {
        let doc = page(r#"<a href="/plan">Plan du site</a>"#);
        assert_eq!(contact(&doc), CheckerResult::Failure);
    }
}
