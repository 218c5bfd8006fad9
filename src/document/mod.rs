// src/document/mod.rs
// =============================================================================
// The Document: everything checkers know about one fetched page.
//
// A Document bundles:
// - the raw HTML (some checks, like the doctype one, look at the source text)
// - the parsed tree (scraper / html5ever)
// - the visible plain text of the page
// - the list of links, already resolved to absolute URLs
//
// Text search is done on the text nodes of the tree rather than on a flat
// string. That way a checker can still ask "is this match inside the footer?"
// or "is this match inside an <a href>?" after finding it.
//
// A Document is built once per fetched page and never modified afterwards.
// =============================================================================

mod links;
mod text;

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub use links::{is_fetchable, resolve_href, Link, LinkTarget};
pub use text::{collapse_whitespace, contains_folded, fold};

static FOOTER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("footer").expect("constant selector is valid"));
static FOOTER_ID: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#footer").expect("constant selector is valid"));

/// Parts of a page a text search can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Every `<footer>` element
    Footer,
    /// The element with `id="footer"` (older sites without `<footer>`)
    FooterId,
    /// The whole page
    Page,
}

impl Region {
    /// Order in which scoped searches try the regions.
    pub const SEARCH_ORDER: [Region; 3] = [Region::Footer, Region::FooterId, Region::Page];
}

/// A text node of the page, with the elements around it.
#[derive(Debug, Clone, Copy)]
pub struct TextNode<'a> {
    pub text: &'a str,
    /// Element directly containing the text
    pub parent: Option<ElementRef<'a>>,
    /// Closest enclosing `<a>`, if any
    pub anchor: Option<ElementRef<'a>>,
}

impl<'a> TextNode<'a> {
    /// The raw href of the enclosing anchor
    pub fn anchor_href(&self) -> Option<&'a str> {
        self.anchor.and_then(|a| a.value().attr("href"))
    }
}

/// A pattern match inside one text node.
#[derive(Debug, Clone, Copy)]
pub struct TextMatch<'a> {
    pub node: TextNode<'a>,
    pub start: usize,
    pub end: usize,
}

impl<'a> TextMatch<'a> {
    pub fn matched(&self) -> &'a str {
        &self.node.text[self.start..self.end]
    }
}

/// One parsed page. See the module comment.
#[derive(Debug)]
pub struct Document {
    url: Url,
    raw_html: String,
    tree: Html,
    plain_text: String,
    links: Vec<Link>,
}

impl Document {
    /// Parses `raw_html` fetched from `url`.
    ///
    /// Links are resolved against `url`. This never fails: html5ever repairs
    /// broken markup and bad hrefs become unresolved links.
    pub fn parse(raw_html: impl Into<String>, url: Url) -> Self {
        let raw_html = raw_html.into();
        let tree = Html::parse_document(&raw_html);
        let links = links::extract_links(&tree, &url);
        let plain_text = collapse_whitespace(
            &text_nodes(tree.root_element())
                .map(|node| node.text)
                .collect::<Vec<_>>()
                .join(" "),
        );

        Self {
            url,
            raw_html,
            tree,
            plain_text,
            links,
        }
    }

    /// The URL the page was fetched from
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn raw_html(&self) -> &str {
        &self.raw_html
    }

    pub fn tree(&self) -> &Html {
        &self.tree
    }

    /// Visible text, whitespace collapsed
    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    /// All `<a href>` of the page in document order
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Visible text nodes of the whole page, in document order.
    pub fn text_nodes(&self) -> impl Iterator<Item = TextNode<'_>> {
        text_nodes(self.tree.root_element())
    }

    /// Every match of `pattern` on the whole page, one per text node, in
    /// document order.
    pub fn text_matches<'a>(&'a self, pattern: &'a Regex) -> impl Iterator<Item = TextMatch<'a>> {
        self.text_nodes().filter_map(move |node| {
            pattern.find(node.text).map(|m| TextMatch {
                node,
                start: m.start(),
                end: m.end(),
            })
        })
    }

    /// First match of `pattern` inside `region`.
    pub fn find_text_in<'a>(&'a self, region: Region, pattern: &Regex) -> Option<TextMatch<'a>> {
        self.region_roots(region)
            .into_iter()
            .flat_map(text_nodes)
            .find_map(|node| {
                pattern.find(node.text).map(|m| TextMatch {
                    node,
                    start: m.start(),
                    end: m.end(),
                })
            })
    }

    /// First match of `pattern`, trying the footer, then `#footer`, then the
    /// whole page.
    pub fn find_text<'a>(&'a self, pattern: &Regex) -> Option<TextMatch<'a>> {
        Region::SEARCH_ORDER
            .iter()
            .find_map(|region| self.find_text_in(*region, pattern))
    }

    fn region_roots(&self, region: Region) -> Vec<ElementRef<'_>> {
        match region {
            Region::Footer => self.tree.select(&FOOTER).collect(),
            Region::FooterId => self.tree.select(&FOOTER_ID).collect(),
            Region::Page => vec![self.tree.root_element()],
        }
    }
}

// Walks the text nodes under `root`, skipping the content of non-visible
// elements.
fn text_nodes(root: ElementRef<'_>) -> impl Iterator<Item = TextNode<'_>> {
    root.descendants().filter_map(|node| {
        let text: &str = node.value().as_text()?;
        let parent = node.parent().and_then(ElementRef::wrap);
        if parent.is_some_and(|p| matches!(p.value().name(), "script" | "style" | "noscript")) {
            return None;
        }
        let anchor = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == "a");
        Some(TextNode {
            text,
            parent,
            anchor,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
        <html lang="fr">
          <head><title>Titre</title><style>.x { color: red }</style></head>
          <body>
            <p>Accueil <a href="/page">lien interne</a></p>
            <script>var hidden = "secret";</script>
            <div id="footer">ancien pied</div>
            <footer><a href="../bas">pied de page</a></footer>
          </body>
        </html>"#;

    fn document() -> Document {
        Document::parse(PAGE, Url::parse("https://example.com/fr/index.html").unwrap())
    }

    #[test]
    fn test_plain_text_skips_scripts_and_styles() {
        let doc = document();
        assert!(doc.plain_text().contains("Accueil lien interne"));
        assert!(!doc.plain_text().contains("secret"));
        assert!(!doc.plain_text().contains("color"));
    }

    #[test]
    fn test_links_are_resolved_against_page_url() {
        let doc = document();
        let hrefs: Vec<_> = doc.links().iter().filter_map(Link::href_absolute).collect();
        assert_eq!(hrefs, vec!["https://example.com/page", "https://example.com/bas"]);
    }

    #[test]
    fn test_find_text_prefers_footer_region() {
        let doc = document();
        let pattern = Regex::new("pied").unwrap();
        let found = doc.find_text(&pattern).unwrap();
        assert_eq!(found.node.text, "pied de page");
        assert_eq!(found.node.anchor_href(), Some("../bas"));
    }

    #[test]
    fn test_find_text_in_footer_id() {
        let doc = document();
        let pattern = Regex::new("ancien").unwrap();
        assert!(doc.find_text_in(Region::Footer, &pattern).is_none());
        let found = doc.find_text_in(Region::FooterId, &pattern).unwrap();
        assert_eq!(found.matched(), "ancien");
        assert!(found.node.anchor.is_none());
    }

    #[test]
    fn test_text_matches_in_document_order() {
        let doc = document();
        let pattern = Regex::new("lien|pied").unwrap();
        let texts: Vec<_> = doc.text_matches(&pattern).map(|m| m.matched()).collect();
        assert_eq!(texts, vec!["lien", "pied", "pied"]);
    }
}
