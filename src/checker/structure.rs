// src/checker/structure.rs
// =============================================================================
// Checks on the structure of the page: doctype, language, landmark tags and
// the depth/count of a configurable tag.
//
// The parser repairs every page: it always creates exactly one <html>, one
// <head> and one <body>, and drops a misplaced doctype. Checks about those
// need the markup as the site wrote it, so they scan the source instead of
// the tree, after removing comments, scripts and styles.
// =============================================================================

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

use super::{CheckerResult, PRESENT};
use crate::document::Document;

// Parts of the source that can contain tag-like text without being markup
static NOT_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("constant regex is valid")
});

// `<!DOCTYPE html ...>` and its declared root name
static DOCTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype\s+([^\s>]+)").expect("constant regex is valid"));

// Opening tag of the root element
static ROOT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html[\s>/]").expect("constant regex is valid"));

// Any opening or closing tag: (closing slash, name, self-closing slash)
static SOURCE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)(?:\s[^>]*?)?(/?)>").expect("constant regex is valid")
});

// Elements the parser inserts when the page does not have them
const IMPLIED_BY_PARSER: [&str; 3] = ["html", "head", "body"];

// Elements that never have a closing tag
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

fn markup(raw: &str) -> Cow<'_, str> {
    NOT_MARKUP.replace_all(raw, " ")
}

/// The doctype must be an HTML one and come before `<html>` in the source.
///
/// This looks at the raw HTML on purpose: the parser repairs documents and
/// would report a root element even when the page has none.
pub fn doctype(document: &Document) -> CheckerResult {
    let source = markup(document.raw_html());
    let (Some(doctype), Some(root)) = (DOCTYPE.captures(&source), ROOT_TAG.find(&source)) else {
        return CheckerResult::Failure;
    };

    let declaration = doctype.get(0).map_or(usize::MAX, |m| m.start());
    if declaration < root.start() && doctype[1].eq_ignore_ascii_case("html") {
        CheckerResult::success("html")
    } else {
        CheckerResult::Failure
    }
}

// Depth of every opening `tag` in the source, counted as the number of
// elements still open at that point. Closing tags close up to the matching
// open element; stray closing tags are ignored.
fn source_depths(raw: &str, tag: &str) -> Vec<usize> {
    let source = markup(raw);
    let mut open: Vec<String> = Vec::new();
    let mut depths = Vec::new();

    for caps in SOURCE_TAG.captures_iter(&source) {
        let name = caps[2].to_ascii_lowercase();
        if &caps[1] == "/" {
            if let Some(position) = open.iter().rposition(|element| *element == name) {
                open.truncate(position);
            }
            continue;
        }
        if name == tag {
            depths.push(open.len());
        }
        if &caps[3] != "/" && !VOID_ELEMENTS.contains(&name.as_str()) {
            open.push(name);
        }
    }
    depths
}

// Depths from the source for parser-implied elements, from the tree otherwise
fn depths(document: &Document, tag: &str) -> Option<Vec<usize>> {
    if IMPLIED_BY_PARSER.contains(&tag) {
        return Some(source_depths(document.raw_html(), tag));
    }
    let selector = Selector::parse(tag).ok()?;
    Some(
        document
            .tree()
            .select(&selector)
            .map(|element| element.ancestors().filter(|node| node.value().is_element()).count())
            .collect(),
    )
}

/// Value of the `lang` attribute of `<html>`.
pub fn lang(document: &Document) -> CheckerResult {
    document
        .tree()
        .root_element()
        .value()
        .attr("lang")
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
        .into()
}

/// `présent` when at least one `tag` element exists.
pub fn presence(document: &Document, tag: &str) -> CheckerResult {
    let Ok(selector) = Selector::parse(tag) else {
        return CheckerResult::Failure;
    };
    if document.tree().select(&selector).next().is_some() {
        CheckerResult::success(PRESENT)
    } else {
        CheckerResult::Failure
    }
}

/// Nesting depth of every `tag` element, in document order.
///
/// The depth is the number of elements above it: `<head>` in a normal page is
/// at depth 1 (only `<html>` above).
pub fn tag_depths(document: &Document, tag: &str) -> CheckerResult {
    match depths(document, tag) {
        Some(depths) if !depths.is_empty() => CheckerResult::Levels(depths),
        _ => CheckerResult::Failure,
    }
}

/// Number of `tag` elements. Zero is a valid answer, not a failure.
pub fn tag_count(document: &Document, tag: &str) -> CheckerResult {
    match depths(document, tag) {
        Some(depths) => CheckerResult::success(depths.len().to_string()),
        None => CheckerResult::Failure,
    }
}
