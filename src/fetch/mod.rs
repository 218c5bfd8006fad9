// src/fetch/mod.rs
// =============================================================================
// This module downloads pages.
//
// Submodules:
// - http: the real fetcher, built on reqwest
//
// The analysis never calls reqwest directly. It goes through the Fetcher
// trait, so tests can plug in an in-memory fetcher and count how many
// requests a chain makes.
//
// A fetcher returns the raw page (final URL + body). Turning it into a
// Document (parsing) is done by `fetch_document`, outside the async part, so
// the parsed tree never has to cross an await point.
// =============================================================================

mod http;

use async_trait::async_trait;
use url::Url;

use crate::document::Document;
use crate::error::FetchError;

pub use http::{FetchConfig, HttpFetcher};

/// A downloaded page, before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL after redirects; relative links resolve against it
    pub url: Url,
    pub body: String,
}

/// Anything that can download a page.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Downloads `url` and parses it.
pub async fn fetch_document<F: Fetcher + ?Sized>(fetcher: &F, url: &Url) -> Result<Document, FetchError> {
    let page = fetcher.fetch(url).await?;
    Ok(Document::parse(page.body, page.url))
}
