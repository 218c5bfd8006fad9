// src/lib.rs
// =============================================================================
// wasc: Websites Accessibility Criteria Checker.
//
// The library holds the whole analysis engine; src/main.rs only parses the
// command line, loads the files and prints the report.
//
// Modules, from the inside out:
// - document: a fetched page (tree, text, resolved links)
// - checker: the individual checks and their registry
// - fetch: page download (trait + reqwest implementation)
// - analysis: criterion chains and the per-website orchestrator
// - config: website list / checker list / criteria file loading
// - report: JSON and CSV output
// - progress: per-website progress bar on stderr
// - error: configuration and fetch errors
// =============================================================================

pub mod analysis;
pub mod checker;
pub mod config;
pub mod document;
pub mod error;
pub mod fetch;
pub mod progress;
pub mod report;
