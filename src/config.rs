// src/config.rs
// =============================================================================
// Loading the run configuration from files.
//
// Three inputs:
// - the website list: CSV, one `label;url` per line, `#` starts a comment
// - a plain checker list: one checker name per line, run as a single chain
// - a criteria file, for several named chains, in TOML:
//
//       [[criterion]]
//       name = "accessibility"
//       checkers = ["AccessChecker", "AccessLinkChecker", "AccessRateChecker"]
//
//   or in YAML (.yaml / .yml), one mapping entry per criterion:
//
//       accessibility: [AccessChecker, AccessLinkChecker, AccessRateChecker]
//       lang:
//         - LangChecker
//
// Checker names are checked against the registry here, before any website is
// fetched: an unknown name stops the run.
// =============================================================================

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::analysis::{Criterion, Website};
use crate::checker::CheckerRegistry;
use crate::error::ConfigError;

/// A criterion as written in configuration, before checker lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CriterionSpec {
    pub name: String,
    pub checkers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CriteriaFile {
    #[serde(rename = "criterion", default)]
    criteria: Vec<CriterionSpec>,
}

/// Criteria used when no checker list or criteria file is given.
pub fn default_criteria() -> Vec<CriterionSpec> {
    let spec = |name: &str, checkers: &[&str]| CriterionSpec {
        name: name.to_string(),
        checkers: checkers.iter().map(|c| c.to_string()).collect(),
    };
    vec![
        spec(
            "accessibility",
            &["AccessChecker", "AccessLinkChecker", "AccessRateChecker"],
        ),
        spec("doctype", &["DoctypeChecker"]),
        spec("lang", &["LangChecker"]),
        spec("legal", &["LegalChecker"]),
        spec("contact", &["ContactLinkChecker"]),
    ]
}

/// Reads the `label;url` website list.
pub fn read_websites(path: &Path) -> Result<Vec<Website>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open website list {}", path.display()))?;

    let mut websites = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("Failed to read {}", path.display()))?;
        let line = row.position().map_or(index as u64 + 1, |p| p.line());
        let field = |i: usize| row.get(i).filter(|value| !value.is_empty());

        match (field(0), field(1)) {
            (Some(label), Some(url)) => websites.push(Website {
                label: label.to_string(),
                url: url.to_string(),
            }),
            _ => {
                return Err(anyhow!(
                    "{}:{}: expected `label;url`",
                    path.display(),
                    line
                ))
            }
        }
    }
    Ok(websites)
}

/// Reads a plain list of checker names.
pub fn read_checker_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read checker list {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Reads a criteria file, YAML when the extension says so, TOML otherwise.
/// Criteria keep their order in the file.
pub fn read_criteria(path: &Path) -> Result<Vec<CriterionSpec>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read criteria file {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        parse_yaml_criteria(&content)
    } else {
        toml::from_str::<CriteriaFile>(&content)
            .map(|file| file.criteria)
            .map_err(anyhow::Error::from)
    };
    parsed.with_context(|| format!("Failed to parse {}", path.display()))
}

// `name: [checkers...]`. serde_yaml's Mapping keeps the file order.
fn parse_yaml_criteria(content: &str) -> Result<Vec<CriterionSpec>> {
    let mapping: serde_yaml::Mapping = match serde_yaml::from_str::<serde_yaml::Value>(content)? {
        serde_yaml::Value::Null => return Ok(Vec::new()),
        value => serde_yaml::from_value(value)?,
    };

    mapping
        .into_iter()
        .map(|(name, checkers)| -> Result<CriterionSpec> {
            let name = name
                .as_str()
                .ok_or_else(|| anyhow!("criterion names must be strings"))?
                .to_string();
            let checkers = match checkers {
                serde_yaml::Value::Null => Vec::new(),
                value => serde_yaml::from_value(value)
                    .with_context(|| format!("criterion '{name}' must list checker names"))?,
            };
            Ok(CriterionSpec { name, checkers })
        })
        .collect()
}

/// Turns configuration into runnable criteria, failing on the first bad name.
pub fn build_criteria(specs: &[CriterionSpec], registry: &CheckerRegistry) -> Result<Vec<Criterion>, ConfigError> {
    if specs.is_empty() {
        return Err(ConfigError::NoCriteria);
    }
    specs
        .iter()
        .map(|spec| Criterion::new(spec.name.clone(), registry.create_all(&spec.checkers)?))
        .collect()
}
