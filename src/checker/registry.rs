// src/checker/registry.rs
// =============================================================================
// Name -> checker lookup.
//
// Configuration files refer to checkers by name ("AccessChecker"). The
// registry turns those names into Checker values before any website is
// fetched, so a typo stops the run immediately instead of failing every
// website.
//
// Tag-driven checkers accept an argument after a colon:
//   "HeadLvlChecker:h1"   -> depths of the <h1> elements
//   "HeaderNbChecker"     -> count of <head> elements (default tag)
// =============================================================================

use std::collections::BTreeMap;

use super::Checker;
use crate::error::ConfigError;

// Names used by earlier versions of the checker lists
const ALIASES: [(&str, &str); 2] = [
    ("HeadNbChecker", "HeaderNbChecker"),
    ("MentionsLegalesChecker", "LegalChecker"),
];

/// Known checkers, by name.
#[derive(Debug, Clone)]
pub struct CheckerRegistry {
    prototypes: BTreeMap<&'static str, Checker>,
}

impl Default for CheckerRegistry {
    fn default() -> Self {
        Self::new(Checker::catalogue())
    }
}

impl CheckerRegistry {
    /// A registry holding exactly `checkers`
    pub fn new(checkers: impl IntoIterator<Item = Checker>) -> Self {
        let prototypes = checkers
            .into_iter()
            .map(|checker| (checker.name(), checker))
            .collect();
        Self { prototypes }
    }

    /// Registered checkers, sorted by name
    pub fn available(&self) -> impl Iterator<Item = &Checker> {
        self.prototypes.values()
    }

    /// Builds the checker described by `spec` (`Name` or `Name:tag`).
    pub fn create(&self, spec: &str) -> Result<Checker, ConfigError> {
        let spec = spec.trim();
        let (name, argument) = match spec.split_once(':') {
            Some((name, argument)) => (name.trim(), Some(argument.trim())),
            None => (spec, None),
        };

        let prototype = self
            .prototypes
            .get(canonical(name))
            .ok_or_else(|| ConfigError::UnknownChecker {
                name: name.to_string(),
                available: self.prototypes.keys().copied().collect::<Vec<_>>().join(", "),
            })?;

        let Some(tag) = argument else {
            return Ok(prototype.clone());
        };

        if !is_element_name(tag) {
            return Err(ConfigError::InvalidTag {
                checker: name.to_string(),
                tag: tag.to_string(),
            });
        }
        let tag = tag.to_ascii_lowercase();
        match prototype {
            Checker::HeadLvl { .. } => Ok(Checker::HeadLvl { tag }),
            Checker::HeaderNb { .. } => Ok(Checker::HeaderNb { tag }),
            _ => Err(ConfigError::UnexpectedArgument(name.to_string())),
        }
    }

    /// Builds every checker of a list, failing on the first bad name.
    pub fn create_all<S: AsRef<str>>(&self, specs: &[S]) -> Result<Vec<Checker>, ConfigError> {
        specs.iter().map(|spec| self.create(spec.as_ref())).collect()
    }
}

fn canonical(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, canonical)| *canonical)
}

// Plain element names only, so the tag can be used as a CSS selector as is
fn is_element_name(tag: &str) -> bool {
    tag.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
