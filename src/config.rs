//! Per-compile configuration.
//!
//! A [`VisitorConfig`] is an immutable value handed to every
//! [`PredicateVisitor::start`](crate::PredicateVisitor::start) call. Changing
//! it means building a new value, so compiles running on other threads
//! never observe a half-applied change.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("alias '{0}' must map to a non-empty selector")]
    EmptyAlias(String),
}

/// Selectors a compile may reference, how they map onto the model, and how
/// string equality is read.
///
/// # Examples
///
/// ```
/// use fiql_predicate::VisitorConfig;
///
/// let config = VisitorConfig::new(["name", "born"])
///     .alias("born", "birthDate")
///     .with_always_wildcard(true);
///
/// assert!(config.is_allowed("born"));
/// assert!(!config.is_allowed("birthDate"));
/// assert_eq!(config.map_selector("born"), "birthDate");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisitorConfig {
    /// Selectors, as written in queries, that may be resolved
    pub allowed_selectors: BTreeSet<String>,

    /// External selector name to internal attribute path
    pub selector_aliases: BTreeMap<String, String>,

    /// Read every string `==`/`!=` as a "contains" pattern match
    pub always_wildcard: bool,
}

impl VisitorConfig {
    pub fn new<I, S>(allowed_selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        VisitorConfig {
            allowed_selectors: allowed_selectors.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn allow(mut self, selector: impl Into<String>) -> Self {
        self.allowed_selectors.insert(selector.into());
        self
    }

    /// Map the external selector `external` onto the internal path `internal`.
    ///
    /// Only `external` is checked against the allow-list.
    pub fn alias(mut self, external: impl Into<String>, internal: impl Into<String>) -> Self {
        self.selector_aliases.insert(external.into(), internal.into());
        self
    }

    pub fn with_always_wildcard(mut self, always_wildcard: bool) -> Self {
        self.always_wildcard = always_wildcard;
        self
    }

    pub fn is_allowed(&self, selector: &str) -> bool {
        self.allowed_selectors.contains(selector)
    }

    /// The internal path for `selector`, or the selector itself when it has no alias.
    pub fn map_selector<'a>(&'a self, selector: &'a str) -> &'a str {
        self.selector_aliases
            .get(selector)
            .map_or(selector, String::as_str)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: VisitorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.selector_aliases.iter().find(|(_, internal)| internal.is_empty()) {
            Some((external, _)) => Err(ConfigError::EmptyAlias(external.clone())),
            None => Ok(()),
        }
    }
}
