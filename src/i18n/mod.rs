//! Internationalization (i18n) support
//!
//! Translations live in `<locales_dir>/<code>/common.json` (or `.yml`).
//! Every value is a [`Translation`]: a string, a list, or a nested group.
//! The default locale is the schema: other locales must provide the same
//! key paths with the same shapes, which [`Catalog::validate`] checks.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::locale::{Locale, Locales};

/// Translation namespace shipped with the site
pub const NAMESPACE: &str = "common";

/// Failure while loading translation files
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("failed to read language file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse language file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// One translation value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Translation {
    Text(String),
    List(Vec<Translation>),
    Group(IndexMap<String, Translation>),
}

/// Shape of a translation value, used for schema checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Text,
    List,
    Group,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Text => f.write_str("text"),
            Shape::List => f.write_str("list"),
            Shape::Group => f.write_str("group"),
        }
    }
}

impl Translation {
    pub fn shape(&self) -> Shape {
        match self {
            Translation::Text(_) => Shape::Text,
            Translation::List(_) => Shape::List,
            Translation::Group(_) => Shape::Group,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Translation::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Follow a dotted key path below this value
    fn get_path(&self, key: &str) -> Option<&Translation> {
        key.split('.').try_fold(self, |current, part| match current {
            Translation::Group(map) => map.get(part),
            Translation::List(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
            Translation::Text(_) => None,
        })
    }
}

/// What is wrong with one key of one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// The key exists in the default locale only
    Missing,
    /// The key exists with a different shape
    ShapeMismatch { expected: Shape, found: Shape },
    /// The key does not exist in the default locale
    Unexpected,
}

/// A schema violation found by [`Catalog::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub locale: Locale,
    pub key: String,
    pub kind: IssueKind,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Missing => write!(f, "[{}] missing key `{}`", self.locale, self.key),
            IssueKind::ShapeMismatch { expected, found } => write!(
                f,
                "[{}] key `{}` should be {} but is {}",
                self.locale, self.key, expected, found
            ),
            IssueKind::Unexpected => write!(
                f,
                "[{}] key `{}` is not defined for the default locale",
                self.locale, self.key
            ),
        }
    }
}

/// Translations for every supported locale
#[derive(Debug, Clone)]
pub struct Catalog {
    locales: Locales,
    /// Root group per locale
    resources: HashMap<Locale, Translation>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new(locales: Locales) -> Self {
        Self {
            locales,
            resources: HashMap::new(),
        }
    }

    /// Load the namespace file of every supported locale under `dir`
    pub fn load<P: AsRef<Path>>(dir: P, locales: &Locales) -> Result<Self, I18nError> {
        let dir = dir.as_ref();
        let mut catalog = Self::new(locales.clone());
        if !dir.exists() {
            tracing::warn!("Locales directory {:?} does not exist", dir);
            return Ok(catalog);
        }

        for locale in locales.all() {
            let base = dir.join(locale.code());
            let candidates = ["json", "yml", "yaml"]
                .map(|ext| base.join(format!("{}.{}", NAMESPACE, ext)));
            let Some(path) = candidates.iter().find(|p| p.is_file()) else {
                tracing::warn!("No translations for locale {}", locale);
                continue;
            };

            let resource = read_resource(path)?;
            catalog.insert(locale.clone(), resource);
            tracing::debug!("Loaded language file: {:?}", path);
        }

        Ok(catalog)
    }

    /// Register the root resource of a locale
    pub fn insert(&mut self, locale: Locale, resource: Translation) {
        self.resources.insert(locale, resource);
    }

    pub fn locales(&self) -> &Locales {
        &self.locales
    }

    /// Look up a key path, falling back to the default locale
    pub fn lookup(&self, locale: &Locale, key: &str) -> Option<&Translation> {
        self.lookup_exact(locale, key).or_else(|| {
            let default = self.locales.default_locale();
            if default != locale {
                self.lookup_exact(default, key)
            } else {
                None
            }
        })
    }

    fn lookup_exact(&self, locale: &Locale, key: &str) -> Option<&Translation> {
        self.resources.get(locale)?.get_path(key)
    }

    /// Translated text, or the key itself when missing
    pub fn text(&self, locale: &Locale, key: &str) -> String {
        self.lookup(locale, key)
            .and_then(Translation::as_text)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// The text items of a list value
    pub fn texts(&self, locale: &Locale, key: &str) -> Vec<String> {
        match self.lookup(locale, key) {
            Some(Translation::List(items)) => items
                .iter()
                .filter_map(Translation::as_text)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// All translations of `locale` layered over the default locale
    pub fn bundle(&self, locale: &Locale) -> serde_json::Value {
        let mut merged = self
            .resources
            .get(self.locales.default_locale())
            .cloned()
            .unwrap_or_else(|| Translation::Group(IndexMap::new()));
        if let Some(own) = self.resources.get(locale) {
            overlay(&mut merged, own);
        }
        serde_json::to_value(&merged).unwrap_or(serde_json::Value::Null)
    }

    /// Check every locale against the default locale's keys and shapes
    pub fn validate(&self) -> Vec<SchemaIssue> {
        let default = self.locales.default_locale();
        let empty = Translation::Group(IndexMap::new());
        let reference = self.resources.get(default).unwrap_or(&empty);

        let mut issues = Vec::new();
        for locale in self.locales.all() {
            if locale == default {
                continue;
            }
            let candidate = self.resources.get(locale).unwrap_or(&empty);
            compare(locale, "", reference, candidate, &mut issues);
        }
        issues
    }
}

/// Parse one language file by extension
fn read_resource(path: &Path) -> Result<Translation, I18nError> {
    let content = fs::read_to_string(path).map_err(|source| I18nError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let parsed: Result<Translation, String> = if is_json {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    };

    match parsed {
        Ok(resource @ Translation::Group(_)) => Ok(resource),
        Ok(other) => Err(I18nError::Parse {
            path: path.to_path_buf(),
            message: format!("top level must be a group, found {}", other.shape()),
        }),
        Err(message) => Err(I18nError::Parse {
            path: path.to_path_buf(),
            message,
        }),
    }
}

/// Replace values in `base` with those of `top`, recursing into groups
fn overlay(base: &mut Translation, top: &Translation) {
    match (base, top) {
        (Translation::Group(base_map), Translation::Group(top_map)) => {
            for (key, value) in top_map {
                match base_map.get_mut(key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, top) => *base = top.clone(),
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Walk `reference` and `candidate` together, collecting differences
fn compare(
    locale: &Locale,
    prefix: &str,
    reference: &Translation,
    candidate: &Translation,
    issues: &mut Vec<SchemaIssue>,
) {
    let (Translation::Group(ref_map), Translation::Group(cand_map)) = (reference, candidate)
    else {
        if reference.shape() != candidate.shape() {
            issues.push(SchemaIssue {
                locale: locale.clone(),
                key: prefix.to_string(),
                kind: IssueKind::ShapeMismatch {
                    expected: reference.shape(),
                    found: candidate.shape(),
                },
            });
        }
        return;
    };

    for (key, ref_value) in ref_map {
        let full_key = join_key(prefix, key);
        match cand_map.get(key) {
            Some(cand_value) => compare(locale, &full_key, ref_value, cand_value, issues),
            None => issues.push(SchemaIssue {
                locale: locale.clone(),
                key: full_key,
                kind: IssueKind::Missing,
            }),
        }
    }

    for key in cand_map.keys() {
        if !ref_map.contains_key(key) {
            issues.push(SchemaIssue {
                locale: locale.clone(),
                key: join_key(prefix, key),
                kind: IssueKind::Unexpected,
            });
        }
    }
}
