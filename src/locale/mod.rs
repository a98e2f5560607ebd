//! Locales supported by the site and per-request locale resolution

pub mod router;

use serde::Serialize;
use std::fmt;

use crate::config::{ConfigError, I18nConfig};

pub use router::{LocaleRouter, Route};

/// Name of the header carrying the detected locale to page handlers
pub const LOCALE_HEADER: &str = "x-locale";

/// A supported locale code
///
/// Only [`Locales`] hands these out, so holding a `Locale` means the code
/// is one the site is configured for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Visible URL of `bare_path` under this locale
    pub fn path(&self, bare_path: &str) -> String {
        match bare_path {
            "" | "/" => format!("/{}", self.0),
            p if p.starts_with('/') => format!("/{}{}", self.0, p),
            p => format!("/{}/{}", self.0, p),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of supported locales with one designated default
#[derive(Debug, Clone)]
pub struct Locales {
    default: Locale,
    supported: Vec<Locale>,
}

impl Locales {
    /// Build the locale set from configuration
    pub fn from_config(config: &I18nConfig) -> Result<Self, ConfigError> {
        if config.locales.is_empty() {
            return Err(ConfigError::NoLocales);
        }
        if !config.locales.contains(&config.default_locale) {
            return Err(ConfigError::DefaultLocaleUnsupported(
                config.default_locale.clone(),
            ));
        }

        let mut supported: Vec<Locale> = Vec::with_capacity(config.locales.len());
        for code in &config.locales {
            if code.is_empty() || code.contains(['/', '.']) {
                return Err(ConfigError::InvalidLocaleCode(code.clone()));
            }
            let locale = Locale(code.clone());
            if !supported.contains(&locale) {
                supported.push(locale);
            }
        }

        Ok(Self {
            default: Locale(config.default_locale.clone()),
            supported,
        })
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    /// All supported locales, in configuration order
    pub fn all(&self) -> &[Locale] {
        &self.supported
    }

    /// Look up a supported locale by its exact code
    pub fn parse(&self, code: &str) -> Option<&Locale> {
        self.supported.iter().find(|l| l.code() == code)
    }

    /// Locale named by the first segment of `path`, if supported
    pub fn from_path(&self, path: &str) -> Option<&Locale> {
        let first = path.trim_start_matches('/').split('/').next()?;
        self.parse(first)
    }

    /// Resolve the locale of a page request
    ///
    /// The header set by the locale router wins. Without it the visible
    /// path is inspected, and the default locale is the last resort.
    pub fn resolve(&self, header: Option<&str>, visible_path: &str) -> &Locale {
        header
            .and_then(|code| self.parse(code.trim()))
            .or_else(|| self.from_path(visible_path))
            .unwrap_or(&self.default)
    }
}
