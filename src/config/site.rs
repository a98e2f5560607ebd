//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating the site configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no supported locales configured")]
    NoLocales,

    #[error("default locale `{0}` is not in the supported locales")]
    DefaultLocaleUnsupported(String),

    #[error("locale code `{0}` must be a non-empty alphanumeric segment")]
    InvalidLocaleCode(String),
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    /// Brand name, also the fallback post author
    pub author: String,
    pub email: String,
    /// Logo path under `url`
    pub logo: String,
    /// Profile URLs of the brand on other sites
    pub social: Vec<String>,

    // URL
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub locales_dir: String,

    #[serde(default)]
    pub i18n: I18nConfig,

    #[serde(default)]
    pub blog: BlogConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Saturne Lab".to_string(),
            description: String::new(),
            author: "Saturne Lab".to_string(),
            email: "contact@saturne-lab.com".to_string(),
            logo: "/images/saturne_lab_logo.png".to_string(),
            social: Vec::new(),

            url: "https://www.saturne-lab.com".to_string(),

            content_dir: "content/posts".to_string(),
            public_dir: "public".to_string(),
            locales_dir: "public/locales".to_string(),

            i18n: I18nConfig::default(),
            blog: BlogConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let i18n = &self.i18n;
        if i18n.locales.is_empty() {
            return Err(ConfigError::NoLocales);
        }
        for code in &i18n.locales {
            if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(ConfigError::InvalidLocaleCode(code.clone()));
            }
        }
        if !i18n.locales.contains(&i18n.default_locale) {
            return Err(ConfigError::DefaultLocaleUnsupported(
                i18n.default_locale.clone(),
            ));
        }
        Ok(())
    }
}

/// Locale configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub default_locale: String,
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "fr".to_string(),
            locales: vec!["fr".to_string(), "en".to_string()],
        }
    }
}

/// Blog content configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Extension of post files, without the dot
    pub extension: String,
    pub excerpt_length: usize,
    pub default_category: String,
    pub default_read_time: String,
    /// Number of posts shown on the home page
    pub recent_posts: usize,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            extension: "mdx".to_string(),
            excerpt_length: 160,
            default_category: "General".to_string(),
            default_read_time: "5 min read".to_string(),
            recent_posts: 3,
        }
    }
}
