//! saturne-lab: bilingual site server for the Saturne Lab website
//!
//! Every page lives under a locale prefix (`/fr/...`, `/en/...`). Blog
//! posts are MDX files with YAML front-matter, read from disk on each
//! request and rendered through embedded Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod i18n;
pub mod locale;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A site rooted at one directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Blog posts directory
    pub content_dir: PathBuf,
    /// Static files served as-is
    pub public_dir: PathBuf,
    /// Translation files, one directory per locale
    pub locales_dir: PathBuf,
}

impl Site {
    /// Open the site in `base_dir`, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Site with an explicit configuration, directories relative to `base_dir`
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let locales_dir = base_dir.join(&config.locales_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            locales_dir,
        }
    }

    /// Loader over the site's blog posts
    pub fn content_loader(&self) -> content::ContentLoader {
        let settings = content::BlogSettings::from_config(&self.config.blog, &self.config.author);
        content::ContentLoader::new(&self.content_dir, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_site_defaults_without_config() {
        let dir = tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.content_dir, dir.path().join("content/posts"));
        assert_eq!(site.locales_dir, dir.path().join("public/locales"));
        assert_eq!(site.config.i18n.default_locale, "fr");
    }

    #[test]
    fn test_site_reads_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Demo\ncontent_dir: posts\ni18n:\n  default_locale: en\n  locales: [en, fr]\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Demo");
        assert_eq!(site.content_dir, dir.path().join("posts"));
        assert_eq!(site.content_loader().root(), dir.path().join("posts"));
    }

    #[test]
    fn test_site_rejects_invalid_locales() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "i18n:\n  default_locale: de\n  locales: [fr, en]\n",
        )
        .unwrap();
        assert!(Site::new(dir.path()).is_err());
    }
}
