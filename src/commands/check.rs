//! Validate site content and translations

use anyhow::{bail, Result};

use crate::i18n::Catalog;
use crate::locale::Locales;
use crate::Site;

/// Load every post and compare every locale against the default one
///
/// Prints each problem found and fails if there was any.
pub fn run(site: &Site) -> Result<()> {
    let mut problems = 0;

    match site.content_loader().list_all() {
        Ok(posts) => println!("Posts: {} loaded", posts.len()),
        Err(e) => {
            println!("  content: {}", e);
            problems += 1;
        }
    }

    let locales = Locales::from_config(&site.config.i18n)?;
    match Catalog::load(&site.locales_dir, &locales) {
        Ok(catalog) => {
            let issues = catalog.validate();
            println!(
                "Translations: {} locales, {} issues",
                locales.all().len(),
                issues.len()
            );
            for issue in &issues {
                println!("  {}", issue);
            }
            problems += issues.len();
        }
        Err(e) => {
            println!("  translations: {}", e);
            problems += 1;
        }
    }

    if problems > 0 {
        bail!("{} problem(s) found", problems);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site(dir: &Path) -> Site {
        Site::with_config(dir.to_path_buf(), SiteConfig::default())
    }

    #[test]
    fn test_check_passes_on_consistent_site() {
        let dir = tempdir().unwrap();
        let site = site(dir.path());
        write(
            &site.content_dir.join("a.mdx"),
            "---\ntitle: A\ndate: 2024-01-01\n---\nBody",
        );
        write(
            &site.locales_dir.join("fr/common.json"),
            r#"{"nav": {"home": "Accueil"}}"#,
        );
        write(
            &site.locales_dir.join("en/common.json"),
            r#"{"nav": {"home": "Home"}}"#,
        );
        assert!(run(&site).is_ok());
    }

    #[test]
    fn test_check_reports_missing_keys() {
        let dir = tempdir().unwrap();
        let site = site(dir.path());
        write(
            &site.locales_dir.join("fr/common.json"),
            r#"{"nav": {"home": "Accueil", "blog": "Blog"}}"#,
        );
        write(
            &site.locales_dir.join("en/common.json"),
            r#"{"nav": {"home": "Home"}}"#,
        );
        assert!(run(&site).is_err());
    }

    #[test]
    fn test_check_reports_malformed_post() {
        let dir = tempdir().unwrap();
        let site = site(dir.path());
        write(
            &site.content_dir.join("bad.mdx"),
            "---\ntitle: [unclosed\n---\nBody",
        );
        assert!(run(&site).is_err());
    }
}
