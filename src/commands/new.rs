//! Create a new blog post

use anyhow::{bail, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Front-matter written into a fresh post
#[derive(Serialize)]
struct Scaffold<'a> {
    title: &'a str,
    description: &'a str,
    date: String,
    author: &'a str,
    category: &'a str,
    tags: &'a [String],
    #[serde(rename = "readTime")]
    read_time: &'a str,
}

/// Create `<content_dir>/<slug>.<ext>` with a front-matter scaffold
pub fn create_post(
    site: &Site,
    title: &str,
    category: Option<&str>,
    tags: &[String],
) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        bail!("Cannot derive a file name from title: {:?}", title);
    }

    let blog = &site.config.blog;
    let file_path = site
        .content_dir
        .join(format!("{}.{}", slug, blog.extension));

    // Check if file already exists
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let scaffold = Scaffold {
        title,
        description: "",
        date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
        author: &site.config.author,
        category: category.unwrap_or(&blog.default_category),
        tags,
        read_time: &blog.default_read_time,
    };
    let front_matter = serde_yaml::to_string(&scaffold)?;
    let content = format!("---\n{}---\n\n# {}\n", front_matter, title);

    fs::create_dir_all(&site.content_dir)?;
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::tempdir;

    fn site(dir: &std::path::Path) -> Site {
        Site::with_config(dir.to_path_buf(), SiteConfig::default())
    }

    #[test]
    fn test_create_post_is_loadable() {
        let dir = tempdir().unwrap();
        let site = site(dir.path());
        let tags = vec!["rust".to_string(), "web".to_string()];

        let path = create_post(&site, "Hello: Données & Co", Some("Tech"), &tags).unwrap();
        assert_eq!(path.file_name().unwrap(), "hello-donnees-co.mdx");

        let post = site
            .content_loader()
            .get_by_slug("hello-donnees-co")
            .unwrap()
            .unwrap();
        assert_eq!(post.title, "Hello: Données & Co");
        assert_eq!(post.category, "Tech");
        assert_eq!(post.tags, tags);
        assert_eq!(post.read_time, "5 min read");
    }

    #[test]
    fn test_create_post_uses_default_category() {
        let dir = tempdir().unwrap();
        let site = site(dir.path());
        create_post(&site, "Plain", None, &[]).unwrap();

        let post = site.content_loader().get_by_slug("plain").unwrap().unwrap();
        assert_eq!(post.category, "General");
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_create_post_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let site = site(dir.path());
        create_post(&site, "Twice", None, &[]).unwrap();
        assert!(create_post(&site, "Twice", None, &[]).is_err());
    }

    #[test]
    fn test_create_post_rejects_empty_slug() {
        let dir = tempdir().unwrap();
        assert!(create_post(&site(dir.path()), "!!!", None, &[]).is_err());
    }
}
