//! Content loader - reads blog posts from the content directory
//!
//! Nothing is cached: every call goes back to the filesystem.

use indexmap::IndexSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{BlogPost, BlogSettings, FrontMatter, FrontMatterError};

/// Failure while reading posts
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list content directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("malformed front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}

/// Loads blog posts from one content directory
#[derive(Debug, Clone)]
pub struct ContentLoader {
    root: PathBuf,
    settings: BlogSettings,
}

impl ContentLoader {
    /// Create a new content loader over `root`
    pub fn new<P: Into<PathBuf>>(root: P, settings: BlogSettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every post, newest first
    ///
    /// A missing directory is an empty blog. Any unreadable or malformed
    /// file fails the whole listing.
    pub fn list_all(&self) -> Result<Vec<BlogPost>, ContentError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(slug) = self.slug_of(path) {
                posts.push(self.load_post(path, &slug)?);
            }
        }

        // Plain string order on the dates; stable so ties keep filename order
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.root);
        Ok(posts)
    }

    /// Load the post stored as `<slug>.<ext>`
    ///
    /// `Ok(None)` means there is no such post.
    pub fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, ContentError> {
        if !is_safe_slug(slug) {
            return Ok(None);
        }

        let path = self
            .root
            .join(format!("{}.{}", slug, self.settings.extension));
        if !path.is_file() {
            return Ok(None);
        }

        self.load_post(&path, slug).map(Some)
    }

    /// Distinct categories in first-seen order
    pub fn list_categories(&self) -> Result<Vec<String>, ContentError> {
        let posts = self.list_all()?;
        let categories: IndexSet<String> = posts.into_iter().map(|p| p.category).collect();
        Ok(categories.into_iter().collect())
    }

    /// Distinct tags in first-seen order
    pub fn list_tags(&self) -> Result<Vec<String>, ContentError> {
        let posts = self.list_all()?;
        let tags: IndexSet<String> = posts.into_iter().flat_map(|p| p.tags).collect();
        Ok(tags.into_iter().collect())
    }

    pub fn filter_by_category(&self, category: &str) -> Result<Vec<BlogPost>, ContentError> {
        let mut posts = self.list_all()?;
        posts.retain(|p| p.in_category(category));
        Ok(posts)
    }

    pub fn filter_by_tag(&self, tag: &str) -> Result<Vec<BlogPost>, ContentError> {
        let mut posts = self.list_all()?;
        posts.retain(|p| p.has_tag(tag));
        Ok(posts)
    }

    /// The `count` newest posts
    pub fn recent(&self, count: usize) -> Result<Vec<BlogPost>, ContentError> {
        let mut posts = self.list_all()?;
        posts.truncate(count);
        Ok(posts)
    }

    /// Slug for a file carrying the content extension
    fn slug_of(&self, path: &Path) -> Option<String> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        if ext != self.settings.extension {
            return None;
        }
        path.file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path, slug: &str) -> Result<BlogPost, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) =
            FrontMatter::parse(&content).map_err(|source| ContentError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(BlogPost::from_parts(slug, fm, body, &self.settings))
    }
}

/// A slug must name a file directly inside the content directory
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_post(dir: &Path, name: &str, front: &str, body: &str) {
        let content = format!("---\n{}\n---\n{}", front, body);
        fs::write(dir.join(name), content).unwrap();
    }

    fn fixture() -> (TempDir, ContentLoader) {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "a.mdx",
            "title: Post A\ndate: 2024-01-01\ncategory: Tech\ntags: [Rust, Data]",
            "Body of A",
        );
        write_post(
            dir.path(),
            "b.mdx",
            "title: Post B\ndate: 2024-06-01\ncategory: Data\ntags: [data, SQL]",
            "Body of B",
        );
        let loader = ContentLoader::new(dir.path(), BlogSettings::default());
        (dir, loader)
    }

    fn slugs(posts: &[BlogPost]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_list_all_sorted_newest_first() {
        let (_dir, loader) = fixture();
        let posts = loader.list_all().unwrap();
        assert_eq!(slugs(&posts), vec!["b", "a"]);
        for pair in posts.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }

    #[test]
    fn test_list_categories_first_seen_order() {
        let (_dir, loader) = fixture();
        assert_eq!(loader.list_categories().unwrap(), vec!["Data", "Tech"]);
    }

    #[test]
    fn test_list_tags_distinct() {
        let (_dir, loader) = fixture();
        // Tag dedup is exact; case variants are distinct values
        assert_eq!(
            loader.list_tags().unwrap(),
            vec!["data", "SQL", "Rust", "Data"]
        );
    }

    #[test]
    fn test_filters_are_case_insensitive() {
        let (_dir, loader) = fixture();
        assert_eq!(slugs(&loader.filter_by_category("tech").unwrap()), vec!["a"]);
        assert_eq!(slugs(&loader.filter_by_tag("DATA").unwrap()), vec!["b", "a"]);
        assert_eq!(slugs(&loader.filter_by_tag("sql").unwrap()), vec!["b"]);
    }

    #[test]
    fn test_filter_unknown_is_empty() {
        let (_dir, loader) = fixture();
        assert!(loader.filter_by_category("Nope").unwrap().is_empty());
        assert!(loader.filter_by_tag("nope").unwrap().is_empty());
    }

    #[test]
    fn test_recent() {
        let (_dir, loader) = fixture();
        assert_eq!(slugs(&loader.recent(1).unwrap()), vec!["b"]);
        assert_eq!(loader.recent(10).unwrap().len(), 2);
    }

    #[test]
    fn test_get_by_slug_round_trip() {
        let (_dir, loader) = fixture();
        for post in loader.list_all().unwrap() {
            let found = loader.get_by_slug(&post.slug).unwrap().unwrap();
            assert_eq!(found.slug, post.slug);
            assert_eq!(found.title, post.title);
        }
    }

    #[test]
    fn test_get_by_slug_missing() {
        let (_dir, loader) = fixture();
        assert!(loader.get_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn test_get_by_slug_rejects_traversal() {
        let (dir, loader) = fixture();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write_post(&nested, "c.mdx", "title: C", "");
        assert!(loader.get_by_slug("nested/c").unwrap().is_none());
        assert!(loader.get_by_slug("../a").unwrap().is_none());
        assert!(loader.get_by_slug("").unwrap().is_none());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ContentLoader::new(dir.path().join("absent"), BlogSettings::default());
        assert!(loader.list_all().unwrap().is_empty());
        assert!(loader.list_categories().unwrap().is_empty());
        assert!(loader.get_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn test_ignores_other_extensions_and_subdirectories() {
        let (dir, loader) = fixture();
        fs::write(dir.path().join("notes.md"), "---\ntitle: Notes\n---\n").unwrap();
        fs::write(dir.path().join("README"), "readme").unwrap();
        let nested = dir.path().join("drafts");
        fs::create_dir(&nested).unwrap();
        write_post(&nested, "d.mdx", "title: Draft", "");

        assert_eq!(slugs(&loader.list_all().unwrap()), vec!["b", "a"]);
    }

    #[test]
    fn test_malformed_file_aborts_listing() {
        let (dir, loader) = fixture();
        fs::write(dir.path().join("broken.mdx"), "---\ntitle: [oops\n---\nBody").unwrap();

        let err = loader.list_all().unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));

        // Single lookups report it for the caller to decide
        assert!(loader.get_by_slug("broken").is_err());
        assert!(loader.get_by_slug("a").unwrap().is_some());
    }

    #[test]
    fn test_equal_dates_keep_filename_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.mdx", "a.mdx", "b.mdx"] {
            write_post(dir.path(), name, "date: 2024-03-03", "");
        }
        let loader = ContentLoader::new(dir.path(), BlogSettings::default());
        assert_eq!(slugs(&loader.list_all().unwrap()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_date_order_is_lexicographic() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "short.mdx", "date: 2024-1-9", "");
        write_post(dir.path(), "padded.mdx", "date: 2024-01-10", "");
        let loader = ContentLoader::new(dir.path(), BlogSettings::default());
        // "2024-1-9" > "2024-01-10" as strings, so it sorts first
        assert_eq!(slugs(&loader.list_all().unwrap()), vec!["short", "padded"]);
    }
}
