//! Blog post model

use serde::Serialize;

use super::FrontMatter;
use crate::config::BlogConfig;

/// Characters stripped from the body before cutting the excerpt
const MARKUP_CHARS: [char; 3] = ['#', '*', '`'];

/// Field defaults applied when the front-matter leaves them out
#[derive(Debug, Clone)]
pub struct BlogSettings {
    /// Extension of post files, without the dot
    pub extension: String,
    pub default_author: String,
    pub default_category: String,
    pub default_read_time: String,
    pub excerpt_length: usize,
}

impl BlogSettings {
    pub fn from_config(blog: &BlogConfig, author: &str) -> Self {
        Self {
            extension: blog.extension.clone(),
            default_author: author.to_string(),
            default_category: blog.default_category.clone(),
            default_read_time: blog.default_read_time.clone(),
            excerpt_length: blog.excerpt_length,
        }
    }
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self::from_config(&BlogConfig::default(), "Saturne Lab")
    }
}

/// A blog post, read-only projection of one content file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Filename stem, unique across the content set
    pub slug: String,
    pub title: String,
    pub description: String,
    /// ISO date string as written in the front-matter
    pub date: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub read_time: String,
    /// Raw MDX body
    pub content: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub image_credit: Option<String>,
}

impl BlogPost {
    /// Build a post from parsed front-matter and body, applying defaults
    pub fn from_parts(slug: &str, fm: FrontMatter, body: &str, settings: &BlogSettings) -> Self {
        let description = fm.description.unwrap_or_default();
        let excerpt = if description.is_empty() {
            derive_excerpt(body, settings.excerpt_length)
        } else {
            description.clone()
        };

        Self {
            slug: slug.to_string(),
            title: fm.title.unwrap_or_else(|| "Untitled".to_string()),
            description,
            date: fm.date.unwrap_or_else(now_iso),
            author: fm
                .author
                .unwrap_or_else(|| settings.default_author.clone()),
            category: fm
                .category
                .unwrap_or_else(|| settings.default_category.clone()),
            tags: fm.tags,
            read_time: fm
                .read_time
                .unwrap_or_else(|| settings.default_read_time.clone()),
            content: body.to_string(),
            excerpt,
            image: fm.image,
            image_credit: fm.image_credit,
        }
    }

    /// Case-insensitive category match
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// Case-insensitive tag match
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

/// First `length` characters of the body with markup characters removed
fn derive_excerpt(body: &str, length: usize) -> String {
    let mut excerpt: String = body
        .chars()
        .filter(|c| !MARKUP_CHARS.contains(c))
        .take(length)
        .collect();
    excerpt.push_str("...");
    excerpt
}

/// Current time in the same shape JavaScript's `toISOString` produces
fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
