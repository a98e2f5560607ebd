//! List site content

use anyhow::{bail, Result};
use indexmap::IndexMap;

use crate::content::BlogPost;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let loader = site.content_loader();
    let posts = loader.list_all()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", posts.len());
            for post in &posts {
                println!(
                    "  {} - {} [{}] ({})",
                    short_date(&post.date),
                    post.title,
                    post.slug,
                    post.category
                );
            }
        }
        "category" | "categories" => {
            let counts = count(&posts, |post| vec![post.category.as_str()]);
            println!("Categories ({}):", counts.len());
            for (category, n) in counts {
                println!("  {} ({})", category, n);
            }
        }
        "tag" | "tags" => {
            let counts = count(&posts, |post| post.tags.iter().map(String::as_str).collect());
            println!("Tags ({}):", counts.len());
            for (tag, n) in counts {
                println!("  {} ({})", tag, n);
            }
        }
        _ => {
            bail!(
                "Unknown type: {}. Use post, category or tag.",
                content_type
            );
        }
    }

    Ok(())
}

/// Occurrences per key, most used first, ties in first-seen order
fn count<'a, F>(posts: &'a [BlogPost], keys: F) -> Vec<(&'a str, usize)>
where
    F: Fn(&'a BlogPost) -> Vec<&'a str>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for post in posts {
        for key in keys(post) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// `YYYY-MM-DD` part of an ISO date
fn short_date(date: &str) -> &str {
    date.get(..10).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::tempdir;

    fn post(slug: &str, category: &str, tags: &[&str]) -> BlogPost {
        BlogPost {
            slug: slug.to_string(),
            title: slug.to_string(),
            description: String::new(),
            date: "2024-01-01".to_string(),
            author: "Saturne Lab".to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            read_time: "5 min read".to_string(),
            content: String::new(),
            excerpt: String::new(),
            image: None,
            image_credit: None,
        }
    }

    #[test]
    fn test_count_orders_by_usage() {
        let posts = vec![
            post("a", "Tech", &["rust"]),
            post("b", "Data", &["sql", "rust"]),
            post("c", "Data", &[]),
        ];
        let categories = count(&posts, |p| vec![p.category.as_str()]);
        assert_eq!(categories, vec![("Data", 2), ("Tech", 1)]);

        let tags = count(&posts, |p| p.tags.iter().map(String::as_str).collect());
        assert_eq!(tags, vec![("rust", 2), ("sql", 1)]);
    }

    #[test]
    fn test_short_date() {
        assert_eq!(short_date("2024-06-01T10:00:00.000Z"), "2024-06-01");
        assert_eq!(short_date("soon"), "soon");
    }

    #[test]
    fn test_run_rejects_unknown_type() {
        let dir = tempdir().unwrap();
        let site = Site::with_config(dir.path().to_path_buf(), SiteConfig::default());
        fs::create_dir_all(&site.content_dir).unwrap();
        assert!(run(&site, "post").is_ok());
        assert!(run(&site, "page").is_err());
    }
}
