//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded in the binary. Page text comes from the
//! translation bundle passed in as `t`.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all site templates loaded
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("page.html", include_str!("site/page.html")),
            ("blog_index.html", include_str!("site/blog_index.html")),
            ("post.html", include_str!("site/post.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            (
                "partials/post_card.html",
                include_str!("site/partials/post_card.html"),
            ),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(template_name, context)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: format an ISO date string for display
///
/// `months` is a list of twelve month names and `pattern` uses the
/// `{day}`, `{month}` and `{year}` placeholders. Unparseable input is
/// returned unchanged.
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let Some(date) = parse_iso_date(&s) else {
        return Ok(tera::Value::String(s));
    };

    let pattern = args
        .get("pattern")
        .and_then(|v| v.as_str())
        .unwrap_or("{month} {day}, {year}");
    let month = args
        .get("months")
        .and_then(|v| v.as_array())
        .and_then(|months| months.get(date.month0() as usize))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| date.format("%B").to_string());

    Ok(tera::Value::String(
        pattern
            .replace("{month}", &month)
            .replace("{day}", &date.day().to_string())
            .replace("{year}", &date.year().to_string()),
    ))
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub url: String,
    pub email: String,
    pub author: String,
}

/// Shell data shared by every page
#[derive(Debug, Clone, Serialize)]
pub struct LayoutData {
    pub lang: String,
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub alternates: Vec<Alternate>,
    pub x_default: String,
    pub nav: Vec<NavLink>,
    pub languages: Vec<LanguageLink>,
    pub home_url: String,
    pub year: i32,
    /// Serialized JSON-LD documents
    pub structured_data: Vec<String>,
}

/// `hreflang` alternate of the current page
#[derive(Debug, Clone, Serialize)]
pub struct Alternate {
    pub hreflang: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Language switcher entry pointing at the current page
#[derive(Debug, Clone, Serialize)]
pub struct LanguageLink {
    pub code: String,
    pub href: String,
    pub current: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkData {
    pub name: String,
    pub url: String,
}

/// Post fields as shown in lists
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub author: String,
    pub category: LinkData,
    pub tags: Vec<LinkData>,
    pub read_time: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub image_credit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, tera::Value)]) -> HashMap<String, tera::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_date_format_default_english() {
        let out = date_format_filter(&tera::Value::from("2024-06-01"), &HashMap::new()).unwrap();
        assert_eq!(out, "June 1, 2024");
    }

    #[test]
    fn test_date_format_localized() {
        let months: Vec<tera::Value> = [
            "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
            "septembre", "octobre", "novembre", "décembre",
        ]
        .iter()
        .map(|m| tera::Value::from(*m))
        .collect();
        let args = args(&[
            ("months", tera::Value::Array(months)),
            ("pattern", tera::Value::from("{day} {month} {year}")),
        ]);
        let out =
            date_format_filter(&tera::Value::from("2024-08-15T09:00:00.000Z"), &args).unwrap();
        assert_eq!(out, "15 août 2024");
    }

    #[test]
    fn test_date_format_keeps_unparseable() {
        let out = date_format_filter(&tera::Value::from("soon"), &HashMap::new()).unwrap();
        assert_eq!(out, "soon");
    }

    #[test]
    fn test_truncate_chars() {
        let args = args(&[("length", tera::Value::from(5))]);
        let out = truncate_chars_filter(&tera::Value::from("données ouvertes"), &args).unwrap();
        assert_eq!(out, "donné...");
        let out = truncate_chars_filter(&tera::Value::from("court"), &args).unwrap();
        assert_eq!(out, "court");
    }
}
