//! Localized HTML pages

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Datelike;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;

use super::{page_response, schema, AppState, PageLocale, ServerError};
use crate::content::{BlogPost, ContentError, ContentLoader};
use crate::locale::Locale;
use crate::templates::{
    Alternate, LanguageLink, LayoutData, LinkData, NavLink, PostSummary, SiteData,
};

/// Navigation entries: translation key and bare path
const NAV: [(&str, &str); 5] = [
    ("nav.home", "/"),
    ("nav.services", "/services"),
    ("nav.about", "/about"),
    ("nav.blog", "/blog"),
    ("nav.contact", "/contact"),
];

/// Bytes escaped in a slug used as a path segment
///
/// `.` is escaped too: dotted paths bypass the locale router as files.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'.')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Blog index filters
#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl BlogQuery {
    pub fn category(&self) -> Option<&str> {
        non_empty(self.category.as_deref())
    }

    pub fn tag(&self) -> Option<&str> {
        non_empty(self.tag.as_deref())
    }

    /// Posts matching both filters, newest first
    pub fn posts(&self, loader: &ContentLoader) -> Result<Vec<BlogPost>, ContentError> {
        match (self.category(), self.tag()) {
            (Some(category), Some(tag)) => Ok(loader
                .filter_by_category(category)?
                .into_iter()
                .filter(|p| p.has_tag(tag))
                .collect()),
            (Some(category), None) => loader.filter_by_category(category),
            (None, Some(tag)) => loader.filter_by_tag(tag),
            (None, None) => loader.list_all(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn home(
    State(state): State<Arc<AppState>>,
    PageLocale(locale): PageLocale,
) -> Result<Response, ServerError> {
    let posts = state.loader.recent(state.config.blog.recent_posts)?;

    let title = state.catalog.text(&locale, "home.hero.title");
    let description = state.catalog.text(&locale, "home.hero.subtitle");
    let mut context = page_context(&state, &locale, "/", &title, &description);
    context.insert("posts", &summaries(&locale, &posts));
    context.insert("blog_url", &locale.path("/blog"));
    context.insert("contact_url", &locale.path("/contact"));

    render(&state, "home.html", &context)
}

pub async fn about(
    State(state): State<Arc<AppState>>,
    PageLocale(locale): PageLocale,
) -> Result<Response, ServerError> {
    static_page(&state, &locale, "about")
}

pub async fn services(
    State(state): State<Arc<AppState>>,
    PageLocale(locale): PageLocale,
) -> Result<Response, ServerError> {
    static_page(&state, &locale, "services")
}

pub async fn contact(
    State(state): State<Arc<AppState>>,
    PageLocale(locale): PageLocale,
) -> Result<Response, ServerError> {
    static_page(&state, &locale, "contact")
}

/// Translated page whose whole content lives under `key` in the bundle
fn static_page(state: &AppState, locale: &Locale, key: &str) -> Result<Response, ServerError> {
    let bundle = state.catalog.bundle(locale);
    let page = bundle
        .get(key)
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));

    let title = state.catalog.text(locale, &format!("{}.title", key));
    let description = state.catalog.text(locale, &format!("{}.intro", key));
    let mut context = page_context(state, locale, &format!("/{}", key), &title, &description);
    context.insert("page", &page);
    context.insert("page_key", key);

    render(state, "page.html", &context)
}

pub async fn blog_index(
    State(state): State<Arc<AppState>>,
    PageLocale(locale): PageLocale,
    Query(query): Query<BlogQuery>,
) -> Result<Response, ServerError> {
    let posts = query.posts(&state.loader)?;
    let categories = state.loader.list_categories()?;
    let tags = state.loader.list_tags()?;

    let title = state.catalog.text(&locale, "blog.title");
    let description = state.catalog.text(&locale, "blog.description");
    let mut context = page_context(&state, &locale, "/blog", &title, &description);
    context.insert("posts", &summaries(&locale, &posts));
    context.insert("blog_url", &locale.path("/blog"));
    context.insert(
        "categories",
        &categories
            .iter()
            .map(|c| category_link(&locale, c))
            .collect::<Vec<_>>(),
    );
    context.insert(
        "tags",
        &tags.iter().map(|t| tag_link(&locale, t)).collect::<Vec<_>>(),
    );
    context.insert("active_category", query.category().unwrap_or(""));
    context.insert("active_tag", query.tag().unwrap_or(""));

    render(&state, "blog_index.html", &context)
}

pub async fn blog_post(
    State(state): State<Arc<AppState>>,
    PageLocale(locale): PageLocale,
    Path(slug): Path<String>,
) -> Result<Response, ServerError> {
    let bare = post_path(&slug);
    let post = match state.loader.get_by_slug(&slug) {
        Ok(Some(post)) => post,
        Ok(None) => return Ok(not_found(&state, &locale, &bare)),
        Err(e) => {
            tracing::warn!("Cannot load post {}: {}", slug, e);
            return Ok(not_found(&state, &locale, &bare));
        }
    };

    let html = state.markdown.render(&post.content);
    let mut context = page_context(&state, &locale, &bare, &post.title, &post.excerpt);
    context.insert("post", &summary(&locale, &post));
    context.insert("html", &html);
    context.insert("blog_url", &locale.path("/blog"));

    render(&state, "post.html", &context)
}

/// Localized 404 page for `bare_path`
pub fn not_found(state: &AppState, locale: &Locale, bare_path: &str) -> Response {
    let title = state.catalog.text(locale, "not_found.title");
    let description = state.catalog.text(locale, "not_found.message");
    let context = page_context(state, locale, bare_path, &title, &description);

    match state.templates.render("not_found.html", &context) {
        Ok(html) => page_response(StatusCode::NOT_FOUND, html),
        Err(e) => {
            tracing::error!("Failed to render 404 page: {}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

fn render(state: &AppState, template: &str, context: &Context) -> Result<Response, ServerError> {
    let html = state.templates.render(template, context)?;
    Ok(page_response(StatusCode::OK, html))
}

/// Context shared by every page: site, layout and the translation bundle
fn page_context(
    state: &AppState,
    locale: &Locale,
    bare_path: &str,
    title: &str,
    description: &str,
) -> Context {
    let config = &state.config;
    let site = SiteData {
        title: config.title.clone(),
        url: config.url.clone(),
        email: config.email.clone(),
        author: config.author.clone(),
    };

    let mut context = Context::new();
    context.insert("site", &site);
    context.insert(
        "layout",
        &layout(state, locale, bare_path, title, description),
    );
    context.insert("t", &state.catalog.bundle(locale));
    context
}

fn layout(
    state: &AppState,
    locale: &Locale,
    bare_path: &str,
    title: &str,
    description: &str,
) -> LayoutData {
    let locales = state.locales();
    let base = state.config.url.trim_end_matches('/');
    let absolute = |l: &Locale| format!("{}{}", base, l.path(bare_path));

    let title = if title.is_empty() || title == state.config.title {
        state.config.title.clone()
    } else {
        format!("{} | {}", title, state.config.title)
    };

    LayoutData {
        lang: locale.code().to_string(),
        title,
        description: description.to_string(),
        canonical: absolute(locale),
        alternates: locales
            .all()
            .iter()
            .map(|l| Alternate {
                hreflang: l.code().to_string(),
                href: absolute(l),
            })
            .collect(),
        x_default: absolute(locales.default_locale()),
        nav: NAV
            .iter()
            .map(|(key, path)| NavLink {
                label: state.catalog.text(locale, key),
                href: locale.path(path),
                active: is_active(path, bare_path),
            })
            .collect(),
        languages: locales
            .all()
            .iter()
            .map(|l| LanguageLink {
                code: l.code().to_string(),
                href: l.path(bare_path),
                current: l == locale,
            })
            .collect(),
        home_url: locale.path("/"),
        year: chrono::Utc::now().year(),
        structured_data: schema::structured_data(state, locale, bare_path),
    }
}

fn is_active(nav_path: &str, bare_path: &str) -> bool {
    if nav_path == "/" {
        bare_path == "/"
    } else {
        bare_path == nav_path || bare_path.starts_with(&format!("{}/", nav_path))
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Bare path of a post page, shared by listings and the page itself
fn post_path(slug: &str) -> String {
    format!("/blog/{}", utf8_percent_encode(slug, PATH_SEGMENT))
}

fn category_link(locale: &Locale, category: &str) -> LinkData {
    LinkData {
        name: category.to_string(),
        url: format!("{}?category={}", locale.path("/blog"), encode(category)),
    }
}

fn tag_link(locale: &Locale, tag: &str) -> LinkData {
    LinkData {
        name: tag.to_string(),
        url: format!("{}?tag={}", locale.path("/blog"), encode(tag)),
    }
}

fn summary(locale: &Locale, post: &BlogPost) -> PostSummary {
    PostSummary {
        slug: post.slug.clone(),
        url: locale.path(&post_path(&post.slug)),
        title: post.title.clone(),
        description: post.description.clone(),
        date: post.date.clone(),
        author: post.author.clone(),
        category: category_link(locale, &post.category),
        tags: post.tags.iter().map(|t| tag_link(locale, t)).collect(),
        read_time: post.read_time.clone(),
        excerpt: post.excerpt.clone(),
        image: post.image.clone(),
        image_credit: post.image_credit.clone(),
    }
}

fn summaries(locale: &Locale, posts: &[BlogPost]) -> Vec<PostSummary> {
    posts.iter().map(|p| summary(locale, p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_active() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/", "/blog"));
        assert!(is_active("/blog", "/blog"));
        assert!(is_active("/blog", "/blog/hello"));
        assert!(!is_active("/blog", "/blogroll"));
    }

    #[test]
    fn test_blog_query_ignores_blank_filters() {
        let query = BlogQuery {
            category: Some("  ".to_string()),
            tag: Some("rust".to_string()),
        };
        assert_eq!(query.category(), None);
        assert_eq!(query.tag(), Some("rust"));
    }

    #[test]
    fn test_post_path_encoding() {
        assert_eq!(post_path("my-post_2"), "/blog/my-post_2");
        assert_eq!(post_path("v1.2"), "/blog/v1%2E2");
        assert_eq!(post_path("café au lait"), "/blog/caf%C3%A9%20au%20lait");
    }

    #[test]
    fn test_links_are_encoded() {
        let en = crate::locale::Locales::from_config(&crate::config::I18nConfig::default())
            .unwrap()
            .parse("en")
            .cloned()
            .unwrap();
        let link = category_link(&en, "Data Science");
        assert_eq!(link.url, "/en/blog?category=Data%20Science");
        assert_eq!(tag_link(&en, "c++").url, "/en/blog?tag=c%2B%2B");
    }
}
