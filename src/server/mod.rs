//! Site server
//!
//! The locale middleware wraps the whole page router, so prefixed URLs are
//! rewritten before routing happens. Handlers only ever see bare paths.

mod api;
mod forms;
mod locale_layer;
mod pages;
mod schema;

use anyhow::Result;
use axum::{
    extract::{OriginalUri, Request},
    http::{header, StatusCode},
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tower::Layer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{ContentError, ContentLoader, MarkdownRenderer};
use crate::i18n::Catalog;
use crate::locale::{LocaleRouter, Locales};
use crate::templates::TemplateRenderer;
use crate::Site;

pub use locale_layer::{locale_layer, PageLocale};

/// Shared, read-only server state
pub struct AppState {
    pub config: SiteConfig,
    pub router: LocaleRouter,
    pub catalog: Catalog,
    pub loader: ContentLoader,
    pub templates: TemplateRenderer,
    pub markdown: MarkdownRenderer,
    pub public_dir: PathBuf,
}

impl AppState {
    /// Build the server state for a site
    pub fn new(site: &Site) -> Result<Self> {
        let locales = Locales::from_config(&site.config.i18n)?;
        let catalog = Catalog::load(&site.locales_dir, &locales)?;
        for issue in catalog.validate() {
            tracing::warn!("Translation schema: {}", issue);
        }

        Ok(Self {
            config: site.config.clone(),
            router: LocaleRouter::new(locales),
            catalog,
            loader: site.content_loader(),
            templates: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::new(),
            public_dir: site.public_dir.clone(),
        })
    }

    pub fn locales(&self) -> &Locales {
        self.router.locales()
    }
}

/// Failure while producing a page
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Build the complete application service
pub fn app(state: Arc<AppState>) -> Router {
    let pages = Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/services", get(pages::services))
        .route("/contact", get(pages::contact))
        .route("/blog", get(pages::blog_index))
        .route("/blog/:slug", get(pages::blog_post))
        .route("/api/posts", get(api::list_posts))
        .route("/api/posts/:slug", get(api::get_post))
        .route("/api/categories", get(api::list_categories))
        .route("/api/tags", get(api::list_tags))
        .route(
            "/api/contact",
            post(forms::contact).fallback(forms::method_not_allowed),
        )
        .route(
            "/api/subscribe",
            post(forms::subscribe).fallback(forms::method_not_allowed),
        )
        .route("/__health", get(health))
        .fallback(fallback_handler)
        .with_state(state.clone());

    let localized = middleware::from_fn_with_state(state, locale_layer).layer(pages);

    Router::new()
        .fallback_service(localized)
        .layer(TraceLayer::new_for_http())
}

/// Start the site server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(site)?);
    let app = app(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

async fn health() -> &'static str {
    "ok"
}

/// Serves public files; page-like misses get the localized 404 page
async fn fallback_handler(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
    PageLocale(locale): PageLocale,
    request: Request,
) -> Response {
    let path = request.uri().path().to_string();

    if !path.contains('.') {
        // `/en/about/` -> `/en/about`
        if path.len() > 1 && path.ends_with('/') {
            let visible = request
                .extensions()
                .get::<OriginalUri>()
                .map(|uri| uri.0.path().to_string())
                .unwrap_or_else(|| path.clone());
            let trimmed = visible.trim_end_matches('/');
            if !trimmed.is_empty() {
                return Redirect::permanent(trimmed).into_response();
            }
        }
        return pages::not_found(&state, &locale, &path);
    }

    let mut service = ServeDir::new(&state.public_dir);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!("Failed to serve {}: {}", path, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// HTML response that must never be cached
fn page_response(status: StatusCode, html: String) -> Response {
    (
        status,
        [(
            header::CACHE_CONTROL,
            "no-store, no-cache, must-revalidate, proxy-revalidate",
        )],
        Html(html),
    )
        .into_response()
}
