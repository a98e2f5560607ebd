//! Locale router - decides how a request path is served
//!
//! Every page must be reached through a locale-prefixed URL. Prefixed
//! paths are rewritten to their bare form, anything else is redirected
//! under the default locale. Assets, internal endpoints and the API are
//! left alone.

use super::{Locale, Locales};

/// Prefix of server-internal endpoints (health checks and the like)
const INTERNAL_PREFIX: &str = "/__";

/// Routing decision for one request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Serve the request unmodified
    PassThrough,
    /// Serve `path` internally, recording `locale` for the page handlers
    Rewrite { path: String, locale: Locale },
    /// Send the client to `location`
    Redirect { location: String },
}

/// Stateless router over a fixed locale set
#[derive(Debug, Clone)]
pub struct LocaleRouter {
    locales: Locales,
}

impl LocaleRouter {
    pub fn new(locales: Locales) -> Self {
        Self { locales }
    }

    pub fn locales(&self) -> &Locales {
        &self.locales
    }

    /// Decide how to serve `path`
    pub fn route(&self, path: &str) -> Route {
        if is_passthrough(path) {
            return Route::PassThrough;
        }

        if let Some((locale, bare)) = self.split_locale(path) {
            return Route::Rewrite {
                path: bare,
                locale: locale.clone(),
            };
        }

        // Root maps to `/fr`, not `/fr/`
        Route::Redirect {
            location: self.locales.default_locale().path(path),
        }
    }

    /// Split a leading supported locale segment off `path`
    fn split_locale(&self, path: &str) -> Option<(&Locale, String)> {
        let rest = path.strip_prefix('/')?;
        let (segment, remainder) = match rest.split_once('/') {
            Some((segment, remainder)) => (segment, remainder),
            None => (rest, ""),
        };
        let locale = self.locales.parse(segment)?;
        Some((locale, format!("/{}", remainder)))
    }
}

/// Paths the router never touches: files, internals and API endpoints
fn is_passthrough(path: &str) -> bool {
    path.contains('.')
        || path.starts_with(INTERNAL_PREFIX)
        || path == "/api"
        || path.contains("/api/")
}
