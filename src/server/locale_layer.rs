//! Locale middleware and the page locale extractor

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{
        request::Parts,
        uri::{PathAndQuery, Uri},
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::convert::Infallible;
use std::sync::Arc;

use super::AppState;
use crate::locale::{Locale, Route, LOCALE_HEADER};

/// Apply the locale router to every request
///
/// Rewrites keep the query string and expose the detected locale through
/// the `x-locale` request header. Redirects point at the default locale.
pub async fn locale_layer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    match state.router.route(&path) {
        Route::PassThrough => next.run(request).await,

        Route::Redirect { location } => {
            tracing::debug!("Redirecting {} -> {}", path, location);
            Redirect::temporary(&location).into_response()
        }

        Route::Rewrite { path: bare, locale } => {
            let original = request.uri().clone();
            let rewritten = match rewrite_uri(&original, &bare) {
                Ok(uri) => uri,
                Err(e) => {
                    tracing::warn!("Cannot rewrite {} to {}: {}", path, bare, e);
                    return (StatusCode::BAD_REQUEST, "Bad request").into_response();
                }
            };
            tracing::debug!("Rewriting {} -> {} [{}]", path, bare, locale);

            let value = locale_header(&locale);
            if request.extensions().get::<OriginalUri>().is_none() {
                request.extensions_mut().insert(OriginalUri(original));
            }
            *request.uri_mut() = rewritten;
            request.headers_mut().insert(LOCALE_HEADER, value.clone());

            let mut response = next.run(request).await;
            response.headers_mut().insert(LOCALE_HEADER, value);
            response
        }
    }
}

/// Same URI with the path replaced, query preserved
fn rewrite_uri(original: &Uri, bare: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match original.query() {
        Some(query) => format!("{}?{}", bare, query),
        None => bare.to_string(),
    };
    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}

fn locale_header(locale: &Locale) -> HeaderValue {
    // Locale codes are validated ASCII segments
    HeaderValue::from_str(locale.code()).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Locale of the page being rendered
///
/// Read from the `x-locale` header, then from the visible path, then the
/// default locale.
#[derive(Debug, Clone)]
pub struct PageLocale(pub Locale);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for PageLocale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(LOCALE_HEADER)
            .and_then(|v| v.to_str().ok());
        let visible = parts
            .extensions
            .get::<OriginalUri>()
            .map(|uri| uri.0.path())
            .unwrap_or_else(|| parts.uri.path());

        Ok(PageLocale(state.locales().resolve(header, visible).clone()))
    }
}
