//! Front-end files. `ServeDir`/`ServeFile` do the serving; misses render as the
//! usual JSON error body.

use crate::{AppError, AppState, Result};
use axum::{
    extract::{Request, State},
    http::{StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

pub async fn index(State(state): State<Arc<AppState>>, request: Request) -> Result<Response> {
    let path = state.config.static_dir.join(&state.config.index_document);

    let response = ServeFile::new(&path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never: Infallible| match never {});

    if response.status() == StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(format!(
            "{} not found",
            state.config.index_document
        )));
    }

    Ok(response.into_response())
}

/// Fallback for `ServeDir` misses.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("{} not found", uri.path()))
}

/// Dotfiles (`.env`, `.git/...`) are never served, whatever lives in the static root.
pub async fn reject_hidden_paths(request: Request, next: Next) -> Response {
    if is_hidden_path(request.uri().path()) {
        tracing::warn!("Refused hidden path {}", request.uri().path());
        return not_found(request.uri().clone()).await.into_response();
    }

    next.run(request).await
}

fn is_hidden_path(path: &str) -> bool {
    path.split('/').any(|segment| {
        segment.starts_with('.')
            || segment
                .get(..3)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("%2e"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hidden_path() {
        assert!(is_hidden_path("/.env"));
        assert!(is_hidden_path("/%2Eenv"));
        assert!(is_hidden_path("/%2egit/config"));
        assert!(is_hidden_path("/images1/.secret.png"));
        assert!(is_hidden_path("/images1/../Cargo.toml"));
        assert!(!is_hidden_path("/"));
        assert!(!is_hidden_path("/challenges.js"));
        assert!(!is_hidden_path("/images1/fern.png"));
        assert!(!is_hidden_path("/api/identify"));
    }
}
