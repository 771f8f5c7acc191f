//! Service HTTP des fichiers du cache
//!
//! Délègue à `tower_http::services::ServeFile`, qui gère `Range`
//! (réponses 206 et 416), `Last-Modified` et le type MIME déduit de
//! l'extension. `If-Range` est traité ici : si le validateur ne correspond
//! pas au fichier, l'en-tête `Range` est retiré et le fichier est servi en
//! entier.

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{IF_RANGE, RANGE};
use axum::http::HeaderValue;
use axum::response::Response;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::SystemTime;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::debug;

/// Sert un fichier en respectant `Range` et `If-Range`
pub async fn serve_file(path: &Path, mut request: Request) -> Response {
    if let Some(if_range) = request.headers().get(IF_RANGE) {
        let modified = tokio::fs::metadata(path)
            .await
            .and_then(|m| m.modified())
            .ok();

        if !if_range_matches(if_range, modified) {
            debug!("If-Range validator is stale, serving full content");
            request.headers_mut().remove(RANGE);
        }
    }

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

/// Un `If-Range` ne correspond que si c'est une date égale (à la seconde)
/// à la date de modification du fichier. Aucun ETag n'est émis, donc un
/// ETag ne correspond jamais.
fn if_range_matches(value: &HeaderValue, modified: Option<SystemTime>) -> bool {
    let (Ok(value), Some(modified)) = (value.to_str(), modified) else {
        return false;
    };

    let value = value.trim();
    if value.starts_with('"') || value.starts_with("W/") {
        return false;
    }

    match DateTime::parse_from_rfc2822(value) {
        Ok(date) => {
            let modified: DateTime<Utc> = modified.into();
            date.timestamp() == modified.timestamp()
        }
        Err(_) => false,
    }
}
