//! HTTPS requirement middleware.
//!
//! `HttpsRequirement::Yes` sends plain-HTTP visitors to the HTTPS URL and
//! `HttpsRequirement::No` sends HTTPS visitors to the plain-HTTP URL. Only
//! safe methods are redirected; other requests are refused.

use axum::{
    extract::{Request, State},
    http::{header::HOST, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::api::AppState;
use crate::config::HttpsRequirement;
use crate::errors::AppError;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Scheme the client used, honouring a reverse proxy's `X-Forwarded-Proto`.
fn request_scheme(request: &Request) -> String {
    request
        .headers()
        .get(FORWARDED_PROTO)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .or_else(|| request.uri().scheme_str().map(str::to_ascii_lowercase))
        .unwrap_or_else(|| "http".to_string())
}

fn redirect_to_scheme(request: &Request, scheme: &str) -> Response {
    if request.method() != Method::GET && request.method() != Method::HEAD {
        tracing::warn!(method = %request.method(), "Refusing request over the wrong scheme");
        return AppError::Forbidden.into_response();
    }

    let host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.to_string()));

    let Some(host) = host else {
        return AppError::bad_request("Missing Host header").into_response();
    };

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let location = format!("{}://{}{}", scheme, host, path_and_query);
    tracing::debug!(location = %location, "Redirecting to required scheme");
    Redirect::temporary(&location).into_response()
}

/// HTTPS requirement middleware.
pub async fn https_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let is_https = request_scheme(&request) == "https";

    match (state.config.https_requirement, is_https) {
        (HttpsRequirement::Yes, false) => redirect_to_scheme(&request, "https"),
        (HttpsRequirement::No, true) => redirect_to_scheme(&request, "http"),
        _ => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_forwarded_proto_wins() {
        let request = Request::builder()
            .uri("http://example.com/notes")
            .header(FORWARDED_PROTO, "HTTPS, http")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_scheme(&request), "https");
    }

    #[test]
    fn test_scheme_defaults_to_http() {
        let request = Request::builder().uri("/notes").body(Body::empty()).unwrap();
        assert_eq!(request_scheme(&request), "http");
    }

    #[test]
    fn test_redirect_keeps_path_and_query() {
        let request = Request::builder()
            .uri("/notes/edit/1?x=2")
            .header(HOST, "example.com")
            .body(Body::empty())
            .unwrap();

        let response = redirect_to_scheme(&request, "https");
        assert_eq!(response.status(), axum::http::StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "https://example.com/notes/edit/1?x=2"
        );
    }

    #[test]
    fn test_unsafe_method_is_refused() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/notes/create")
            .header(HOST, "example.com")
            .body(Body::empty())
            .unwrap();

        let response = redirect_to_scheme(&request, "https");
        assert_eq!(response.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
