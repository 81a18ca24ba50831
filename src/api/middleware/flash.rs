//! Flash middleware - Carries `TempData` across one request boundary.
//!
//! Before the handler runs, entries stored for the visitor's `flash_id`
//! cookie are taken from the flash store and placed on the request as
//! `TempData`. After the response is built, whatever the handler left
//! unread (the `CarriedOver` response extension) is merged back into the
//! store.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::FLASH_COOKIE_NAME;
use crate::infra::FlashEntries;
use crate::mvc::{CarriedOver, TempData};

/// Flash carrier middleware.
///
/// Store failures never fail the request: they are logged and the request
/// proceeds with an empty carried-over scope.
pub async fn flash_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(FLASH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| Uuid::parse_str(value).is_ok());

    let incoming = match &existing {
        Some(session_id) => match state.flash_store.take(session_id).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load flash entries");
                FlashEntries::new()
            }
        },
        None => FlashEntries::new(),
    };

    if !incoming.is_empty() {
        tracing::debug!(entries = incoming.len(), "Loaded carried-over entries");
    }
    request
        .extensions_mut()
        .insert(TempData::from_incoming(incoming.clone()));

    let mut response = next.run(request).await;

    // Handlers that never built a controller result keep the incoming entries.
    let carried = match response.extensions_mut().remove::<CarriedOver>() {
        Some(CarriedOver(entries)) => entries,
        None => incoming,
    };

    // Nothing to carry: leave the store alone so entries written by a
    // parallel request of the same visitor survive.
    if carried.is_empty() {
        return response;
    }

    let (session_id, is_new) = match existing {
        Some(session_id) => (session_id, false),
        None => (Uuid::new_v4().to_string(), true),
    };

    if let Err(e) = state
        .flash_store
        .put(&session_id, &carried, state.config.flash_ttl_seconds)
        .await
    {
        tracing::warn!(error = %e, "Failed to store flash entries");
        return response;
    }

    if !is_new {
        return response;
    }

    let cookie = Cookie::build((FLASH_COOKIE_NAME, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), response).into_response()
}
