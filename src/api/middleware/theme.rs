//! Theme middleware - Stamps the active theme onto each request.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use url::form_urlencoded;

use crate::api::AppState;
use crate::mvc::ActiveTheme;

const PREVIEW_PARAM: &str = "theme";

/// Theme middleware.
///
/// A known `?theme=` query value previews that theme for this request only;
/// otherwise the site-wide theme applies.
pub async fn theme_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let themes = &state.collaborators.themes;

    let preview = request.uri().query().and_then(|query| {
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == PREVIEW_PARAM)
            .map(|(_, value)| value.into_owned())
    });

    let theme = match preview {
        Some(theme) if themes.is_known(&theme) => theme,
        _ => themes.current(),
    };

    request.extensions_mut().insert(ActiveTheme(theme));
    next.run(request).await
}
