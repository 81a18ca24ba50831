//! Security controller handlers.

use axum::{extract::Query, http::StatusCode, routing::get, Router};
use serde::Deserialize;

use crate::api::views::AccessDeniedModel;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::mvc::{ActionResult, Controller};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDeniedQuery {
    pub page_url: Option<String>,
}

/// Create security routes
pub fn security_routes() -> Router<AppState> {
    Router::new().route("/access-denied", get(access_denied))
}

/// Page shown when the visitor may not open the requested URL
pub async fn access_denied(controller: Controller, Query(query): Query<AccessDeniedQuery>) -> AppResult<ActionResult> {
    let model = AccessDeniedModel {
        page_url: query.page_url.filter(|url| !url.is_empty()),
    };
    controller.view_model_with_status(StatusCode::FORBIDDEN, None, &model)
}

/// Router fallback
pub async fn page_not_found(controller: Controller) -> AppResult<ActionResult> {
    controller.page_not_found()
}
