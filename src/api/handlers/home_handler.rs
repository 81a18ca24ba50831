//! Home controller handlers.

use std::sync::Arc;

use axum::{extract::Query, routing::get, Router};
use serde::Deserialize;

use crate::api::views::{HomeModel, SuccessModel};
use crate::api::AppState;
use crate::config::{DEFAULT_ACTION, DEFAULT_CONTROLLER, DEFAULT_SUCCESS_WAIT_SECONDS};
use crate::errors::AppResult;
use crate::mvc::{ActionResult, Controller, RedirectInstruction};
use crate::services::NoteService;

/// Query of the success interstitial
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessPageQuery {
    #[serde(default)]
    pub page_title: String,
    pub ret_action: Option<String>,
    pub ret_controller: Option<String>,
    pub wait_seconds: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeTemplateQuery {
    pub template: Option<String>,
}

/// Create home routes
pub fn home_routes() -> Router<AppState> {
    Router::new()
        .route("/index", get(index))
        .route("/success-page", get(success_page))
        .route("/change-template", get(change_template))
}

/// Home page
pub async fn index(mut controller: Controller) -> AppResult<ActionResult> {
    let notes = controller.service::<Arc<dyn NoteService>>()?;
    let note_count = notes.list_notes().await?.len();

    let model = HomeModel {
        note_count,
        themes: controller.themes().known().to_vec(),
    };
    controller.view_model(None, &model)
}

/// Countdown page shown after a successful operation
pub async fn success_page(controller: Controller, Query(query): Query<SuccessPageQuery>) -> AppResult<ActionResult> {
    let return_url = RedirectInstruction::to_action(
        query.ret_action.unwrap_or_else(|| DEFAULT_ACTION.to_string()),
        query.ret_controller.unwrap_or_else(|| DEFAULT_CONTROLLER.to_string()),
    )
    .location();

    let model = SuccessModel {
        page_title: query.page_title,
        return_url,
        wait_seconds: query.wait_seconds.unwrap_or(DEFAULT_SUCCESS_WAIT_SECONDS),
    };
    controller.view_model(None, &model)
}

/// Switch the site theme
pub async fn change_template(controller: Controller, Query(query): Query<ChangeTemplateQuery>) -> ActionResult {
    controller.change_template(query.template.as_deref())
}
