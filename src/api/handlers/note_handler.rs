//! Notes controller handlers.

use std::sync::Arc;

use axum::{
    extract::Path,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use uuid::Uuid;

use crate::api::views::{NoteCardModel, NoteFormModel, NotesIndexModel};
use crate::api::AppState;
use crate::config::DEFAULT_ACTION;
use crate::domain::{Note, NoteForm};
use crate::errors::{AppError, AppResult};
use crate::mvc::{ActionResult, Controller, RedirectInstruction, SuccessRedirect};
use crate::services::NoteService;

const NOTES_CONTROLLER: &str = "Notes";
const FORM_VIEW: &str = "Form";
const CARD_VIEW: &str = "NoteCard";

/// Create note routes
pub fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/index", get(index))
        .route("/create", get(create_form).post(create))
        .route("/edit/:id", get(edit_form).post(edit))
        .route("/delete/:id", post(delete))
        .route("/preview/:id", get(preview))
}

/// List notes as rendered cards
pub async fn index(mut controller: Controller) -> AppResult<ActionResult> {
    let notes = controller.service::<Arc<dyn NoteService>>()?;

    let mut cards = Vec::new();
    for note in notes.list_notes().await? {
        cards.push(controller.render_partial_model(Some(CARD_VIEW), &NoteCardModel::from(&note))?);
    }

    controller.view_model(None, &NotesIndexModel { cards })
}

/// Empty create form
pub async fn create_form(controller: Controller) -> AppResult<ActionResult> {
    render_form(controller, create_model(NoteForm::default()))
}

/// Store a new note and show the success page
pub async fn create(mut controller: Controller, Form(form): Form<NoteForm>) -> AppResult<ActionResult> {
    let notes = controller.service::<Arc<dyn NoteService>>()?;

    match notes.create_note(form.clone()).await {
        Ok(note) => {
            let message = controller.localize_args("notes.created", &[note.title.clone()]);
            controller.notify_success(message, true);

            let page_title = controller.localize("success.title");
            Ok(controller.redirect_to_success_page(
                SuccessRedirect::new(page_title).returning_to(DEFAULT_ACTION, NOTES_CONTROLLER),
            ))
        }
        Err(error @ AppError::Validation(_)) => {
            controller.notify_exception(&error, false, false);
            render_form(controller, create_model(form))
        }
        Err(error) => Err(error),
    }
}

/// Edit form for an existing note
pub async fn edit_form(mut controller: Controller, Path(id): Path<Uuid>) -> AppResult<ActionResult> {
    let notes = controller.service::<Arc<dyn NoteService>>()?;

    let note = match notes.get_note(id).await {
        Ok(note) => note,
        Err(AppError::NotFound) => return controller.page_not_found(),
        Err(error) => return Err(error),
    };

    if note.locked {
        return Ok(controller.access_denied());
    }

    render_form(controller, edit_model(&note, NoteForm::from(&note)))
}

/// Apply edits and go back to the list
pub async fn edit(
    mut controller: Controller,
    Path(id): Path<Uuid>,
    Form(form): Form<NoteForm>,
) -> AppResult<ActionResult> {
    let notes = controller.service::<Arc<dyn NoteService>>()?;

    match notes.update_note(id, form.clone()).await {
        Ok(_) => {
            let message = controller.localize("notes.updated");
            controller.notify_success(message, true);
            Ok(controller.redirect(RedirectInstruction::to_action(DEFAULT_ACTION, NOTES_CONTROLLER)))
        }
        Err(error @ AppError::Validation(_)) => {
            controller.notify_exception(&error, false, false);
            let note = notes.get_note(id).await?;
            render_form(controller, edit_model(&note, form))
        }
        Err(AppError::Forbidden) => Ok(controller.access_denied()),
        Err(AppError::NotFound) => controller.page_not_found(),
        Err(error) => Err(error),
    }
}

/// Delete a note; failures are reported on the list page
pub async fn delete(mut controller: Controller, Path(id): Path<Uuid>) -> AppResult<ActionResult> {
    let notes = controller.service::<Arc<dyn NoteService>>()?;

    match notes.delete_note(id).await {
        Ok(()) => {
            let message = controller.localize("notes.deleted");
            controller.notify_success(message, true);
        }
        Err(error @ (AppError::Forbidden | AppError::NotFound)) => {
            controller.notify_exception(&error, true, true);
        }
        Err(error) => return Err(error),
    }

    Ok(controller.redirect(RedirectInstruction::to_action(DEFAULT_ACTION, NOTES_CONTROLLER)))
}

/// A single note card as an HTML fragment
pub async fn preview(mut controller: Controller, Path(id): Path<Uuid>) -> AppResult<Response> {
    let notes = controller.service::<Arc<dyn NoteService>>()?;

    match notes.get_note(id).await {
        Ok(note) => {
            let html = controller.render_partial_model(Some(CARD_VIEW), &NoteCardModel::from(&note))?;
            Ok(Html(html).into_response())
        }
        Err(AppError::NotFound) => Ok(controller.page_not_found()?.into_response()),
        Err(error) => Err(error),
    }
}

fn create_model(form: NoteForm) -> NoteFormModel {
    NoteFormModel {
        heading_key: "notes.create.title".to_string(),
        action_url: "/notes/create".to_string(),
        title: form.title,
        body: form.body,
    }
}

fn edit_model(note: &Note, form: NoteForm) -> NoteFormModel {
    NoteFormModel {
        heading_key: "notes.edit.title".to_string(),
        action_url: format!("/notes/edit/{}", note.id),
        title: form.title,
        body: form.body,
    }
}

fn render_form(controller: Controller, model: NoteFormModel) -> AppResult<ActionResult> {
    controller.view_model(Some(FORM_VIEW), &model)
}
