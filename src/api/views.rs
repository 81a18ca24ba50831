//! Page views of the site.
//!
//! Each view is an askama template built from the bound model and the
//! request's `ViewContext`, registered under `{Controller}/{Name}` (or
//! `{theme}/{Controller}/{Name}` for theme-specific variants).

use std::sync::Arc;

use askama::Template;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Note;
use crate::errors::AppResult;
use crate::mvc::{template_view, NotificationSet, ViewContext, ViewEngine, ViewRegistry};

// =============================================================================
// Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeModel {
    pub note_count: usize,
    pub themes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessModel {
    pub page_title: String,
    pub return_url: String,
    pub wait_seconds: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessDeniedModel {
    pub page_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesIndexModel {
    /// Pre-rendered note cards
    pub cards: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteFormModel {
    pub heading_key: String,
    pub action_url: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteCardModel {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub locked: bool,
}

impl From<&Note> for NoteCardModel {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            body: note.body.clone(),
            locked: note.locked,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Data used by the shared layout
pub struct Page {
    pub title: String,
    pub site_title: String,
    pub lang: String,
    pub theme: String,
    pub notifications: NotificationSet,
}

impl Page {
    fn build(ctx: &mut ViewContext<'_>, title_key: &str) -> Self {
        Self {
            title: ctx.localize(title_key, &[]),
            site_title: ctx.localize("site.title", &[]),
            lang: ctx.culture().to_string(),
            theme: ctx.theme().to_string(),
            notifications: ctx.notifications(),
        }
    }
}

pub struct ThemeLink {
    pub name: String,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "home/index.html")]
pub struct HomeIndexTemplate {
    pub page: Page,
    pub greeting: String,
    pub theme_label: String,
    pub themes: Vec<ThemeLink>,
    pub notes_label: String,
}

#[derive(Template)]
#[template(path = "home/success_page.html")]
pub struct SuccessPageTemplate {
    pub page: Page,
    pub countdown: String,
    pub continue_label: String,
    pub return_url: String,
    pub wait_seconds: u32,
}

#[derive(Template)]
#[template(path = "shared/page_not_found.html")]
pub struct PageNotFoundTemplate {
    pub page: Page,
    pub message: String,
    pub home_label: String,
}

#[derive(Template)]
#[template(path = "security/access_denied.html")]
pub struct AccessDeniedTemplate {
    pub page: Page,
    pub message: String,
    pub home_label: String,
}

#[derive(Template)]
#[template(path = "notes/index.html")]
pub struct NotesIndexTemplate {
    pub page: Page,
    pub cards: Vec<String>,
    pub empty_label: String,
    pub new_label: String,
}

#[derive(Template)]
#[template(path = "notes/form.html")]
pub struct NoteFormTemplate {
    pub page: Page,
    pub action_url: String,
    pub title: String,
    pub body: String,
    pub title_label: String,
    pub body_label: String,
    pub save_label: String,
}

#[derive(Template)]
#[template(path = "notes/note_card.html")]
pub struct NoteCardTemplate {
    pub note: NoteCardModel,
    pub edit_label: String,
    pub delete_label: String,
    pub locked_label: String,
}

#[derive(Template)]
#[template(path = "compact/notes/note_card.html")]
pub struct CompactNoteCardTemplate {
    pub note: NoteCardModel,
    pub locked_label: String,
}

fn note_card(ctx: &mut ViewContext<'_>) -> AppResult<NoteCardTemplate> {
    Ok(NoteCardTemplate {
        note: ctx.model()?,
        edit_label: ctx.localize("notes.edit", &[]),
        delete_label: ctx.localize("notes.delete", &[]),
        locked_label: ctx.localize("notes.locked", &[]),
    })
}

/// All views of the site.
pub fn view_registry() -> Arc<dyn ViewEngine> {
    let registry = ViewRegistry::new()
        .register(
            "Home/Index",
            template_view(|ctx| {
                let model: HomeModel = ctx.model()?;
                let themes = model
                    .themes
                    .into_iter()
                    .map(|name| ThemeLink {
                        active: name == ctx.theme(),
                        name,
                    })
                    .collect();
                Ok(HomeIndexTemplate {
                    page: Page::build(ctx, "home.title"),
                    greeting: ctx.localize("home.greeting", &[model.note_count.to_string()]),
                    theme_label: ctx.localize("home.theme", &[]),
                    themes,
                    notes_label: ctx.localize("notes.title", &[]),
                })
            }),
        )
        .register(
            "Home/SuccessPage",
            template_view(|ctx| {
                let model: SuccessModel = ctx.model()?;
                let mut page = Page::build(ctx, "success.title");
                if !model.page_title.is_empty() {
                    page.title = model.page_title;
                }
                Ok(SuccessPageTemplate {
                    page,
                    countdown: ctx.localize("success.redirecting", &[model.wait_seconds.to_string()]),
                    continue_label: ctx.localize("success.continue", &[]),
                    return_url: model.return_url,
                    wait_seconds: model.wait_seconds,
                })
            }),
        )
        .register(
            "Shared/PageNotFound",
            template_view(|ctx| {
                Ok(PageNotFoundTemplate {
                    page: Page::build(ctx, "notfound.title"),
                    message: ctx.localize("notfound.message", &[]),
                    home_label: ctx.localize("nav.home", &[]),
                })
            }),
        )
        .register(
            "Security/AccessDenied",
            template_view(|ctx| {
                let model = ctx.model::<Option<AccessDeniedModel>>()?.unwrap_or_default();
                let message = match model.page_url {
                    Some(url) => ctx.localize("denied.message", &[url]),
                    None => ctx.localize("denied.generic", &[]),
                };
                Ok(AccessDeniedTemplate {
                    page: Page::build(ctx, "denied.title"),
                    message,
                    home_label: ctx.localize("nav.home", &[]),
                })
            }),
        )
        .register(
            "Notes/Index",
            template_view(|ctx| {
                let model: NotesIndexModel = ctx.model()?;
                Ok(NotesIndexTemplate {
                    page: Page::build(ctx, "notes.title"),
                    cards: model.cards,
                    empty_label: ctx.localize("notes.empty", &[]),
                    new_label: ctx.localize("notes.new", &[]),
                })
            }),
        )
        .register(
            "Notes/Form",
            template_view(|ctx| {
                let model: NoteFormModel = ctx.model()?;
                Ok(NoteFormTemplate {
                    page: Page::build(ctx, &model.heading_key),
                    action_url: model.action_url,
                    title: model.title,
                    body: model.body,
                    title_label: ctx.localize("notes.field.title", &[]),
                    body_label: ctx.localize("notes.field.body", &[]),
                    save_label: ctx.localize("notes.save", &[]),
                })
            }),
        )
        .register("Notes/NoteCard", template_view(note_card))
        .register(
            "compact/Notes/NoteCard",
            template_view(|ctx| {
                Ok(CompactNoteCardTemplate {
                    note: ctx.model()?,
                    locked_label: ctx.localize("notes.locked", &[]),
                })
            }),
        );

    tracing::debug!(views = registry.len(), "View registry built");
    Arc::new(registry)
}
