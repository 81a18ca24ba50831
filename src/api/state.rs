//! Application state - Shared collaborators of every request.

use std::sync::Arc;

use axum::extract::FromRef;

use super::views::view_registry;
use crate::config::{Config, KNOWN_THEMES};
use crate::domain::Note;
use crate::infra::{
    Cache, Culture, FlashStore, Localizer, MemoryRepository, Repository, TracingErrorLogger,
};
use crate::mvc::{Collaborators, ThemeRegistry};
use crate::services::{NoteManager, NoteService, ServiceRegistry};

/// Application state shared by handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Everything a `Controller` is built from
    pub collaborators: Arc<Collaborators>,
    /// Carrier for notifications that survive a redirect
    pub flash_store: Arc<dyn FlashStore>,
    /// Redis cache, when configured
    pub cache: Option<Arc<Cache>>,
}

impl AppState {
    /// Wire the site's services, views and themes around the given
    /// infrastructure.
    pub fn new(
        config: Config,
        localizer: Arc<dyn Localizer>,
        flash_store: Arc<dyn FlashStore>,
        cache: Option<Arc<Cache>>,
    ) -> Self {
        let notes: Arc<dyn Repository<Note>> = Arc::new(MemoryRepository::with_items([Note::locked(
            "Welcome",
            "This note is read-only. Create your own to try editing.",
        )]));

        let collaborators = Collaborators {
            resolver: Arc::new(service_registry(notes)),
            localizer,
            views: view_registry(),
            error_logger: Arc::new(TracingErrorLogger),
            themes: Arc::new(ThemeRegistry::new(KNOWN_THEMES.iter().copied(), config.default_theme.clone())),
            namespace: config.app_namespace.clone(),
            default_culture: Culture::new(config.default_culture.clone()),
        };

        Self {
            config: Arc::new(config),
            collaborators: Arc::new(collaborators),
            flash_store,
            cache,
        }
    }
}

impl FromRef<AppState> for Arc<Collaborators> {
    fn from_ref(state: &AppState) -> Self {
        state.collaborators.clone()
    }
}

/// Services the controllers may resolve.
///
/// The repository is shared; the note service is transient and therefore
/// only stable within one request.
pub fn service_registry(notes: Arc<dyn Repository<Note>>) -> ServiceRegistry {
    ServiceRegistry::new()
        .singleton::<Arc<dyn Repository<Note>>>(notes)
        .transient::<Arc<dyn NoteService>, _>(|registry| {
            let notes = registry.get::<Arc<dyn Repository<Note>>>()?;
            Ok(Arc::new(NoteManager::new(notes)) as Arc<dyn NoteService>)
        })
}
