//! View lookup and rendering.
//!
//! A `ViewEngine` locates a named view for the executing controller and the
//! active theme; a `View` renders itself into a string buffer against a
//! `ViewContext`. Concrete views are askama templates built by closures that
//! read the bound model from the context.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use askama::Template;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::data::{TempData, ViewData};
use super::notifications::NotificationSet;
use super::routing::RouteData;
use crate::config::SHARED_VIEW_FOLDER;
use crate::errors::{AppError, AppResult};
use crate::infra::{Culture, Localizer};

/// Everything a view may read while rendering.
pub struct ViewContext<'a> {
    route: &'a RouteData,
    view_data: &'a ViewData,
    temp_data: &'a mut TempData,
    culture: &'a Culture,
    theme: &'a str,
    namespace: &'a str,
    localizer: &'a dyn Localizer,
}

impl<'a> ViewContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        route: &'a RouteData,
        view_data: &'a ViewData,
        temp_data: &'a mut TempData,
        culture: &'a Culture,
        theme: &'a str,
        namespace: &'a str,
        localizer: &'a dyn Localizer,
    ) -> Self {
        Self {
            route,
            view_data,
            temp_data,
            culture,
            theme,
            namespace,
            localizer,
        }
    }

    pub fn route(&self) -> &RouteData {
        self.route
    }

    pub fn view_data(&self) -> &ViewData {
        self.view_data
    }

    pub fn culture(&self) -> &Culture {
        self.culture
    }

    pub fn theme(&self) -> &str {
        self.theme
    }

    /// Deserialize the bound model into the view's own type.
    pub fn model<M: DeserializeOwned>(&self) -> AppResult<M> {
        let model = self.view_data.model.clone().unwrap_or(Value::Null);
        serde_json::from_value(model).map_err(|e| {
            AppError::internal(format!(
                "Model does not fit view {}/{}: {}",
                self.route.controller, self.route.action, e
            ))
        })
    }

    /// Notifications of both scopes; carried-over ones are consumed.
    pub fn notifications(&mut self) -> NotificationSet {
        NotificationSet::collect(self.namespace, self.view_data, self.temp_data)
    }

    /// Localized string in the request culture.
    pub fn localize(&self, key: &str, args: &[String]) -> String {
        self.localizer.get_string(key, self.culture, args)
    }
}

/// A renderable view.
pub trait View: Send + Sync {
    fn render(&self, ctx: &mut ViewContext<'_>, out: &mut String) -> AppResult<()>;
}

/// View engine trait for dependency injection.
pub trait ViewEngine: Send + Sync {
    /// Locate `name` for the executing controller and theme.
    fn find_partial_view(
        &self,
        route: &RouteData,
        theme: &str,
        name: &str,
    ) -> AppResult<Arc<dyn View>>;
}

/// View engine backed by views registered under path-like names such as
/// `Notes/Edit`, `Shared/PageNotFound` or `compact/Notes/NoteCard`.
#[derive(Default)]
pub struct ViewRegistry {
    views: HashMap<String, Arc<dyn View>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, path: impl Into<String>, view: Arc<dyn View>) -> Self {
        self.views.insert(path.into(), view);
        self
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Candidate paths in lookup order.
    pub fn search_locations(route: &RouteData, theme: &str, name: &str) -> Vec<String> {
        vec![
            format!("{}/{}/{}", theme, route.controller, name),
            format!("{}/{}", route.controller, name),
            format!("{}/{}/{}", theme, SHARED_VIEW_FOLDER, name),
            format!("{}/{}", SHARED_VIEW_FOLDER, name),
        ]
    }
}

impl ViewEngine for ViewRegistry {
    fn find_partial_view(
        &self,
        route: &RouteData,
        theme: &str,
        name: &str,
    ) -> AppResult<Arc<dyn View>> {
        let locations = Self::search_locations(route, theme, name);
        for location in &locations {
            if let Some(view) = self.views.get(location) {
                tracing::trace!(view = %location, "Resolved view");
                return Ok(view.clone());
            }
        }

        tracing::debug!(view = %name, searched = ?locations, "View not found");
        Err(AppError::ViewNotFound(name.to_string()))
    }
}

/// View rendering an askama template built from the context.
pub struct TemplateView<T, F> {
    build: F,
    _template: PhantomData<fn() -> T>,
}

impl<T, F> TemplateView<T, F>
where
    T: Template,
    F: Fn(&mut ViewContext<'_>) -> AppResult<T> + Send + Sync + 'static,
{
    pub fn new(build: F) -> Self {
        Self {
            build,
            _template: PhantomData,
        }
    }
}

impl<T, F> View for TemplateView<T, F>
where
    T: Template,
    F: Fn(&mut ViewContext<'_>) -> AppResult<T> + Send + Sync + 'static,
{
    fn render(&self, ctx: &mut ViewContext<'_>, out: &mut String) -> AppResult<()> {
        let template = (self.build)(ctx)?;
        template.render_into(out)?;
        Ok(())
    }
}

/// Shorthand for registering a template view.
pub fn template_view<T, F>(build: F) -> Arc<dyn View>
where
    T: Template + 'static,
    F: Fn(&mut ViewContext<'_>) -> AppResult<T> + Send + Sync + 'static,
{
    Arc::new(TemplateView::new(build))
}
