//! Request-scoped controller.
//!
//! `Controller` is an axum extractor built once per request. It owns the
//! request's service cache and data bags, and offers the helpers page
//! handlers share: memoized service lookup, localization, partial
//! rendering, notifications and the common redirect/error results.
//!
//! Result helpers consume the controller and hand its `TempData` to the
//! `ActionResult`, which the flash middleware persists for the next request.

use std::convert::Infallible;
use std::error::Error;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, MatchedPath},
    http::{header::ACCEPT_LANGUAGE, request::Parts, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Serialize;
use serde_json::Value;

use super::context::ServiceCache;
use super::data::{CarriedOver, TempData, ViewData};
use super::notifications::{push_notification, NotificationScope, NotifyType};
use super::routing::{RedirectInstruction, RouteData, SuccessRedirect};
use super::themes::{ActiveTheme, ThemeRegistry};
use super::views::{ViewContext, ViewEngine};
use crate::config::{DEFAULT_ACTION, ERROR_LOG_LABEL, PAGE_NOT_FOUND_VIEW};
use crate::domain::AggregateRoot;
use crate::errors::{AppError, AppResult};
use crate::infra::{Culture, ErrorLogger, Localizer, Repository};
use crate::services::Resolver;

/// Shared collaborators every controller is built from.
pub struct Collaborators {
    pub resolver: Arc<dyn Resolver>,
    pub localizer: Arc<dyn Localizer>,
    pub views: Arc<dyn ViewEngine>,
    pub error_logger: Arc<dyn ErrorLogger>,
    pub themes: Arc<ThemeRegistry>,
    /// Prefix of notification keys
    pub namespace: String,
    pub default_culture: Culture,
}

/// Per-request controller state.
pub struct Controller {
    collaborators: Arc<Collaborators>,
    services: ServiceCache,
    route: RouteData,
    raw_url: String,
    culture: Culture,
    theme: String,
    view_data: ViewData,
    temp_data: TempData,
}

impl Controller {
    pub fn new(collaborators: Arc<Collaborators>, route: RouteData, raw_url: impl Into<String>) -> Self {
        let culture = collaborators.default_culture.clone();
        let theme = collaborators.themes.current();
        Self {
            services: ServiceCache::new(collaborators.resolver.clone()),
            collaborators,
            route,
            raw_url: raw_url.into(),
            culture,
            theme,
            view_data: ViewData::new(),
            temp_data: TempData::new(),
        }
    }

    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Use entries carried over from the previous request.
    pub fn with_temp_data(mut self, temp_data: TempData) -> Self {
        self.temp_data = temp_data;
        self
    }

    pub fn route(&self) -> &RouteData {
        &self.route
    }

    /// Path and query of the current request
    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    pub fn culture(&self) -> &Culture {
        &self.culture
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn view_data(&self) -> &ViewData {
        &self.view_data
    }

    pub fn view_data_mut(&mut self) -> &mut ViewData {
        &mut self.view_data
    }

    pub fn temp_data_mut(&mut self) -> &mut TempData {
        &mut self.temp_data
    }

    pub fn themes(&self) -> &ThemeRegistry {
        &self.collaborators.themes
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// Resolve a capability, at most once per request.
    pub fn service<T: Clone + Send + Sync + 'static>(&mut self) -> AppResult<T> {
        self.services.get::<T>()
    }

    /// Resolve the repository for an aggregate root.
    pub fn repository<E: AggregateRoot>(&mut self) -> AppResult<Arc<dyn Repository<E>>> {
        self.service::<Arc<dyn Repository<E>>>()
    }

    // =========================================================================
    // Localization
    // =========================================================================

    pub fn localize(&self, key: &str) -> String {
        self.localize_with(key, None, &[])
    }

    pub fn localize_args(&self, key: &str, args: &[String]) -> String {
        self.localize_with(key, None, args)
    }

    pub fn localize_in(&self, key: &str, culture: &Culture) -> String {
        self.localize_with(key, Some(culture), &[])
    }

    /// Localized string in `culture`, or the request culture when absent.
    pub fn localize_with(&self, key: &str, culture: Option<&Culture>, args: &[String]) -> String {
        let culture = culture.unwrap_or(&self.culture);
        self.collaborators.localizer.get_string(key, culture, args)
    }

    // =========================================================================
    // Partial rendering
    // =========================================================================

    /// Render a view to a string. An absent or empty name means the current
    /// action. The model is bound for this render only; the previous model is
    /// restored afterwards.
    pub fn render_partial_to_string(&mut self, view_name: Option<&str>, model: Option<Value>) -> AppResult<String> {
        let name = match view_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.route.action.clone(),
        };

        let view = self
            .collaborators
            .views
            .find_partial_view(&self.route, &self.theme, &name)?;

        let previous = std::mem::replace(&mut self.view_data.model, model);
        let mut out = String::new();
        let rendered = {
            let mut ctx = ViewContext::new(
                &self.route,
                &self.view_data,
                &mut self.temp_data,
                &self.culture,
                &self.theme,
                &self.collaborators.namespace,
                self.collaborators.localizer.as_ref(),
            );
            view.render(&mut ctx, &mut out)
        };
        self.view_data.model = previous;

        rendered?;
        tracing::debug!(view = %name, bytes = out.len(), "Rendered partial view");
        Ok(out)
    }

    /// `render_partial_to_string` with a serializable model.
    pub fn render_partial_model<M: Serialize>(&mut self, view_name: Option<&str>, model: &M) -> AppResult<String> {
        let model = to_model(model)?;
        self.render_partial_to_string(view_name, Some(model))
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub fn add_notification(&mut self, severity: NotifyType, message: impl Into<String>, scope: NotificationScope) {
        push_notification(
            &self.collaborators.namespace,
            &mut self.view_data,
            &mut self.temp_data,
            severity,
            message.into(),
            scope,
        );
    }

    /// Success notification; `persist` carries it to the next request.
    pub fn notify_success(&mut self, message: impl Into<String>, persist: bool) {
        self.add_notification(NotifyType::Success, message, NotificationScope::from_persist(persist));
    }

    /// Error notification; `persist` carries it to the next request.
    pub fn notify_error(&mut self, message: impl Into<String>, persist: bool) {
        self.add_notification(NotifyType::Error, message, NotificationScope::from_persist(persist));
    }

    /// Error notification built from an error's message, optionally logged
    /// first.
    pub fn notify_exception(&mut self, error: &(dyn Error + 'static), persist: bool, log: bool) {
        if log {
            self.log_exception(error);
        }
        self.notify_error(error.to_string(), persist);
    }

    pub fn log_exception(&self, error: &(dyn Error + 'static)) {
        self.collaborators.error_logger.log_error(ERROR_LOG_LABEL, error);
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Render a full page with status 200.
    pub fn view(self, view_name: Option<&str>, model: Option<Value>) -> AppResult<ActionResult> {
        self.view_with_status(StatusCode::OK, view_name, model)
    }

    /// `view` with a serializable model.
    pub fn view_model<M: Serialize>(self, view_name: Option<&str>, model: &M) -> AppResult<ActionResult> {
        self.view_model_with_status(StatusCode::OK, view_name, model)
    }

    pub fn view_model_with_status<M: Serialize>(
        self,
        status: StatusCode,
        view_name: Option<&str>,
        model: &M,
    ) -> AppResult<ActionResult> {
        let model = to_model(model)?;
        self.view_with_status(status, view_name, Some(model))
    }

    /// Render a full page with the given status.
    pub fn view_with_status(
        mut self,
        status: StatusCode,
        view_name: Option<&str>,
        model: Option<Value>,
    ) -> AppResult<ActionResult> {
        let body = self.render_partial_to_string(view_name, model)?;
        Ok(ActionResult {
            outcome: Outcome::Page { status, body },
            temp_data: self.temp_data,
        })
    }

    pub fn redirect(self, instruction: RedirectInstruction) -> ActionResult {
        tracing::debug!(location = %instruction.location(), "Redirecting");
        ActionResult {
            outcome: Outcome::Redirect(instruction),
            temp_data: self.temp_data,
        }
    }

    /// Redirect to the success interstitial page.
    pub fn redirect_to_success_page(self, redirect: impl Into<SuccessRedirect>) -> ActionResult {
        let instruction = redirect.into().into_instruction();
        self.redirect(instruction)
    }

    /// Render the `PageNotFound` view with status 404.
    pub fn page_not_found(self) -> AppResult<ActionResult> {
        tracing::debug!(url = %self.raw_url, "Page not found");
        self.view_with_status(StatusCode::NOT_FOUND, Some(PAGE_NOT_FOUND_VIEW), None)
    }

    /// Redirect to the access denied page, passing the requested URL.
    pub fn access_denied(self) -> ActionResult {
        tracing::info!(url = %self.raw_url, "Access denied");
        let instruction = RedirectInstruction::access_denied(self.raw_url.clone());
        self.redirect(instruction)
    }

    /// Switch the site theme and go back to the controller's index.
    pub fn change_template(self, template: Option<&str>) -> ActionResult {
        if let Some(template) = template.filter(|name| !name.is_empty()) {
            self.collaborators.themes.set_current(template);
        }
        let instruction = RedirectInstruction::to_action(DEFAULT_ACTION, self.route.controller.clone());
        self.redirect(instruction)
    }
}

fn to_model<M: Serialize>(model: &M) -> AppResult<Value> {
    serde_json::to_value(model).map_err(|e| AppError::internal(format!("Failed to serialize view model: {}", e)))
}

#[async_trait]
impl<S> FromRequestParts<S> for Controller
where
    Arc<Collaborators>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let collaborators = Arc::<Collaborators>::from_ref(state);

        let route = match parts.extensions.get::<MatchedPath>() {
            Some(matched) => RouteData::from_path(matched.as_str()),
            None => RouteData::from_path(parts.uri.path()),
        };

        let raw_url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        let culture = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(Culture::from_accept_language)
            .unwrap_or_else(|| collaborators.default_culture.clone());

        let theme = match parts.extensions.get::<ActiveTheme>() {
            Some(ActiveTheme(theme)) => theme.clone(),
            None => collaborators.themes.current(),
        };

        let temp_data = parts.extensions.remove::<TempData>().unwrap_or_default();

        tracing::trace!(
            controller = %route.controller,
            action = %route.action,
            culture = %culture,
            theme = %theme,
            "Controller created"
        );

        Ok(Controller::new(collaborators, route, raw_url)
            .with_culture(culture)
            .with_theme(theme)
            .with_temp_data(temp_data))
    }
}

enum Outcome {
    Page { status: StatusCode, body: String },
    Redirect(RedirectInstruction),
}

/// Result of a controller action.
pub struct ActionResult {
    outcome: Outcome,
    temp_data: TempData,
}

impl ActionResult {
    pub fn status(&self) -> StatusCode {
        match &self.outcome {
            Outcome::Page { status, .. } => *status,
            Outcome::Redirect(_) => StatusCode::SEE_OTHER,
        }
    }

    /// Rendered body, for page results
    pub fn body(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Page { body, .. } => Some(body),
            Outcome::Redirect(_) => None,
        }
    }

    /// Redirect instruction, for redirect results
    pub fn redirect_instruction(&self) -> Option<&RedirectInstruction> {
        match &self.outcome {
            Outcome::Page { .. } => None,
            Outcome::Redirect(instruction) => Some(instruction),
        }
    }
}

impl IntoResponse for ActionResult {
    fn into_response(self) -> Response {
        let mut response = match self.outcome {
            Outcome::Page { status, body } => (status, Html(body)).into_response(),
            Outcome::Redirect(instruction) => Redirect::to(&instruction.location()).into_response(),
        };

        response
            .extensions_mut()
            .insert(CarriedOver(self.temp_data.into_carried()));
        response
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::http::Request;
    use serde_json::json;

    use super::*;
    use crate::domain::Note;
    use crate::infra::{MemoryRepository, MockLocalizer};
    use crate::mvc::notifications::notification_key;
    use crate::mvc::views::{View, ViewRegistry};
    use crate::services::{Capability, MockResolver, ServiceRegistry};

    /// Renders the `title` field of the bound model, or a fixed label.
    struct TitleView(&'static str);

    impl View for TitleView {
        fn render(&self, ctx: &mut ViewContext<'_>, out: &mut String) -> AppResult<()> {
            let model: Option<Value> = ctx.model()?;
            match model.as_ref().and_then(|m| m.get("title")).and_then(Value::as_str) {
                Some(title) => out.push_str(title),
                None => out.push_str(self.0),
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        entries: Mutex<Vec<(String, String)>>,
    }

    impl RecordingLogger {
        fn count(&self) -> usize {
            self.entries.lock().unwrap().len()
        }
    }

    impl ErrorLogger for RecordingLogger {
        fn log_error(&self, label: &str, error: &(dyn Error + 'static)) {
            self.entries
                .lock()
                .unwrap()
                .push((label.to_string(), error.to_string()));
        }
    }

    trait Counter: Send + Sync {
        fn value(&self) -> u32;
    }

    struct Fixed;

    impl Counter for Fixed {
        fn value(&self) -> u32 {
            42
        }
    }

    fn views() -> Arc<dyn ViewEngine> {
        Arc::new(
            ViewRegistry::new()
                .register("Notes/Edit", Arc::new(TitleView("edit")))
                .register("Shared/PageNotFound", Arc::new(TitleView("not found"))),
        )
    }

    fn collaborators_with(
        resolver: Arc<dyn Resolver>,
        localizer: Arc<dyn Localizer>,
        logger: Arc<dyn ErrorLogger>,
    ) -> Arc<Collaborators> {
        Arc::new(Collaborators {
            resolver,
            localizer,
            views: views(),
            error_logger: logger,
            themes: Arc::new(ThemeRegistry::new(["default", "compact"], "default")),
            namespace: "app".to_string(),
            default_culture: Culture::new("en-US"),
        })
    }

    fn collaborators() -> Arc<Collaborators> {
        collaborators_with(
            Arc::new(ServiceRegistry::new()),
            Arc::new(MockLocalizer::new()),
            Arc::new(RecordingLogger::default()),
        )
    }

    fn controller(collaborators: Arc<Collaborators>) -> Controller {
        Controller::new(collaborators, RouteData::new("Notes", "Edit"), "/notes/edit/1?x=2")
    }

    #[test]
    fn test_service_resolved_once_per_request() {
        let mut resolver = MockResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|_| Ok(Box::new(Arc::new(Fixed) as Arc<dyn Counter>)));

        let collaborators = collaborators_with(
            Arc::new(resolver),
            Arc::new(MockLocalizer::new()),
            Arc::new(RecordingLogger::default()),
        );
        let mut controller = controller(collaborators);

        let first = controller.service::<Arc<dyn Counter>>().unwrap();
        let second = controller.service::<Arc<dyn Counter>>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.value(), 42);
    }

    #[test]
    fn test_repository_resolved_once_per_request() {
        let mut resolver = MockResolver::new();
        resolver
            .expect_resolve()
            .withf(|capability| *capability == Capability::of::<Arc<dyn Repository<Note>>>())
            .times(1)
            .returning(|_| {
                let notes: Arc<dyn Repository<Note>> =
                    Arc::new(MemoryRepository::with_items([Note::new("Groceries", "milk")]));
                Ok(Box::new(notes))
            });

        let collaborators = collaborators_with(
            Arc::new(resolver),
            Arc::new(MockLocalizer::new()),
            Arc::new(RecordingLogger::default()),
        );
        let mut controller = controller(collaborators);

        let first = controller.repository::<Note>().unwrap();
        let second = controller.repository::<Note>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_service_propagates_resolution_error() {
        let mut controller = controller(collaborators());
        let result = controller.service::<Arc<dyn Counter>>();
        assert!(matches!(result, Err(AppError::Resolution { .. })));
    }

    #[test]
    fn test_notification_scopes_accumulate_independently() {
        let mut controller = controller(collaborators());
        controller.notify_success("now", false);
        controller.notify_success("first", true);
        controller.notify_success("second", true);

        let key = notification_key("app", NotifyType::Success);
        assert_eq!(controller.view_data().bag().list(&key), vec!["now"]);
        assert_eq!(controller.temp_data_mut().take_list(&key), vec!["first", "second"]);
    }

    #[test]
    fn test_notify_exception_logs_once_when_requested() {
        let logger = Arc::new(RecordingLogger::default());
        let collaborators = collaborators_with(
            Arc::new(ServiceRegistry::new()),
            Arc::new(MockLocalizer::new()),
            logger.clone(),
        );
        let mut controller = controller(collaborators);

        let error = AppError::validation("Title is required");
        controller.notify_exception(&error, false, true);
        assert_eq!(logger.count(), 1);
        assert_eq!(logger.entries.lock().unwrap()[0].0, ERROR_LOG_LABEL);

        controller.notify_exception(&error, true, false);
        assert_eq!(logger.count(), 1);

        let key = notification_key("app", NotifyType::Error);
        assert_eq!(controller.view_data().bag().list(&key), vec!["Title is required"]);
        assert_eq!(controller.temp_data_mut().take_list(&key), vec!["Title is required"]);
    }

    #[test]
    fn test_partial_defaults_to_action_name() {
        let mut controller = controller(collaborators());
        let html = controller.render_partial_to_string(None, None).unwrap();
        assert_eq!(html, "edit");

        let html = controller.render_partial_to_string(Some(""), None).unwrap();
        assert_eq!(html, "edit");
    }

    #[test]
    fn test_partial_restores_previous_model() {
        let mut controller = controller(collaborators());
        controller.view_data_mut().model = Some(json!({ "title": "outer" }));

        let html = controller
            .render_partial_to_string(Some("Edit"), Some(json!({ "title": "inner" })))
            .unwrap();

        assert_eq!(html, "inner");
        assert_eq!(controller.view_data().model, Some(json!({ "title": "outer" })));
    }

    #[test]
    fn test_partial_missing_view() {
        let mut controller = controller(collaborators());
        let result = controller.render_partial_to_string(Some("Nope"), None);
        assert!(matches!(result, Err(AppError::ViewNotFound(name)) if name == "Nope"));
    }

    #[test]
    fn test_localize_uses_ambient_culture() {
        let mut localizer = MockLocalizer::new();
        localizer
            .expect_get_string()
            .withf(|key, culture, args| key == "greeting" && culture.as_str() == "fr-FR" && args.is_empty())
            .times(1)
            .returning(|_, _, _| "Bonjour".to_string());
        localizer
            .expect_get_string()
            .withf(|key, culture, args| key == "greeting" && culture.as_str() == "zh-CN" && args.len() == 1)
            .times(1)
            .returning(|_, _, _| "你好".to_string());

        let collaborators = collaborators_with(
            Arc::new(ServiceRegistry::new()),
            Arc::new(localizer),
            Arc::new(RecordingLogger::default()),
        );
        let controller = controller(collaborators).with_culture(Culture::new("fr-FR"));

        assert_eq!(controller.localize_with("greeting", None, &[]), "Bonjour");
        assert_eq!(
            controller.localize_with("greeting", Some(&Culture::new("zh-CN")), &["Ann".to_string()]),
            "你好"
        );
    }

    #[test]
    fn test_page_not_found_is_404() {
        let result = controller(collaborators()).page_not_found().unwrap();
        assert_eq!(result.status(), StatusCode::NOT_FOUND);
        assert_eq!(result.body(), Some("not found"));
    }

    #[test]
    fn test_access_denied_passes_raw_url() {
        let result = controller(collaborators()).access_denied();
        let instruction = result.redirect_instruction().unwrap();
        assert_eq!(instruction.controller, "Security");
        assert_eq!(instruction.get("pageUrl"), Some("/notes/edit/1?x=2"));
    }

    #[test]
    fn test_change_template_switches_known_theme() {
        let collaborators = collaborators();
        let result = controller(collaborators.clone()).change_template(Some("compact"));

        assert_eq!(collaborators.themes.current(), "compact");
        assert_eq!(result.redirect_instruction().unwrap().location(), "/notes/index");

        controller(collaborators.clone()).change_template(Some("neon"));
        assert_eq!(collaborators.themes.current(), "compact");
    }

    #[test]
    fn test_success_redirect_result() {
        let result = controller(collaborators())
            .redirect_to_success_page(SuccessRedirect::new("Saved").returning_to("Index", "Notes"));

        assert_eq!(result.status(), StatusCode::SEE_OTHER);
        let instruction = result.redirect_instruction().unwrap();
        assert_eq!(instruction.action, "SuccessPage");
        assert_eq!(instruction.get("retController"), Some("Notes"));
    }

    #[test]
    fn test_response_carries_persisted_notifications() {
        let mut controller = controller(collaborators());
        controller.notify_success("Saved", true);
        controller.notify_error("shown now", false);

        let response = controller
            .redirect(RedirectInstruction::to_action("Index", "Notes"))
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let carried = response.extensions().get::<CarriedOver>().unwrap();
        assert_eq!(carried.0.len(), 1);
        assert_eq!(
            carried.0.get(&notification_key("app", NotifyType::Success)),
            Some(&json!(["Saved"]))
        );
    }

    #[tokio::test]
    async fn test_extractor_reads_request() {
        let collaborators = collaborators();
        let (mut parts, _) = Request::builder()
            .uri("/notes/edit/5?tab=body")
            .header(ACCEPT_LANGUAGE, "zh-CN,zh;q=0.9")
            .body(())
            .unwrap()
            .into_parts();

        let mut incoming = TempData::new();
        incoming.set("carried", json!(true));
        parts.extensions.insert(incoming);
        parts.extensions.insert(ActiveTheme("compact".to_string()));

        let mut controller = Controller::from_request_parts(&mut parts, &collaborators)
            .await
            .unwrap();

        assert_eq!(controller.route(), &RouteData::new("Notes", "Edit"));
        assert_eq!(controller.raw_url(), "/notes/edit/5?tab=body");
        assert_eq!(controller.culture().as_str(), "zh-CN");
        assert_eq!(controller.theme(), "compact");
        assert_eq!(controller.temp_data_mut().peek("carried"), Some(&json!(true)));
        assert!(parts.extensions.get::<TempData>().is_none());
    }

    #[tokio::test]
    async fn test_extractor_defaults() {
        let collaborators = collaborators();
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();

        let controller = Controller::from_request_parts(&mut parts, &collaborators)
            .await
            .unwrap();

        assert_eq!(controller.route(), &RouteData::new("Home", "Index"));
        assert_eq!(controller.culture().as_str(), "en-US");
        assert_eq!(controller.theme(), "default");
    }
}
